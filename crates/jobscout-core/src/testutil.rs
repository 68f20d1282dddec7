//! Test utilities: mock implementations of the core traits and HTML fixtures.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{DEFAULT_SEARCH_URL, SearchConfig};
use crate::error::AppError;
use crate::models::{JobRecord, PageExtraction};
use crate::traits::{Extractor, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued responses and records requested URLs.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns an empty page.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs passed to `fetch`, in call order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(String::new())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that reads a page as `;`-separated listing titles.
///
/// `"Rust Dev;Go Dev"` yields two cards; an empty page yields none.
#[derive(Clone)]
pub struct MockExtractor;

impl Extractor for MockExtractor {
    fn extract(&self, html: &str) -> PageExtraction {
        let records: Vec<JobRecord> = html
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|title| JobRecord {
                title: title.to_string(),
                ..JobRecord::default()
            })
            .collect();
        PageExtraction {
            cards: records.len(),
            records,
        }
    }
}

/// Search config pointing at the default source with no inter-page pause.
pub fn no_delay_config() -> SearchConfig {
    SearchConfig::new(DEFAULT_SEARCH_URL)
        .unwrap()
        .with_page_delay(Duration::ZERO)
}

// ---------------------------------------------------------------------------
// HTML fixtures
// ---------------------------------------------------------------------------

/// A listing card in the current `div.base-card` layout.
///
/// Passing `None` for `company` leaves out every company element.
pub fn base_card(
    title: &str,
    company: Option<&str>,
    location: &str,
    href: &str,
    posted: &str,
) -> String {
    let company = company
        .map(|c| {
            format!(
                r#"<h4 class="base-search-card__subtitle">
                     <a class="hidden-nested-link" href="https://www.linkedin.com/company/x">{c}</a>
                   </h4>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="base-card relative w-full job-search-card">
             <a class="base-card__full-link" href="{href}"><span class="sr-only">{title}</span></a>
             <div class="base-search-card__info">
               <h3 class="base-search-card__title">
                 {title}
               </h3>
               {company}
               <div class="base-search-card__metadata">
                 <span class="job-search-card__location">{location}</span>
                 <time class="job-search-card__listdate" datetime="{posted}">1 week ago</time>
               </div>
             </div>
           </div>"#
    )
}

/// A listing card in the older `li.result-card` layout.
pub fn result_card(title: &str, company: &str, location: &str, href: &str) -> String {
    format!(
        r#"<li class="result-card job-result-card">
             <a class="result-card__full-card-link" href="{href}">{title}</a>
             <h3 class="result-card__title">{title}</h3>
             <h4 class="result-card__subtitle">{company}</h4>
             <span class="job-result-card__location">{location}</span>
             <time>2 days ago</time>
           </li>"#
    )
}

/// Wrap cards in a minimal results page.
pub fn results_page(cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
           <html><head><title>Jobs</title></head>
           <body><ul class="jobs-search__results-list">{}</ul></body></html>"#,
        cards
            .iter()
            .map(|c| format!("<li>{c}</li>"))
            .collect::<String>()
    )
}
