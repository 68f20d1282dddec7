use url::Url;

use crate::config::{PAGE_SIZE, SearchConfig};
use crate::error::AppError;
use crate::models::{FetchRequest, JobRecord};
use crate::traits::{Extractor, Fetcher};

/// What happened to a single results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was fetched and listing cards were found on it.
    Extracted {
        cards: usize,
        records: usize,
    },
    /// The page was fetched but neither card layout matched anything.
    NoCards,
    /// The fetch failed at the network layer; the page was skipped.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Zero-based page index.
    pub page: u32,
    pub outcome: PageOutcome,
}

/// Records gathered across all pages, plus per-page diagnostics.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub records: Vec<JobRecord>,
    pub pages: Vec<PageReport>,
}

impl FetchReport {
    pub fn failed_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Failed { .. }))
            .count()
    }

    pub fn empty_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.outcome == PageOutcome::NoCards)
            .count()
    }
}

/// Walks the paginated search results: fetch → extract → accumulate.
///
/// A page whose fetch fails at the network layer contributes nothing and
/// the walk moves on; only errors that make the fetcher itself unusable
/// abort the query.
#[derive(Clone)]
pub struct FetchOrchestrator<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    fetcher: F,
    extractor: E,
    config: SearchConfig,
}

impl<F, E> FetchOrchestrator<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    pub fn new(fetcher: F, extractor: E, config: SearchConfig) -> Self {
        Self {
            fetcher,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Build the URL of one results page.
    pub fn page_url(&self, request: &FetchRequest, page: u32) -> Url {
        let mut url = self.config.search_url.clone();
        url.query_pairs_mut()
            .append_pair("keywords", &request.keywords)
            .append_pair("location", &request.location)
            .append_pair("geoId", &self.config.geo_id)
            .append_pair("trk", &self.config.trk)
            .append_pair("position", "1")
            .append_pair("pageNum", &page.to_string())
            .append_pair("start", &(u64::from(page) * u64::from(PAGE_SIZE)).to_string());
        url
    }

    /// Fetch every requested page and return the records in page order.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Vec<JobRecord>, AppError> {
        Ok(self.fetch_report(request).await?.records)
    }

    /// Like [`fetch`](Self::fetch), also reporting what happened to each page.
    pub async fn fetch_report(&self, request: &FetchRequest) -> Result<FetchReport, AppError> {
        let mut report = FetchReport::default();
        let pages = request.pages.max(1);

        tracing::info!(
            keywords = %request.keywords,
            location = %request.location,
            pages,
            "Searching job listings"
        );

        for page in 0..pages {
            let url = self.page_url(request, page);
            tracing::info!(page = page + 1, "Fetching results page");

            let outcome = match self.fetcher.fetch(url.as_str()).await {
                Ok(html) => {
                    let extraction = self.extractor.extract(&html);
                    if extraction.cards == 0 {
                        tracing::warn!(page = page + 1, "No job cards found on page");
                        PageOutcome::NoCards
                    } else {
                        tracing::info!(
                            page = page + 1,
                            cards = extraction.cards,
                            records = extraction.records.len(),
                            "Extracted job cards"
                        );
                        let outcome = PageOutcome::Extracted {
                            cards: extraction.cards,
                            records: extraction.records.len(),
                        };
                        report.records.extend(extraction.records);
                        outcome
                    }
                }
                Err(e) if e.is_page_recoverable() => {
                    tracing::warn!(page = page + 1, error = %e, "Skipping page after fetch failure");
                    PageOutcome::Failed {
                        error: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            report.pages.push(PageReport { page, outcome });

            if page + 1 < pages && !self.config.page_delay.is_zero() {
                tracing::debug!(
                    sleep_ms = %self.config.page_delay.as_millis(),
                    "Pausing before next page"
                );
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        tracing::info!(
            records = report.records.len(),
            failed_pages = report.failed_pages(),
            empty_pages = report.empty_pages(),
            "Search complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::testutil::*;

    fn orchestrator(fetcher: MockFetcher) -> FetchOrchestrator<MockFetcher, MockExtractor> {
        FetchOrchestrator::new(fetcher, MockExtractor, no_delay_config())
    }

    fn titles(records: &[JobRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn page_url_carries_offset_and_page_number() {
        let orch = orchestrator(MockFetcher::new(""));
        let request = FetchRequest::new("Rust Developer", "Recife", 3);

        let url = orch.page_url(&request, 2);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("keywords".into(), "Rust Developer".into())));
        assert!(pairs.contains(&("location".into(), "Recife".into())));
        assert!(pairs.contains(&("geoId".into(), "106236613".into())));
        assert!(pairs.contains(&("position".into(), "1".into())));
        assert!(pairs.contains(&("pageNum".into(), "2".into())));
        assert!(pairs.contains(&("start".into(), "50".into())));
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let fetcher = MockFetcher::with_responses(vec![
            Ok("Rust Dev;Go Dev".into()),
            Ok("Python Dev".into()),
        ]);
        let orch = orchestrator(fetcher.clone());

        let records = orch
            .fetch(&FetchRequest::new("dev", "Recife", 2))
            .await
            .unwrap();

        assert_eq!(titles(&records), vec!["Rust Dev", "Go Dev", "Python Dev"]);
        let urls = fetcher.requested_urls();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("start=0"));
        assert!(urls[1].contains("start=25"));
    }

    #[tokio::test]
    async fn failed_page_is_skipped() {
        let fetcher = MockFetcher::with_responses(vec![
            Ok("First".into()),
            Err(AppError::Timeout(10)),
            Ok("Third".into()),
        ]);
        let orch = orchestrator(fetcher);

        let report = orch
            .fetch_report(&FetchRequest::new("", "Recife", 3))
            .await
            .unwrap();

        assert_eq!(titles(&report.records), vec!["First", "Third"]);
        assert_eq!(report.failed_pages(), 1);
        assert!(matches!(
            report.pages[1].outcome,
            PageOutcome::Failed { ref error } if error.contains("timed out")
        ));
    }

    #[tokio::test]
    async fn every_page_failing_yields_empty_result() {
        let fetcher = MockFetcher::with_responses(vec![
            Err(AppError::HttpError("HTTP 429".into())),
            Err(AppError::NetworkError("reset".into())),
        ]);
        let orch = orchestrator(fetcher);

        let records = orch
            .fetch(&FetchRequest::new("", "Recife", 2))
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn page_without_cards_is_reported_separately() {
        let fetcher = MockFetcher::with_responses(vec![
            Ok("".into()),
            Err(AppError::HttpError("HTTP 500".into())),
        ]);
        let orch = orchestrator(fetcher);

        let report = orch
            .fetch_report(&FetchRequest::new("", "Recife", 2))
            .await
            .unwrap();

        assert_eq!(report.pages[0].outcome, PageOutcome::NoCards);
        assert_eq!(report.empty_pages(), 1);
        assert_eq!(report.failed_pages(), 1);
    }

    #[tokio::test]
    async fn unrecoverable_fetch_error_aborts_query() {
        let fetcher = MockFetcher::with_responses(vec![
            Ok("First".into()),
            Err(AppError::ConfigError("client unusable".into())),
            Ok("Third".into()),
        ]);
        let orch = orchestrator(fetcher.clone());

        let err = orch
            .fetch(&FetchRequest::new("", "Recife", 3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert_eq!(fetcher.requested_urls().len(), 2);
    }

    #[tokio::test]
    async fn delay_applies_between_pages_only() {
        let config = no_delay_config().with_page_delay(Duration::from_millis(60));
        let orch = FetchOrchestrator::new(MockFetcher::new("A"), MockExtractor, config);

        let start = Instant::now();
        orch.fetch(&FetchRequest::new("", "Recife", 1))
            .await
            .unwrap();
        assert!(
            start.elapsed() < Duration::from_millis(60),
            "single page must not sleep, elapsed: {:?}",
            start.elapsed()
        );

        let start = Instant::now();
        orch.fetch(&FetchRequest::new("", "Recife", 3))
            .await
            .unwrap();
        assert!(
            start.elapsed() >= Duration::from_millis(120),
            "three pages need two pauses, elapsed: {:?}",
            start.elapsed()
        );
    }
}
