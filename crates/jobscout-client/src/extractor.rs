//! Job card extraction from results pages.
//!
//! The source serves several historical markup variants, so nothing here
//! relies on a single layout. Cards are located with an ordered list of
//! selectors (first one that matches wins), and every field of a card is
//! resolved through its own ordered chain of [`FieldRule`]s. A field whose
//! chain comes up empty is stored as `"N/A"`. Every card located on a
//! page yields exactly one record.

use std::sync::Arc;

use jobscout_core::error::AppError;
use jobscout_core::models::{JobRecord, PageExtraction, or_not_available};
use jobscout_core::traits::Extractor;
use scraper::{ElementRef, Html, Selector};
use url::Url;

fn parse_selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::ParseError(format!("Invalid selector '{css}': {e}")))
}

/// Visible text of an element: text nodes trimmed and joined by one space.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
enum Probe {
    Text,
    Attr(String),
}

/// One strategy for reading a field: a selector plus what to read from
/// the matched element.
#[derive(Debug, Clone)]
pub struct FieldRule {
    selector: Selector,
    probe: Probe,
}

impl FieldRule {
    /// Read the text content of the first matching element that has any.
    pub fn text(css: &str) -> Result<Self, AppError> {
        Ok(Self {
            selector: parse_selector(css)?,
            probe: Probe::Text,
        })
    }

    /// Read an attribute of the first matching element that carries it.
    pub fn attr(css: &str, name: &str) -> Result<Self, AppError> {
        Ok(Self {
            selector: parse_selector(css)?,
            probe: Probe::Attr(name.to_string()),
        })
    }

    fn apply(&self, card: ElementRef<'_>) -> Option<String> {
        card.select(&self.selector).find_map(|element| {
            let value = match &self.probe {
                Probe::Text => element_text(element),
                Probe::Attr(name) => element.value().attr(name)?.trim().to_string(),
            };
            (!value.is_empty()).then_some(value)
        })
    }
}

/// Ordered fallback strategies for one field; the first hit wins.
#[derive(Debug, Clone, Default)]
pub struct FieldChain(Vec<FieldRule>);

impl FieldChain {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self(rules)
    }

    pub fn resolve(&self, card: ElementRef<'_>) -> Option<String> {
        self.0.iter().find_map(|rule| rule.apply(card))
    }
}

/// Everything the extractor needs to know about a page layout.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// Card selectors, primary first. Later ones are only consulted when
    /// every earlier one matched nothing.
    pub cards: Vec<Selector>,
    pub title: FieldChain,
    pub company: FieldChain,
    pub location: FieldChain,
    pub link: FieldChain,
    pub posted_date: FieldChain,
}

impl ExtractionRules {
    /// Rules for the LinkedIn guest job search, current and legacy layouts.
    pub fn linkedin() -> Result<Self, AppError> {
        Ok(Self {
            cards: vec![parse_selector("div.base-card")?, parse_selector("li.result-card")?],
            title: FieldChain::new(vec![
                FieldRule::text("h3.base-search-card__title")?,
                FieldRule::text("h3")?,
            ]),
            company: FieldChain::new(vec![
                FieldRule::text("h4.base-search-card__subtitle")?,
                FieldRule::text("a.hidden-nested-link")?,
                FieldRule::text("h4")?,
            ]),
            location: FieldChain::new(vec![
                FieldRule::text("span.job-search-card__location")?,
                FieldRule::text("span.job-result-card__location")?,
            ]),
            link: FieldChain::new(vec![
                FieldRule::attr("a.base-card__full-link", "href")?,
                FieldRule::attr("a[href]", "href")?,
            ]),
            posted_date: FieldChain::new(vec![
                FieldRule::attr("time", "datetime")?,
                FieldRule::text("time")?,
            ]),
        })
    }
}

/// HTML extractor built on `scraper`.
///
/// Links are resolved against `base_url`, so relative hrefs come out as
/// absolute URLs of the source site.
#[derive(Clone)]
pub struct CardExtractor {
    rules: Arc<ExtractionRules>,
    base_url: Url,
}

impl CardExtractor {
    pub fn new(base_url: Url) -> Result<Self, AppError> {
        Ok(Self::with_rules(base_url, ExtractionRules::linkedin()?))
    }

    pub fn with_rules(base_url: Url, rules: ExtractionRules) -> Self {
        Self {
            rules: Arc::new(rules),
            base_url,
        }
    }

    fn find_cards<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.rules.cards {
            let cards: Vec<_> = document.select(selector).collect();
            if !cards.is_empty() {
                return cards;
            }
        }
        Vec::new()
    }

    /// Absolute link, or the raw href when it cannot be joined onto `base_url`.
    fn resolve_link(&self, href: String) -> String {
        match self.base_url.join(&href) {
            Ok(url) => url.into(),
            Err(e) => {
                tracing::debug!(href = %href, error = %e, "Keeping unresolvable job link as-is");
                href
            }
        }
    }

    fn extract_card(&self, card: ElementRef<'_>) -> JobRecord {
        let link = self.rules.link.resolve(card).map(|href| self.resolve_link(href));

        JobRecord {
            title: or_not_available(self.rules.title.resolve(card)),
            company: or_not_available(self.rules.company.resolve(card)),
            location: or_not_available(self.rules.location.resolve(card)),
            link: or_not_available(link),
            posted_date: or_not_available(self.rules.posted_date.resolve(card)),
        }
    }
}

impl Extractor for CardExtractor {
    fn extract(&self, html: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        let cards = self.find_cards(&document);

        PageExtraction {
            cards: cards.len(),
            records: cards.into_iter().map(|card| self.extract_card(card)).collect(),
        }
    }
}
