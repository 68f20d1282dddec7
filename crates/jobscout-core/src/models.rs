use serde::{Deserialize, Serialize};

/// Placeholder stored in a [`JobRecord`] field whose data could not be found.
pub const NOT_AVAILABLE: &str = "N/A";

/// Location searched when the caller does not provide one.
pub const DEFAULT_LOCATION: &str = "Caruaru, Pernambuco, Brasil";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Wrap an optional field value, falling back to [`NOT_AVAILABLE`].
pub fn or_not_available(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(not_available)
}

/// One job listing extracted from a results page.
///
/// Every field is always populated: data that could not be found holds
/// [`NOT_AVAILABLE`], so the record serializes with exactly five string
/// fields no matter how much of the card was readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default = "not_available")]
    pub title: String,
    #[serde(default = "not_available")]
    pub company: String,
    #[serde(default = "not_available")]
    pub location: String,
    /// URL of the listing, resolved against the search page when possible.
    #[serde(default = "not_available")]
    pub link: String,
    /// Posting date as published by the source (ISO date or relative text).
    #[serde(default = "not_available")]
    pub posted_date: String,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            title: not_available(),
            company: not_available(),
            location: not_available(),
            link: not_available(),
            posted_date: not_available(),
        }
    }
}

impl JobRecord {
    /// Coerce every field to its trimmed text or the sentinel.
    ///
    /// Applying it twice yields the same record.
    pub fn sanitized(self) -> Self {
        Self {
            title: or_not_available(Some(self.title)),
            company: or_not_available(Some(self.company)),
            location: or_not_available(Some(self.location)),
            link: or_not_available(Some(self.link)),
            posted_date: or_not_available(Some(self.posted_date)),
        }
    }
}

/// Sanitize a whole result list, preserving order.
pub fn sanitize_records(records: Vec<JobRecord>) -> Vec<JobRecord> {
    records.into_iter().map(JobRecord::sanitized).collect()
}

/// What the extractor found on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// Number of listing cards located on the page.
    pub cards: usize,
    pub records: Vec<JobRecord>,
}

/// A search to run against the listing source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub keywords: String,
    pub location: String,
    /// Number of result pages to walk, always at least 1.
    pub pages: u32,
}

impl FetchRequest {
    /// Build a request, clamping the page count to at least 1.
    pub fn new(keywords: impl Into<String>, location: impl Into<String>, pages: i64) -> Self {
        Self {
            keywords: keywords.into(),
            location: location.into(),
            pages: u32::try_from(pages.max(1)).unwrap_or(u32::MAX),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.keywords, &self.location, self.pages)
    }
}

/// Normalized identity of a search for caching purposes.
///
/// Query and location are trimmed and lower-cased, so requests that differ
/// only in case or surrounding whitespace share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    location: String,
    pages: u32,
}

impl CacheKey {
    pub fn new(query: &str, location: &str, pages: u32) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            location: location.trim().to_lowercase(),
            pages,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }
}
