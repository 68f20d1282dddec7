use std::num::NonZeroUsize;
use std::time::Duration;

use url::Url;

use crate::error::AppError;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 128;
pub const DEFAULT_SEARCH_URL: &str = "https://www.linkedin.com/jobs/search";
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2000;
/// Listings per results page on the source; drives the `start` offset.
pub const PAGE_SIZE: u32 = 25;

const DEFAULT_GEO_ID: &str = "106236613";
const DEFAULT_TRK: &str = "public_jobs_jobs-search-bar_search-submit";

/// Capacity and freshness limits of the result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: NonZeroUsize,
}

impl CacheConfig {
    /// Both limits must be positive.
    pub fn new(ttl: Duration, max_entries: usize) -> Result<Self, AppError> {
        if ttl.is_zero() {
            return Err(AppError::ConfigError(
                "cache TTL must be greater than zero".into(),
            ));
        }
        let max_entries = NonZeroUsize::new(max_entries).ok_or_else(|| {
            AppError::ConfigError("cache max entries must be at least 1".into())
        })?;
        Ok(Self { ttl, max_entries })
    }

    /// Read configuration from environment variables.
    ///
    /// - `JOBSCOUT_CACHE_TTL_SECONDS` (optional, defaults to 300)
    /// - `JOBSCOUT_CACHE_MAX_ENTRIES` (optional, defaults to 128)
    pub fn from_env() -> Result<Self, AppError> {
        let ttl_secs = positive_env("JOBSCOUT_CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECS)?;
        let max_entries = positive_env("JOBSCOUT_CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES as u64)?;
        let max_entries = usize::try_from(max_entries).map_err(|_| {
            AppError::ConfigError(format!("JOBSCOUT_CACHE_MAX_ENTRIES '{max_entries}' is too large"))
        })?;
        Self::new(Duration::from_secs(ttl_secs), max_entries)
    }
}


/// Where and how politely to walk the listing source.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub search_url: Url,
    pub geo_id: String,
    pub trk: String,
    /// Pause between consecutive page fetches of one query.
    pub page_delay: Duration,
}

impl SearchConfig {
    pub fn new(search_url: &str) -> Result<Self, AppError> {
        let search_url = Url::parse(search_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid search URL '{search_url}': {e}")))?;
        Ok(Self {
            search_url,
            geo_id: DEFAULT_GEO_ID.to_string(),
            trk: DEFAULT_TRK.to_string(),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        })
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Read configuration from environment variables.
    ///
    /// - `JOBSCOUT_SEARCH_URL` (optional, defaults to the LinkedIn guest search)
    /// - `JOBSCOUT_PAGE_DELAY_MS` (optional, defaults to 2000)
    pub fn from_env() -> Result<Self, AppError> {
        let url = std::env::var("JOBSCOUT_SEARCH_URL").unwrap_or_else(|_| DEFAULT_SEARCH_URL.into());
        let delay_ms = match std::env::var("JOBSCOUT_PAGE_DELAY_MS") {
            Err(_) => DEFAULT_PAGE_DELAY_MS,
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid JOBSCOUT_PAGE_DELAY_MS '{raw}': must be a non-negative integer"
                ))
            })?,
        };
        Ok(Self::new(&url)?.with_page_delay(Duration::from_millis(delay_ms)))
    }
}

fn positive_env(name: &str, default: u64) -> Result<u64, AppError> {
    parse_positive(name, std::env::var(name).ok(), default)
}

fn parse_positive(name: &str, raw: Option<String>, default: u64) -> Result<u64, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let parsed: u64 = raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!("Invalid {name} '{raw}': must be a positive integer"))
    })?;
    if parsed == 0 {
        return Err(AppError::ConfigError(format!("{name} must be at least 1")));
    }
    Ok(parsed)
}
