use std::fmt;
use std::sync::Arc;

use crate::cache::ResultCache;
use crate::error::AppError;
use crate::models::{FetchRequest, JobRecord, sanitize_records};
use crate::search::FetchOrchestrator;
use crate::traits::{Extractor, Fetcher};

/// Whether a query was answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn served_from_cache(self) -> bool {
        self == CacheStatus::Hit
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub records: Vec<JobRecord>,
    pub cache_status: CacheStatus,
}

/// Cache-aside front for the listing search.
///
/// Looks the normalized request up in the shared cache; on a miss runs the
/// full fetch, sanitizes the records and stores them. A failed fetch is
/// returned as-is and leaves the cache untouched.
pub struct QueryService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    cache: Arc<ResultCache>,
    orchestrator: FetchOrchestrator<F, E>,
}

impl<F, E> Clone for QueryService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            orchestrator: self.orchestrator.clone(),
        }
    }
}

impl<F, E> QueryService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    pub fn new(cache: Arc<ResultCache>, orchestrator: FetchOrchestrator<F, E>) -> Self {
        Self {
            cache,
            orchestrator,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub async fn query(&self, request: &FetchRequest) -> Result<QueryOutcome, AppError> {
        let key = request.cache_key();

        if let Some(records) = self.cache.get(&key) {
            tracing::info!(records = records.len(), cache = "HIT", "Serving cached results");
            return Ok(QueryOutcome {
                records,
                cache_status: CacheStatus::Hit,
            });
        }

        let records = sanitize_records(self.orchestrator.fetch(request).await?);
        self.cache.put(key, records.clone());
        tracing::info!(records = records.len(), cache = "MISS", "Fetched fresh results");

        Ok(QueryOutcome {
            records,
            cache_status: CacheStatus::Miss,
        })
    }
}
