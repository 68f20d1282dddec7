use serde::{Deserialize, Serialize};

use jobscout_core::cache::CacheStats;
use jobscout_core::models::{DEFAULT_LOCATION, FetchRequest, JobRecord};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    /// Free-text keywords (default: empty, i.e. every category)
    pub query: Option<String>,
    /// Location to search in (default: "Caruaru, Pernambuco, Brasil")
    pub location: Option<String>,
    /// Result pages to walk; values below 1 are treated as 1 (default: 1)
    pub num_pages: Option<i64>,
}

impl SearchRequest {
    pub fn into_fetch_request(self) -> FetchRequest {
        FetchRequest::new(
            self.query.unwrap_or_default(),
            self.location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            self.num_pages.unwrap_or(1),
        )
    }
}

/// One job listing. Fields that could not be found are "N/A".
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobResponse {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub posted_date: String,
}

impl From<JobRecord> for JobResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            title: job.title,
            company: job.company,
            location: job.location,
            link: job.link,
            posted_date: job.posted_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Health & cache
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache_entries: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub entries: usize,
    pub max_entries: usize,
    pub ttl_seconds: u64,
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(stats: CacheStats, max_entries: usize, ttl_seconds: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            evictions: stats.evictions,
            entries: stats.entries,
            max_entries,
            ttl_seconds,
            hit_rate: stats.hit_rate(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
