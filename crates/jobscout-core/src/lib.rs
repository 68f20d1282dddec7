pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod service;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use cache::{CacheStats, CacheStore, ResultCache};
pub use config::{CacheConfig, SearchConfig};
pub use error::AppError;
pub use models::{
    CacheKey, DEFAULT_LOCATION, FetchRequest, JobRecord, NOT_AVAILABLE, PageExtraction,
    sanitize_records,
};
pub use search::{FetchOrchestrator, FetchReport, PageOutcome, PageReport};
pub use service::{CacheStatus, QueryOutcome, QueryService};
pub use traits::{Extractor, Fetcher};
