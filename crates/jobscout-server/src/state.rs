use std::sync::Arc;

use jobscout_client::{CardExtractor, ReqwestFetcher};
use jobscout_core::{AppError, FetchOrchestrator, QueryService, ResultCache, SearchConfig};

pub type JobSearchService = QueryService<ReqwestFetcher, CardExtractor>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub search: JobSearchService,
}

impl AppState {
    /// Wire the HTTP fetcher and card extractor behind the given cache.
    pub fn new(cache: Arc<ResultCache>, config: SearchConfig) -> Result<Self, AppError> {
        let fetcher = ReqwestFetcher::new()?;
        let extractor = CardExtractor::new(config.search_url.clone())?;
        let orchestrator = FetchOrchestrator::new(fetcher, extractor, config);

        Ok(Self {
            search: QueryService::new(cache, orchestrator),
        })
    }
}
