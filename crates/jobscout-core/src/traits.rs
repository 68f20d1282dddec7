use std::future::Future;

use crate::error::AppError;
use crate::models::PageExtraction;

/// Fetches a raw results page from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Turns one results page into job records.
///
/// Implementations are best-effort: missing fields become the sentinel
/// and a page without listings yields an empty [`PageExtraction`].
/// Nothing here is an error.
pub trait Extractor: Send + Sync + Clone {
    fn extract(&self, html: &str) -> PageExtraction;
}
