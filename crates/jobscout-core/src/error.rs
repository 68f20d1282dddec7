use thiserror::Error;

/// Application-wide error types for jobscout.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (bad status, unreadable body, client setup).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Markup or selector could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if this is a network-layer failure of a single page fetch.
    ///
    /// The fetch pipeline skips such a page and keeps going; every other
    /// error aborts the whole query.
    pub fn is_page_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }
}
