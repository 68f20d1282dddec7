pub mod extractor;
pub mod fetcher;

pub use extractor::{CardExtractor, ExtractionRules, FieldChain, FieldRule};
pub use fetcher::{DEFAULT_FETCH_TIMEOUT, ReqwestFetcher};
