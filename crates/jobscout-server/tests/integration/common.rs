use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use tokio::net::TcpListener;

use jobscout_core::{CacheConfig, ResultCache, SearchConfig};
use jobscout_server::routes;
use jobscout_server::state::AppState;

/// One canned results page served by the stub source.
#[derive(Clone)]
pub struct StubPage {
    pub status: StatusCode,
    pub html: String,
}

impl StubPage {
    pub fn ok(html: String) -> Self {
        Self {
            status: StatusCode::OK,
            html,
        }
    }

    pub fn error(status: StatusCode) -> Self {
        Self {
            status,
            html: String::new(),
        }
    }
}

#[derive(Clone)]
struct StubSource {
    pages: Arc<Vec<StubPage>>,
    hits: Arc<AtomicUsize>,
}

pub struct TestApp {
    pub router: Router,
    /// Number of page requests that reached the stub source.
    pub source_hits: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn source_hits(&self) -> usize {
        self.source_hits.load(Ordering::SeqCst)
    }
}

async fn stub_search(
    State(source): State<StubSource>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    source.hits.fetch_add(1, Ordering::SeqCst);
    let page: usize = params
        .get("pageNum")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);
    match source.pages.get(page) {
        Some(stub) => (stub.status, Html(stub.html.clone())),
        None => (StatusCode::OK, Html(String::new())),
    }
}

/// Serve the given pages as a paginated job search on an ephemeral port.
async fn spawn_source(pages: Vec<StubPage>) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let source = StubSource {
        pages: Arc::new(pages),
        hits: Arc::clone(&hits),
    };
    let app = Router::new()
        .route("/jobs/search", get(stub_search))
        .with_state(source);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub source");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub source crashed");
    });

    (format!("http://{addr}/jobs/search"), hits)
}

fn build_app(search_url: &str, hits: Arc<AtomicUsize>) -> TestApp {
    let cache = Arc::new(ResultCache::new(
        CacheConfig::new(Duration::from_secs(300), 16).expect("valid cache config"),
    ));
    let config = SearchConfig::new(search_url)
        .expect("valid search URL")
        .with_page_delay(Duration::ZERO);
    let state = Arc::new(AppState::new(cache, config).expect("Failed to build app state"));

    TestApp {
        router: routes::router(state),
        source_hits: hits,
    }
}

/// App backed by a stub source serving `pages` in order.
pub async fn setup_test_app(pages: Vec<StubPage>) -> TestApp {
    let (url, hits) = spawn_source(pages).await;
    build_app(&url, hits)
}

/// App whose search URL the HTTP client refuses to request at all.
pub fn setup_unusable_source_app() -> TestApp {
    build_app("ftp://jobs.invalid/search", Arc::new(AtomicUsize::new(0)))
}
