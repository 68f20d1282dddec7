use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{CacheStatsResponse, HealthResponse, JobResponse, SearchRequest};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Reports whether a search was answered from the cache: `HIT` or `MISS`.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(search))
        .route("/health", get(health))
        .route("/cache/stats", get(cache_stats))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Job listings; X-Cache header tells HIT or MISS", body = Vec<JobResponse>),
        (status = 500, description = "Search failed", body = crate::dto::ErrorResponse),
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.into_fetch_request();
    let outcome = state.search.query(&request).await?;

    let jobs: Vec<JobResponse> = outcome.records.into_iter().map(JobResponse::from).collect();

    Ok(([(X_CACHE, outcome.cache_status.as_str())], axum::Json(jobs)))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        cache_entries: state.search.cache().len(),
    })
}

#[utoipa::path(
    get,
    path = "/cache/stats",
    responses(
        (status = 200, description = "Cache counters", body = CacheStatsResponse),
    ),
    tag = "system"
)]
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = state.search.cache();
    let config = cache.config();

    axum::Json(CacheStatsResponse::new(
        cache.stats(),
        config.max_entries.get(),
        config.ttl.as_secs(),
    ))
}
