use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "jobscout API",
        version = "0.1.0",
        description = "Job listing search with an in-memory TTL + LRU result cache."
    ),
    paths(
        crate::routes::search,
        crate::routes::health,
        crate::routes::cache_stats,
    ),
    components(schemas(
        crate::dto::SearchRequest,
        crate::dto::JobResponse,
        crate::dto::HealthResponse,
        crate::dto::CacheStatsResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "search", description = "Job listing search"),
        (name = "system", description = "Health and cache status"),
    )
)]
pub struct ApiDoc;
