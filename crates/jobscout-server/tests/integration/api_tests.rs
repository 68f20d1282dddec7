use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use jobscout_core::testutil::{base_card, results_page};

use crate::integration::common::{StubPage, setup_test_app, setup_unusable_source_app};

async fn post_search(router: &Router, body: serde_json::Value) -> (StatusCode, String, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let cache = response
        .headers()
        .get("x-cache")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, cache, json)
}

async fn get_json(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn two_card_page() -> StubPage {
    StubPage::ok(results_page(&[
        base_card(
            "Python Developer",
            Some("Acme Corp"),
            "Recife, PE",
            "/jobs/view/python-developer-1",
            "2024-05-01",
        ),
        base_card(
            "Django Engineer",
            None,
            "Recife, PE",
            "/jobs/view/django-engineer-2",
            "2024-05-03",
        ),
    ]))
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(vec![]).await;

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cache_entries"], 0);
}

#[tokio::test]
async fn search_miss_then_hit() {
    let app = setup_test_app(vec![two_card_page()]).await;
    let request = serde_json::json!({"query": "Python", "location": "Recife", "num_pages": 1});

    let (status, cache, first) = post_search(&app.router, request.clone()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache, "MISS");
    let jobs = first.as_array().unwrap();
    assert_eq!(jobs.len(), 2);

    assert_eq!(jobs[0]["title"], "Python Developer");
    assert_eq!(jobs[0]["company"], "Acme Corp");
    assert_eq!(jobs[0]["location"], "Recife, PE");
    assert!(
        jobs[0]["link"]
            .as_str()
            .unwrap()
            .ends_with("/jobs/view/python-developer-1")
    );
    assert_eq!(jobs[0]["posted_date"], "2024-05-01");

    assert_eq!(jobs[1]["title"], "Django Engineer");
    assert_eq!(jobs[1]["company"], "N/A");
    assert_eq!(jobs[1]["location"], "Recife, PE");
    assert_ne!(jobs[1]["link"], "N/A");
    assert_eq!(jobs[1]["posted_date"], "2024-05-03");

    let (status, cache, second) = post_search(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache, "HIT");
    assert_eq!(second, first);
    assert_eq!(app.source_hits(), 1);
}

#[tokio::test]
async fn search_key_ignores_case_and_whitespace() {
    let app = setup_test_app(vec![two_card_page()]).await;

    post_search(
        &app.router,
        serde_json::json!({"query": "Python", "location": "Recife"}),
    )
    .await;
    let (_, cache, _) = post_search(
        &app.router,
        serde_json::json!({"query": "  PYTHON", "location": "recife  ", "num_pages": 1}),
    )
    .await;

    assert_eq!(cache, "HIT");
    assert_eq!(app.source_hits(), 1);
}

#[tokio::test]
async fn failed_page_does_not_abort_search() {
    let app = setup_test_app(vec![
        two_card_page(),
        StubPage::error(StatusCode::SERVICE_UNAVAILABLE),
        StubPage::ok(results_page(&[base_card(
            "Go Developer",
            Some("Globex"),
            "Recife, PE",
            "/jobs/view/go-developer-3",
            "2024-05-04",
        )])),
    ])
    .await;

    let (status, cache, json) = post_search(
        &app.router,
        serde_json::json!({"query": "dev", "location": "Recife", "num_pages": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache, "MISS");
    let titles: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Python Developer", "Django Engineer", "Go Developer"]);
    assert_eq!(app.source_hits(), 3);
}

#[tokio::test]
async fn zero_pages_is_treated_as_one() {
    let app = setup_test_app(vec![two_card_page()]).await;

    let (status, _, json) = post_search(
        &app.router,
        serde_json::json!({"query": "Python", "num_pages": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(app.source_hits(), 1);
}

#[tokio::test]
async fn unusable_source_returns_500_and_is_not_cached() {
    let app = setup_unusable_source_app();

    let (status, cache, json) =
        post_search(&app.router, serde_json::json!({"query": "Python"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(cache, "");
    assert_eq!(json["error"], "internal_error");
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .starts_with("Configuration error")
    );

    let (_, stats) = get_json(&app.router, "/cache/stats").await;
    assert_eq!(stats["entries"], 0);
}

#[tokio::test]
async fn cache_stats_track_hits_and_misses() {
    let app = setup_test_app(vec![two_card_page()]).await;
    let request = serde_json::json!({"query": "Python", "location": "Recife"});

    post_search(&app.router, request.clone()).await;
    post_search(&app.router, request).await;

    let (status, stats) = get_json(&app.router, "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["max_entries"], 16);
    assert_eq!(stats["ttl_seconds"], 300);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(vec![]).await;

    let (status, json) = get_json(&app.router, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/"]["post"].is_object());
    assert!(json["paths"]["/health"]["get"].is_object());
}
