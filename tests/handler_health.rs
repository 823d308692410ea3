mod common;

use axum::http::StatusCode;
use serde_json::json;
use snaplink::domain::entities::Policy;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::create_test_app(Policy::default(), 0);
    let server = common::create_test_server(&app);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_reports_policy_snapshot() {
    let app = common::create_test_app(Policy::new(12, 3), 0);
    let server = common::create_test_server(&app);

    let json = server.get("/health").await.json::<serde_json::Value>();
    assert_eq!(json["policy"]["ttl_hours"], 0);

    // Any policy-aware request refreshes the snapshot.
    server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status_ok();

    let json = server.get("/health").await.json::<serde_json::Value>();
    assert_eq!(json["policy"]["ttl_hours"], 12);
    assert_eq!(json["policy"]["cache_ttl_minutes"], 3);
}

#[tokio::test]
async fn test_health_degraded_when_cache_down() {
    let app = common::create_test_app(Policy::default(), 0);
    let server = common::create_test_server(&app);

    app.cache.fail.store(true, Ordering::SeqCst);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}
