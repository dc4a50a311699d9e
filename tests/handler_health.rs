mod common;

use axum_test::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_health_check() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["visit_queue"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["message"], "Disabled");
}

#[tokio::test]
async fn test_health_degraded_when_worker_gone() {
    let repo = common::test_repository().await;
    let (state, rx) = common::create_test_state(repo);
    drop(rx);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_service_unavailable();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["visit_queue"]["status"], "error");
}
