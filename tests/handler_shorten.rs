mod common;

use axum_test::TestServer;
use serde_json::{Value, json};
use snaplink::domain::entities::NewLink;
use snaplink::domain::repositories::LinkRepository;
use std::future::IntoFuture;
use std::sync::Arc;

#[tokio::test]
async fn test_shorten_generates_code() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo.clone());
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/some/page" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(json["shortUrl"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(json["targetUrl"], "https://example.com/some/page");

    let stored = repo.get(code).await.unwrap();
    assert_eq!(stored.target_url, "https://example.com/some/page");
}

#[tokio::test]
async fn test_shorten_with_custom_slug() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com", "slug": "My_Link-1" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<Value>();
    assert_eq!(json["code"], "My_Link-1");
    assert_eq!(json["shortUrl"], "http://sho.rt/My_Link-1");
}

#[tokio::test]
async fn test_shorten_distinct_slugs_then_resolve_each() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let links = [
        ("alpha", "https://example.com/a"),
        ("beta", "https://example.org/b?x=1"),
        ("gamma", "http://example.net/C#frag"),
    ];

    for (slug, url) in links {
        server
            .post("/shorten")
            .json(&json!({ "url": url, "slug": slug }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    for (slug, url) in links {
        let response = server.get(&format!("/{slug}")).await;

        assert_eq!(response.status_code(), 302);
        assert_eq!(response.header("location"), url);
    }
}

#[tokio::test]
async fn test_shorten_slug_taken() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo.clone());
    let server = TestServer::new(common::test_app(state)).unwrap();

    server
        .post("/shorten")
        .json(&json!({ "url": "https://first.example.com", "slug": "taken" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://second.example.com", "slug": "taken" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "slug_taken");

    let stored = repo.get("taken").await.unwrap();
    assert_eq!(stored.target_url, "https://first.example.com");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_same_slug_single_winner() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo.clone());
    let server = TestServer::new(common::test_app(state)).unwrap();

    let first = server
        .post("/shorten")
        .json(&json!({ "url": "https://one.example.com", "slug": "contested" }))
        .into_future();
    let second = server
        .post("/shorten")
        .json(&json!({ "url": "https://two.example.com", "slug": "contested" }))
        .into_future();

    let (first, second) = tokio::join!(first, second);

    let mut statuses = [first.status_code().as_u16(), second.status_code().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 409]);

    let stored = repo.get("contested").await.unwrap();
    assert!(
        stored.target_url == "https://one.example.com"
            || stored.target_url == "https://two.example.com"
    );
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    for url in ["not-a-url", "ftp://example.com/file", "javascript:alert(1)", ""] {
        let response = server.post("/shorten").json(&json!({ "url": url })).await;

        response.assert_status_bad_request();
        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "invalid_url", "{url}");
    }
}

#[tokio::test]
async fn test_shorten_invalid_slug() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    for slug in ["has spaces", "a/b", "stats", "health", &"x".repeat(65)] {
        let response = server
            .post("/shorten")
            .json(&json!({ "url": "https://example.com", "slug": slug }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "invalid_slug_format", "{slug}");
    }
}

#[tokio::test]
async fn test_shorten_missing_url_field() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "slug": "nourl" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "invalid_url");
}

#[tokio::test]
async fn test_shorten_url_too_long() {
    let repo = common::test_repository().await;
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let url = format!("https://example.com/{}", "a".repeat(2100));
    let response = server.post("/shorten").json(&json!({ "url": url })).await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "invalid_url");
    assert_eq!(json["error"]["details"]["fields"], json!(["url"]));
}

#[tokio::test]
async fn test_shorten_generation_exhausted() {
    let repo = common::test_repository().await;
    repo.insert_if_absent(NewLink::new("occupied", "https://example.com"))
        .await
        .unwrap();

    let (state, _rx) = common::create_test_state_with(
        repo,
        Arc::new(common::SequenceCodeGenerator::new(&["occupied"])),
        common::default_settings(),
    );
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/new" }))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "generation_exhausted");
    assert_eq!(json["error"]["details"]["attempts"], 5);
}

#[tokio::test]
async fn test_shorten_retries_past_collision() {
    let repo = common::test_repository().await;
    repo.insert_if_absent(NewLink::new("occupied", "https://example.com"))
        .await
        .unwrap();

    let (state, _rx) = common::create_test_state_with(
        repo,
        Arc::new(common::SequenceCodeGenerator::new(&["occupied", "freecode"])),
        common::default_settings(),
    );
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/new" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["code"], "freecode");
}
