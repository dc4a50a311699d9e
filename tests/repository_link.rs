mod common;

use chrono::{Duration, Utc};
use snaplink::domain::entities::{NewLink, NewVisit, VisitMetadata};
use snaplink::domain::repositories::{LinkRepository, StoreError};

#[tokio::test]
async fn test_insert_and_get_link() {
    let repo = common::test_repository().await;

    let created = repo
        .insert_if_absent(NewLink::new("test123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(created.code, "test123");
    assert_eq!(created.target_url, "https://example.com");
    assert_eq!(created.click_count, 0);

    let fetched = repo.get("test123").await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_insert_duplicate_code_conflicts() {
    let repo = common::test_repository().await;

    repo.insert_if_absent(NewLink::new("dup", "https://first.example.com"))
        .await
        .unwrap();

    let result = repo
        .insert_if_absent(NewLink::new("dup", "https://second.example.com"))
        .await;

    assert!(matches!(result, Err(StoreError::Conflict { ref code }) if code == "dup"));

    let link = repo.get("dup").await.unwrap();
    assert_eq!(link.target_url, "https://first.example.com");
}

#[tokio::test]
async fn test_codes_are_case_sensitive() {
    let repo = common::test_repository().await;

    repo.insert_if_absent(NewLink::new("AbC", "https://upper.example.com"))
        .await
        .unwrap();
    repo.insert_if_absent(NewLink::new("abc", "https://lower.example.com"))
        .await
        .unwrap();

    assert_eq!(
        repo.get("AbC").await.unwrap().target_url,
        "https://upper.example.com"
    );
    assert_eq!(
        repo.get("abc").await.unwrap().target_url,
        "https://lower.example.com"
    );
}

#[tokio::test]
async fn test_target_is_stored_verbatim() {
    let repo = common::test_repository().await;
    let target = "HTTPS://Example.COM:443/a/../b?z=1&a=%20#Frag";

    repo.insert_if_absent(NewLink::new("verbatim", target))
        .await
        .unwrap();

    assert_eq!(repo.get("verbatim").await.unwrap().target_url, target);
}

#[tokio::test]
async fn test_get_unknown_code() {
    let repo = common::test_repository().await;

    let result = repo.get("missing").await;

    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_increment_click_count() {
    let repo = common::test_repository().await;
    repo.insert_if_absent(NewLink::new("counted", "https://example.com"))
        .await
        .unwrap();

    for _ in 0..3 {
        repo.increment_click_count("counted").await.unwrap();
    }

    assert_eq!(repo.get("counted").await.unwrap().click_count, 3);
}

#[tokio::test]
async fn test_increment_unknown_code() {
    let repo = common::test_repository().await;

    let result = repo.increment_click_count("missing").await;

    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_record_visit_does_not_touch_counter() {
    let repo = common::test_repository().await;
    repo.insert_if_absent(NewLink::new("visited", "https://example.com"))
        .await
        .unwrap();

    repo.record_visit(NewVisit::new(
        "visited",
        Utc::now(),
        VisitMetadata::new(Some("10.0.0.1".to_string()), Some("curl/8.0"), None),
    ))
    .await
    .unwrap();

    assert_eq!(repo.count_visits("visited").await.unwrap(), 1);
    assert_eq!(repo.get("visited").await.unwrap().click_count, 0);
}

#[tokio::test]
async fn test_recent_visits_newest_first_with_limit() {
    let repo = common::test_repository().await;
    let start = Utc::now();

    for (offset, agent) in [(0, "first"), (1, "second"), (2, "third")] {
        repo.record_visit(NewVisit::new(
            "ordered",
            start + Duration::seconds(offset),
            VisitMetadata::new(None, Some(agent), Some("https://ref.example.com")),
        ))
        .await
        .unwrap();
    }
    repo.record_visit(NewVisit::new(
        "other",
        start,
        VisitMetadata::default(),
    ))
    .await
    .unwrap();

    let visits = repo.recent_visits("ordered", 2).await.unwrap();

    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0].user_agent.as_deref(), Some("third"));
    assert_eq!(visits[1].user_agent.as_deref(), Some("second"));
    assert_eq!(visits[0].referer.as_deref(), Some("https://ref.example.com"));
    assert!(visits.iter().all(|v| v.link_code == "ordered"));

    assert_eq!(repo.count_visits("ordered").await.unwrap(), 3);
    assert_eq!(repo.count_visits("other").await.unwrap(), 1);
}

#[tokio::test]
async fn test_ping() {
    let repo = common::test_repository().await;

    assert!(repo.ping().await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_of_same_code() {
    let repo = common::test_repository().await;

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.insert_if_absent(NewLink::new(
                    "race",
                    format!("https://example.com/{i}"),
                ))
                .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(StoreError::Conflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 9);
}
