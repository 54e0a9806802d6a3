//! End-to-end crawl loop scenarios

use crate::support::{
    dish_json, extractor, id, mount_business, CountingFrontier, FailingSink,
};
use canary::crawler::{seed_frontier, Coordinator};
use canary::frontier::{InMemoryFrontier, SqliteFrontier};
use canary::sink::{AuditWriter, SqliteRecordSink};
use canary::{FrontierStore, Membership};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_completes_and_queues_discovered() {
    let server = MockServer::start().await;
    mount_business(
        &server,
        "x",
        true,
        &[],
        &["/biz/x?osq=pizza", "https://www.yelp.com/biz/y#reviews"],
    )
    .await;

    let frontier = Arc::new(InMemoryFrontier::with_pending([id("x")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink.clone(), extractor(&server))
        .with_max_targets(Some(1));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(frontier.completed_ids().unwrap(), vec![id("x")]);
    assert_eq!(frontier.pending_ids().unwrap(), vec![id("y")]);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.discovered, 2);
    assert_eq!(stats.added, 1);

    let stored = sink.get(&id("x")).unwrap().unwrap();
    assert_eq!(stored.merchant_id.as_deref(), Some("x-id"));
    assert_eq!(stored.categories, vec!["Pizza"]);
    assert_eq!(stored.reviews[0].date_exact.as_deref(), Some("2024-03-14"));
    assert_eq!(stored.website.as_deref(), Some("joes.example"));
}

#[tokio::test]
async fn test_missing_structured_block_releases_target() {
    let server = MockServer::start().await;
    mount_business(&server, "x", false, &[], &["/biz/y"]).await;

    let frontier = Arc::new(CountingFrontier::with_pending([id("x")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink.clone(), extractor(&server))
        .with_max_targets(Some(1));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.released, 1);
    assert_eq!(frontier.completions(&id("x")), 0);
    assert_eq!(frontier.membership(&id("x")).await.unwrap(), Membership::Pending);
    assert!(frontier.inner.completed_ids().unwrap().is_empty());
    // Discovery is offered even when extraction fails
    assert_eq!(frontier.membership(&id("y")).await.unwrap(), Membership::Pending);
    assert_eq!(sink.count().unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_target_is_released() {
    let server = MockServer::start().await;

    let frontier = Arc::new(InMemoryFrontier::with_pending([id("gone")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink, extractor(&server))
        .with_max_targets(Some(3));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.released, 3);
    assert_eq!(frontier.pending_ids().unwrap(), vec![id("gone")]);
}

#[tokio::test]
async fn test_crawl_runs_until_frontier_exhausted() {
    let server = MockServer::start().await;
    mount_business(&server, "x", true, &[], &["/biz/y"]).await;
    mount_business(&server, "y", true, &[], &["/biz/x", "/biz/z"]).await;
    mount_business(&server, "z", true, &[], &["/biz/y"]).await;

    let frontier = Arc::new(CountingFrontier::with_pending([id("x")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink.clone(), extractor(&server));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.completed, 3);
    assert_eq!(frontier.inner.completed_ids().unwrap(), vec![id("x"), id("y"), id("z")]);
    assert!(frontier.inner.pending_ids().unwrap().is_empty());
    for target in ["x", "y", "z"] {
        assert_eq!(frontier.completions(&id(target)), 1);
    }
    assert_eq!(sink.count().unwrap(), 3);
}

#[tokio::test]
async fn test_completed_targets_are_not_requeued() {
    let server = MockServer::start().await;
    mount_business(&server, "x", true, &[], &["/biz/x", "/biz/done"]).await;

    let frontier = Arc::new(InMemoryFrontier::with_pending([id("x")]));
    frontier.mark_completed(&id("done")).await.unwrap();
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink, extractor(&server));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.processed, 1);
    assert_eq!(stats.added, 0);
    assert!(frontier.pending_ids().unwrap().is_empty());
    assert_eq!(frontier.completed_ids().unwrap(), vec![id("done"), id("x")]);
}

#[tokio::test]
async fn test_drink_fallback_tags_catalog_item() {
    let server = MockServer::start().await;
    mount_business(&server, "x", true, &["Iced Tea"], &[]).await;
    Mock::given(method("GET"))
        .and(path("/popular_dish/x/drink/iced%20tea"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dish_json()))
        .mount(&server)
        .await;

    let frontier = Arc::new(InMemoryFrontier::with_pending([id("x")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink.clone(), extractor(&server));

    coordinator.run().await.unwrap();

    let stored = sink.get(&id("x")).unwrap().unwrap();
    assert_eq!(stored.food_items.len(), 1);
    let item = &stored.food_items[0];
    assert_eq!(item.title, "Iced Tea");
    assert_eq!(item.is_drink, Some(true));
    assert_eq!(item.images[0].time_uploaded.as_deref(), Some("2024-02-01"));
    assert_eq!(item.reviews[0].total_user_review_count, Some(3));
}

#[tokio::test]
async fn test_failed_catalog_item_keeps_record() {
    let server = MockServer::start().await;
    mount_business(&server, "x", true, &["Mystery Special"], &[]).await;

    let frontier = Arc::new(InMemoryFrontier::with_pending([id("x")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink.clone(), extractor(&server));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.completed, 1);
    let stored = sink.get(&id("x")).unwrap().unwrap();
    assert_eq!(stored.food_items[0].title, "Mystery Special");
    assert!(stored.food_items[0].images.is_empty());
    assert_eq!(stored.food_items[0].is_drink, None);
}

#[tokio::test]
async fn test_catalog_image_without_fields_rejects_record() {
    let server = MockServer::start().await;
    mount_business(&server, "x", true, &["Cheese Slice"], &[]).await;
    Mock::given(method("GET"))
        .and(path("/popular_dish/x/food/cheese%20slice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mediaItems": [{}]})))
        .mount(&server)
        .await;

    let frontier = Arc::new(CountingFrontier::with_pending([id("x")]));
    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut coordinator = Coordinator::new(frontier.clone(), sink.clone(), extractor(&server))
        .with_max_targets(Some(1));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.completed, 0);
    assert_eq!(stats.released, 1);
    assert_eq!(frontier.completions(&id("x")), 0);
    assert_eq!(frontier.membership(&id("x")).await.unwrap(), Membership::Pending);
    assert_eq!(sink.count().unwrap(), 0);
}

#[tokio::test]
async fn test_sink_failure_releases_but_writes_audit() {
    let server = MockServer::start().await;
    mount_business(&server, "x", true, &[], &[]).await;
    let audit_dir = TempDir::new().unwrap();
    let audit = AuditWriter::new(audit_dir.path());

    let frontier = Arc::new(CountingFrontier::with_pending([id("x")]));
    let mut coordinator =
        Coordinator::new(frontier.clone(), Arc::new(FailingSink), extractor(&server))
            .with_audit(audit.clone())
            .with_max_targets(Some(1));

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.released, 1);
    assert_eq!(frontier.completions(&id("x")), 0);
    assert_eq!(frontier.membership(&id("x")).await.unwrap(), Membership::Pending);
    assert!(audit.path_for(&id("x")).exists());
}

#[tokio::test]
async fn test_seeding_skips_known_targets() {
    let frontier = InMemoryFrontier::with_pending([id("a")]);
    frontier.mark_completed(&id("b")).await.unwrap();

    let added = seed_frontier(&frontier, &[id("a"), id("b"), id("c")])
        .await
        .unwrap();

    assert_eq!(added, 1);
    assert_eq!(frontier.pending_ids().unwrap(), vec![id("a"), id("c")]);
    assert_eq!(frontier.pending_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_two_coordinators_share_sqlite_frontier() {
    let server = MockServer::start().await;
    let names = ["a", "b", "c", "d", "e", "f"];
    for name in names {
        mount_business(&server, name, true, &[], &[]).await;
    }

    let dir = TempDir::new().unwrap();
    let frontier_path = dir.path().join("frontier.db");
    let first: Arc<dyn FrontierStore> = Arc::new(SqliteFrontier::open(&frontier_path).unwrap());
    let second: Arc<dyn FrontierStore> = Arc::new(SqliteFrontier::open(&frontier_path).unwrap());
    for name in names {
        first.add_if_new(&id(name)).await.unwrap();
    }

    let sink = Arc::new(SqliteRecordSink::open_in_memory().unwrap());
    let mut one = Coordinator::new(first.clone(), sink.clone(), extractor(&server));
    let mut two = Coordinator::new(second, sink.clone(), extractor(&server));

    let (a, b) = tokio::join!(one.run(), two.run());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.completed + b.completed, names.len() as u64);
    assert_eq!(first.completed_count().await.unwrap(), names.len() as u64);
    assert!(first.is_empty().await.unwrap());
    assert_eq!(sink.count().unwrap(), names.len() as u64);
}
