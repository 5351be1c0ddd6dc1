#[path = "../common/mod.rs"]
mod common;
use cinefetch_domain::{SearchQuery, StalePolicy};
use common::{omdb_unavailable, tmdb_three_results, TestServerBuilder};
use mockito::{Matcher, Server};

// ============================================================================
// Failover Tests
// ============================================================================

#[tokio::test]
async fn test_primary_down_secondary_answers_then_cache() {
    let mut primary = Server::new_async().await;
    let mut secondary = Server::new_async().await;
    let primary_mock = omdb_unavailable(&mut primary, 1).await;
    let secondary_mock = tmdb_three_results(&mut secondary, 1).await;

    let server = TestServerBuilder::new()
        .with_primary(primary.url())
        .with_secondary(secondary.url())
        .start()
        .await;
    let client = server.client();

    let first = client.search(&SearchQuery::new("heat")).await.unwrap();
    assert_eq!(first.source, "secondary");
    assert_eq!(first.items.len(), 3);

    // a fresh client skips its own cache, so this exercises the server cache
    let repeat = server.client().search(&SearchQuery::new("Heat")).await.unwrap();
    assert_eq!(repeat.source, "cache");
    assert_eq!(repeat.items, first.items);

    primary_mock.assert_async().await;
    secondary_mock.assert_async().await;
    server.shutdown();
}

#[tokio::test]
async fn test_all_upstreams_down_is_explicit_none() {
    let mut primary = Server::new_async().await;
    let mut secondary = Server::new_async().await;
    omdb_unavailable(&mut primary, 1).await;
    secondary
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let server = TestServerBuilder::new()
        .with_primary(primary.url())
        .with_secondary(secondary.url())
        .with_stale_policy(StalePolicy::ExplicitEmpty)
        .memory_only()
        .start()
        .await;

    let page = server.client().search(&SearchQuery::new("heat")).await.unwrap();

    assert_eq!(page.source, "none");
    assert!(page.no_results);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_no_providers_configured_serves_none() {
    let server = TestServerBuilder::new().memory_only().start().await;

    let page = server.client().search(&SearchQuery::new("heat")).await.unwrap();

    assert_eq!(page.source, "none");
    assert!(page.no_results);
}

#[tokio::test]
async fn test_persistent_tier_survives_memory_loss() {
    let mut secondary = Server::new_async().await;
    let mock = tmdb_three_results(&mut secondary, 1).await;

    let server = TestServerBuilder::new()
        .with_secondary(secondary.url())
        .start()
        .await;

    server.client().search(&SearchQuery::new("heat")).await.unwrap();
    let stats = server.cache().stats().await;
    assert!(stats.persistent_entries.unwrap_or(0) >= 1);

    let repeat = server.client().search(&SearchQuery::new("heat")).await.unwrap();
    assert_eq!(repeat.source, "cache");
    mock.assert_async().await;
}
