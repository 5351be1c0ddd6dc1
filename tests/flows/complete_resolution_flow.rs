#[path = "../common/mod.rs"]
mod common;
use cinefetch_domain::SearchQuery;
use common::{tmdb_three_results, TestServerBuilder};
use mockito::Server;

const JPEG: &[u8] = b"\xff\xd8\xff\xe0heat";

// ============================================================================
// Search -> poster resolution
// ============================================================================

#[tokio::test]
async fn test_search_then_poster_is_fetched_once() {
    let mut upstream = Server::new_async().await;
    tmdb_three_results(&mut upstream, 1).await;
    let image_mock = upstream
        .mock("GET", "/img/heat.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(JPEG)
        .expect(1)
        .create_async()
        .await;

    let server = TestServerBuilder::new()
        .with_secondary(upstream.url())
        .start()
        .await;
    let client = server.client();

    let page = client.search(&SearchQuery::new("heat")).await.unwrap();
    let heat = &page.items[0];
    assert!(heat.poster_url.starts_with("/api/image?url="));

    let first = client.image(&heat.poster_url).await.unwrap();
    assert_eq!(first.content_type, "image/jpeg");
    assert_eq!(&first.bytes[..], JPEG);
    assert!(!first.cache_hit);
    assert!(!first.placeholder);

    let second = server.client().image(&heat.poster_url).await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(second.bytes, first.bytes);

    image_mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_poster_resolves_to_titled_placeholder() {
    let mut upstream = Server::new_async().await;
    tmdb_three_results(&mut upstream, 1).await;

    let server = TestServerBuilder::new()
        .with_secondary(upstream.url())
        .memory_only()
        .start()
        .await;
    let client = server.client();

    let page = client.search(&SearchQuery::new("heat")).await.unwrap();
    let wave = page.items.iter().find(|m| m.title == "Heat Wave").unwrap();

    let image = client.image(&wave.poster_url).await.unwrap();

    assert!(image.placeholder);
    assert_eq!(image.content_type, "image/svg+xml");
    assert!(String::from_utf8_lossy(&image.bytes).contains("Heat Wave"));
}

#[tokio::test]
async fn test_refusing_origin_degrades_and_is_cached() {
    let mut upstream = Server::new_async().await;
    tmdb_three_results(&mut upstream, 1).await;
    let refused = upstream
        .mock("GET", "/img/heat.jpg")
        .with_status(403)
        .expect(2)
        .create_async()
        .await;

    let server = TestServerBuilder::new()
        .with_secondary(upstream.url())
        .memory_only()
        .start()
        .await;
    let client = server.client();

    let page = client.search(&SearchQuery::new("heat")).await.unwrap();
    let poster = page.items[0].poster_url.clone();

    let first = client.image(&poster).await.unwrap();
    assert!(first.placeholder);
    assert!(String::from_utf8_lossy(&first.bytes).contains("Heat"));

    let second = server.client().image(&poster).await.unwrap();
    assert!(second.placeholder);
    assert!(second.cache_hit);

    // both header profiles tried on the first miss, none on the repeat
    refused.assert_async().await;
}
