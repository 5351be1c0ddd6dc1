use cinefetch_application::ports::ImageOrigin;
use cinefetch_domain::config::ImageConfig;
use cinefetch_domain::FetchError;
use cinefetch_infrastructure::image::HttpImageOrigin;
use mockito::{Matcher, Server};

#[tokio::test]
async fn test_fetch_sends_profile_headers_and_reads_bytes() {
    let config = ImageConfig::default();
    let profile = config.header_profiles[0].clone();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/poster.jpg")
        .match_header("user-agent", Matcher::Exact(profile.user_agent.clone()))
        .with_status(200)
        .with_header("content-type", "image/jpeg; charset=binary")
        .with_body(b"\xff\xd8\xff\xe0")
        .create_async()
        .await;

    let origin = HttpImageOrigin::new(&config);
    let image = origin
        .fetch(&format!("{}/poster.jpg", server.url()), &profile)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(image.content_type, "image/jpeg");
    assert!(image.is_image());
    assert_eq!(&image.bytes[..], b"\xff\xd8\xff\xe0");
}

#[tokio::test]
async fn test_forbidden_is_upstream_rejected() {
    let config = ImageConfig::default();
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/blocked.jpg")
        .with_status(403)
        .create_async()
        .await;

    let origin = HttpImageOrigin::new(&config);
    let err = origin
        .fetch(&format!("{}/blocked.jpg", server.url()), &config.header_profiles[0])
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UpstreamRejected { status: 403, .. }));
}

#[tokio::test]
async fn test_oversized_body_is_refused() {
    let config = ImageConfig {
        max_bytes: 4,
        ..Default::default()
    };
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/huge.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(vec![0u8; 64])
        .create_async()
        .await;

    let origin = HttpImageOrigin::new(&config);
    let err = origin
        .fetch(&format!("{}/huge.jpg", server.url()), &config.header_profiles[0])
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MalformedInput(_)));
}

#[tokio::test]
async fn test_html_response_reports_its_content_type() {
    let config = ImageConfig::default();
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/hotlink.jpg")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>no hotlinking</html>")
        .create_async()
        .await;

    let origin = HttpImageOrigin::new(&config);
    let image = origin
        .fetch(&format!("{}/hotlink.jpg", server.url()), &config.header_profiles[0])
        .await
        .unwrap();

    assert!(!image.is_image());
}
