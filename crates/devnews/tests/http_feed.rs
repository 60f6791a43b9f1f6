use devnews::feed::{FeedError, FeedSource, HttpFeed};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Smashing Magazine</title>
    <link>https://www.smashingmagazine.com</link>
    <description>For web designers and developers</description>
    <item>
      <title>Modern CSS Layouts</title>
      <link>https://www.smashingmagazine.com/2026/10/modern-css-layouts/</link>
      <description>Grid, subgrid and container queries.</description>
    </item>
    <item>
      <title>Accessible Forms</title>
      <link>https://www.smashingmagazine.com/2026/10/accessible-forms/</link>
    </item>
  </channel>
</rss>"#;

#[tokio::test]
async fn test_fetch_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(RSS, "application/rss+xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let feed = HttpFeed::new(format!("{}/feed/", server.uri()), 5);
    let items = feed.fetch().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title(), "Modern CSS Layouts");
    assert_eq!(items[0].summary(), "Grid, subgrid and container queries.");
    assert_eq!(items[1].summary(), "");
}

#[tokio::test]
async fn test_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = HttpFeed::new(format!("{}/feed/", server.uri()), 5);
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, FeedError::Http(_)));
}
