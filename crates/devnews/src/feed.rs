//! News feed sources.

use std::time::Duration;

use async_trait::async_trait;
use devnews_core::NewsItem;
use feed_rs::model::Entry;
use reqwest::Client;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Error returned when a feed cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The feed could not be downloaded.
    #[error("failed to fetch feed: {0}")]
    Http(#[from] reqwest::Error),
    /// The document is not a valid RSS or Atom feed.
    #[error("failed to parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Something that yields the news items of one run.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the items in feed order.
    async fn fetch(&self) -> Result<Vec<NewsItem>, FeedError>;
}

/// An RSS or Atom feed served over HTTP.
#[derive(Clone, Debug)]
pub struct HttpFeed {
    client: Client,
    url: String,
    max_items: usize,
}

impl HttpFeed {
    /// Creates a source reading `url` and keeping the first `max_items`
    /// entries.
    pub fn new<S: Into<String>>(url: S, max_items: usize) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            max_items,
        }
    }

    /// Returns the feed URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FeedError> {
        debug!(url = %self.url, "fetching feed");
        let body = self
            .client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_feed(&body, self.max_items)
    }
}

/// Parses an RSS or Atom document into at most `max_items` news items.
///
/// Only the first `max_items` entries are considered, in document order.
/// Entries without a title or a link are skipped. A missing summary falls
/// back to the entry's content, then to an empty string.
pub fn parse_feed(
    bytes: &[u8],
    max_items: usize,
) -> Result<Vec<NewsItem>, FeedError> {
    let feed = feed_rs::parser::parse(bytes)?;
    let items = feed
        .entries
        .into_iter()
        .take(max_items)
        .filter_map(|entry| {
            let id = entry.id.clone();
            let item = entry_to_item(entry);
            if item.is_none() {
                warn!(id = %id, "skipping feed entry without title or link");
            }
            item
        })
        .collect();
    Ok(items)
}

fn entry_to_item(entry: Entry) -> Option<NewsItem> {
    let title = entry.title?.content;
    let link = entry
        .links
        .iter()
        .find(|link| link.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| entry.links.first())?
        .href
        .clone();
    let summary = entry
        .summary
        .map(|text| text.content)
        .or_else(|| entry.content.and_then(|content| content.body))
        .unwrap_or_default();
    NewsItem::new(title, link, summary).ok()
}
