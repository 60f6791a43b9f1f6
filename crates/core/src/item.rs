use serde::{Deserialize, Serialize};

/// The number of feed entries kept for one digest.
pub const MAX_ITEMS: usize = 5;

/// Error returned when a [`NewsItem`] cannot be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidItem {
    /// The title is empty or only whitespace.
    #[error("news item title is empty")]
    EmptyTitle,
}

/// One entry of a news feed.
///
/// Items are immutable once constructed. The title is never empty; the
/// summary may be.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNewsItem")]
pub struct NewsItem {
    title: String,
    link: String,
    summary: String,
}

impl NewsItem {
    /// Creates an item, trimming surrounding whitespace of every field.
    pub fn new<T, L, S>(
        title: T,
        link: L,
        summary: S,
    ) -> Result<Self, InvalidItem>
    where
        T: AsRef<str>,
        L: AsRef<str>,
        S: AsRef<str>,
    {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(InvalidItem::EmptyTitle);
        }
        Ok(Self {
            title: title.to_owned(),
            link: link.as_ref().trim().to_owned(),
            summary: summary.as_ref().trim().to_owned(),
        })
    }

    /// Returns the title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the link, usually an absolute URL.
    #[inline]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Returns the summary, possibly empty.
    #[inline]
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

#[derive(Deserialize)]
struct RawNewsItem {
    title: String,
    link: String,
    #[serde(default)]
    summary: String,
}

impl TryFrom<RawNewsItem> for NewsItem {
    type Error = InvalidItem;

    fn try_from(raw: RawNewsItem) -> Result<Self, Self::Error> {
        NewsItem::new(raw.title, raw.link, raw.summary)
    }
}

/// The items processed in one run, together with the mail subject.
///
/// A digest is built once per run and consumed by the composer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digest {
    subject: String,
    items: Vec<NewsItem>,
}

impl Digest {
    /// Creates a digest, keeping at most [`MAX_ITEMS`] items in feed order.
    pub fn new<S: Into<String>>(subject: S, mut items: Vec<NewsItem>) -> Self {
        items.truncate(MAX_ITEMS);
        Self {
            subject: subject.into(),
            items,
        }
    }

    /// Returns the mail subject.
    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the items in feed order.
    #[inline]
    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    /// Returns `true` if the digest carries no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
