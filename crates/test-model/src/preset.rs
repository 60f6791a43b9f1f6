use devnews_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
}

/// How a preset response fails.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PresetFailure {
    /// `send_request` itself fails.
    Request { kind: ErrorKind },
    /// The stream fails after delivering `after` events.
    Stream { after: usize, kind: ErrorKind },
}

/// The preset response for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the response fails instead of completing.
    pub failure: Option<PresetFailure>,
    /// If set, the response finishes at the token limit.
    #[serde(default)]
    pub truncated: bool,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failure: None,
            truncated: false,
        }
    }

    /// Creates a response that streams `text` as a single delta.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_events([PresetEvent::MessageDelta(text.into())])
    }

    /// Creates a response whose request is rejected with `kind`.
    #[inline]
    pub fn rejected(kind: ErrorKind) -> Self {
        Self {
            events: Vec::new(),
            failure: Some(PresetFailure::Request { kind }),
            truncated: false,
        }
    }

    /// Makes the stream fail after the first `after` events.
    #[inline]
    pub fn failing_after(mut self, after: usize, kind: ErrorKind) -> Self {
        self.failure = Some(PresetFailure::Stream { after, kind });
        self
    }

    /// Makes the response finish with [`ModelFinishReason::Length`].
    ///
    /// [`ModelFinishReason::Length`]: devnews_model::ModelFinishReason::Length
    #[inline]
    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }
}
