//! The text-styling capability used by the composer.

mod model;

use std::time::Duration;

use async_trait::async_trait;
use devnews_model::ErrorKind;

pub use model::{ModelStyler, ModelStylerBuilder};

/// Describes why a styler could not produce HTML.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StylerError {
    /// No styler is configured.
    #[error("styler is unavailable")]
    Unavailable,
    /// The styler did not answer within the given time.
    #[error("styler timed out after {0:?}")]
    Timeout(Duration),
    /// The model stopped at its token limit, so the output is cut off.
    #[error("styler output was truncated by the token limit")]
    Truncated,
    /// The underlying model reported an error.
    #[error("model error ({kind}): {message}")]
    Model {
        /// The kind reported by the provider.
        kind: ErrorKind,
        /// The provider's message.
        message: String,
    },
}

/// Turns a prompt into styled HTML.
///
/// Implementations make at most one attempt per call. Timeouts and
/// transport errors are reported as [`StylerError`]s; the composer treats
/// all of them the same way.
#[async_trait]
pub trait Styler: Send + Sync {
    /// Sends `prompt` and returns the raw response text.
    async fn style(&self, prompt: &str) -> Result<String, StylerError>;
}

/// A styler that always fails with [`StylerError::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStyler;

#[async_trait]
impl Styler for UnavailableStyler {
    async fn style(&self, _prompt: &str) -> Result<String, StylerError> {
        Err(StylerError::Unavailable)
    }
}
