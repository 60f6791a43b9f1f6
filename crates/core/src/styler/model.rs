use std::future::poll_fn;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use devnews_model::{
    ModelFinishReason, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse, ModelResponseEvent,
};
use tracing::Instrument;

use super::{Styler, StylerError};

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/styler_system.md");
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_TEMPERATURE: f32 = 0.7;

type StyleResult = Result<String, StylerError>;
type BoxedStyleFuture = Pin<Box<dyn Future<Output = StyleResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedStyleFuture + Send + Sync>;

/// [`ModelStyler`] builder.
pub struct ModelStylerBuilder {
    handler_fn: HandlerFn,
    system_prompt: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
}

impl ModelStylerBuilder {
    /// Creates a new builder with the specified model provider.
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        // Erase `P` so that the styler can be stored behind `dyn Styler`
        // without a generic parameter.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    collect_text::<P>(fut.await).await
                }
                .instrument(debug_span!("styler request")),
            )
        });
        Self {
            handler_fn,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: Some(DEFAULT_TEMPERATURE),
            timeout: None,
        }
    }

    /// Replaces the default system prompt.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the token limit, `None` leaves it to the provider.
    #[inline]
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature, `None` leaves it to the provider.
    #[inline]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Bounds the whole call, including streaming, by `timeout`.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the styler.
    #[inline]
    pub fn build(self) -> ModelStyler {
        ModelStyler {
            handler_fn: self.handler_fn,
            system_prompt: self.system_prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}

/// A [`Styler`] backed by a text-generation model.
///
/// Each call sends one request made of the system prompt and the given
/// prompt, and concatenates the streamed deltas. Failures are never
/// retried.
#[derive(Clone)]
pub struct ModelStyler {
    handler_fn: HandlerFn,
    system_prompt: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
}

impl ModelStyler {
    /// Creates a styler with default settings.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        ModelStylerBuilder::with_model_provider(provider).build()
    }

    fn make_request(&self, prompt: &str) -> ModelRequest {
        let mut req = ModelRequest::with_prompt(&*self.system_prompt, prompt);
        req.max_tokens = self.max_tokens;
        req.temperature = self.temperature;
        req
    }
}

#[async_trait]
impl Styler for ModelStyler {
    async fn style(&self, prompt: &str) -> Result<String, StylerError> {
        let fut = (self.handler_fn)(self.make_request(prompt));
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| StylerError::Timeout(timeout))?,
            None => fut.await,
        }
    }
}

async fn collect_text<P: ModelProvider + 'static>(
    resp_or_err: Result<P::Response, P::Error>,
) -> StyleResult {
    let resp = resp_or_err.map_err(model_error)?;

    let mut text = String::new();
    let mut pinned_resp = pin!(resp);
    loop {
        let event = poll_fn(|cx| pinned_resp.as_mut().poll_next_event(cx))
            .await
            .map_err(model_error)?;
        let Some(event) = event else {
            break;
        };

        match event {
            ModelResponseEvent::MessageDelta(delta) => text.push_str(&delta),
            ModelResponseEvent::Completed(ModelFinishReason::Length) => {
                debug!("hit the token limit after {} bytes", text.len());
                return Err(StylerError::Truncated);
            }
            ModelResponseEvent::Completed(ModelFinishReason::Stop) => {}
        }
    }

    trace!("received {} bytes", text.len());
    Ok(text)
}

fn model_error<E: ModelProviderError>(err: E) -> StylerError {
    debug!("got an error: {err:?}");
    StylerError::Model {
        kind: err.kind(),
        message: err.to_string(),
    }
}
