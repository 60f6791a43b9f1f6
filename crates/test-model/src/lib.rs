//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use devnews_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: VecDeque<ModelResponseEvent>,
    emitted: usize,
    failure: Option<(usize, ErrorKind)>,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl TestModelResponse {
    fn from_preset(preset: &PresetResponse, delay: Duration) -> Self {
        let mut events: VecDeque<_> = preset
            .events
            .iter()
            .map(|event| match event {
                PresetEvent::MessageDelta(msg) => {
                    ModelResponseEvent::MessageDelta(msg.clone())
                }
            })
            .collect();
        let finish_reason = if preset.truncated {
            ModelFinishReason::Length
        } else {
            ModelFinishReason::Stop
        };
        events.push_back(ModelResponseEvent::Completed(finish_reason));
        let failure = match preset.failure {
            Some(PresetFailure::Stream { after, kind }) => Some((after, kind)),
            _ => None,
        };
        Self {
            events,
            emitted: 0,
            failure,
            delay,
            sleep: None,
        }
    }
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        let delay = this.delay;
        let sleep = this.sleep.get_or_insert_with(|| Box::pin(sleep(delay)));
        ready!(sleep.as_mut().poll(cx));
        this.sleep = None;

        if let Some((after, kind)) = this.failure {
            if this.emitted >= after {
                this.events.clear();
                return Poll::Ready(Err(Error {
                    message: "scripted stream failure",
                    kind,
                }));
            }
        }

        let Some(event) = this.events.pop_front() else {
            return Poll::Ready(Ok(None));
        };
        this.emitted += 1;
        Poll::Ready(Ok(Some(event)))
    }
}

/// A local fake model for testing purpose.
///
/// Responses are served in the order they were added; once the script runs
/// out, the last response is repeated. Every request is recorded so tests
/// can inspect what was sent, or assert that nothing was.
///
/// Clones share the request log.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Vec<PresetResponse>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Creates a provider that always answers with `preset`.
    #[inline]
    pub fn with_response(preset: PresetResponse) -> Self {
        let mut provider = Self::default();
        provider.add_response(preset);
        provider
    }

    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        Arc::make_mut(&mut self.script).push(preset);
    }

    /// Delays every streamed event by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|log| log.len()).unwrap_or_default()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<ModelRequest> {
        self.requests.lock().ok()?.last().cloned()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let step_idx = match self.requests.lock() {
            Ok(mut log) => {
                log.push(req.clone());
                log.len() - 1
            }
            Err(_) => 0,
        };

        let result = match self
            .script
            .get(step_idx)
            .or_else(|| self.script.last())
        {
            None => Err(Error {
                message: "empty script",
                kind: ErrorKind::Other,
            }),
            Some(PresetResponse {
                failure: Some(PresetFailure::Request { kind }),
                ..
            }) => Err(Error {
                message: "scripted request failure",
                kind: *kind,
            }),
            Some(preset) => Ok(TestModelResponse::from_preset(
                preset,
                self.delay.unwrap_or(Duration::from_millis(1)),
            )),
        };
        ready(result)
    }
}
