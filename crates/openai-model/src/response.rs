use std::pin::Pin;
use std::task::{Context, Poll, ready};

use devnews_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::{Sse, SseError};
use crate::proto::ChatCompletionChunk;

struct PartialState {
    sse: Sse,
    id: Option<String>,
    // Set once the server reports a finish reason; emitted after the last
    // delta of the same chunk.
    pending_finish_reason: Option<ModelFinishReason>,
    finished: bool,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ModelResponseEvent>, PartialState), Error>;

pin_project! {
    pub struct OpenAIResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
    }
}

impl OpenAIResponse {
    #[inline]
    pub fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState {
            sse,
            id: None,
            pending_finish_reason: None,
            finished: false,
        };
        Self {
            next_event_fut: Some(Box::pin(next_event(partial_state))),
        }
    }
}

impl ModelResponse for OpenAIResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let result = ready!(next_event_fut.as_mut().poll(cx));
        match result {
            Ok((Some(event), partial_state)) => {
                *this.next_event_fut =
                    Some(Box::pin(next_event(partial_state)));
                Poll::Ready(Ok(Some(event)))
            }
            Ok((None, _)) => {
                *this.next_event_fut = None;
                Poll::Ready(Ok(None))
            }
            Err(err) => {
                *this.next_event_fut = None;
                Poll::Ready(Err(err))
            }
        }
    }
}

async fn next_event(mut partial_state: PartialState) -> NextEvent {
    // Emit a finish reason that arrived together with a delta first.
    if let Some(reason) = partial_state.pending_finish_reason.take() {
        partial_state.finished = true;
        return Ok((Some(ModelResponseEvent::Completed(reason)), partial_state));
    }
    if partial_state.finished {
        return Ok((None, partial_state));
    }

    loop {
        let sse_event = match partial_state.sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(SseError::Chunks(err)) => return Err(err),
            Err(SseError::InvalidPayload) => {
                return Err(Error::new(
                    "invalid event stream payload",
                    ErrorKind::Other,
                ));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            break;
        }

        let mut chunk = serde_json::from_str::<ChatCompletionChunk>(&sse_event)
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
        if partial_state.id.get_or_insert_with(|| chunk.id.clone()) != &chunk.id
        {
            return Err(Error::new("chunk id mismatch", ErrorKind::Other));
        }

        let Some(choice) = chunk.choices.pop() else {
            continue;
        };

        if let Some(finish_reason) = choice.finish_reason {
            let finish_reason = if finish_reason == "length" {
                ModelFinishReason::Length
            } else {
                ModelFinishReason::Stop
            };
            partial_state.pending_finish_reason = Some(finish_reason);
        }

        match choice.delta.content {
            Some(content) if !content.is_empty() => {
                return Ok((
                    Some(ModelResponseEvent::MessageDelta(content)),
                    partial_state,
                ));
            }
            _ => {}
        }

        if let Some(reason) = partial_state.pending_finish_reason.take() {
            partial_state.finished = true;
            return Ok((
                Some(ModelResponseEvent::Completed(reason)),
                partial_state,
            ));
        }
    }

    partial_state.finished = true;
    Ok((None, partial_state))
}
