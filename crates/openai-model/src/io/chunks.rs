use std::pin::Pin;

use bytes::Bytes;
use devnews_model::ErrorKind;
use futures_util::stream::{self, Stream, StreamExt};
use reqwest::Response;

use crate::Error;

type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// An adapter for streaming byte chunks.
pub struct Chunks {
    inner: ChunkStream,
}

impl Chunks {
    pub fn from_response(response: Response) -> Self {
        let inner = stream::unfold(Some(response), |response| async move {
            let mut response = response?;
            match response.chunk().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(response))),
                Ok(None) => None,
                // Stop after the first error.
                Err(err) => Some((Err(Error::from_reqwest(&err)), None)),
            }
        });
        Self {
            inner: Box::pin(inner),
        }
    }

    #[cfg(test)]
    pub fn from_vec(chunks: Vec<Bytes>) -> Self {
        Self {
            inner: Box::pin(stream::iter(chunks.into_iter().map(Ok))),
        }
    }

    #[cfg(test)]
    pub fn from_strs(chunks: &[&'static str]) -> Self {
        Self::from_vec(
            chunks
                .iter()
                .map(|c| Bytes::from_static(c.as_bytes()))
                .collect(),
        )
    }

    #[inline]
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, Error> {
        self.inner.next().await.transpose()
    }
}

impl Error {
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.status().map(|s| s.as_u16()) == Some(429) {
            ErrorKind::RateLimitExceeded
        } else {
            ErrorKind::Other
        };
        Error::new(format!("{err}"), kind)
    }
}
