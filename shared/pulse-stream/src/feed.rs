//! Feed transport
//!
//! A feed is opened against a deadline and yields raw bytes until the remote
//! closes it or the deadline passes. Once the deadline passes the stream
//! yields a single [`FeedChunk::Expired`] and ends, whatever the remote does.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use pulse_core::{PulseError, Result};
use std::pin::Pin;
use tokio::time::{sleep_until, timeout_at, Instant};

/// One item read from a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedChunk {
    Data(Bytes),
    /// The deadline cut the feed off; nothing follows.
    Expired,
}

pub type FeedStream = Pin<Box<dyn Stream<Item = Result<FeedChunk>> + Send>>;

/// Source of post-update bytes
#[async_trait]
pub trait FeedSource: Send + Sync {
    fn name(&self) -> &str;

    /// Open the feed. Reads from the returned stream never outlive `deadline`.
    async fn open(&self, deadline: Instant) -> Result<FeedStream>;
}

/// Bound `bytes` by `deadline`.
///
/// The deadline is checked before every read, so a feed that keeps sending
/// still stops at the deadline.
pub fn bounded<S>(bytes: S, deadline: Instant) -> FeedStream
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
{
    let initial = Some((Box::pin(bytes), Box::pin(sleep_until(deadline))));

    stream::unfold(initial, |state| async move {
        let (mut bytes, mut timer) = state?;

        tokio::select! {
            biased;
            _ = &mut timer => Some((Ok(FeedChunk::Expired), None)),
            item = bytes.next() => match item {
                Some(Ok(chunk)) => Some((Ok(FeedChunk::Data(chunk)), Some((bytes, timer)))),
                Some(Err(e)) => Some((Err(e), None)),
                None => None,
            },
        }
    })
    .boxed()
}

/// A feed whose deadline has already passed
pub fn expired() -> FeedStream {
    stream::iter([Ok::<_, PulseError>(FeedChunk::Expired)]).boxed()
}

/// Server-Sent-Events feed over HTTP
pub struct HttpFeed {
    url: String,
    http_client: reqwest::Client,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| PulseError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn name(&self) -> &str {
        &self.url
    }

    async fn open(&self, deadline: Instant) -> Result<FeedStream> {
        let request = self
            .http_client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send();

        let response = timeout_at(deadline, request)
            .await
            .map_err(|_| {
                PulseError::StreamUnavailable(format!(
                    "{} did not respond before the deadline",
                    self.url
                ))
            })?
            .map_err(|e| PulseError::StreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::StreamUnavailable(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        tracing::debug!(url = %self.url, "Feed opened");

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| PulseError::StreamUnavailable(e.to_string())));

        Ok(bounded(bytes, deadline))
    }
}
