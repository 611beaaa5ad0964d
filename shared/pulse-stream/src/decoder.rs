//! Frame decoding
//!
//! The feed is a run of `data: <json>` segments. Whatever precedes the first
//! marker is preamble. A segment is complete once the next marker arrives, or
//! once the feed ends.

use futures_util::stream::{Stream, StreamExt};
use pulse_core::{PulseError, Result};
use std::collections::HashMap;
use std::pin::Pin;
use std::str::FromStr;
use std::task::{Context, Poll};

use crate::feed::{FeedChunk, FeedStream};
use crate::record::EventRecord;

/// Literal that opens every frame
pub const FRAME_MARKER: &[u8] = b"data: ";

/// What to do with a frame that does not decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    /// Fail the whole analysis on the first malformed frame
    #[default]
    Abort,
    /// Log and count the frame, then continue
    Skip,
}

impl FromStr for FramePolicy {
    type Err = PulseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(PulseError::Config(format!("Unknown frame policy: {}", other))),
        }
    }
}

/// Decode one frame body: an object holding a single `{kind: record}` entry.
/// The key names the post kind and is ignored.
pub fn decode_frame(segment: &[u8]) -> Result<EventRecord> {
    let frame: HashMap<String, EventRecord> =
        serde_json::from_slice(segment).map_err(|e| PulseError::MalformedFrame(e.to_string()))?;

    if frame.len() != 1 {
        return Err(PulseError::MalformedFrame(format!(
            "expected exactly one entry per frame, found {}",
            frame.len()
        )));
    }

    frame
        .into_values()
        .next()
        .ok_or_else(|| PulseError::MalformedFrame("empty frame".to_string()))
}

/// Incremental splitter over raw feed bytes.
///
/// Works on bytes so markers and multi-byte characters split across reads
/// are reassembled before anything is decoded.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    /// Offset before which `buffer` is known not to contain a marker
    scanned: usize,
    in_body: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete segment, without its marker.
    pub fn next_segment(&mut self) -> Option<Vec<u8>> {
        if !self.in_body {
            let pos = self.find_marker()?;
            self.buffer.drain(..pos + FRAME_MARKER.len());
            self.scanned = 0;
            self.in_body = true;
        }

        let pos = self.find_marker()?;
        let segment: Vec<u8> = self.buffer.drain(..pos).collect();
        self.buffer.drain(..FRAME_MARKER.len());
        self.scanned = 0;
        Some(segment)
    }

    /// Flush the trailing segment once no more bytes will arrive.
    ///
    /// Returns `None` when the feed never got past its preamble or the tail is
    /// only whitespace.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        let tail = std::mem::take(&mut self.buffer);
        self.scanned = 0;

        if !self.in_body || tail.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        Some(tail)
    }

    fn find_marker(&mut self) -> Option<usize> {
        let found = self.buffer[self.scanned..]
            .windows(FRAME_MARKER.len())
            .position(|window| window == FRAME_MARKER)
            .map(|offset| self.scanned + offset);

        if found.is_none() {
            // A marker may straddle the end of the buffer.
            self.scanned = self.buffer.len().saturating_sub(FRAME_MARKER.len() - 1);
            if !self.in_body {
                self.buffer.drain(..self.scanned);
                self.scanned = 0;
            }
        }
        found
    }
}

/// Strip a marker prefix left dangling at the end of `tail`.
fn trim_partial_marker(tail: &[u8]) -> &[u8] {
    (1..FRAME_MARKER.len())
        .rev()
        .find(|&len| tail.ends_with(&FRAME_MARKER[..len]))
        .map_or(tail, |len| &tail[..tail.len() - len])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reading,
    Finished,
}

/// Lazy sequence of records decoded from a feed.
///
/// Single use: the feed is consumed as the stream is polled.
pub struct FrameStream {
    feed: FeedStream,
    decoder: FrameDecoder,
    policy: FramePolicy,
    phase: Phase,
    skipped: u64,
    expired: bool,
}

impl FrameStream {
    pub fn new(feed: FeedStream, policy: FramePolicy) -> Self {
        Self {
            feed,
            decoder: FrameDecoder::new(),
            policy,
            phase: Phase::Reading,
            skipped: 0,
            expired: false,
        }
    }

    /// Frames dropped under [`FramePolicy::Skip`]
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Whether the deadline, rather than the remote, ended the feed
    pub fn deadline_reached(&self) -> bool {
        self.expired
    }

    fn next_buffered(&mut self) -> Option<Result<EventRecord>> {
        while let Some(segment) = self.decoder.next_segment() {
            match decode_frame(&segment) {
                Ok(record) => return Some(Ok(record)),
                Err(e) => {
                    if let Some(err) = self.reject(e) {
                        return Some(Err(err));
                    }
                }
            }
        }
        None
    }

    fn finish(&mut self) -> Option<Result<EventRecord>> {
        self.phase = Phase::Finished;
        let tail = self.decoder.finish()?;

        if !self.expired {
            return match decode_frame(&tail) {
                Ok(record) => Some(Ok(record)),
                Err(e) => self.reject(e).map(Err),
            };
        }

        // The cut may land inside the marker of the frame that follows.
        match decode_frame(trim_partial_marker(&tail)) {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                tracing::debug!(
                    bytes = tail.len(),
                    error = %e,
                    "Dropping frame truncated by deadline"
                );
                None
            }
        }
    }

    /// Apply the frame policy; returns the error when it must surface.
    fn reject(&mut self, error: PulseError) -> Option<PulseError> {
        match self.policy {
            FramePolicy::Abort => {
                self.phase = Phase::Finished;
                Some(error)
            }
            FramePolicy::Skip => {
                self.skipped += 1;
                tracing::warn!(error = %error, skipped = self.skipped, "Skipping malformed frame");
                None
            }
        }
    }
}

impl Stream for FrameStream {
    type Item = Result<EventRecord>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.phase == Phase::Finished {
                return Poll::Ready(None);
            }

            if let Some(item) = this.next_buffered() {
                return Poll::Ready(Some(item));
            }

            match this.feed.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(FeedChunk::Data(bytes)))) => this.decoder.push(&bytes),
                Poll::Ready(Some(Ok(FeedChunk::Expired))) => {
                    this.expired = true;
                    if let Some(item) = this.finish() {
                        return Poll::Ready(Some(item));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    this.phase = Phase::Finished;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    if let Some(item) = this.finish() {
                        return Poll::Ready(Some(item));
                    }
                }
            }
        }
    }
}
