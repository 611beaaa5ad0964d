//! Pulse Stream
//!
//! Time-bounded ingestion of the post-update feed and single-pass reduction
//! of its events into an engagement summary.
//!
//! Data flows strictly one way:
//! feed bytes -> [`FrameStream`] -> [`AggregateState`] -> [`Summary`].

pub mod aggregator;
pub mod analysis;
pub mod decoder;
pub mod feed;
pub mod params;
pub mod record;
pub mod summary;


pub use aggregator::{aggregate, aggregate_stream, AggregateState};
pub use analysis::{AnalysisOptions, AnalysisReport, Analyzer};
pub use decoder::{decode_frame, FrameDecoder, FramePolicy, FrameStream, FRAME_MARKER};
pub use feed::{bounded, FeedChunk, FeedSource, FeedStream, HttpFeed};
pub use params::{parse_duration, validate};
pub use record::{Dimension, EventRecord};
pub use summary::{EmptyPolicy, Summary};
