//! Analysis pipeline: validate, open the feed, decode, aggregate, summarize

use pulse_core::{PulseError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use crate::aggregator::aggregate_stream;
use crate::decoder::{FramePolicy, FrameStream};
use crate::feed::{self, FeedSource};
use crate::params::validate;
use crate::record::Dimension;
use crate::summary::{EmptyPolicy, Summary};

/// Per-deployment knobs of the pipeline
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Longest time budget a caller may ask for
    pub max_duration: Option<Duration>,
    pub frame_policy: FramePolicy,
    pub empty_policy: EmptyPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_duration: Some(Duration::from_secs(300)),
            frame_policy: FramePolicy::Abort,
            empty_policy: EmptyPolicy::Zero,
        }
    }
}

/// Outcome of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub skipped_frames: u64,
    /// False for a zero budget, which never connects
    pub feed_opened: bool,
    /// The deadline, not the remote, ended the feed
    pub deadline_reached: bool,
    pub elapsed: Duration,
}

/// Runs analyses against one feed.
///
/// Holds no per-request state; concurrent runs are independent.
pub struct Analyzer {
    feed: Arc<dyn FeedSource>,
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(feed: Arc<dyn FeedSource>, options: AnalysisOptions) -> Self {
        Self { feed, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn feed_name(&self) -> &str {
        self.feed.name()
    }

    /// Validate raw parameters and run the analysis.
    pub async fn analyze(
        &self,
        duration_text: &str,
        dimension_text: &str,
    ) -> Result<AnalysisReport> {
        let (budget, dimension) = validate(duration_text, dimension_text)?;
        self.run(budget, dimension).await
    }

    /// Read the feed for `budget` and summarize whatever arrived.
    pub async fn run(&self, budget: Duration, dimension: Dimension) -> Result<AnalysisReport> {
        if let Some(max) = self.options.max_duration {
            if budget > max {
                return Err(PulseError::InvalidDuration(format!(
                    "{} exceeds the maximum of {}",
                    humantime::format_duration(budget),
                    humantime::format_duration(max)
                )));
            }
        }

        let started = Instant::now();
        let deadline = started.checked_add(budget).ok_or_else(|| {
            PulseError::InvalidDuration(format!(
                "{} is too large",
                humantime::format_duration(budget)
            ))
        })?;

        let feed_opened = !budget.is_zero();
        let source = if feed_opened {
            self.feed.open(deadline).await?
        } else {
            feed::expired()
        };

        let mut frames = FrameStream::new(source, self.options.frame_policy);
        let state = aggregate_stream(&mut frames, dimension).await?;
        let summary = Summary::build(&state, dimension, self.options.empty_policy)?;

        let report = AnalysisReport {
            summary,
            skipped_frames: frames.skipped_frames(),
            feed_opened,
            deadline_reached: frames.deadline_reached(),
            elapsed: started.elapsed(),
        };

        info!(
            dimension = %dimension,
            budget_ms = budget.as_millis() as u64,
            posts = report.summary.total_posts,
            skipped = report.skipped_frames,
            deadline_reached = report.deadline_reached,
            "Analysis complete"
        );

        Ok(report)
    }
}
