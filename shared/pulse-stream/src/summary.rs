//! Dimension-shaped analysis summary

use pulse_core::{PulseError, Result};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::str::FromStr;

use crate::aggregator::AggregateState;
use crate::record::Dimension;

/// What to report when no record arrived before the feed ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Zero posts, zero timestamps, zero average
    #[default]
    Zero,
    /// Fail with [`PulseError::EmptyResult`]
    Error,
}

impl FromStr for EmptyPolicy {
    type Err = PulseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Self::Zero),
            "error" => Ok(Self::Error),
            other => Err(PulseError::Config(format!("Unknown empty result policy: {}", other))),
        }
    }
}

/// Final analysis result.
///
/// Serializes as `{"total_posts", "mini_timestamp", "maxi_timestamp",
/// "avg_<dimension>"}` with the average field named by [`Dimension::average_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_posts: u64,
    pub mini_timestamp: i64,
    pub maxi_timestamp: i64,
    pub dimension: Dimension,
    pub average: u64,
}

impl Summary {
    pub fn build(
        state: &AggregateState,
        dimension: Dimension,
        policy: EmptyPolicy,
    ) -> Result<Self> {
        let average = match (state.average(), policy) {
            (Some(average), _) => average,
            (None, EmptyPolicy::Zero) => 0,
            (None, EmptyPolicy::Error) => {
                return Err(PulseError::EmptyResult(format!(
                    "no posts observed, average {} is undefined",
                    dimension
                )))
            }
        };

        Ok(Self {
            total_posts: state.count,
            mini_timestamp: state.min_timestamp.unwrap_or(0),
            maxi_timestamp: state.max_timestamp.unwrap_or(0),
            dimension,
            average,
        })
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| PulseError::Internal(format!("Summary serialization: {}", e)))
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut summary = serializer.serialize_struct("Summary", 4)?;
        summary.serialize_field("total_posts", &self.total_posts)?;
        summary.serialize_field("mini_timestamp", &self.mini_timestamp)?;
        summary.serialize_field("maxi_timestamp", &self.maxi_timestamp)?;
        summary.serialize_field(self.dimension.average_field(), &self.average)?;
        summary.end()
    }
}
