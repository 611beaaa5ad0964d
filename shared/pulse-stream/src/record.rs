//! Feed records and the metric dimensions they can be analyzed on

use pulse_core::PulseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One observed post update.
///
/// Post kinds that lack a counter (a pin has no retweets) omit it from the
/// feed, so missing counters read as zero. The timestamp is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub favorites: u64,
    #[serde(default)]
    pub retweets: u64,
    /// Seconds since epoch, as assigned by the feed
    pub timestamp: i64,
}

/// Metric the analysis averages over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Likes,
    Comments,
    Favorites,
    Retweets,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Likes,
        Dimension::Comments,
        Dimension::Favorites,
        Dimension::Retweets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Comments => "comments",
            Self::Favorites => "favorites",
            Self::Retweets => "retweets",
        }
    }

    /// Name of the average field in the serialized summary.
    ///
    /// `avg_retweet` is singular on the wire; clients depend on it.
    pub fn average_field(self) -> &'static str {
        match self {
            Self::Likes => "avg_likes",
            Self::Comments => "avg_comments",
            Self::Favorites => "avg_favorites",
            Self::Retweets => "avg_retweet",
        }
    }

    /// The counter of `record` this dimension sums.
    pub fn select(self, record: &EventRecord) -> u64 {
        match self {
            Self::Likes => record.likes,
            Self::Comments => record.comments,
            Self::Favorites => record.favorites,
            Self::Retweets => record.retweets,
        }
    }
}

impl FromStr for Dimension {
    type Err = PulseError;

    /// Exact, case-sensitive match; no trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "likes" => Ok(Self::Likes),
            "comments" => Ok(Self::Comments),
            "favorites" => Ok(Self::Favorites),
            "retweets" => Ok(Self::Retweets),
            other => Err(PulseError::InvalidDimension(format!(
                "'{}' is not one of likes, comments, favorites, retweets",
                other
            ))),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
