//! Request parameter validation

use pulse_core::{PulseError, Result};
use std::time::Duration;

use crate::record::Dimension;

/// Turn the raw `duration` and `dimension` strings into a time budget and a
/// dimension.
///
/// A zero budget is valid and means the feed read expires immediately.
pub fn validate(duration_text: &str, dimension_text: &str) -> Result<(Duration, Dimension)> {
    if duration_text.is_empty() || dimension_text.is_empty() {
        return Err(PulseError::MissingParameter(
            "the query parameter duration or dimension is empty".to_string(),
        ));
    }

    let budget = parse_duration(duration_text)?;
    let dimension = dimension_text.parse()?;

    Ok((budget, dimension))
}

/// Parse a compound duration expression (`30s`, `2m`, `1h30m`, `250ms`).
///
/// Signed expressions are rejected.
pub fn parse_duration(text: &str) -> Result<Duration> {
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    humantime::parse_duration(text)
        .map_err(|e| PulseError::InvalidDuration(format!("'{}': {}", text, e)))
}
