//! Single-pass reduction of records into running totals

use futures_util::stream::{Stream, StreamExt};
use pulse_core::Result;

use crate::record::{Dimension, EventRecord};

/// Running reduction over the records seen so far.
///
/// Every update is monotone: the count and sum only grow, and the timestamp
/// bounds only widen. `None` bounds mean no record has been observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateState {
    pub count: u64,
    pub sum: u64,
    pub min_timestamp: Option<i64>,
    pub max_timestamp: Option<i64>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: &EventRecord, dimension: Dimension) {
        self.count += 1;
        self.sum = self.sum.saturating_add(dimension.select(record));
        self.min_timestamp = Some(
            self.min_timestamp
                .map_or(record.timestamp, |min| min.min(record.timestamp)),
        );
        self.max_timestamp = Some(
            self.max_timestamp
                .map_or(record.timestamp, |max| max.max(record.timestamp)),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Integer average, rounded toward zero. `None` before the first record.
    pub fn average(&self) -> Option<u64> {
        self.sum.checked_div(self.count)
    }
}

/// Reduce an in-memory sequence of records.
pub fn aggregate<I>(records: I, dimension: Dimension) -> AggregateState
where
    I: IntoIterator<Item = EventRecord>,
{
    records
        .into_iter()
        .fold(AggregateState::new(), |mut state, record| {
            state.observe(&record, dimension);
            state
        })
}

/// Reduce a record stream in arrival order.
///
/// The stream decides when input ends; the first error is returned as is and
/// the partial state is dropped.
pub async fn aggregate_stream<S>(records: &mut S, dimension: Dimension) -> Result<AggregateState>
where
    S: Stream<Item = Result<EventRecord>> + Unpin,
{
    let mut state = AggregateState::new();

    while let Some(record) = records.next().await {
        let record = record?;
        state.observe(&record, dimension);
    }

    Ok(state)
}
