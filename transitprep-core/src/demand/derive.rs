//! Inter-event gaps from per-day event times

use log::trace;

use crate::Minutes;
use crate::model::{Item, Record};

const HOURS: usize = 24;

/// Gap between two consecutive events, tagged with the later instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub later: Minutes,
    pub value: Minutes,
}

/// Sort one column's event times and return the gaps between neighbours.
///
/// Columns with fewer than two events have no gaps.
pub fn column_gaps(times: &[Minutes]) -> Vec<Gap> {
    if times.len() <= 1 {
        return Vec::new();
    }
    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    sorted
        .windows(2)
        .map(|pair| Gap {
            later: pair[1],
            value: pair[1] - pair[0],
        })
        .collect()
}

/// Flat mode: the gap values of one column in event order
pub fn flat_gaps(times: &[Minutes]) -> Vec<Minutes> {
    column_gaps(times).into_iter().map(|g| g.value).collect()
}

/// Hour of day a gap is attributed to, clamped into `0..=23`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hour_of(later: Minutes) -> usize {
    let hour = (later / 60.0).floor().clamp(0.0, (HOURS - 1) as f64);
    hour as usize
}

/// `"H:00-H:59"` label of an hour bucket
pub fn hour_label(hour: usize) -> String {
    format!("{hour}:00-{hour}:59")
}

/// Sequential record ids, shared across one ingestion call
#[derive(Debug)]
pub(crate) struct RecordIds(u32);

impl RecordIds {
    pub(crate) fn new() -> Self {
        Self(1)
    }

    pub(crate) fn record(&mut self, numeric_value: f64) -> Record {
        let record = Record {
            record_id: self.0,
            numeric_value,
        };
        self.0 += 1;
        record
    }
}

/// Day-template accumulator pooling gaps of every sampled day by hour of the
/// later event.
#[derive(Debug, Default)]
pub struct HourlyBuckets {
    buckets: [Vec<Minutes>; HOURS],
}

impl HourlyBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one day (column) of event times
    pub fn add_column(&mut self, times: &[Minutes]) {
        for gap in column_gaps(times) {
            self.buckets[hour_of(gap.later)].push(gap.value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Gaps pooled into one hour
    pub fn hour(&self, hour: usize) -> &[Minutes] {
        &self.buckets[hour]
    }

    /// One item per populated hour in ascending order, or the single
    /// `"0:00-0:59"` zero placeholder when no hour holds data.
    pub(crate) fn into_items(self, station: &str, ids: &mut RecordIds) -> Vec<Item> {
        if self.is_empty() {
            trace!("Station {station}: no gaps in any hour, emitting placeholder");
            return vec![Item {
                station: station.to_string(),
                time_range: hour_label(0),
                records: vec![ids.record(0.0)],
            }];
        }

        self.buckets
            .into_iter()
            .enumerate()
            .filter(|(_, gaps)| !gaps.is_empty())
            .map(|(hour, gaps)| Item {
                station: station.to_string(),
                time_range: hour_label(hour),
                records: gaps.into_iter().map(|gap| ids.record(gap)).collect(),
            })
            .collect()
    }
}
