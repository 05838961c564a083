use serde::{Deserialize, Serialize};

use crate::record::Timestamped;

/// Inclusive epoch-ms range. `(0, 0)` means no timestamps were present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: i64,
    pub max: i64,
}

impl TimeRange {
    pub const EMPTY: TimeRange = TimeRange { min: 0, max: 0 };

    pub fn is_empty(&self) -> bool {
        *self == TimeRange::EMPTY
    }

    pub fn span_ms(&self) -> i64 {
        self.max - self.min
    }
}

pub fn compute_range<A: Timestamped, B: Timestamped>(networks: &[A], observations: &[B]) -> TimeRange {
    let stamps = networks
        .iter()
        .map(Timestamped::timestamp)
        .chain(observations.iter().map(Timestamped::timestamp))
        .filter(|&t| t > 0);
    let mut range: Option<(i64, i64)> = None;
    for t in stamps {
        range = Some(match range {
            None => (t, t),
            Some((lo, hi)) => (lo.min(t), hi.max(t)),
        });
    }
    match range {
        Some((min, max)) => TimeRange { min, max },
        None => TimeRange::EMPTY,
    }
}

pub fn filter_by_cutoff<T: Timestamped>(records: &[T], cutoff: i64) -> Vec<&T> {
    records.iter().filter(|r| r.timestamp() <= cutoff).collect()
}
