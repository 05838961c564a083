pub mod analytics;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod record;
pub mod sample;
pub mod spatial;
pub mod temporal;

pub use analytics::{analyze, AnalysisSummary, AnalyticsConfig};
pub use classify::{classify_frequency_band, classify_security, FrequencyBand, SecurityClass};
pub use config::Config;
pub use error::ConfigError;
pub use filter::{filter_networks, matches, FilterCriteria, SecurityFlags};
pub use fingerprint::fingerprint;
pub use record::{GeoPoint, NetworkRecord, ObservationRecord, Positioned, RadioType, Timestamped};
pub use sample::{plan_sample, SamplePlan};
pub use spatial::densest_cell;
pub use temporal::{compute_range, filter_by_cutoff, TimeRange};

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_unix_ms() -> i64 {
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (dur.as_secs() as i64) * 1000 + (dur.subsec_millis() as i64)
}
