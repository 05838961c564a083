use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use scanmap_core::record::normalize_ssid;
use scanmap_core::{plan_sample, NetworkRecord, ObservationRecord, RadioType, SamplePlan};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::source::{has_fix, NetworkRow, ObservationRow, QuerySource};

const NETWORK_PASS_END_PCT: u8 = 45;
const OBSERVATION_PASS_END_PCT: u8 = 95;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub chunk_size: usize,
    pub observation_ceiling: usize,
}

impl From<&scanmap_core::Config> for IngestOptions {
    fn from(cfg: &scanmap_core::Config) -> Self {
        IngestOptions {
            chunk_size: cfg.chunk_size,
            observation_ceiling: cfg.observation_ceiling,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    pub network_rows: usize,
    pub observation_rows_total: usize,
    pub skipped_rows: usize,
    pub chunks: usize,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub networks: Vec<NetworkRecord>,
    pub observations: Vec<ObservationRecord>,
    pub plan: SamplePlan,
    pub stats: IngestStats,
    pub cancelled: bool,
}

struct ProgressReporter<'a> {
    sink: &'a mut dyn FnMut(Progress),
    last: u8,
}

impl<'a> ProgressReporter<'a> {
    fn report(&mut self, percent: u8, message: String) {
        let percent = percent.min(100).max(self.last);
        self.last = percent;
        (self.sink)(Progress { percent, message });
    }
}

/// Pulls both record streams out of `source` in bounded chunks.
///
/// Networks are loaded in full; observations are strided down to
/// `observation_ceiling` rows. The cancel flag is checked before every chunk:
/// the pass in flight then returns empty, while a pass that already finished
/// keeps its records.
pub fn ingest<S: QuerySource + ?Sized>(
    source: &mut S,
    cancel: &CancelFlag,
    opts: IngestOptions,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<IngestOutcome> {
    let chunk = opts.chunk_size.max(1);
    let mut progress = ProgressReporter {
        sink: on_progress,
        last: 0,
    };
    let mut stats = IngestStats::default();

    progress.report(0, "Counting networks".to_string());
    let network_total = source.count_networks()?;
    info!(network_total, chunk, "loading networks");
    let networks = network_pass(source, cancel, chunk, network_total, &mut progress, &mut stats)?;
    let networks_cancelled = networks.is_none();

    let observation_total = source.count_observations()?;
    stats.observation_rows_total = observation_total;
    let plan = plan_sample(observation_total, opts.observation_ceiling);
    if plan.is_sampled() {
        info!(
            observation_total,
            stride = plan.stride,
            limit = plan.limit,
            "sampling observations"
        );
    }
    let observations = observation_pass(source, cancel, chunk, &plan, &mut progress, &mut stats)?;
    let cancelled = networks_cancelled || observations.is_none();

    if stats.skipped_rows > 0 {
        warn!(skipped = stats.skipped_rows, "rows with unknown radio type skipped");
    }
    if cancelled {
        info!("load cancelled");
    } else {
        progress.report(100, "Done".to_string());
    }

    Ok(IngestOutcome {
        networks: networks.unwrap_or_default(),
        observations: observations.unwrap_or_default(),
        plan,
        stats,
        cancelled,
    })
}

fn network_pass<S: QuerySource + ?Sized>(
    source: &mut S,
    cancel: &CancelFlag,
    chunk: usize,
    total: usize,
    progress: &mut ProgressReporter<'_>,
    stats: &mut IngestStats,
) -> Result<Option<Vec<NetworkRecord>>> {
    let mut acc = Vec::with_capacity(total);
    let mut offset = 0;
    loop {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let rows = source.network_page(offset, chunk)?;
        let fetched = rows.len();
        offset += fetched;
        stats.network_rows += fetched;
        stats.chunks += 1;
        for row in rows {
            match network_record(row) {
                Some(rec) => acc.push(rec),
                None => stats.skipped_rows += 1,
            }
        }
        debug!(offset, total, "network chunk");
        progress.report(
            scaled(offset, total, 0, NETWORK_PASS_END_PCT),
            format!("Loading networks {}/{}", offset.min(total), total),
        );
        thread::yield_now();
        if fetched < chunk {
            break;
        }
    }
    Ok(Some(acc))
}

fn observation_pass<S: QuerySource + ?Sized>(
    source: &mut S,
    cancel: &CancelFlag,
    chunk: usize,
    plan: &SamplePlan,
    progress: &mut ProgressReporter<'_>,
    stats: &mut IngestStats,
) -> Result<Option<Vec<ObservationRecord>>> {
    let mut acc = Vec::with_capacity(plan.limit);
    let mut after = i64::MIN;
    let mut taken = 0;
    while taken < plan.limit {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let want = chunk.min(plan.limit - taken);
        let rows = source.observation_page(plan.stride, after, want)?;
        let fetched = rows.len();
        taken += fetched;
        stats.chunks += 1;
        if let Some(last) = rows.last() {
            after = last.ordinal;
        }
        for row in rows {
            match observation_record(row) {
                Some(rec) => acc.push(rec),
                None => stats.skipped_rows += 1,
            }
        }
        debug!(taken, limit = plan.limit, "observation chunk");
        progress.report(
            scaled(taken, plan.limit, NETWORK_PASS_END_PCT, OBSERVATION_PASS_END_PCT),
            format!("Loading observations {}/{}", taken, plan.limit),
        );
        thread::yield_now();
        if fetched < want {
            break;
        }
    }
    Ok(Some(acc))
}

fn scaled(done: usize, total: usize, from: u8, to: u8) -> u8 {
    if total == 0 {
        return to;
    }
    let frac = done.min(total) as f64 / total as f64;
    from + ((to - from) as f64 * frac).floor() as u8
}

pub fn network_record(row: NetworkRow) -> Option<NetworkRecord> {
    let radio_type = RadioType::from_code(&row.radio_type)?;
    if !has_fix(row.lat, row.lon) {
        return None;
    }
    Some(NetworkRecord {
        radio_type,
        lat: row.lat,
        lon: row.lon,
        level: row.level,
        ssid: normalize_ssid(row.ssid),
        bssid: row.bssid,
        last_seen: row.last_seen,
        frequency: row.frequency,
        capabilities: row.capabilities.unwrap_or_default(),
    })
}

pub fn observation_record(row: ObservationRow) -> Option<ObservationRecord> {
    let radio_type = RadioType::from_code(&row.radio_type)?;
    if !has_fix(row.lat, row.lon) {
        return None;
    }
    Some(ObservationRecord {
        lat: row.lat,
        lon: row.lon,
        level: row.level,
        radio_type,
        time: row.time,
    })
}
