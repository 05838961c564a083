use scanmap_core::analytics::{analyze, AnalysisSummary};
use scanmap_core::{
    compute_range, densest_cell, filter_by_cutoff, filter_networks, fingerprint, now_unix_ms, Config,
    FilterCriteria, GeoPoint, NetworkRecord, ObservationRecord, SamplePlan, TimeRange,
};
use tracing::info;

use crate::error::Result;
use crate::ingestor::{ingest, CancelFlag, IngestOptions, IngestOutcome, IngestStats, Progress};
use crate::source::QuerySource;
use crate::worker::{spawn_ingest, IngestHandle};

#[derive(Debug, Clone)]
pub struct Dataset {
    pub networks: Vec<NetworkRecord>,
    pub observations: Vec<ObservationRecord>,
    pub time_range: TimeRange,
    pub plan: SamplePlan,
    pub stats: IngestStats,
    pub fingerprint: String,
    pub loaded_at_ms: i64,
}

impl Dataset {
    fn from_outcome(outcome: IngestOutcome) -> Self {
        let time_range = compute_range(&outcome.networks, &outcome.observations);
        let fingerprint = fingerprint(&outcome.networks, &outcome.observations, &outcome.plan);
        Dataset {
            networks: outcome.networks,
            observations: outcome.observations,
            time_range,
            plan: outcome.plan,
            stats: outcome.stats,
            fingerprint,
            loaded_at_ms: now_unix_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub cutoff: i64,
    pub networks: Vec<&'a NetworkRecord>,
    pub observations: Vec<&'a ObservationRecord>,
}

/// Owns the current dataset and at most one load in flight.
///
/// A finished load replaces the dataset wholesale. A cancelled or failed load
/// leaves the previous dataset in place.
pub struct Session {
    config: Config,
    dataset: Option<Dataset>,
    in_flight: Option<IngestHandle>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            config,
            dataset: None,
            in_flight: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn start_load<S>(&mut self, source: S) -> &IngestHandle
    where
        S: QuerySource + Send + 'static,
    {
        self.cancel_load();
        info!("starting load");
        self.in_flight
            .insert(spawn_ingest(source, IngestOptions::from(&self.config)))
    }

    pub fn cancel_load(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel();
            // The superseded load's result is discarded either way.
            let _ = prev.wait();
        }
    }

    pub fn load_cancel_flag(&self) -> Option<CancelFlag> {
        self.in_flight.as_ref().map(IngestHandle::cancel_flag)
    }

    pub fn poll_progress(&self) -> Vec<Progress> {
        self.in_flight
            .as_ref()
            .map(IngestHandle::try_progress)
            .unwrap_or_default()
    }

    /// Without a load in flight this reports `Cancelled`.
    pub fn finish_load(&mut self) -> Result<LoadStatus> {
        let Some(handle) = self.in_flight.take() else {
            return Ok(LoadStatus::Cancelled);
        };
        let outcome = handle.wait()?;
        Ok(self.commit(outcome))
    }

    pub fn load<S: QuerySource + ?Sized>(
        &mut self,
        source: &mut S,
        cancel: &CancelFlag,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<LoadStatus> {
        self.cancel_load();
        let outcome = ingest(source, cancel, IngestOptions::from(&self.config), on_progress)?;
        Ok(self.commit(outcome))
    }

    fn commit(&mut self, outcome: IngestOutcome) -> LoadStatus {
        if outcome.cancelled {
            return LoadStatus::Cancelled;
        }
        let dataset = Dataset::from_outcome(outcome);
        info!(
            networks = dataset.networks.len(),
            observations = dataset.observations.len(),
            stride = dataset.plan.stride,
            fingerprint = %dataset.fingerprint,
            "load committed"
        );
        self.dataset = Some(dataset);
        LoadStatus::Loaded
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<&NetworkRecord> {
        match &self.dataset {
            Some(ds) => filter_networks(&ds.networks, criteria),
            None => Vec::new(),
        }
    }

    pub fn snapshot(&self, cutoff: i64) -> Option<Snapshot<'_>> {
        let ds = self.dataset.as_ref()?;
        Some(Snapshot {
            cutoff,
            networks: filter_by_cutoff(&ds.networks, cutoff),
            observations: filter_by_cutoff(&ds.observations, cutoff),
        })
    }

    /// Center of the densest grid cell over the networks, falling back to
    /// the observations when no network has a fix.
    pub fn focus_point(&self) -> Option<GeoPoint> {
        let ds = self.dataset.as_ref()?;
        densest_cell(&ds.networks, self.config.grid_deg)
            .or_else(|| densest_cell(&ds.observations, self.config.grid_deg))
    }

    pub fn summary(&self) -> Option<AnalysisSummary> {
        let ds = self.dataset.as_ref()?;
        Some(analyze(&ds.networks, &ds.observations, &self.config.analytics()))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = &self.in_flight {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, NetworkRow, ObservationRow};
    use scanmap_core::RadioType;

    const TEST_GRID_DEG: f64 = 0.01;

    fn row(bssid: &str, lat: f64, lon: f64, last_seen: i64) -> NetworkRow {
        NetworkRow {
            radio_type: "W".to_string(),
            lat,
            lon,
            level: -60,
            ssid: Some(bssid.to_string()),
            bssid: bssid.to_string(),
            last_seen,
            frequency: Some(5180),
            capabilities: Some("[WPA2-PSK-CCMP]".to_string()),
        }
    }

    fn berlin() -> MemorySource {
        let networks = vec![
            row("a", 52.001, 13.001, 100),
            row("b", 52.001, 13.001, 200),
            row("c", 52.001, 13.001, 300),
            row("d", 52.500, 13.500, 400),
            row("e", 52.500, 13.500, 500),
        ];
        let observations = vec![ObservationRow {
            ordinal: 1,
            lat: 52.0012,
            lon: 13.0011,
            level: -70,
            radio_type: "W".to_string(),
            time: 50,
        }];
        MemorySource::new(networks, observations)
    }

    fn session() -> Session {
        Session::new(Config {
            grid_deg: TEST_GRID_DEG,
            ..Config::default()
        })
    }

    #[test]
    fn load_exposes_views() {
        let mut s = session();
        let status = s.load(&mut berlin(), &CancelFlag::new(), &mut |_| {}).unwrap();
        assert_eq!(status, LoadStatus::Loaded);
        let ds = s.dataset().unwrap();
        assert_eq!(ds.time_range, TimeRange { min: 50, max: 500 });
        assert_eq!(ds.fingerprint.len(), 64);

        let focus = s.focus_point().unwrap();
        assert!((focus.lat - 52.00).abs() < 1e-9);
        assert!((focus.lon - 13.00).abs() < 1e-9);

        let snap = s.snapshot(300).unwrap();
        assert_eq!(snap.networks.len(), 3);
        assert_eq!(snap.observations.len(), 1);

        let bluetooth_only = FilterCriteria::default().with_types([RadioType::Bluetooth]);
        assert!(s.filtered(&bluetooth_only).is_empty());
        assert_eq!(s.filtered(&FilterCriteria::default()).len(), 5);

        let summary = s.summary().unwrap();
        assert_eq!(summary.totals.networks, 5);
        assert_eq!(summary.most_sighted[0].bssid, "c");
    }

    #[test]
    fn cancelled_load_keeps_previous_dataset() {
        let mut s = session();
        s.load(&mut berlin(), &CancelFlag::new(), &mut |_| {}).unwrap();
        let before = s.dataset().unwrap().fingerprint.clone();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut other = MemorySource::new(vec![row("z", 1.0, 1.0, 1)], Vec::new());
        let status = s.load(&mut other, &cancel, &mut |_| {}).unwrap();
        assert_eq!(status, LoadStatus::Cancelled);
        assert_eq!(s.dataset().unwrap().fingerprint, before);
    }

    #[test]
    fn new_load_replaces_dataset_wholesale() {
        let mut s = session();
        s.load(&mut berlin(), &CancelFlag::new(), &mut |_| {}).unwrap();
        let mut other = MemorySource::new(vec![row("z", 1.0, 1.0, 1)], Vec::new());
        s.load(&mut other, &CancelFlag::new(), &mut |_| {}).unwrap();
        let ds = s.dataset().unwrap();
        assert_eq!(ds.networks.len(), 1);
        assert!(ds.observations.is_empty());
    }

    #[test]
    fn background_load_commits_on_finish() {
        let mut s = session();
        s.start_load(berlin());
        assert!(s.is_loading());
        assert_eq!(s.finish_load().unwrap(), LoadStatus::Loaded);
        assert!(!s.is_loading());
        assert_eq!(s.dataset().unwrap().networks.len(), 5);
    }

    #[test]
    fn second_background_load_supersedes_first() {
        let mut s = session();
        s.start_load(berlin());
        s.start_load(MemorySource::new(vec![row("z", 1.0, 1.0, 1)], Vec::new()));
        assert_eq!(s.finish_load().unwrap(), LoadStatus::Loaded);
        assert_eq!(s.dataset().unwrap().networks[0].bssid, "z");
    }

    #[test]
    fn empty_session_has_no_views() {
        let mut s = session();
        assert!(s.focus_point().is_none());
        assert!(s.summary().is_none());
        assert!(s.snapshot(0).is_none());
        assert!(s.filtered(&FilterCriteria::default()).is_empty());
        assert_eq!(s.finish_load().unwrap(), LoadStatus::Cancelled);
    }
}
