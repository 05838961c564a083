//! Summary statistics over a loaded dataset.
//!
//! Everything here works on the full network set; view filters are applied by
//! callers before they hand records to the renderer, not before aggregation.

mod findings;
mod patterns;
mod sightings;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::classify::{classify_frequency_band, classify_security, FrequencyBand, SecurityClass};
use crate::constants::*;
use crate::record::{NetworkRecord, ObservationRecord, RadioType};
use crate::temporal::{compute_range, TimeRange};

pub use findings::{findings, Finding, FindingInputs, FindingKind};
pub use patterns::{categorize_names, NamePattern, PatternGroup};
pub use sightings::{most_sighted, tally_sightings, SightingAggregate, SightingTally};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsConfig {
    pub sighting_epsilon_deg: f64,
    pub top_n: usize,
    pub max_findings: usize,
    pub pattern_examples: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            sighting_epsilon_deg: DEFAULT_SIGHTING_EPSILON_DEG,
            top_n: DEFAULT_TOP_N,
            max_findings: DEFAULT_MAX_FINDINGS,
            pattern_examples: DEFAULT_PATTERN_EXAMPLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEntry {
    pub bssid: String,
    pub ssid: String,
    #[serde(rename = "type")]
    pub radio_type: RadioType,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub area_km2: f64,
    pub label: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub networks: usize,
    pub observations: usize,
    pub wifi: usize,
    pub hidden: usize,
    pub unique_ssids: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub totals: Totals,
    pub time_range: TimeRange,
    pub by_type: Vec<GroupCount>,
    pub by_security: Vec<GroupCount>,
    pub by_band: Vec<GroupCount>,
    pub strongest: Vec<SignalEntry>,
    pub most_sighted: Vec<SightingAggregate>,
    pub unmatched_observations: usize,
    pub coverage: Coverage,
    pub name_patterns: Vec<PatternGroup>,
    pub findings: Vec<Finding>,
}

pub fn analyze(
    networks: &[NetworkRecord],
    observations: &[ObservationRecord],
    cfg: &AnalyticsConfig,
) -> AnalysisSummary {
    let wifi: Vec<&NetworkRecord> = networks
        .iter()
        .filter(|n| n.radio_type == RadioType::Wifi)
        .collect();

    let by_type = group_counts(
        RadioType::ALL.iter().map(|t| {
            let count = networks.iter().filter(|n| n.radio_type == *t).count();
            (t.label(), count)
        }),
        networks.len(),
    );

    let classes: Vec<SecurityClass> = wifi
        .iter()
        .map(|n| classify_security(&n.capabilities))
        .collect();
    let by_security = group_counts(
        SecurityClass::ALL.iter().map(|c| {
            let count = classes.iter().filter(|k| *k == c).count();
            (c.label(), count)
        }),
        wifi.len(),
    );

    let bands: Vec<FrequencyBand> = wifi
        .iter()
        .filter_map(|n| n.frequency)
        .map(|f| classify_frequency_band(f as f64))
        .collect();
    let by_band = group_counts(
        FrequencyBand::ALL.iter().map(|b| {
            let count = bands.iter().filter(|k| *k == b).count();
            (b.label(), count)
        }),
        bands.len(),
    );

    let tally = tally_sightings(networks, observations, cfg.sighting_epsilon_deg);
    debug!(
        observations = observations.len(),
        unmatched = tally.unmatched,
        "sightings tallied"
    );

    let named: Vec<&str> = networks
        .iter()
        .filter(|n| !n.is_hidden())
        .map(|n| n.ssid.as_str())
        .collect();
    let unique_names = named.iter().collect::<HashSet<_>>().len();
    let hidden_wifi = wifi.iter().filter(|n| n.is_hidden()).count();

    let inputs = FindingInputs {
        total: networks.len(),
        wifi: wifi.len(),
        open: count_class(&classes, SecurityClass::Open),
        wep: count_class(&classes, SecurityClass::Wep),
        wpa3: count_class(&classes, SecurityClass::Wpa3),
        bluetooth: networks.iter().filter(|n| n.radio_type.is_bluetooth()).count(),
        hidden: hidden_wifi,
        named: named.len(),
        unique_names,
    };

    AnalysisSummary {
        totals: Totals {
            networks: networks.len(),
            observations: observations.len(),
            wifi: wifi.len(),
            hidden: hidden_wifi,
            unique_ssids: unique_names,
        },
        time_range: compute_range(networks, observations),
        by_type,
        by_security,
        by_band,
        strongest: strongest(networks, cfg.top_n),
        most_sighted: most_sighted(networks, &tally, cfg.top_n),
        unmatched_observations: tally.unmatched,
        coverage: coverage(networks),
        name_patterns: categorize_names(networks, cfg.pattern_examples),
        findings: findings(&inputs, cfg.max_findings),
    }
}

/// Top `n` named networks by signal level; equal levels keep ingestion order.
/// Records without a level reading are not ranked.
pub fn strongest(networks: &[NetworkRecord], n: usize) -> Vec<SignalEntry> {
    let mut named: Vec<&NetworkRecord> = networks
        .iter()
        .filter(|r| !r.is_hidden() && r.level != NO_LEVEL_DBM)
        .collect();
    named.sort_by(|a, b| b.level.cmp(&a.level));
    named
        .into_iter()
        .take(n)
        .map(|r| SignalEntry {
            bssid: r.bssid.clone(),
            ssid: r.ssid.clone(),
            radio_type: r.radio_type,
            level: r.level,
        })
        .collect()
}

pub fn coverage(networks: &[NetworkRecord]) -> Coverage {
    let Some(first) = networks.first() else {
        return Coverage {
            area_km2: 0.0,
            label: "no data".to_string(),
            min_lat: 0.0,
            max_lat: 0.0,
            min_lon: 0.0,
            max_lon: 0.0,
        };
    };
    let (mut min_lat, mut max_lat, mut min_lon, mut max_lon) = (first.lat, first.lat, first.lon, first.lon);
    for n in networks {
        min_lat = min_lat.min(n.lat);
        max_lat = max_lat.max(n.lat);
        min_lon = min_lon.min(n.lon);
        max_lon = max_lon.max(n.lon);
    }
    let area_km2 = (max_lat - min_lat) * KM_PER_DEG * (max_lon - min_lon) * KM_PER_DEG;
    Coverage {
        area_km2,
        label: area_label(area_km2).to_string(),
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

pub fn area_label(area_km2: f64) -> &'static str {
    if area_km2 < AREA_NEIGHBORHOOD_KM2 {
        "neighborhood"
    } else if area_km2 < AREA_DISTRICT_KM2 {
        "district"
    } else if area_km2 < AREA_CITY_KM2 {
        "city"
    } else {
        "region"
    }
}

fn count_class(classes: &[SecurityClass], class: SecurityClass) -> usize {
    classes.iter().filter(|c| **c == class).count()
}

fn group_counts<'a, I>(counts: I, total: usize) -> Vec<GroupCount>
where
    I: Iterator<Item = (&'a str, usize)>,
{
    if total == 0 {
        return Vec::new();
    }
    counts
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| GroupCount {
            label: label.to_string(),
            count,
            percent: (count as f64 * 1000.0 / total as f64).round() / 10.0,
        })
        .collect()
}
