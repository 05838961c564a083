use std::collections::HashMap;

use serde::Serialize;

use crate::record::{NetworkRecord, ObservationRecord, RadioType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingAggregate {
    pub bssid: String,
    pub ssid: String,
    #[serde(rename = "type")]
    pub radio_type: RadioType,
    pub capabilities: String,
    pub sighting_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SightingTally {
    pub counts: Vec<usize>,
    pub unmatched: usize,
}

/// Per-type grid of network indices with cells as wide as the match epsilon,
/// so every network within epsilon of a point sits in the point's cell or one
/// of its eight neighbours.
struct NetworkGrid {
    cell_deg: f64,
    cells: HashMap<(RadioType, i64, i64), Vec<usize>>,
}

impl NetworkGrid {
    fn build(networks: &[NetworkRecord], cell_deg: f64) -> Self {
        let mut cells: HashMap<(RadioType, i64, i64), Vec<usize>> = HashMap::new();
        for (idx, net) in networks.iter().enumerate() {
            let (cy, cx) = cell_of(net.lat, net.lon, cell_deg);
            cells.entry((net.radio_type, cy, cx)).or_default().push(idx);
        }
        NetworkGrid { cell_deg, cells }
    }

    fn neighbours(&self, radio_type: RadioType, lat: f64, lon: f64) -> impl Iterator<Item = usize> + '_ {
        let (cy, cx) = cell_of(lat, lon, self.cell_deg);
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (radio_type, cy + dy, cx + dx)))
            .filter_map(move |key| self.cells.get(&key))
            .flatten()
            .copied()
    }
}

fn cell_of(lat: f64, lon: f64, cell_deg: f64) -> (i64, i64) {
    ((lat / cell_deg).floor() as i64, (lon / cell_deg).floor() as i64)
}

/// Counts observations per network by proximity.
///
/// An observation matches a network of the same type when both axes differ by
/// less than `epsilon_deg`. When several networks qualify, the one earliest in
/// `networks` wins, which is what a linear scan of the list would pick.
pub fn tally_sightings(
    networks: &[NetworkRecord],
    observations: &[ObservationRecord],
    epsilon_deg: f64,
) -> SightingTally {
    let mut tally = SightingTally {
        counts: vec![0; networks.len()],
        unmatched: 0,
    };
    if networks.is_empty() || !(epsilon_deg.is_finite() && epsilon_deg > 0.0) {
        tally.unmatched = observations.len();
        return tally;
    }

    let grid = NetworkGrid::build(networks, epsilon_deg);
    for obs in observations {
        let hit = grid
            .neighbours(obs.radio_type, obs.lat, obs.lon)
            .filter(|&idx| {
                let net = &networks[idx];
                (net.lat - obs.lat).abs() < epsilon_deg && (net.lon - obs.lon).abs() < epsilon_deg
            })
            .min();
        match hit {
            Some(idx) => tally.counts[idx] += 1,
            None => tally.unmatched += 1,
        }
    }
    tally
}

/// Highest tallies first; equal tallies keep ingestion order. Unsighted networks are left out.
pub fn most_sighted(networks: &[NetworkRecord], tally: &SightingTally, top_n: usize) -> Vec<SightingAggregate> {
    let mut ranked: Vec<(usize, usize)> = tally
        .counts
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(idx, count)| {
            let net = &networks[idx];
            SightingAggregate {
                bssid: net.bssid.clone(),
                ssid: net.ssid.clone(),
                radio_type: net.radio_type,
                capabilities: net.capabilities.clone(),
                sighting_count: count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_EPSILON_DEG: f64 = 0.001;

    fn net(bssid: &str, t: RadioType, lat: f64, lon: f64) -> NetworkRecord {
        NetworkRecord {
            radio_type: t,
            lat,
            lon,
            level: -60,
            ssid: format!("ssid-{bssid}"),
            bssid: bssid.to_string(),
            last_seen: 1,
            frequency: None,
            capabilities: "[WPA2-PSK]".to_string(),
        }
    }

    fn obs(t: RadioType, lat: f64, lon: f64) -> ObservationRecord {
        ObservationRecord {
            lat,
            lon,
            level: -70,
            radio_type: t,
            time: 1,
        }
    }

    fn naive(networks: &[NetworkRecord], observations: &[ObservationRecord], eps: f64) -> Vec<usize> {
        let mut counts = vec![0; networks.len()];
        for o in observations {
            if let Some(idx) = networks.iter().position(|n| {
                n.radio_type == o.radio_type && (n.lat - o.lat).abs() < eps && (n.lon - o.lon).abs() < eps
            }) {
                counts[idx] += 1;
            }
        }
        counts
    }

    #[test]
    fn far_observation_does_not_count() {
        let networks = vec![net("AA:BB", RadioType::Wifi, 52.0001, 13.0001)];
        let observations = vec![
            obs(RadioType::Wifi, 52.0002, 13.0001),
            obs(RadioType::Wifi, 52.0003, 13.0000),
            obs(RadioType::Wifi, 53.0, 14.0),
        ];
        let tally = tally_sightings(&networks, &observations, TEST_EPSILON_DEG);
        assert_eq!(tally.counts, vec![2]);
        assert_eq!(tally.unmatched, 1);
        let top = most_sighted(&networks, &tally, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].bssid, "AA:BB");
        assert_eq!(top[0].sighting_count, 2);
    }

    #[test]
    fn type_must_agree() {
        let networks = vec![net("bt", RadioType::Bluetooth, 10.0, 10.0)];
        let observations = vec![obs(RadioType::Wifi, 10.0, 10.0)];
        let tally = tally_sightings(&networks, &observations, TEST_EPSILON_DEG);
        assert_eq!(tally.counts, vec![0]);
        assert!(most_sighted(&networks, &tally, 10).is_empty());
    }

    #[test]
    fn overlapping_candidates_go_to_first_listed() {
        let networks = vec![
            net("listed-first", RadioType::Wifi, 10.0012, 10.0),
            net("listed-second", RadioType::Wifi, 10.0004, 10.0),
        ];
        let observations = vec![obs(RadioType::Wifi, 10.0008, 10.0)];
        let tally = tally_sightings(&networks, &observations, TEST_EPSILON_DEG);
        assert_eq!(tally.counts, vec![1, 0]);
    }

    #[test]
    fn grid_agrees_with_linear_scan_across_cell_edges() {
        let mut networks = Vec::new();
        let mut observations = Vec::new();
        for i in 0..40 {
            let step = i as f64 * 0.00037;
            networks.push(net(&format!("n{i}"), RadioType::Wifi, -33.8 + step, 151.2 - step));
            observations.push(obs(RadioType::Wifi, -33.8 + step + 0.0005, 151.2 - step));
            observations.push(obs(RadioType::Wifi, -33.8 + step - 0.0009, 151.2 - step + 0.0009));
        }
        let tally = tally_sightings(&networks, &observations, TEST_EPSILON_DEG);
        assert_eq!(tally.counts, naive(&networks, &observations, TEST_EPSILON_DEG));
    }

    #[test]
    fn ranking_is_stable_and_truncated() {
        let networks = vec![
            net("a", RadioType::Wifi, 1.0, 1.0),
            net("b", RadioType::Wifi, 2.0, 2.0),
            net("c", RadioType::Wifi, 3.0, 3.0),
        ];
        let tally = SightingTally {
            counts: vec![2, 5, 2],
            unmatched: 0,
        };
        let top: Vec<String> = most_sighted(&networks, &tally, 2)
            .into_iter()
            .map(|s| s.bssid)
            .collect();
        assert_eq!(top, vec!["b", "a"]);
    }
}
