use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRow {
    pub radio_type: String,
    pub lat: f64,
    pub lon: f64,
    pub level: i32,
    pub ssid: Option<String>,
    pub bssid: String,
    pub last_seen: i64,
    pub frequency: Option<u32>,
    pub capabilities: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    // Stable row id: the stride key and the paging cursor.
    pub ordinal: i64,
    pub lat: f64,
    pub lon: f64,
    pub level: i32,
    pub radio_type: String,
    pub time: i64,
}

// Sources exclude rows whose latitude or longitude is exactly zero.
pub trait QuerySource {
    fn count_networks(&mut self) -> Result<usize>;

    fn network_page(&mut self, offset: usize, limit: usize) -> Result<Vec<NetworkRow>>;

    fn count_observations(&mut self) -> Result<usize>;

    // `ordinal > after && ordinal % stride == 0`, ascending.
    fn observation_page(&mut self, stride: usize, after: i64, limit: usize) -> Result<Vec<ObservationRow>>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    networks: Vec<NetworkRow>,
    observations: Vec<ObservationRow>,
}

impl MemorySource {
    pub fn new(mut networks: Vec<NetworkRow>, mut observations: Vec<ObservationRow>) -> Self {
        networks.retain(|r| has_fix(r.lat, r.lon));
        networks.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        observations.retain(|r| has_fix(r.lat, r.lon));
        observations.sort_by_key(|r| r.ordinal);
        MemorySource {
            networks,
            observations,
        }
    }
}

impl QuerySource for MemorySource {
    fn count_networks(&mut self) -> Result<usize> {
        Ok(self.networks.len())
    }

    fn network_page(&mut self, offset: usize, limit: usize) -> Result<Vec<NetworkRow>> {
        Ok(self.networks.iter().skip(offset).take(limit).cloned().collect())
    }

    fn count_observations(&mut self) -> Result<usize> {
        Ok(self.observations.len())
    }

    fn observation_page(&mut self, stride: usize, after: i64, limit: usize) -> Result<Vec<ObservationRow>> {
        let stride = stride.max(1) as i64;
        Ok(self
            .observations
            .iter()
            .filter(|r| r.ordinal > after && r.ordinal.rem_euclid(stride) == 0)
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(crate) fn has_fix(lat: f64, lon: f64) -> bool {
    lat != 0.0 && lon != 0.0
}
