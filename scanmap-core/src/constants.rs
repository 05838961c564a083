pub const HIDDEN_SSID: &str = "Hidden Network";

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_OBSERVATION_CEILING: usize = 15_000;
pub const DEFAULT_GRID_DEG: f64 = 0.01;
pub const DEFAULT_SIGHTING_EPSILON_DEG: f64 = 0.001;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MAX_FINDINGS: usize = 5;
pub const DEFAULT_PATTERN_EXAMPLES: usize = 3;
pub const DEFAULT_MIN_SIGNAL_DBM: i32 = -120;
// Scanners write 0 when a record carries no level reading.
pub const NO_LEVEL_DBM: i32 = 0;

pub const KM_PER_DEG: f64 = 111.0;

pub const AREA_NEIGHBORHOOD_KM2: f64 = 1.0;
pub const AREA_DISTRICT_KM2: f64 = 25.0;
pub const AREA_CITY_KM2: f64 = 500.0;

pub const FINDING_OPEN_SHARE_PCT: f64 = 20.0;
pub const FINDING_BLUETOOTH_SHARE_PCT: f64 = 30.0;
pub const FINDING_HIDDEN_SHARE_PCT: f64 = 15.0;
pub const FINDING_WPA3_SHARE_PCT: f64 = 10.0;
pub const FINDING_DIVERSITY_RATIO: f64 = 0.5;
pub const FINDING_DIVERSITY_MIN_NAMED: usize = 10;
