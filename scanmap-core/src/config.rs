use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsConfig;
use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_observation_ceiling")]
    pub observation_ceiling: usize,
    #[serde(default = "default_grid_deg")]
    pub grid_deg: f64,
    #[serde(default = "default_sighting_epsilon_deg")]
    pub sighting_epsilon_deg: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_max_findings")]
    pub max_findings: usize,
    #[serde(default = "default_pattern_examples")]
    pub pattern_examples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: DEFAULT_CHUNK_SIZE,
            observation_ceiling: DEFAULT_OBSERVATION_CEILING,
            grid_deg: DEFAULT_GRID_DEG,
            sighting_epsilon_deg: DEFAULT_SIGHTING_EPSILON_DEG,
            top_n: DEFAULT_TOP_N,
            max_findings: DEFAULT_MAX_FINDINGS,
            pattern_examples: DEFAULT_PATTERN_EXAMPLES,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read(path)?;
        let cfg: Config = serde_json::from_slice(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunkSize must be > 0".into()));
        }
        if !(self.grid_deg.is_finite() && self.grid_deg > 0.0) {
            return Err(ConfigError::Invalid("gridDeg must be > 0".into()));
        }
        if !(self.sighting_epsilon_deg.is_finite() && self.sighting_epsilon_deg > 0.0) {
            return Err(ConfigError::Invalid("sightingEpsilonDeg must be > 0".into()));
        }
        Ok(())
    }

    pub fn analytics(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            sighting_epsilon_deg: self.sighting_epsilon_deg,
            top_n: self.top_n,
            max_findings: self.max_findings,
            pattern_examples: self.pattern_examples,
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_observation_ceiling() -> usize {
    DEFAULT_OBSERVATION_CEILING
}

fn default_grid_deg() -> f64 {
    DEFAULT_GRID_DEG
}

fn default_sighting_epsilon_deg() -> f64 {
    DEFAULT_SIGHTING_EPSILON_DEG
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_max_findings() -> usize {
    DEFAULT_MAX_FINDINGS
}

fn default_pattern_examples() -> usize {
    DEFAULT_PATTERN_EXAMPLES
}
