use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::classify::{classify_security, SecurityClass};
use crate::constants::DEFAULT_MIN_SIGNAL_DBM;
use crate::record::{NetworkRecord, RadioType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFlags {
    pub open: bool,
    pub wep: bool,
    pub wpa: bool,
    pub wpa3: bool,
    pub hidden: bool,
}

impl Default for SecurityFlags {
    fn default() -> Self {
        SecurityFlags {
            open: true,
            wep: true,
            wpa: true,
            wpa3: true,
            hidden: true,
        }
    }
}

impl SecurityFlags {
    pub fn allows(&self, class: SecurityClass) -> bool {
        match class {
            SecurityClass::Open => self.open,
            SecurityClass::Wep => self.wep,
            SecurityClass::Wpa | SecurityClass::Wpa2 => self.wpa,
            SecurityClass::Wpa3 => self.wpa3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub active_types: BTreeSet<RadioType>,
    pub min_signal: i32,
    pub search_text: String,
    pub security: SecurityFlags,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            active_types: RadioType::ALL.into_iter().collect(),
            min_signal: DEFAULT_MIN_SIGNAL_DBM,
            search_text: String::new(),
            security: SecurityFlags::default(),
        }
    }
}

impl FilterCriteria {
    pub fn with_types<I: IntoIterator<Item = RadioType>>(self, types: I) -> Self {
        FilterCriteria {
            active_types: types.into_iter().collect(),
            ..self
        }
    }

    pub fn with_min_signal(self, min_signal: i32) -> Self {
        FilterCriteria { min_signal, ..self }
    }

    pub fn with_search(self, text: impl Into<String>) -> Self {
        FilterCriteria {
            search_text: text.into(),
            ..self
        }
    }

    pub fn with_security(self, security: SecurityFlags) -> Self {
        FilterCriteria { security, ..self }
    }
}

pub fn matches(record: &NetworkRecord, criteria: &FilterCriteria) -> bool {
    let needle = criteria.search_text.to_lowercase();
    matches_lowered(record, criteria, &needle)
}

pub fn filter_networks<'a>(
    records: &'a [NetworkRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a NetworkRecord> {
    let needle = criteria.search_text.to_lowercase();
    records
        .iter()
        .filter(|r| matches_lowered(r, criteria, &needle))
        .collect()
}

fn matches_lowered(record: &NetworkRecord, criteria: &FilterCriteria, needle: &str) -> bool {
    if !criteria.active_types.contains(&record.radio_type) {
        return false;
    }
    if record.level < criteria.min_signal {
        return false;
    }
    if !needle.is_empty()
        && !record.ssid.to_lowercase().contains(needle)
        && !record.bssid.to_lowercase().contains(needle)
    {
        return false;
    }
    if record.radio_type != RadioType::Wifi {
        return true;
    }
    if record.is_hidden() {
        return criteria.security.hidden;
    }
    criteria
        .security
        .allows(classify_security(&record.capabilities))
}
