use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SecurityClass {
    Open,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WPA2")]
    Wpa2,
    #[serde(rename = "WPA3")]
    Wpa3,
}

impl SecurityClass {
    pub const ALL: [SecurityClass; 5] = [
        SecurityClass::Open,
        SecurityClass::Wep,
        SecurityClass::Wpa,
        SecurityClass::Wpa2,
        SecurityClass::Wpa3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SecurityClass::Open => "Open",
            SecurityClass::Wep => "WEP",
            SecurityClass::Wpa => "WPA",
            SecurityClass::Wpa2 => "WPA2",
            SecurityClass::Wpa3 => "WPA3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FrequencyBand {
    #[serde(rename = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    Ghz5,
    #[serde(rename = "6GHz")]
    Ghz6,
    #[serde(rename = "900MHz")]
    Mhz900,
    #[serde(rename = "1800MHz")]
    Mhz1800,
    Other,
}

impl FrequencyBand {
    pub const ALL: [FrequencyBand; 6] = [
        FrequencyBand::Ghz2_4,
        FrequencyBand::Ghz5,
        FrequencyBand::Ghz6,
        FrequencyBand::Mhz900,
        FrequencyBand::Mhz1800,
        FrequencyBand::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FrequencyBand::Ghz2_4 => "2.4GHz",
            FrequencyBand::Ghz5 => "5GHz",
            FrequencyBand::Ghz6 => "6GHz",
            FrequencyBand::Mhz900 => "900MHz",
            FrequencyBand::Mhz1800 => "1800MHz",
            FrequencyBand::Other => "Other",
        }
    }
}

// Order matters: a "WPA2" descriptor also contains "WPA".
const SECURITY_TOKENS: [(&str, SecurityClass); 4] = [
    ("WPA3", SecurityClass::Wpa3),
    ("WPA2", SecurityClass::Wpa2),
    ("WPA", SecurityClass::Wpa),
    ("WEP", SecurityClass::Wep),
];

pub fn classify_security(capabilities: &str) -> SecurityClass {
    if capabilities.is_empty() {
        return SecurityClass::Open;
    }
    SECURITY_TOKENS
        .iter()
        .find(|(token, _)| capabilities.contains(token))
        .map(|(_, class)| *class)
        .unwrap_or(SecurityClass::Open)
}

/// Ranges are inclusive and checked in order, so 6000 MHz lands in 5GHz.
pub fn classify_frequency_band(mhz: f64) -> FrequencyBand {
    if (2400.0..=2500.0).contains(&mhz) {
        FrequencyBand::Ghz2_4
    } else if (5000.0..=6000.0).contains(&mhz) {
        FrequencyBand::Ghz5
    } else if (6000.0..=7000.0).contains(&mhz) {
        FrequencyBand::Ghz6
    } else if (900.0..=1000.0).contains(&mhz) {
        FrequencyBand::Mhz900
    } else if (1800.0..=2000.0).contains(&mhz) {
        FrequencyBand::Mhz1800
    } else {
        FrequencyBand::Other
    }
}
