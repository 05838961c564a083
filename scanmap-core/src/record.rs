use serde::{Deserialize, Serialize};

use crate::constants::HIDDEN_SSID;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RadioType {
    #[serde(rename = "W")]
    Wifi,
    #[serde(rename = "B")]
    Bluetooth,
    #[serde(rename = "E")]
    BluetoothLe,
    #[serde(rename = "G")]
    Gsm,
    #[serde(rename = "L")]
    Lte,
    #[serde(rename = "C")]
    Cdma,
}

impl RadioType {
    pub const ALL: [RadioType; 6] = [
        RadioType::Wifi,
        RadioType::Bluetooth,
        RadioType::BluetoothLe,
        RadioType::Gsm,
        RadioType::Lte,
        RadioType::Cdma,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "W" => Some(RadioType::Wifi),
            "B" => Some(RadioType::Bluetooth),
            "E" => Some(RadioType::BluetoothLe),
            "G" => Some(RadioType::Gsm),
            "L" => Some(RadioType::Lte),
            "C" => Some(RadioType::Cdma),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            RadioType::Wifi => 'W',
            RadioType::Bluetooth => 'B',
            RadioType::BluetoothLe => 'E',
            RadioType::Gsm => 'G',
            RadioType::Lte => 'L',
            RadioType::Cdma => 'C',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RadioType::Wifi => "WiFi",
            RadioType::Bluetooth => "Bluetooth",
            RadioType::BluetoothLe => "Bluetooth LE",
            RadioType::Gsm => "GSM",
            RadioType::Lte => "LTE",
            RadioType::Cdma => "CDMA",
        }
    }

    pub fn is_bluetooth(self) -> bool {
        matches!(self, RadioType::Bluetooth | RadioType::BluetoothLe)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    #[serde(rename = "type")]
    pub radio_type: RadioType,
    pub lat: f64,
    pub lon: f64,
    pub level: i32,
    pub ssid: String,
    pub bssid: String,
    pub last_seen: i64,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub capabilities: String,
}

impl NetworkRecord {
    pub fn is_hidden(&self) -> bool {
        is_hidden_ssid(&self.ssid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    pub lat: f64,
    pub lon: f64,
    pub level: i32,
    #[serde(rename = "type")]
    pub radio_type: RadioType,
    pub time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

pub trait Positioned {
    fn position(&self) -> (f64, f64);
}

pub trait Timestamped {
    fn timestamp(&self) -> i64;
}

impl Positioned for NetworkRecord {
    fn position(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl Positioned for ObservationRecord {
    fn position(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl Timestamped for NetworkRecord {
    fn timestamp(&self) -> i64 {
        self.last_seen
    }
}

impl Timestamped for ObservationRecord {
    fn timestamp(&self) -> i64 {
        self.time
    }
}

impl<T: Positioned> Positioned for &T {
    fn position(&self) -> (f64, f64) {
        (**self).position()
    }
}

impl<T: Timestamped> Timestamped for &T {
    fn timestamp(&self) -> i64 {
        (**self).timestamp()
    }
}

pub fn is_hidden_ssid(ssid: &str) -> bool {
    ssid.is_empty() || ssid == HIDDEN_SSID
}

pub fn normalize_ssid(ssid: Option<String>) -> String {
    match ssid {
        Some(s) if !s.trim().is_empty() => s,
        _ => HIDDEN_SSID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_codes_round_trip_for_known_types() {
        for t in RadioType::ALL {
            let code = t.code().to_string();
            assert_eq!(RadioType::from_code(&code), Some(t));
        }
        assert_eq!(RadioType::from_code("N"), None);
        assert_eq!(RadioType::from_code(""), None);
    }

    #[test]
    fn normalize_ssid_replaces_missing_and_blank() {
        assert_eq!(normalize_ssid(None), HIDDEN_SSID);
        assert_eq!(normalize_ssid(Some(String::new())), HIDDEN_SSID);
        assert_eq!(normalize_ssid(Some("  ".into())), HIDDEN_SSID);
        assert_eq!(normalize_ssid(Some("cafe".into())), "cafe");
    }

    #[test]
    fn network_serializes_with_type_code() {
        let rec = NetworkRecord {
            radio_type: RadioType::BluetoothLe,
            lat: 1.0,
            lon: 2.0,
            level: -60,
            ssid: "tag".into(),
            bssid: "aa".into(),
            last_seen: 5,
            frequency: None,
            capabilities: String::new(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "E");
        assert_eq!(json["lastSeen"], 5);
    }
}
