use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::record::NetworkRecord;

lazy_static! {
    static ref CARRIER_PATTERN: Regex = Regex::new(
        r"(?i)(xfinity|comcast|spectrum|verizon|\bat&t|attwifi|t-?mobile|vodafone|telekom|orange|bt-?wifi|telstra|optus|\bsfr\b)"
    )
    .unwrap();
    static ref DEFAULT_ROUTER_PATTERN: Regex = Regex::new(
        r"(?i)^(linksys|netgear|d-?link|dir-\d+|tp-?link|asus|belkin|default|dlink|huawei-|zte_|fritz!?box|ubee|arris|home-[0-9a-f]{4}|mywifi|wifi-?[0-9a-f]{4,})"
    )
    .unwrap();
    static ref CAMPUS_PATTERN: Regex =
        Regex::new(r"(?i)(eduroam|campus|universit|college|school|student|library|\bedu\b)").unwrap();
    static ref GUEST_PATTERN: Regex =
        Regex::new(r"(?i)(guest|public|visitor|free|hotel|lobby|customer)").unwrap();
    static ref MOBILE_PATTERN: Regex =
        Regex::new(r"(?i)(iphone|android|galaxy|pixel|hotspot|mifi|jetpack)").unwrap();
    static ref CORPORATE_PATTERN: Regex =
        Regex::new(r"^[A-Z][A-Z0-9]{1,}([-_][A-Z0-9]{2,}){1,3}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NamePattern {
    CarrierHotspot,
    DefaultRouter,
    Campus,
    GuestPublic,
    MobileHotspot,
    Corporate,
}

impl NamePattern {
    pub const ALL: [NamePattern; 6] = [
        NamePattern::CarrierHotspot,
        NamePattern::DefaultRouter,
        NamePattern::Campus,
        NamePattern::GuestPublic,
        NamePattern::MobileHotspot,
        NamePattern::Corporate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NamePattern::CarrierHotspot => "Carrier hotspots",
            NamePattern::DefaultRouter => "Default router names",
            NamePattern::Campus => "Campus / education",
            NamePattern::GuestPublic => "Guest / public access",
            NamePattern::MobileHotspot => "Mobile hotspots",
            NamePattern::Corporate => "Structured corporate names",
        }
    }

    pub fn is_match(self, ssid: &str) -> bool {
        let re: &Regex = match self {
            NamePattern::CarrierHotspot => &CARRIER_PATTERN,
            NamePattern::DefaultRouter => &DEFAULT_ROUTER_PATTERN,
            NamePattern::Campus => &CAMPUS_PATTERN,
            NamePattern::GuestPublic => &GUEST_PATTERN,
            NamePattern::MobileHotspot => &MOBILE_PATTERN,
            NamePattern::Corporate => &CORPORATE_PATTERN,
        };
        re.is_match(ssid)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternGroup {
    pub pattern: NamePattern,
    pub label: String,
    pub count: usize,
    pub examples: Vec<String>,
}

pub fn categorize_names(networks: &[NetworkRecord], max_examples: usize) -> Vec<PatternGroup> {
    let mut groups: Vec<PatternGroup> = NamePattern::ALL
        .iter()
        .map(|&pattern| PatternGroup {
            pattern,
            label: pattern.label().to_string(),
            count: 0,
            examples: Vec::new(),
        })
        .collect();

    for net in networks.iter().filter(|n| !n.is_hidden()) {
        for group in groups.iter_mut() {
            if !group.pattern.is_match(&net.ssid) {
                continue;
            }
            group.count += 1;
            if group.examples.len() < max_examples && !group.examples.contains(&net.ssid) {
                group.examples.push(net.ssid.clone());
            }
        }
    }

    groups.retain(|g| g.count > 0);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HIDDEN_SSID;
    use crate::record::RadioType;

    fn named(ssid: &str) -> NetworkRecord {
        NetworkRecord {
            radio_type: RadioType::Wifi,
            lat: 1.0,
            lon: 1.0,
            level: -60,
            ssid: ssid.to_string(),
            bssid: format!("bssid-{ssid}"),
            last_seen: 1,
            frequency: None,
            capabilities: String::new(),
        }
    }

    #[test]
    fn rules_recognize_typical_names() {
        assert!(NamePattern::CarrierHotspot.is_match("xfinitywifi"));
        assert!(NamePattern::DefaultRouter.is_match("NETGEAR42"));
        assert!(NamePattern::DefaultRouter.is_match("TP-Link_5G_1A2B"));
        assert!(NamePattern::Campus.is_match("eduroam"));
        assert!(NamePattern::GuestPublic.is_match("Hotel-Guest"));
        assert!(NamePattern::MobileHotspot.is_match("Alex's iPhone"));
        assert!(NamePattern::Corporate.is_match("ACME-CORP-WLAN"));
        assert!(!NamePattern::Corporate.is_match("Acme Corp"));
    }

    #[test]
    fn groups_are_non_exclusive_and_skip_hidden() {
        let nets = vec![
            named("xfinitywifi"),
            named("Free Public WiFi"),
            named("CORP-GUEST"),
            named(HIDDEN_SSID),
            named("plainname"),
        ];
        let groups = categorize_names(&nets, 3);
        let guest = groups
            .iter()
            .find(|g| g.pattern == NamePattern::GuestPublic)
            .unwrap();
        assert_eq!(guest.count, 2);
        let corp = groups
            .iter()
            .find(|g| g.pattern == NamePattern::Corporate)
            .unwrap();
        assert_eq!(corp.examples, vec!["CORP-GUEST".to_string()]);
        assert!(groups.iter().all(|g| g.count > 0));
    }

    #[test]
    fn examples_are_distinct_and_capped() {
        let nets: Vec<NetworkRecord> = ["guest1", "guest1", "guest2", "guest3", "guest4"]
            .iter()
            .map(|s| named(s))
            .collect();
        let groups = categorize_names(&nets, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 5);
        assert_eq!(groups[0].examples, vec!["guest1", "guest2", "guest3"]);
    }
}
