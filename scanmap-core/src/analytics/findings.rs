use serde::Serialize;

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FindingKind {
    ManyOpen,
    WepPresent,
    BluetoothDense,
    ManyHidden,
    LowNameDiversity,
    Wpa3Adoption,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FindingInputs {
    pub total: usize,
    pub wifi: usize,
    pub open: usize,
    pub wep: usize,
    pub wpa3: usize,
    pub bluetooth: usize,
    pub hidden: usize,
    pub named: usize,
    pub unique_names: usize,
}

pub fn findings(inputs: &FindingInputs, max: usize) -> Vec<Finding> {
    let mut out = Vec::new();
    let wifi_pct = |n: usize| pct(n, inputs.wifi);

    if inputs.wifi > 0 && wifi_pct(inputs.open) > FINDING_OPEN_SHARE_PCT {
        out.push(Finding {
            kind: FindingKind::ManyOpen,
            message: format!(
                "{:.1}% of WiFi networks are open ({} of {})",
                wifi_pct(inputs.open),
                inputs.open,
                inputs.wifi
            ),
        });
    }
    if inputs.wep > 0 {
        out.push(Finding {
            kind: FindingKind::WepPresent,
            message: format!("{} networks still rely on WEP", inputs.wep),
        });
    }
    if inputs.total > 0 && pct(inputs.bluetooth, inputs.total) > FINDING_BLUETOOTH_SHARE_PCT {
        out.push(Finding {
            kind: FindingKind::BluetoothDense,
            message: format!(
                "Bluetooth devices make up {:.1}% of sightings",
                pct(inputs.bluetooth, inputs.total)
            ),
        });
    }
    if inputs.wifi > 0 && wifi_pct(inputs.hidden) > FINDING_HIDDEN_SHARE_PCT {
        out.push(Finding {
            kind: FindingKind::ManyHidden,
            message: format!("{:.1}% of WiFi networks hide their name", wifi_pct(inputs.hidden)),
        });
    }
    if inputs.named >= FINDING_DIVERSITY_MIN_NAMED {
        let ratio = inputs.unique_names as f64 / inputs.named as f64;
        if ratio < FINDING_DIVERSITY_RATIO {
            out.push(Finding {
                kind: FindingKind::LowNameDiversity,
                message: format!(
                    "Only {} distinct names across {} named networks",
                    inputs.unique_names, inputs.named
                ),
            });
        }
    }
    if inputs.wifi > 0 && wifi_pct(inputs.wpa3) > FINDING_WPA3_SHARE_PCT {
        out.push(Finding {
            kind: FindingKind::Wpa3Adoption,
            message: format!("WPA3 already covers {:.1}% of WiFi networks", wifi_pct(inputs.wpa3)),
        });
    }

    out.truncate(max);
    out
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}
