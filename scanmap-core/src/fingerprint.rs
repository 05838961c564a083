use sha2::{Digest, Sha256};

use crate::record::{NetworkRecord, ObservationRecord};
use crate::sample::SamplePlan;

pub fn fingerprint(
    networks: &[NetworkRecord],
    observations: &[ObservationRecord],
    plan: &SamplePlan,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update((plan.stride as u64).to_be_bytes());
    hasher.update((networks.len() as u64).to_be_bytes());
    for n in networks {
        hasher.update(n.bssid.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update((observations.len() as u64).to_be_bytes());
    for o in observations {
        hasher.update(o.lat.to_bits().to_be_bytes());
        hasher.update(o.lon.to_bits().to_be_bytes());
        hasher.update(o.time.to_be_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
