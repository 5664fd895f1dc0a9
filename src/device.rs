use log::{debug, warn};

use crate::sim::HardwareIdentifier;

/// MobileGestalt keys holding the IMEI of each slot, in slot order.
pub const IMEI_KEYS: [(u32, &str); 2] = [
    (1, "InternationalMobileEquipmentIdentity"),
    (2, "InternationalMobileEquipmentIdentity2"),
];

pub trait DeviceIdentity: Send + Sync {
    /// Empty on Wi-Fi only devices or without the entitlement.
    fn hardware_identifiers(&self) -> Vec<HardwareIdentifier>;
}

pub struct GestaltIdentity<F> {
    copy_answer: F,
}

impl<F> GestaltIdentity<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    pub fn new(copy_answer: F) -> Self {
        Self { copy_answer }
    }
}

impl<F> DeviceIdentity for GestaltIdentity<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn hardware_identifiers(&self) -> Vec<HardwareIdentifier> {
        let identifiers: Vec<HardwareIdentifier> = IMEI_KEYS
            .iter()
            .filter_map(|(slot, key)| {
                let value = (self.copy_answer)(key)?;
                if value.is_empty() {
                    debug!("Empty answer for {key}");
                    return None;
                }
                Some(HardwareIdentifier { slot: *slot, value })
            })
            .collect();

        if identifiers.is_empty() {
            warn!("No IMEI available, Wi-Fi only device or missing entitlement?");
        }
        identifiers
    }
}

#[derive(Debug, Default)]
pub struct NoIdentity;

impl DeviceIdentity for NoIdentity {
    fn hardware_identifiers(&self) -> Vec<HardwareIdentifier> {
        Vec::new()
    }
}
