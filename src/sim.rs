use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::settings::Settings;

pub const UNKNOWN: &str = "Unknown";

/// Discriminants are the raw CoreTelephony max data rate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DataRate {
    #[serde(rename = "2G")]
    TwoG = 1,
    #[serde(rename = "3G")]
    ThreeG = 2,
    #[serde(rename = "4G")]
    FourG = 3,
    #[serde(rename = "5G")]
    FiveG = 4,
    #[serde(rename = "5G SA")]
    FiveGStandalone = 5,
}

impl DataRate {
    pub fn from_raw(raw: i64) -> Option<DataRate> {
        match raw {
            1 => Some(DataRate::TwoG),
            2 => Some(DataRate::ThreeG),
            3 => Some(DataRate::FourG),
            4 => Some(DataRate::FiveG),
            5 => Some(DataRate::FiveGStandalone),
            _ => None,
        }
    }

    pub fn raw(self) -> i64 {
        self as i64
    }

    /// An empty result means "unknown".
    pub fn normalize(mut rates: Vec<DataRate>) -> Option<Vec<DataRate>> {
        rates.sort();
        rates.dedup();
        if rates.is_empty() {
            None
        } else {
            Some(rates)
        }
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DataRate::TwoG => "2G",
            DataRate::ThreeG => "3G",
            DataRate::FourG => "4G",
            DataRate::FiveG => "5G",
            DataRate::FiveGStandalone => "5G SA",
        };
        f.write_str(text)
    }
}

pub fn rate_text(rate: Option<DataRate>) -> String {
    match rate {
        Some(rate) => rate.to_string(),
        None => UNKNOWN.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegistrationStatus {
    Registered,
    NotRegistered,
    EmergencyOnly,
    Unknown,
}

impl RegistrationStatus {
    pub fn from_ct(status: &str) -> RegistrationStatus {
        match status {
            "kCTRegistrationStatusRegisteredHome" | "kCTRegistrationStatusRegisteredRoaming" => {
                RegistrationStatus::Registered
            }
            "kCTRegistrationStatusNotRegistered"
            | "kCTRegistrationStatusSearching"
            | "kCTRegistrationStatusDenied" => RegistrationStatus::NotRegistered,
            "kCTRegistrationStatusEmergencyOnly" => RegistrationStatus::EmergencyOnly,
            _ => RegistrationStatus::Unknown,
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::NotRegistered => "not registered",
            RegistrationStatus::EmergencyOnly => "emergency only",
            RegistrationStatus::Unknown => UNKNOWN,
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareIdentifier {
    pub slot: u32,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSlot {
    pub slot: u32,
    pub uuid: Uuid,
    pub label: String,
    pub operator_name: String,
    pub phone_number: Option<String>,
    pub registration_status: RegistrationStatus,
    pub is_enabled: bool,
    pub is_data_preferred: bool,
    pub supported_rates: Option<Vec<DataRate>>,
    pub current_rate: Option<DataRate>,
    /// Plain 5G only, standalone does not count.
    pub supports_5g: bool,
    pub imei: Option<String>,
}

impl fmt::Display for SimSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rates = match &self.supported_rates {
            Some(rates) => rates
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            None => "none".to_string(),
        };

        writeln!(f, "---- SIM Slot {} ----", self.slot)?;
        writeln!(f, "label: {}", self.label)?;
        writeln!(f, "uuid: {}", self.uuid)?;
        writeln!(f, "operator: {}", self.operator_name)?;
        writeln!(
            f,
            "phone number: {}",
            self.phone_number.as_deref().unwrap_or("none")
        )?;
        writeln!(f, "registration: {}", self.registration_status)?;
        writeln!(f, "enabled: {}", self.is_enabled)?;
        writeln!(f, "data preferred: {}", self.is_data_preferred)?;
        writeln!(f, "current rate: {}", rate_text(self.current_rate))?;
        writeln!(f, "supported rates: {rates}")?;
        writeln!(f, "supports 5G: {}", self.supports_5g)?;
        write!(f, "IMEI: {}", self.imei.as_deref().unwrap_or("none"))
    }
}

/// One row of the slot list, trimmed to what the display settings allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRow {
    pub slot: u32,
    pub label: Option<String>,
    pub operator_name: Option<String>,
    /// Only set when the operator is hidden behind "no service" or "emergency only".
    pub service_status: Option<RegistrationStatus>,
    pub phone_number: Option<String>,
    pub is_data_preferred: bool,
}

impl SlotRow {
    pub fn new(slot: &SimSlot, settings: &Settings) -> Self {
        let label = (settings.show_slot_label && slot.label != UNKNOWN && !slot.label.is_empty())
            .then(|| slot.label.clone());

        let (operator_name, service_status) = if !settings.show_operator_name {
            (None, None)
        } else if slot.operator_name != UNKNOWN && !slot.operator_name.is_empty() {
            (Some(slot.operator_name.clone()), None)
        } else {
            match slot.registration_status {
                RegistrationStatus::NotRegistered | RegistrationStatus::EmergencyOnly => {
                    (None, Some(slot.registration_status))
                }
                _ => (None, None),
            }
        };

        Self {
            slot: slot.slot,
            label,
            operator_name,
            service_status,
            phone_number: settings
                .show_phone_number
                .then(|| slot.phone_number.clone())
                .flatten(),
            is_data_preferred: slot.is_data_preferred,
        }
    }
}
