use std::fmt;

use log::warn;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::plan::CellularPlan;
use crate::sim::DataRate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionContext {
    pub slot: u32,
    pub uuid: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError(pub String);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The private calls hand back an error object only when they fail.
pub fn backend_result(error: Option<String>) -> Result<(), BackendError> {
    match error {
        None => Ok(()),
        Some(descriptor) => Err(BackendError(descriptor)),
    }
}

pub trait TelephonyBackend: Send + Sync {
    fn subscription_context(&self, slot: u32) -> Option<SubscriptionContext>;
    fn preferred_data_context(&self) -> Option<SubscriptionContext>;

    fn label(&self, context: &SubscriptionContext) -> Option<String>;
    fn operator_name(&self, context: &SubscriptionContext) -> Option<String>;
    fn phone_number(&self, context: &SubscriptionContext) -> Option<String>;
    fn registration_status(&self, context: &SubscriptionContext) -> Option<String>;
    fn sim_status(&self, context: &SubscriptionContext) -> Option<String>;
    fn supported_data_rates(&self, context: &SubscriptionContext) -> Option<Vec<DataRate>>;
    fn max_data_rate(&self, context: &SubscriptionContext) -> Option<DataRate>;

    fn set_active_data_slot(&self, context: &SubscriptionContext) -> Result<(), BackendError>;
    fn set_max_data_rate(
        &self,
        context: &SubscriptionContext,
        rate: DataRate,
    ) -> Result<(), BackendError>;

    /// The reply may never arrive.
    fn request_cellular_plans(&self) -> oneshot::Receiver<Vec<CellularPlan>>;
    fn set_cellular_plan_enabled(&self, plan_id: &str, enable: bool) -> Result<(), BackendError>;

    fn is_tablet(&self) -> bool;
}

/// Behaves like a Wi-Fi only device.
#[derive(Debug, Default)]
pub struct UnavailableBackend;

const UNAVAILABLE: &str = "telephony daemon is not available on this platform";

impl TelephonyBackend for UnavailableBackend {
    fn subscription_context(&self, _slot: u32) -> Option<SubscriptionContext> {
        None
    }

    fn preferred_data_context(&self) -> Option<SubscriptionContext> {
        None
    }

    fn label(&self, _context: &SubscriptionContext) -> Option<String> {
        None
    }

    fn operator_name(&self, _context: &SubscriptionContext) -> Option<String> {
        None
    }

    fn phone_number(&self, _context: &SubscriptionContext) -> Option<String> {
        None
    }

    fn registration_status(&self, _context: &SubscriptionContext) -> Option<String> {
        None
    }

    fn sim_status(&self, _context: &SubscriptionContext) -> Option<String> {
        None
    }

    fn supported_data_rates(&self, _context: &SubscriptionContext) -> Option<Vec<DataRate>> {
        None
    }

    fn max_data_rate(&self, _context: &SubscriptionContext) -> Option<DataRate> {
        None
    }

    fn set_active_data_slot(&self, _context: &SubscriptionContext) -> Result<(), BackendError> {
        warn!("{UNAVAILABLE}");
        Err(BackendError(UNAVAILABLE.to_string()))
    }

    fn set_max_data_rate(
        &self,
        _context: &SubscriptionContext,
        _rate: DataRate,
    ) -> Result<(), BackendError> {
        warn!("{UNAVAILABLE}");
        Err(BackendError(UNAVAILABLE.to_string()))
    }

    fn request_cellular_plans(&self) -> oneshot::Receiver<Vec<CellularPlan>> {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Vec::new());
        rx
    }

    fn set_cellular_plan_enabled(&self, _plan_id: &str, _enable: bool) -> Result<(), BackendError> {
        warn!("{UNAVAILABLE}");
        Err(BackendError(UNAVAILABLE.to_string()))
    }

    fn is_tablet(&self) -> bool {
        false
    }
}
