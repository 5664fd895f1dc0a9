use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::backend::{SubscriptionContext, TelephonyBackend};
use crate::device::DeviceIdentity;
use crate::errors::{Res, SwitcherError};
use crate::plan::{self, CellularPlan, PlanCache, PLAN_CACHE_TTL};
use crate::settings::SettingsStore;
use crate::sim::{DataRate, HardwareIdentifier, RegistrationStatus, SimSlot, UNKNOWN};
use crate::RUNTIME;

/// Upper bound on waiting for the daemon's plan list reply.
pub const PLAN_FETCH_TIMEOUT: Duration = Duration::from_secs(1);

const SIM_READY: &str = "kCTSIMSupportSIMStatusReady";

pub struct TelephonySlotController {
    backend: Arc<dyn TelephonyBackend>,
    settings: Arc<SettingsStore>,
    identifiers: Vec<HardwareIdentifier>,
    plans: Mutex<PlanCache>,
    plan_fetch_timeout: Duration,
}

impl TelephonySlotController {
    /// Hardware identifiers are read once.
    pub fn new(
        backend: Arc<dyn TelephonyBackend>,
        identity: &dyn DeviceIdentity,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let identifiers = identity.hardware_identifiers();
        info!("Found {} hardware identifiers", identifiers.len());

        Self {
            backend,
            settings,
            identifiers,
            plans: Mutex::new(PlanCache::new(PLAN_CACHE_TTL)),
            plan_fetch_timeout: PLAN_FETCH_TIMEOUT,
        }
    }

    pub fn with_plan_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.plan_fetch_timeout = timeout;
        self
    }

    pub fn with_plan_cache_ttl(self, ttl: Duration) -> Self {
        *self.plan_cache() = PlanCache::new(ttl);
        self
    }

    pub fn hardware_identifiers(&self) -> &[HardwareIdentifier] {
        &self.identifiers
    }

    /* Slots */

    pub fn all_sim_slots(&self) -> Vec<SimSlot> {
        if self.identifiers.is_empty() {
            debug!("No hardware identifiers, reporting no slots");
            return Vec::new();
        }

        let preferred = self.preferred_slot_id();
        let slot_count = self.identifiers.len().max(1) as u32;

        (1..=slot_count)
            .filter_map(|index| {
                let context = crate::some_or!(
                    self.backend.subscription_context(index),
                    trace!("No subscription context for slot {index}, skipping"),
                    return None
                );
                Some(self.read_slot(&context, preferred))
            })
            .collect()
    }

    fn read_slot(&self, context: &SubscriptionContext, preferred: Option<u32>) -> SimSlot {
        let backend = &self.backend;
        let slot = context.slot;

        let supported_rates = backend
            .supported_data_rates(context)
            .and_then(DataRate::normalize);
        let supports_5g = supported_rates
            .as_ref()
            .is_some_and(|rates| rates.contains(&DataRate::FiveG));

        SimSlot {
            slot,
            uuid: context.uuid.unwrap_or_else(Uuid::new_v4),
            label: backend
                .label(context)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            operator_name: backend
                .operator_name(context)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            phone_number: backend.phone_number(context),
            registration_status: backend
                .registration_status(context)
                .map(|s| RegistrationStatus::from_ct(&s))
                .unwrap_or(RegistrationStatus::Unknown),
            is_enabled: backend.sim_status(context).as_deref() == Some(SIM_READY),
            is_data_preferred: preferred == Some(slot),
            supported_rates,
            current_rate: backend.max_data_rate(context),
            supports_5g,
            imei: slot
                .checked_sub(1)
                .and_then(|i| self.identifiers.get(i as usize))
                .map(|id| id.value.clone()),
        }
    }

    /// Enabled slots only, unless the device has a single slot. A lone slot that is not ready
    /// yet (an iPad without a plan) is still shown.
    pub fn enabled_slots(&self) -> Vec<SimSlot> {
        let slots = self.all_sim_slots();
        if slots.len() > 1 {
            slots.into_iter().filter(|s| s.is_enabled).collect()
        } else {
            slots
        }
    }

    pub fn preferred_slot_id(&self) -> Option<u32> {
        self.backend.preferred_data_context().map(|c| c.slot)
    }

    pub fn set_data_slot(&self, slot: u32) -> Res<()> {
        if self.identifiers.is_empty() {
            warn!("No hardware identifiers, cannot switch cellular data");
            return Err(SwitcherError::Unsupported);
        }
        if slot == 0 || slot as usize > self.identifiers.len() {
            warn!(
                "Slot {slot} is out of range, device has {} hardware identifiers",
                self.identifiers.len()
            );
            return Err(SwitcherError::InvalidSlot(slot));
        }

        let control_slot = if self.settings.get().compatibility_mode {
            let mapped = match slot {
                1 => 2,
                2 => 1,
                other => other,
            };
            debug!("Compatibility mode, switching slot {slot} as {mapped}");
            mapped
        } else {
            slot
        };

        let context = crate::some_or!(
            self.backend.subscription_context(control_slot),
            error!("No subscription context for slot {control_slot}"),
            return Err(SwitcherError::NoContext(control_slot))
        );

        match self.backend.set_active_data_slot(&context) {
            Ok(()) => {
                info!("Switched cellular data to slot {slot}");
                Ok(())
            }
            Err(e) => {
                error!("Switching cellular data to slot {slot} returned: {e}");
                Err(SwitcherError::BackendRejected(e.0))
            }
        }
    }

    /// Moves data to the other of slots 1 and 2. Devices with more slots need `set_data_slot`.
    pub fn toggle_data_slot(&self) -> Res<()> {
        let enabled = self
            .all_sim_slots()
            .iter()
            .filter(|s| s.is_enabled)
            .count();
        if enabled < 2 {
            info!("Only {enabled} enabled slots, nothing to toggle");
            return Err(SwitcherError::NothingToToggle);
        }

        let target = if self.preferred_slot_id() == Some(1) { 2 } else { 1 };
        self.set_data_slot(target)
    }

    /* Rates */

    pub fn set_data_rate(&self, slot: u32, rate: DataRate) -> Res<()> {
        let context = crate::some_or!(
            self.backend.subscription_context(slot),
            error!("No subscription context for slot {slot}"),
            return Err(SwitcherError::NoContext(slot))
        );
        self.apply_rate(&context, rate)
    }

    pub fn set_preferred_rate(&self, rate: DataRate) -> Res<()> {
        let context = crate::some_or!(
            self.backend.preferred_data_context(),
            error!("No preferred data context"),
            return Err(SwitcherError::NoPreferredSlot)
        );
        self.apply_rate(&context, rate)
    }

    fn apply_rate(&self, context: &SubscriptionContext, rate: DataRate) -> Res<()> {
        match self.backend.set_max_data_rate(context, rate) {
            Ok(()) => {
                info!("Set slot {} to {rate}", context.slot);
                Ok(())
            }
            Err(e) => {
                error!("Switching slot {} to {rate} returned: {e}", context.slot);
                Err(SwitcherError::BackendRejected(e.0))
            }
        }
    }

    pub fn preferred_rate(&self) -> Option<DataRate> {
        let context = self.backend.preferred_data_context()?;
        self.backend.max_data_rate(&context)
    }

    pub fn preferred_supported_rates(&self) -> Vec<DataRate> {
        self.backend
            .preferred_data_context()
            .and_then(|c| self.backend.supported_data_rates(&c))
            .and_then(DataRate::normalize)
            .unwrap_or_default()
    }

    /// Flips the data slot between its highest and second highest supported rate.
    pub fn toggle_preferred_rate(&self) -> Res<()> {
        let rates = self.preferred_supported_rates();
        let (highest, second) = match rates.as_slice() {
            [] => {
                warn!("Supported rates of the data slot are unknown");
                return Err(SwitcherError::UnknownRates);
            }
            [only] => {
                debug!("Data slot only supports {only}, nothing to toggle");
                return Ok(());
            }
            [.., second, highest] => (*highest, *second),
        };

        let target = if self.preferred_rate() == Some(highest) {
            second
        } else {
            highest
        };
        self.set_preferred_rate(target)
    }

    /* Cellular plans */

    /// A daemon that does not answer in time reads as "no plans".
    pub fn cellular_plans(&self) -> Vec<CellularPlan> {
        let mut cache = self.plan_cache();
        if let Some(plans) = cache.fresh() {
            trace!("Using cached cellular plans");
            return plans.to_vec();
        }

        let reply = self.backend.request_cellular_plans();
        let timeout = self.plan_fetch_timeout;
        match RUNTIME.block_on(async move { tokio::time::timeout(timeout, reply).await }) {
            Ok(Ok(plans)) => {
                debug!("Fetched {} cellular plans", plans.len());
                cache.store(plans.clone());
                plans
            }
            Ok(Err(_)) => {
                warn!("Cellular plan request was dropped, treating as no plans");
                Vec::new()
            }
            Err(_) => {
                warn!("Cellular plan request timed out after {timeout:?}, treating as no plans");
                Vec::new()
            }
        }
    }

    fn plan_cache(&self) -> MutexGuard<'_, PlanCache> {
        match self.plans.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn find_plan(&self, plan_id: &str) -> Res<(CellularPlan, Vec<CellularPlan>)> {
        let plans = self.cellular_plans();
        match plans.iter().find(|p| p.identifier == plan_id) {
            Some(plan) => Ok((plan.clone(), plans)),
            None => {
                warn!("Cellular plan {plan_id} not found");
                Err(SwitcherError::PlanNotFound(plan_id.to_string()))
            }
        }
    }

    pub fn set_cellular_plan_enabled(&self, plan_id: &str, enable: bool) -> Res<()> {
        let (plan, plans) = self.find_plan(plan_id)?;

        // disabling the last enabled plan leaves the baseband unusable until fixed in Settings
        if !enable && plan::is_last_enabled(&plans, plan_id) {
            warn!("Refusing to disable {plan_id}, it is the last enabled plan");
            return Err(SwitcherError::LastEnabledPlan(plan_id.to_string()));
        }

        if plan.is_selected == enable {
            debug!("Cellular plan {plan_id} already has enabled = {enable}");
            return Ok(());
        }

        let result = self.backend.set_cellular_plan_enabled(plan_id, enable);
        self.plan_cache().invalidate();
        match result {
            Ok(()) => {
                info!("Set cellular plan {plan_id} enabled = {enable}");
                Ok(())
            }
            Err(e) => {
                error!("Setting cellular plan {plan_id} enabled = {enable} returned: {e}");
                Err(SwitcherError::BackendRejected(e.0))
            }
        }
    }

    pub fn toggle_cellular_plan_enabled(&self, plan_id: &str) -> Res<()> {
        let (plan, _) = self.find_plan(plan_id)?;
        self.set_cellular_plan_enabled(plan_id, !plan.is_selected)
    }

    pub fn can_turn_off_cellular_plan(&self) -> bool {
        plan::enabled_count(&self.cellular_plans()) > 1
    }

    pub fn can_manage_cellular_plans(&self) -> bool {
        if self.backend.is_tablet() {
            return false;
        }
        if self.identifiers.len() < 2 {
            return false;
        }
        self.cellular_plans().len() >= 2
    }
}
