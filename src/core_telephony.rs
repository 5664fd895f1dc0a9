// the host app implements the extern "Swift" half
#![cfg(target_os = "ios")]

use std::sync::Mutex;

use log::{debug, warn};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::backend::{backend_result, BackendError, SubscriptionContext, TelephonyBackend};
use crate::plan::CellularPlan;
use crate::sim::DataRate;

#[swift_bridge::bridge]
mod ffi {
    extern "Rust" {
        type CellularPlanReply;
        #[swift_bridge(swift_name = "pushPlan")]
        fn push_plan(
            &mut self,
            identifier: String,
            label: String,
            carrier_name: String,
            is_selected: bool,
        );
        fn finish(&mut self);
    }

    extern "Swift" {
        fn mg_copy_answer(key: String) -> Option<String>;
        fn ct_is_tablet() -> bool;

        fn ct_context_slot(slot: i64) -> Option<i64>;
        fn ct_context_uuid(slot: i64) -> Option<String>;
        fn ct_preferred_slot() -> Option<i64>;

        fn ct_label(slot: i64) -> Option<String>;
        fn ct_operator_name(slot: i64) -> Option<String>;
        fn ct_phone_number(slot: i64) -> Option<String>;
        fn ct_registration_status(slot: i64) -> Option<String>;
        fn ct_sim_status(slot: i64) -> Option<String>;
        fn ct_supported_data_rates(slot: i64) -> Vec<i64>;
        fn ct_max_data_rate(slot: i64) -> Option<i64>;

        fn ct_set_active_data_slot(slot: i64) -> Option<String>;
        fn ct_set_max_data_rate(slot: i64, rate: i64) -> Option<String>;
        fn ct_request_cellular_plans(reply: CellularPlanReply);
        fn ct_set_cellular_plan_enabled(plan_id: String, enable: bool) -> Option<String>;

        fn telephony_did_change();
    }
}

/// Collects the plan list the host reports from its asynchronous callback.
pub struct CellularPlanReply {
    plans: Vec<CellularPlan>,
    tx: Option<oneshot::Sender<Vec<CellularPlan>>>,
}

impl CellularPlanReply {
    fn push_plan(
        &mut self,
        identifier: String,
        label: String,
        carrier_name: String,
        is_selected: bool,
    ) {
        self.plans
            .push(CellularPlan::new(identifier, label, carrier_name, is_selected));
    }

    fn finish(&mut self) {
        match self.tx.take() {
            Some(tx) => {
                if tx.send(std::mem::take(&mut self.plans)).is_err() {
                    debug!("Cellular plan reply arrived after the caller gave up");
                }
            }
            None => warn!("Cellular plan reply finished twice"),
        }
    }
}

pub fn copy_answer(key: &str) -> Option<String> {
    ffi::mg_copy_answer(key.to_string())
}

pub fn notify_host() {
    ffi::telephony_did_change();
}

fn context_for(slot: i64) -> Option<SubscriptionContext> {
    let resolved = ffi::ct_context_slot(slot)?;
    Some(SubscriptionContext {
        slot: u32::try_from(resolved).ok()?,
        uuid: ffi::ct_context_uuid(slot).and_then(|u| Uuid::parse_str(&u).ok()),
    })
}

fn slot_of(context: &SubscriptionContext) -> i64 {
    i64::from(context.slot)
}

#[derive(Debug, Default)]
pub struct CoreTelephonyBackend {
    // the host's client is not reentrant
    lock: Mutex<()>,
}

impl CoreTelephonyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        match self.lock.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TelephonyBackend for CoreTelephonyBackend {
    fn subscription_context(&self, slot: u32) -> Option<SubscriptionContext> {
        let _guard = self.guard();
        context_for(i64::from(slot))
    }

    fn preferred_data_context(&self) -> Option<SubscriptionContext> {
        let _guard = self.guard();
        context_for(ffi::ct_preferred_slot()?)
    }

    fn label(&self, context: &SubscriptionContext) -> Option<String> {
        let _guard = self.guard();
        ffi::ct_label(slot_of(context))
    }

    fn operator_name(&self, context: &SubscriptionContext) -> Option<String> {
        let _guard = self.guard();
        ffi::ct_operator_name(slot_of(context))
    }

    fn phone_number(&self, context: &SubscriptionContext) -> Option<String> {
        let _guard = self.guard();
        ffi::ct_phone_number(slot_of(context))
    }

    fn registration_status(&self, context: &SubscriptionContext) -> Option<String> {
        let _guard = self.guard();
        ffi::ct_registration_status(slot_of(context))
    }

    fn sim_status(&self, context: &SubscriptionContext) -> Option<String> {
        let _guard = self.guard();
        ffi::ct_sim_status(slot_of(context))
    }

    fn supported_data_rates(&self, context: &SubscriptionContext) -> Option<Vec<DataRate>> {
        let _guard = self.guard();
        let raw = ffi::ct_supported_data_rates(slot_of(context));
        let rates: Vec<DataRate> = raw.into_iter().filter_map(DataRate::from_raw).collect();
        if rates.is_empty() {
            None
        } else {
            Some(rates)
        }
    }

    fn max_data_rate(&self, context: &SubscriptionContext) -> Option<DataRate> {
        let _guard = self.guard();
        ffi::ct_max_data_rate(slot_of(context)).and_then(DataRate::from_raw)
    }

    fn set_active_data_slot(&self, context: &SubscriptionContext) -> Result<(), BackendError> {
        let _guard = self.guard();
        backend_result(ffi::ct_set_active_data_slot(slot_of(context)))
    }

    fn set_max_data_rate(
        &self,
        context: &SubscriptionContext,
        rate: DataRate,
    ) -> Result<(), BackendError> {
        let _guard = self.guard();
        backend_result(ffi::ct_set_max_data_rate(slot_of(context), rate.raw()))
    }

    fn request_cellular_plans(&self) -> oneshot::Receiver<Vec<CellularPlan>> {
        let (tx, rx) = oneshot::channel();
        let reply = CellularPlanReply {
            plans: Vec::new(),
            tx: Some(tx),
        };
        ffi::ct_request_cellular_plans(reply);
        rx
    }

    fn set_cellular_plan_enabled(&self, plan_id: &str, enable: bool) -> Result<(), BackendError> {
        let _guard = self.guard();
        backend_result(ffi::ct_set_cellular_plan_enabled(plan_id.to_string(), enable))
    }

    fn is_tablet(&self) -> bool {
        ffi::ct_is_tablet()
    }
}
