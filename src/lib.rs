use std::sync::Arc;

use log::{error, info, warn};
use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::runtime::{self, Runtime};

use crate::action::Action;
use crate::backend::TelephonyBackend;
use crate::controller::TelephonySlotController;
use crate::device::DeviceIdentity;
use crate::dispatcher::{ActionDispatcher, Surface};
use crate::errors::Res;
use crate::notifier::ChangeNotifier;
use crate::settings::SettingsStore;
use crate::sim::{rate_text, DataRate, SlotRow};

pub mod action;
pub mod backend;
pub mod controller;
#[cfg(target_os = "ios")]
mod core_telephony;
pub mod device;
pub mod dispatcher;
pub mod errors;
pub mod logging;
pub mod notifications;
pub mod notifier;
pub mod plan;
pub mod settings;
pub mod sim;
mod util;

pub(crate) static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .expect("failed to build the tokio runtime")
});

#[swift_bridge::bridge]
mod ffi {
    #[swift_bridge(swift_name = "TriggerSurface")]
    enum TriggerSurface {
        InApp,
        QuickAction,
        Widget,
        Shortcut,
        Notification,
    }

    extern "Rust" {
        type Switcher;

        #[swift_bridge(init)]
        fn new(settings_path: String, log_dir: String, debug: bool) -> Switcher;

        #[swift_bridge(swift_name = "slotsJson")]
        fn slots_json(&self, enabled_only: bool) -> String;
        #[swift_bridge(swift_name = "plansJson")]
        fn plans_json(&self) -> String;
        #[swift_bridge(swift_name = "preferredSlotId")]
        fn preferred_slot_id(&self) -> i64;
        #[swift_bridge(swift_name = "preferredRateText")]
        fn preferred_rate_text(&self) -> String;

        #[swift_bridge(swift_name = "setDataSlot")]
        fn set_data_slot(&self, slot: u32) -> bool;
        #[swift_bridge(swift_name = "toggleDataSlot")]
        fn toggle_data_slot(&self) -> bool;
        #[swift_bridge(swift_name = "setDataRate")]
        fn set_data_rate(&self, slot: u32, rate: i64) -> bool;
        #[swift_bridge(swift_name = "setPreferredRate")]
        fn set_preferred_rate(&self, rate: i64) -> bool;
        #[swift_bridge(swift_name = "togglePreferredRate")]
        fn toggle_preferred_rate(&self) -> bool;

        #[swift_bridge(swift_name = "setCellularPlanEnabled")]
        fn set_cellular_plan_enabled(&self, plan_id: String, enable: bool) -> bool;
        #[swift_bridge(swift_name = "toggleCellularPlanEnabled")]
        fn toggle_cellular_plan_enabled(&self, plan_id: String) -> bool;
        #[swift_bridge(swift_name = "canManageCellularPlans")]
        fn can_manage_cellular_plans(&self) -> bool;
        #[swift_bridge(swift_name = "selectedPlan")]
        fn selected_plan(&self) -> String;
        #[swift_bridge(swift_name = "selectPlan")]
        fn select_plan(&self, plan_id: String) -> bool;
        #[swift_bridge(swift_name = "setCompatibilityMode")]
        fn set_compatibility_mode(&self, enable: bool) -> bool;
        #[swift_bridge(swift_name = "settingsJson")]
        fn settings_json(&self) -> String;
        #[swift_bridge(swift_name = "setSetting")]
        fn set_setting(&self, key: String, value: bool) -> bool;
        #[swift_bridge(swift_name = "slotRowsJson")]
        fn slot_rows_json(&self) -> String;
        #[swift_bridge(swift_name = "quickActionIds")]
        fn quick_action_ids(&self) -> Vec<String>;
        #[swift_bridge(swift_name = "onAppLaunch")]
        fn on_app_launch(&self) -> DispatchOutcome;

        fn dispatch(&self, action_id: String, surface: TriggerSurface) -> DispatchOutcome;
        #[swift_bridge(swift_name = "telephonyChanged")]
        fn telephony_changed(&self, reason: String);
        #[swift_bridge(swift_name = "plannedNotificationsJson")]
        fn planned_notifications_json(&self, silent: bool, group: Option<String>) -> String;
        #[swift_bridge(swift_name = "handleNotificationResponse")]
        fn handle_notification_response(&self, action_id: String, group: String) -> bool;
    }

    extern "Rust" {
        type DispatchOutcome;
        fn succeeded(&self) -> bool;
        #[swift_bridge(swift_name = "showFailureAlert")]
        fn show_failure_alert(&self) -> bool;
        #[swift_bridge(swift_name = "exitAfter")]
        fn exit_after(&self) -> bool;
        #[swift_bridge(swift_name = "refreshNotifications")]
        fn refresh_notifications(&self) -> bool;
        #[swift_bridge(swift_name = "refreshGroup")]
        fn refresh_group(&self) -> Option<String>;
    }
}

impl From<ffi::TriggerSurface> for Surface {
    fn from(surface: ffi::TriggerSurface) -> Self {
        match surface {
            ffi::TriggerSurface::InApp => Surface::InApp,
            ffi::TriggerSurface::QuickAction => Surface::QuickAction,
            ffi::TriggerSurface::Widget => Surface::Widget,
            ffi::TriggerSurface::Shortcut => Surface::Shortcut,
            ffi::TriggerSurface::Notification => Surface::Notification,
        }
    }
}

/// Built once per process and passed to every surface.
pub struct Switcher {
    settings: Arc<SettingsStore>,
    controller: Arc<TelephonySlotController>,
    notifier: Arc<ChangeNotifier>,
    dispatcher: ActionDispatcher,
}

#[cfg(target_os = "ios")]
fn platform() -> (Arc<dyn TelephonyBackend>, Box<dyn DeviceIdentity>) {
    use crate::core_telephony::{copy_answer, CoreTelephonyBackend};
    use crate::device::GestaltIdentity;

    (
        Arc::new(CoreTelephonyBackend::new()),
        Box::new(GestaltIdentity::new(copy_answer)),
    )
}

#[cfg(not(target_os = "ios"))]
fn platform() -> (Arc<dyn TelephonyBackend>, Box<dyn DeviceIdentity>) {
    warn!("No telephony daemon on this platform, cellular features are unavailable");
    (
        Arc::new(backend::UnavailableBackend),
        Box::new(device::NoIdentity),
    )
}

impl Switcher {
    pub fn new(settings_path: String, log_dir: String, debug: bool) -> Self {
        if let Err(e) = logging::init(&log_dir, debug) {
            eprintln!("simswitcher logger failed to initialize: {e:?}");
        }

        let settings = Arc::new(SettingsStore::load(util::strip_file_url(&settings_path)));
        let (backend, identity) = platform();
        let switcher = Self::with_services(settings, backend, identity.as_ref());

        #[cfg(target_os = "ios")]
        switcher.notifier.subscribe(core_telephony::notify_host);

        info!("simswitcher has started!");
        switcher
    }

    pub fn with_services(
        settings: Arc<SettingsStore>,
        backend: Arc<dyn TelephonyBackend>,
        identity: &dyn DeviceIdentity,
    ) -> Self {
        let controller = Arc::new(TelephonySlotController::new(
            backend,
            identity,
            settings.clone(),
        ));
        Self::from_parts(settings, controller)
    }

    pub fn from_parts(
        settings: Arc<SettingsStore>,
        controller: Arc<TelephonySlotController>,
    ) -> Self {
        let notifier = Arc::new(ChangeNotifier::new());
        let dispatcher =
            ActionDispatcher::new(controller.clone(), notifier.clone(), settings.clone());
        Self {
            settings,
            controller,
            notifier,
            dispatcher,
        }
    }

    pub fn controller(&self) -> &TelephonySlotController {
        &self.controller
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    fn slots_json(&self, enabled_only: bool) -> String {
        let slots = if enabled_only {
            self.controller.enabled_slots()
        } else {
            self.controller.all_sim_slots()
        };
        to_json(&slots)
    }

    fn plans_json(&self) -> String {
        to_json(&self.controller.cellular_plans())
    }

    fn preferred_slot_id(&self) -> i64 {
        self.controller
            .preferred_slot_id()
            .map(i64::from)
            .unwrap_or(-1)
    }

    fn preferred_rate_text(&self) -> String {
        rate_text(self.controller.preferred_rate())
    }

    fn set_data_slot(&self, slot: u32) -> bool {
        succeeded(self.controller.set_data_slot(slot))
    }

    fn toggle_data_slot(&self) -> bool {
        succeeded(self.controller.toggle_data_slot())
    }

    fn set_data_rate(&self, slot: u32, rate: i64) -> bool {
        match DataRate::from_raw(rate) {
            Some(rate) => succeeded(self.controller.set_data_rate(slot, rate)),
            None => {
                warn!("Unknown data rate {rate}");
                false
            }
        }
    }

    fn set_preferred_rate(&self, rate: i64) -> bool {
        match DataRate::from_raw(rate) {
            Some(rate) => succeeded(self.controller.set_preferred_rate(rate)),
            None => {
                warn!("Unknown data rate {rate}");
                false
            }
        }
    }

    fn toggle_preferred_rate(&self) -> bool {
        succeeded(self.controller.toggle_preferred_rate())
    }

    fn set_cellular_plan_enabled(&self, plan_id: String, enable: bool) -> bool {
        succeeded(self.controller.set_cellular_plan_enabled(&plan_id, enable))
    }

    fn toggle_cellular_plan_enabled(&self, plan_id: String) -> bool {
        succeeded(self.controller.toggle_cellular_plan_enabled(&plan_id))
    }

    fn can_manage_cellular_plans(&self) -> bool {
        self.controller.can_manage_cellular_plans()
    }

    fn selected_plan(&self) -> String {
        self.settings.get().selected_plan
    }

    fn select_plan(&self, plan_id: String) -> bool {
        let saved = succeeded(self.settings.update(|s| s.selected_plan = plan_id));
        if saved {
            self.notifier.publish();
        }
        saved
    }

    fn set_compatibility_mode(&self, enable: bool) -> bool {
        succeeded(self.settings.update(|s| s.compatibility_mode = enable))
    }

    fn settings_json(&self) -> String {
        match serde_json::to_string(&self.settings.get()) {
            Ok(json) => json,
            Err(e) => {
                error!("Couldn't serialize settings: {e:?}");
                "{}".to_string()
            }
        }
    }

    fn set_setting(&self, key: String, value: bool) -> bool {
        let mut known = true;
        let saved = succeeded(self.settings.update(|s| known = s.set_flag(&key, value)));
        if !known {
            warn!("Unknown setting {key}");
        }
        saved && known
    }

    fn slot_rows_json(&self) -> String {
        let settings = self.settings.get();
        let rows: Vec<SlotRow> = self
            .controller
            .enabled_slots()
            .iter()
            .map(|slot| SlotRow::new(slot, &settings))
            .collect();
        to_json(&rows)
    }

    fn quick_action_ids(&self) -> Vec<String> {
        Action::quick_actions(&self.settings.get())
            .iter()
            .map(|a| a.identifier().to_string())
            .collect()
    }

    fn on_app_launch(&self) -> DispatchOutcome {
        DispatchOutcome(
            self.dispatcher
                .on_app_launch()
                .unwrap_or_else(dispatcher::DispatchOutcome::unhandled),
        )
    }

    fn dispatch(&self, action_id: String, surface: ffi::TriggerSurface) -> DispatchOutcome {
        DispatchOutcome(
            self.dispatcher
                .dispatch_identifier(&action_id, surface.into()),
        )
    }

    fn telephony_changed(&self, reason: String) {
        self.notifier.backend_changed(&reason);
    }

    fn planned_notifications_json(&self, silent: bool, group: Option<String>) -> String {
        let planned = notifications::plan_notifications(
            &self.controller.enabled_slots(),
            &self.settings.get(),
            silent,
            group.as_deref(),
        );
        to_json(&planned)
    }

    fn handle_notification_response(&self, action_id: String, group: String) -> bool {
        match notifications::apply_notification_response(&self.settings, &action_id, &group) {
            Ok(handled) => handled,
            Err(e) => {
                error!("Couldn't apply notification response {action_id}: {e}");
                false
            }
        }
    }
}

pub struct DispatchOutcome(dispatcher::DispatchOutcome);

impl DispatchOutcome {
    fn succeeded(&self) -> bool {
        self.0.succeeded()
    }

    fn show_failure_alert(&self) -> bool {
        self.0.show_failure_alert
    }

    fn exit_after(&self) -> bool {
        self.0.exit_after
    }

    fn refresh_notifications(&self) -> bool {
        self.0.notification_refresh.is_some()
    }

    fn refresh_group(&self) -> Option<String> {
        self.0
            .notification_refresh
            .as_ref()
            .and_then(|r| r.group)
            .map(str::to_string)
    }
}

fn succeeded(result: Res<()>) -> bool {
    result.is_ok()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            error!("Couldn't serialize to JSON: {e:?}");
            "[]".to_string()
        }
    }
}

/// Every identifier a trigger surface may send, for registering quick actions and widgets.
pub fn action_identifiers() -> Vec<&'static str> {
    Action::ALL.iter().map(|a| a.identifier()).collect()
}
