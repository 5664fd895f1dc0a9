use std::sync::Arc;

use log::{error, info, warn};

use crate::action::Action;
use crate::controller::TelephonySlotController;
use crate::errors::{ErrorKind, Res, SwitcherError};
use crate::notifications::SLOT_GROUP;
use crate::notifier::ChangeNotifier;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    InApp,
    QuickAction,
    Widget,
    Shortcut,
    Notification,
}

impl Surface {
    /// Can show an alert dialog.
    pub fn is_interactive(self) -> bool {
        matches!(self, Surface::InApp | Surface::QuickAction)
    }

    pub fn has_foreground_app(self) -> bool {
        !matches!(self, Surface::Shortcut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRefresh {
    pub silent: bool,
    /// Set for slot switches.
    pub group: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub action: Option<Action>,
    pub error: Option<SwitcherError>,
    pub show_failure_alert: bool,
    pub exit_after: bool,
    pub notification_refresh: Option<NotificationRefresh>,
}

impl DispatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.action.is_some() && self.error.is_none()
    }

    pub(crate) fn unhandled() -> Self {
        Self {
            action: None,
            error: None,
            show_failure_alert: false,
            exit_after: false,
            notification_refresh: None,
        }
    }
}

pub struct ActionDispatcher {
    controller: Arc<TelephonySlotController>,
    notifier: Arc<ChangeNotifier>,
    settings: Arc<SettingsStore>,
}

impl ActionDispatcher {
    pub fn new(
        controller: Arc<TelephonySlotController>,
        notifier: Arc<ChangeNotifier>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            controller,
            notifier,
            settings,
        }
    }

    /// Unknown identifiers are ignored, like an unmatched quick action.
    pub fn dispatch_identifier(&self, identifier: &str, surface: Surface) -> DispatchOutcome {
        match identifier.parse::<Action>() {
            Ok(action) => self.dispatch(action, surface),
            Err(e) => {
                warn!("Ignoring {e} from {surface:?}");
                DispatchOutcome::unhandled()
            }
        }
    }

    pub fn dispatch(&self, action: Action, surface: Surface) -> DispatchOutcome {
        info!("Dispatching {action} from {surface:?}");

        match self.perform(action) {
            Ok(()) => {
                self.notifier.publish();
                DispatchOutcome {
                    action: Some(action),
                    error: None,
                    show_failure_alert: false,
                    exit_after: surface.has_foreground_app()
                        && self.settings.get().exit_after_switching,
                    notification_refresh: Some(NotificationRefresh {
                        silent: true,
                        group: action.is_slot_switch().then_some(SLOT_GROUP),
                    }),
                }
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::SafetyRefused => warn!("{action} refused: {e}"),
                    _ => error!("{action} failed: {e}"),
                }
                DispatchOutcome {
                    action: Some(action),
                    show_failure_alert: surface.is_interactive(),
                    error: Some(e),
                    exit_after: false,
                    notification_refresh: None,
                }
            }
        }
    }

    /// Toggles the data slot when the app is opened, if the user asked for it.
    pub fn on_app_launch(&self) -> Option<DispatchOutcome> {
        if !self.settings.get().switch_when_starting_app {
            return None;
        }
        info!("Switching data slot on launch");
        Some(self.dispatch(Action::ToggleSlot, Surface::InApp))
    }

    fn perform(&self, action: Action) -> Res<()> {
        let controller = &self.controller;
        match action {
            Action::SwitchToSlot1 => controller.set_data_slot(1),
            Action::SwitchToSlot2 => controller.set_data_slot(2),
            Action::ToggleSlot => controller.toggle_data_slot(),
            Action::SetRate(rate) => controller.set_preferred_rate(rate),
            Action::ToggleRate => controller.toggle_preferred_rate(),
            Action::TurnOnPlan => {
                controller.set_cellular_plan_enabled(&self.selected_plan()?, true)
            }
            Action::TurnOffPlan => {
                controller.set_cellular_plan_enabled(&self.selected_plan()?, false)
            }
            Action::TogglePlan => controller.toggle_cellular_plan_enabled(&self.selected_plan()?),
        }
    }

    fn selected_plan(&self) -> Res<String> {
        self.settings
            .get()
            .selected_plan()
            .map(str::to_string)
            .ok_or(SwitcherError::NoPlanSelected)
    }
}
