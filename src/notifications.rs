use log::{debug, info, warn};
use serde::Serialize;

use crate::action::Action;
use crate::errors::Res;
use crate::settings::{Settings, SettingsStore};
use crate::sim::{DataRate, SimSlot};

pub const SLOT_GROUP: &str = "com.developlab.TrollSIMSwitcher.notification.switch.slot";
pub const RATE_GROUP: &str = "com.developlab.TrollSIMSwitcher.notification.switch.networkType";

pub const DISABLE_CATEGORY: &str = "com.developlab.TrollSIMSwitcher.notification.disable.group";
pub const DISABLE_ALL_ACTION: &str = "com.developlab.TrollSIMSwitcher.notification.disable.all";
pub const DISABLE_GROUP_ACTION: &str =
    "com.developlab.TrollSIMSwitcher.notification.disable.thisGroup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostStyle {
    Normal,
    FollowUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Title {
    CellularData { slot: u32, label: Option<String> },
    NetworkType { rate: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedNotification {
    /// Also the request identifier, so a group holds one notification at a time.
    pub group: &'static str,
    pub action: &'static str,
    pub category: &'static str,
    pub title: Title,
    pub style: PostStyle,
    pub critical: bool,
}

/// `group` is the group refreshed right after an action. After a slot switch the daemon still
/// reports the old data slot, so the two slots swap roles.
pub fn plan_notifications(
    slots: &[SimSlot],
    settings: &Settings,
    silent: bool,
    group: Option<&str>,
) -> Vec<PlannedNotification> {
    if !settings.enable_notifications {
        return Vec::new();
    }

    let after_slot_switch = group == Some(SLOT_GROUP);
    let style = if silent {
        PostStyle::FollowUp
    } else {
        PostStyle::Normal
    };
    let notification =
        |group: &'static str, action: &'static str, title: Title| PlannedNotification {
            group,
            action,
            category: DISABLE_CATEGORY,
            title,
            style,
            critical: settings.critical_notifications,
        };

    let mut planned = Vec::new();

    if settings.slot_notifications {
        let target = slots
            .iter()
            .find(|s| s.is_data_preferred == after_slot_switch);
        if let Some(slot) = target {
            match Action::for_slot(slot.slot) {
                Some(action) => planned.push(notification(
                    SLOT_GROUP,
                    action.identifier(),
                    Title::CellularData {
                        slot: slot.slot,
                        label: settings.show_slot_label.then(|| slot.label.clone()),
                    },
                )),
                None => debug!("Slot {} has no switch action", slot.slot),
            }
        }
    }

    if settings.rate_notifications {
        let data_slot = slots
            .iter()
            .find(|s| s.is_data_preferred != after_slot_switch);
        if let Some(slot) = data_slot {
            let rates = slot.supported_rates.as_deref().unwrap_or_default();
            if rates.len() > 1 {
                for rate in rates {
                    // nobody switches to 2G from a notification
                    if Some(*rate) == slot.current_rate || *rate == DataRate::TwoG {
                        continue;
                    }
                    let Some(action) = Action::for_rate(*rate) else {
                        continue;
                    };
                    planned.push(notification(
                        RATE_GROUP,
                        action.identifier(),
                        Title::NetworkType {
                            rate: rate.to_string(),
                        },
                    ));
                }
            }
        }
    }

    debug!("Planned {} notifications", planned.len());
    planned
}

pub fn apply_notification_response(
    settings: &SettingsStore,
    action_id: &str,
    group: &str,
) -> Res<bool> {
    match action_id {
        DISABLE_ALL_ACTION => {
            info!("Disabling all notifications");
            settings.update(|s| s.enable_notifications = false)?;
            Ok(true)
        }
        DISABLE_GROUP_ACTION => match group {
            SLOT_GROUP => {
                info!("Disabling slot switch notifications");
                settings.update(|s| s.slot_notifications = false)?;
                Ok(true)
            }
            RATE_GROUP => {
                info!("Disabling network type notifications");
                settings.update(|s| s.rate_notifications = false)?;
                Ok(true)
            }
            other => {
                warn!("Unknown notification group {other}");
                Ok(false)
            }
        },
        _ => Ok(false),
    }
}
