use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockWriteGuard};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{Res, SwitcherError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Invert slot 1 and 2 before talking to the daemon.
    #[serde(rename = "CompatibilitySwitchMode")]
    pub compatibility_mode: bool,
    #[serde(rename = "ShowSlotLabel")]
    pub show_slot_label: bool,
    #[serde(rename = "ShowOperatorName")]
    pub show_operator_name: bool,
    #[serde(rename = "ShowPhoneNumber")]
    pub show_phone_number: bool,
    #[serde(rename = "EnableHomeScreenQuickActions")]
    pub enable_quick_actions: bool,
    #[serde(rename = "ExitAfterSwitching")]
    pub exit_after_switching: bool,
    #[serde(rename = "AutomaticallySwitchWhenStartingApp")]
    pub switch_when_starting_app: bool,
    #[serde(rename = "EnableNotifications")]
    pub enable_notifications: bool,
    #[serde(rename = "EnableToggleCellularDataSlotNotifications")]
    pub slot_notifications: bool,
    #[serde(rename = "EnableToggleNetworkTypeNotifications")]
    pub rate_notifications: bool,
    #[serde(rename = "UseCriticalNotifications")]
    pub critical_notifications: bool,
    /// Empty when nothing was picked.
    #[serde(rename = "SelectCellularPlan1")]
    pub selected_plan: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compatibility_mode: false,
            show_slot_label: true,
            show_operator_name: true,
            show_phone_number: false,
            enable_quick_actions: false,
            exit_after_switching: false,
            switch_when_starting_app: false,
            enable_notifications: false,
            slot_notifications: false,
            rate_notifications: false,
            critical_notifications: false,
            selected_plan: String::new(),
        }
    }
}

impl Settings {
    pub fn selected_plan(&self) -> Option<&str> {
        if self.selected_plan.is_empty() {
            None
        } else {
            Some(&self.selected_plan)
        }
    }

    /// Sets a switch by its plist key. Returns `false` for keys that are not switches.
    pub fn set_flag(&mut self, key: &str, value: bool) -> bool {
        let flag = match key {
            "CompatibilitySwitchMode" => &mut self.compatibility_mode,
            "ShowSlotLabel" => &mut self.show_slot_label,
            "ShowOperatorName" => &mut self.show_operator_name,
            "ShowPhoneNumber" => &mut self.show_phone_number,
            "EnableHomeScreenQuickActions" => &mut self.enable_quick_actions,
            "ExitAfterSwitching" => &mut self.exit_after_switching,
            "AutomaticallySwitchWhenStartingApp" => &mut self.switch_when_starting_app,
            "EnableNotifications" => &mut self.enable_notifications,
            "EnableToggleCellularDataSlotNotifications" => &mut self.slot_notifications,
            "EnableToggleNetworkTypeNotifications" => &mut self.rate_notifications,
            "UseCriticalNotifications" => &mut self.critical_notifications,
            _ => return false,
        };
        *flag = value;
        true
    }
}

/// The app and its extensions share one plist, so every read goes back to the file.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    last_read: RwLock<Settings>,
}

impl SettingsStore {
    /// A missing or unreadable file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let settings = match read_file(&path) {
            Some(s) => s,
            None => {
                info!("Using default settings for {}", path.display());
                Settings::default()
            }
        };

        Self {
            path: Some(path),
            last_read: RwLock::new(settings),
        }
    }

    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            last_read: RwLock::new(settings),
        }
    }

    /// Current settings as written by any process. Falls back to the last good read while the
    /// file is missing or half written.
    pub fn get(&self) -> Settings {
        let mut last_read = self.lock();
        if let Some(fresh) = self.path.as_deref().and_then(read_file) {
            *last_read = fresh;
        }
        last_read.clone()
    }

    /// Applies `f` to the current settings and writes them back. Nothing changes if the write
    /// fails.
    pub fn update<F>(&self, f: F) -> Res<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut last_read = self.lock();
        let mut next = self
            .path
            .as_deref()
            .and_then(read_file)
            .unwrap_or_else(|| last_read.clone());
        f(&mut next);

        if let Some(path) = &self.path {
            if let Err(e) = plist::to_file_xml(path, &next) {
                error!("Couldn't save settings to {}: {e:?}", path.display());
                return Err(SwitcherError::Settings(e.to_string()));
            }
            debug!("Saved settings to {}", path.display());
        }
        *last_read = next;
        Ok(())
    }

    fn lock(&self) -> RwLockWriteGuard<'_, Settings> {
        match self.last_read.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn read_file(path: &Path) -> Option<Settings> {
    if !path.exists() {
        return None;
    }
    match plist::from_file::<_, Settings>(path) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Couldn't read settings at {}: {e:?}", path.display());
            None
        }
    }
}
