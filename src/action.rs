use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::DataRate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SwitchToSlot1,
    SwitchToSlot2,
    ToggleSlot,
    /// Only 2G through 5G have an identifier.
    SetRate(DataRate),
    ToggleRate,
    TurnOnPlan,
    TurnOffPlan,
    TogglePlan,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::SwitchToSlot1,
        Action::SwitchToSlot2,
        Action::ToggleSlot,
        Action::SetRate(DataRate::TwoG),
        Action::SetRate(DataRate::ThreeG),
        Action::SetRate(DataRate::FourG),
        Action::SetRate(DataRate::FiveG),
        Action::ToggleRate,
        Action::TurnOnPlan,
        Action::TurnOffPlan,
        Action::TogglePlan,
    ];

    /// Home screen quick actions, empty when the user turned them off.
    pub fn quick_actions(settings: &Settings) -> &'static [Action] {
        const QUICK_ACTIONS: [Action; 4] = [
            Action::SwitchToSlot1,
            Action::SwitchToSlot2,
            Action::SetRate(DataRate::FourG),
            Action::SetRate(DataRate::FiveG),
        ];
        if settings.enable_quick_actions {
            &QUICK_ACTIONS
        } else {
            &[]
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Action::SwitchToSlot1 => "TrollSIMSwitcherSlot1",
            Action::SwitchToSlot2 => "TrollSIMSwitcherSlot2",
            Action::ToggleSlot => "TrollSIMSwitcherToggleSlot",
            Action::SetRate(DataRate::TwoG) => "TrollSIMSwitcher2G",
            Action::SetRate(DataRate::ThreeG) => "TrollSIMSwitcher3G",
            Action::SetRate(DataRate::FourG) => "TrollSIMSwitcher4G",
            Action::SetRate(DataRate::FiveG) | Action::SetRate(DataRate::FiveGStandalone) => {
                "TrollSIMSwitcher5G"
            }
            Action::ToggleRate => "TrollSIMSwitcherToggleNetworkType",
            Action::TurnOnPlan => "TrollSIMSwitcherTurnOnCellularPlan",
            Action::TurnOffPlan => "TrollSIMSwitcherTurnOffCellularPlan",
            Action::TogglePlan => "TrollSIMSwitcherToggleCellularPlan",
        }
    }

    pub fn for_rate(rate: DataRate) -> Option<Action> {
        match rate {
            DataRate::FiveGStandalone => None,
            rate => Some(Action::SetRate(rate)),
        }
    }

    pub fn for_slot(slot: u32) -> Option<Action> {
        match slot {
            1 => Some(Action::SwitchToSlot1),
            2 => Some(Action::SwitchToSlot2),
            _ => None,
        }
    }

    pub fn is_slot_switch(&self) -> bool {
        matches!(
            self,
            Action::SwitchToSlot1 | Action::SwitchToSlot2 | Action::ToggleSlot
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action identifier {0:?}")]
pub struct UnknownAction(pub String);

const LEGACY_PREFIX: &str = "com.developlab.TrollSIMSwitcher.notification.";

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(action) = Action::ALL.iter().find(|a| a.identifier() == s) {
            return Ok(*action);
        }

        // notifications posted by older builds carry their own ids
        match s.strip_prefix(LEGACY_PREFIX) {
            Some("switchToSlot1") => Ok(Action::SwitchToSlot1),
            Some("switchToSlot2") => Ok(Action::SwitchToSlot2),
            Some("switch2G") => Ok(Action::SetRate(DataRate::TwoG)),
            Some("switch3G") => Ok(Action::SetRate(DataRate::ThreeG)),
            Some("switch4G") => Ok(Action::SetRate(DataRate::FourG)),
            Some("switch5G") => Ok(Action::SetRate(DataRate::FiveG)),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}
