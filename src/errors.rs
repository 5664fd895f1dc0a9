use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unsupported,
    InvalidTarget,
    BackendRejected,
    SafetyRefused,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitcherError {
    #[error("no cellular hardware identifiers are available")]
    Unsupported,
    #[error("slot {0} does not exist on this device")]
    InvalidSlot(u32),
    #[error("no subscription context for slot {0}")]
    NoContext(u32),
    #[error("no preferred data subscription")]
    NoPreferredSlot,
    #[error("fewer than two enabled slots, nothing to toggle to")]
    NothingToToggle,
    #[error("supported data rates of the data slot are unknown")]
    UnknownRates,
    #[error("cellular plan {0} not found")]
    PlanNotFound(String),
    #[error("no cellular plan selected")]
    NoPlanSelected,
    #[error("telephony backend rejected the request: {0}")]
    BackendRejected(String),
    #[error("refusing to disable {0}, it is the last enabled cellular plan")]
    LastEnabledPlan(String),
    #[error("settings: {0}")]
    Settings(String),
}

impl SwitcherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwitcherError::Unsupported => ErrorKind::Unsupported,
            SwitcherError::InvalidSlot(_)
            | SwitcherError::NoContext(_)
            | SwitcherError::NoPreferredSlot
            | SwitcherError::NothingToToggle
            | SwitcherError::UnknownRates
            | SwitcherError::PlanNotFound(_)
            | SwitcherError::NoPlanSelected => ErrorKind::InvalidTarget,
            SwitcherError::BackendRejected(_) => ErrorKind::BackendRejected,
            SwitcherError::LastEnabledPlan(_) => ErrorKind::SafetyRefused,
            SwitcherError::Settings(_) => ErrorKind::Settings,
        }
    }
}

/// utility Result to always use a SwitcherError as Err type
pub type Res<T> = Result<T, SwitcherError>;
