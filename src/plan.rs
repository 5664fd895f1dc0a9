use std::time::{Duration, Instant};

use serde::Serialize;

pub const PLAN_CACHE_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellularPlan {
    pub identifier: String,
    pub label: String,
    pub carrier_name: String,
    pub is_selected: bool,
}

impl CellularPlan {
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        carrier_name: impl Into<String>,
        is_selected: bool,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            carrier_name: carrier_name.into(),
            is_selected,
        }
    }
}

/// True when turning `plan_id` off would leave no enabled plan at all.
pub fn is_last_enabled(plans: &[CellularPlan], plan_id: &str) -> bool {
    !plans
        .iter()
        .any(|p| p.is_selected && p.identifier != plan_id)
}

pub fn enabled_count(plans: &[CellularPlan]) -> usize {
    plans.iter().filter(|p| p.is_selected).count()
}

#[derive(Debug)]
pub(crate) struct PlanCache {
    plans: Vec<CellularPlan>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl PlanCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            plans: Vec::new(),
            fetched_at: None,
            ttl,
        }
    }

    pub fn fresh(&self) -> Option<&[CellularPlan]> {
        match self.fetched_at {
            Some(at) if at.elapsed() < self.ttl => Some(&self.plans),
            _ => None,
        }
    }

    pub fn store(&mut self, plans: Vec<CellularPlan>) {
        self.plans = plans;
        self.fetched_at = Some(Instant::now());
    }

    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }
}
