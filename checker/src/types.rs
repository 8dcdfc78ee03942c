//! Check-specific data types

use serde::{Deserialize, Serialize};
use shared::HealthLevel;

/// Derived result for one process in one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCheck {
    pub proc_name: String,
    pub tags: Vec<String>,
    pub health: HealthLevel,
    pub message: String,
    pub uptime_seconds: i64,
}

/// Per-cycle tally of processes by health level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    pub total: usize,
    pub healthy: usize,
    pub critical: usize,
    pub indeterminate: usize,
}

impl AggregateCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, health: HealthLevel) {
        match health {
            HealthLevel::Healthy => self.healthy += 1,
            HealthLevel::Critical => self.critical += 1,
            HealthLevel::Indeterminate => self.indeterminate += 1,
        }
    }

    pub fn count(&self, health: HealthLevel) -> usize {
        match health {
            HealthLevel::Healthy => self.healthy,
            HealthLevel::Critical => self.critical,
            HealthLevel::Indeterminate => self.indeterminate,
        }
    }
}
