use serde::Serialize;
use std::time::Duration;

use crate::rebalancing::TriggerType;

/// Explicit trigger registration: interval plus which batch it drives.
/// Replaces implicit cron annotations with data the scheduler owns.
#[derive(Debug, Clone)]
pub struct TriggerDefinition {
    pub name: &'static str,
    pub interval: Duration,
    pub trigger_type: TriggerType,
}

impl TriggerDefinition {
    /// Calendar-style trigger; fires a simulation for every enrolled
    /// customer regardless of drift.
    pub fn periodic(interval: Duration) -> Self {
        Self {
            name: "periodic-rebalance",
            interval,
            trigger_type: TriggerType::Periodic,
        }
    }

    /// Dense trigger; fires only on drift-band breach outside the cooldown.
    pub fn threshold(interval: Duration) -> Self {
        Self {
            name: "threshold-rebalance",
            interval,
            trigger_type: TriggerType::Threshold,
        }
    }

    /// Simulation-only pass for smoke checks; never executes orders.
    pub fn test(interval: Duration) -> Self {
        Self {
            name: "test-rebalance",
            interval,
            trigger_type: TriggerType::Test,
        }
    }
}

/// Per-tick summary. One customer's failure never aborts the batch, so the
/// outcome carries all three tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}
