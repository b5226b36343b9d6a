use crate::gate::Shortfall;
use sdk_smoke_core::events::HarnessEvent;
use std::time::Instant;

/// Events emitted by a [`BalanceGate`](crate::BalanceGate).
#[derive(Debug, Clone)]
pub enum GateEvent {
    /// Every required balance exceeded its threshold.
    Passed {
        gate_name: String,
        timestamp: Instant,
    },
    /// At least one balance was at or below its threshold; the scenario
    /// will be skipped.
    Blocked {
        gate_name: String,
        timestamp: Instant,
        shortfalls: Vec<Shortfall>,
    },
}

impl HarnessEvent for GateEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GateEvent::Passed { .. } => "Passed",
            GateEvent::Blocked { .. } => "Blocked",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            GateEvent::Passed { timestamp, .. } | GateEvent::Blocked { timestamp, .. } => *timestamp,
        }
    }

    fn source_name(&self) -> &str {
        match self {
            GateEvent::Passed { gate_name, .. } | GateEvent::Blocked { gate_name, .. } => gate_name,
        }
    }
}
