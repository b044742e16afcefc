//! Per-flow in-flight gates.
//!
//! A flow may have at most one request outstanding. Entering an occupied gate
//! fails immediately; nothing waits.

use event_ticket_core::Flow;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// One gate per [`Flow`]
#[derive(Debug)]
pub struct FlowGates {
    busy: [AtomicBool; Flow::ALL.len()],
}

impl Default for FlowGates {
    fn default() -> Self {
        Self {
            busy: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }
}

impl FlowGates {
    /// Create gates with every flow idle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy the gate of `flow`.
    ///
    /// Returns `None` if the flow is already in flight. The gate is released
    /// when the returned permit drops, including when the owning future is
    /// cancelled.
    #[must_use]
    pub fn try_enter(&self, flow: Flow) -> Option<FlowPermit<'_>> {
        let gate = &self.busy[flow.index()];
        if gate
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(FlowPermit { gate })
        } else {
            debug!(flow = flow.as_str(), "re-entry rejected");
            metrics::counter!("ticket_client.flow.rejected", "flow" => flow.as_str())
                .increment(1);
            None
        }
    }
}

/// Proof of an occupied gate; releases it on drop.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the permit is dropped"]
pub struct FlowPermit<'a> {
    gate: &'a AtomicBool,
}

impl Drop for FlowPermit<'_> {
    fn drop(&mut self) {
        self.gate.store(false, Ordering::Release);
    }
}
