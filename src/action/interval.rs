//! Wall-clock rate limiting for shared actions.

use ahash::AHashMap;

use crate::action::Action;
use crate::core::types::ActionId;

/// Gate configuration carried on an action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalGate {
    /// Minimum elapsed milliseconds between firings (strictly exceeded)
    pub every_ms: u64,
    /// When true, the first check after registration passes immediately;
    /// otherwise the first period starts at registration time.
    pub immediate: bool,
}

impl IntervalGate {
    pub fn new(every_ms: u64) -> Self {
        Self {
            every_ms,
            immediate: false,
        }
    }

    pub fn immediate(every_ms: u64) -> Self {
        Self {
            every_ms,
            immediate: true,
        }
    }
}

/// Firing state for gated actions, keyed by action id
///
/// The state lives here rather than on the action so that every binding of
/// one shared action consults the same entry: when the gate passes for one
/// entity, it is closed for all of them until the period elapses again.
#[derive(Debug, Default)]
pub struct IntervalBook {
    last_fire: AHashMap<ActionId, Option<u64>>,
}

impl IntervalBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a gated action
    ///
    /// Non-immediate gates begin their first period at `now`; immediate
    /// gates start open. Ungated actions are ignored, and an action that
    /// is already tracked keeps its state.
    pub fn register(&mut self, action: &Action, now: u64) {
        if let Some(gate) = action.gate {
            self.last_fire
                .entry(action.id)
                .or_insert(if gate.immediate { None } else { Some(now) });
        }
    }

    /// Checks the gate and, on a pass, stamps the firing time
    ///
    /// Ungated actions always pass. A gated action not seen before is
    /// registered on the spot, as if it had been registered at `now`.
    pub fn try_fire(&mut self, action: &Action, now: u64) -> bool {
        let Some(gate) = action.gate else {
            return true;
        };

        let entry = self
            .last_fire
            .entry(action.id)
            .or_insert(if gate.immediate { None } else { Some(now) });

        let pass = match *entry {
            None => true,
            Some(last) => now - last > gate.every_ms,
        };
        if pass {
            *entry = Some(now);
        }
        pass
    }
}
