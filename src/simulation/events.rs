//! Events surfaced from each tick, in the order they happened.
//!
//! This is the observation surface for callers: the headless driver prints
//! them as JSON lines and tests assert on them.

use serde::Serialize;

use crate::core::types::{EntityId, Tick, TriggerId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A trigger matched an entity and bound its actions
    TriggerFired {
        tick: Tick,
        trigger: TriggerId,
        entity: EntityId,
    },
    /// A create action produced a new entity
    Spawned {
        tick: Tick,
        entity: EntityId,
        source: EntityId,
    },
    /// A destroy action removed an entity
    Destroyed { tick: Tick, entity: EntityId },
}
