//! Actions: the effect half of a trigger rule.
//!
//! Actions are shared. A trigger holds one `Arc<Action>` per effect and
//! every entity it fires on binds that same instance, so an interval gate
//! on the action limits it globally rather than per entity.

pub mod interval;

use std::sync::Arc;

use crate::core::types::{ActionId, EntityId, EntityKind, Vec2};
use crate::spatial::shape::Shape;
use interval::IntervalGate;

/// What an action does when executed
#[derive(Debug, Clone)]
pub enum ActionKind {
    /// Spawn a fresh entity from a `SpawnSpec`
    Create(SpawnSpec),
    /// Remove the source entity from the world
    Destroy,
    /// Step the source entity toward the target
    MoveTo(MoveTarget),
}

/// Destination of a move action
#[derive(Debug, Clone, Copy)]
pub enum MoveTarget {
    /// Follow another entity's center. A vanished target makes the move a
    /// no-op rather than an error.
    Entity(EntityId),
    /// A fixed point.
    Point(Vec2),
}

/// Template for entities produced by a create action
///
/// The shape's center is fixed when the template is built; every spawn
/// appears there with a fresh id.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub kind: EntityKind,
    pub shape: Shape,
}

/// Binding key: one bound action per slot on each entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSlot {
    Create,
    Destroy,
    MoveTo,
}

/// A shared, executable effect
///
/// `source` is the configured fallback subject; when a trigger fires the
/// action on an entity, that entity overrides it. The gate, if present,
/// rate-limits execution against the wall clock.
#[derive(Debug)]
pub struct Action {
    pub id: ActionId,
    pub source: Option<EntityId>,
    pub kind: ActionKind,
    pub gate: Option<IntervalGate>,
}

impl Action {
    pub fn create(spec: SpawnSpec) -> Self {
        Self::from_kind(ActionKind::Create(spec))
    }

    pub fn destroy() -> Self {
        Self::from_kind(ActionKind::Destroy)
    }

    pub fn move_to(target: MoveTarget) -> Self {
        Self::from_kind(ActionKind::MoveTo(target))
    }

    fn from_kind(kind: ActionKind) -> Self {
        Self {
            id: ActionId::new(),
            source: None,
            kind,
            gate: None,
        }
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_gate(mut self, gate: IntervalGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn slot(&self) -> ActionSlot {
        match self.kind {
            ActionKind::Create(_) => ActionSlot::Create,
            ActionKind::Destroy => ActionSlot::Destroy,
            ActionKind::MoveTo(_) => ActionSlot::MoveTo,
        }
    }

    /// Convenience for sharing an action between a trigger and bindings
    pub fn shared(self) -> Arc<Action> {
        Arc::new(self)
    }
}
