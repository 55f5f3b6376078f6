//! Triggers: condition/action rules evaluated against every entity each tick.

use std::sync::Arc;

use crate::action::Action;
use crate::core::types::{EntityId, EntityKind, TriggerId};
use crate::entity::Entity;
use crate::world::World;

/// A single predicate over a candidate entity
///
/// Conditions are pure: they read the candidate and the world, never
/// modify either. A trigger's condition list is a conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The candidate has this kind
    IsKind(EntityKind),
    /// The candidate is this exact entity
    Is(EntityId),
    /// The candidate's shape overlaps the named entity's shape
    ///
    /// False when the named entity is gone.
    Overlaps(EntityId),
}

impl Condition {
    pub fn matches(&self, candidate: &Entity, world: &World, tolerance: f32) -> bool {
        match self {
            Condition::IsKind(kind) => candidate.kind == *kind,
            Condition::Is(id) => candidate.id == *id,
            Condition::Overlaps(id) => match world.get(*id) {
                Some(other) => candidate.shape.overlaps(&other.shape, tolerance),
                None => false,
            },
        }
    }
}

/// A rule: when every condition holds for an entity, bind the actions to it
///
/// `once` triggers latch globally after their first firing; the latch
/// blocks evaluation against every entity, not just the one that matched.
#[derive(Debug)]
pub struct Trigger {
    pub id: TriggerId,
    pub label: Option<String>,
    conditions: Vec<Condition>,
    actions: Vec<Arc<Action>>,
    once: bool,
    fired: bool,
}

impl Trigger {
    pub fn new(conditions: Vec<Condition>, actions: Vec<Arc<Action>>) -> Self {
        Self {
            id: TriggerId::new(),
            label: None,
            conditions,
            actions,
            once: false,
            fired: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the trigger one-shot: it latches after its first firing.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// True when all conditions hold for the candidate
    ///
    /// An empty condition list never matches; a trigger without conditions
    /// is permanently inert rather than permanently firing.
    pub fn matches(&self, candidate: &Entity, world: &World, tolerance: f32) -> bool {
        if self.conditions.is_empty() {
            return false;
        }
        self.conditions
            .iter()
            .all(|c| c.matches(candidate, world, tolerance))
    }

    pub fn is_once(&self) -> bool {
        self.once
    }

    /// True once a one-shot trigger has fired
    pub fn is_latched(&self) -> bool {
        self.once && self.fired
    }

    /// Records a firing. Only meaningful for `once` triggers, but recorded
    /// unconditionally.
    pub fn mark_fired(&mut self) {
        self.fired = true;
    }

    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }
}
