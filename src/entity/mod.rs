//! Entities: mobs and zones, their bound actions, and step movement.

use ahash::AHashSet;
use std::sync::Arc;

use crate::action::{Action, ActionSlot};
use crate::core::types::{EntityId, EntityKind, TriggerId, Vec2};
use crate::spatial::shape::Shape;

/// A live simulation object
///
/// Zones and mobs share one representation; the kind plus the trigger rules
/// decide how each behaves. Bound actions run every time the entity
/// advances, in binding order.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub label: Option<String>,
    pub kind: EntityKind,
    pub shape: Shape,
    bound: Vec<(ActionSlot, Arc<Action>)>,
    seen_triggers: AHashSet<TriggerId>,
}

impl Entity {
    pub fn new(kind: EntityKind, shape: Shape) -> Self {
        Self {
            id: EntityId::new(),
            label: None,
            kind,
            shape,
            bound: Vec::new(),
            seen_triggers: AHashSet::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Records the trigger and binds its actions
    ///
    /// Returns false without touching anything if this trigger was already
    /// seen, so a trigger whose conditions keep matching binds each entity
    /// at most once.
    pub fn bind_trigger(&mut self, trigger: TriggerId, actions: &[Arc<Action>]) -> bool {
        if !self.seen_triggers.insert(trigger) {
            return false;
        }
        for action in actions {
            self.bind_action(action.clone());
        }
        true
    }

    /// Forgets a trigger so it can bind again
    ///
    /// Actions the trigger already bound stay in place; only the dedup
    /// record is dropped.
    pub fn unbind_trigger(&mut self, trigger: TriggerId) -> bool {
        self.seen_triggers.remove(&trigger)
    }

    pub fn has_seen(&self, trigger: TriggerId) -> bool {
        self.seen_triggers.contains(&trigger)
    }

    /// Binds an action into its slot
    ///
    /// One action per slot: rebinding replaces the slot's action in place,
    /// keeping the slot's original position in the execution order.
    pub fn bind_action(&mut self, action: Arc<Action>) {
        let slot = action.slot();
        if let Some(entry) = self.bound.iter_mut().find(|(s, _)| *s == slot) {
            entry.1 = action;
        } else {
            self.bound.push((slot, action));
        }
    }

    /// Removes the bound action in a slot
    ///
    /// Returns false when the slot was empty. Seen-trigger records are
    /// untouched, so the trigger that bound it will not bind again.
    pub fn unbind_action(&mut self, slot: ActionSlot) -> bool {
        match self.bound.iter().position(|(s, _)| *s == slot) {
            Some(i) => {
                self.bound.remove(i);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the bound actions in execution order
    pub fn bound_actions(&self) -> Vec<Arc<Action>> {
        self.bound.iter().map(|(_, action)| action.clone()).collect()
    }

    pub fn bound_len(&self) -> usize {
        self.bound.len()
    }

    /// One movement step toward `target`
    ///
    /// Axis-wise: an axis already equal to the target's stays put, any
    /// other axis moves by the full `speed` toward it. Diagonal steps
    /// therefore cover `speed` on both axes at once. There is no snap on
    /// final approach; a target that is not a multiple of `speed` away is
    /// overshot and oscillated around.
    pub fn step_toward(&mut self, target: Vec2, speed: f32) {
        let c = self.shape.center;
        if c.x == target.x && c.y == target.y {
            return;
        }

        let mut next = c;
        if c.x == target.x {
            next.y += axis_step(c.y, target.y, speed);
        } else if c.y == target.y {
            next.x += axis_step(c.x, target.x, speed);
        } else {
            next.x += axis_step(c.x, target.x, speed);
            next.y += axis_step(c.y, target.y, speed);
        }
        self.shape.set_center(next);
    }
}

fn axis_step(from: f32, to: f32, speed: f32) -> f32 {
    if to > from {
        speed
    } else {
        -speed
    }
}
