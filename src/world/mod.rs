//! World - the insertion-ordered collection of live entities.

use ahash::AHashMap;

use crate::core::types::{EntityId, EntityKind, Tick};
use crate::entity::Entity;

/// All live entities plus the tick counter
///
/// Iteration follows insertion order. Removal leaves a stale id in the
/// order index until `compact` runs; every ordered access tolerates that
/// by looking the id up first. This is what lets actions create and
/// destroy entities while the advance walk is mid-flight.
pub struct World {
    pub current_tick: Tick,
    entities: AHashMap<EntityId, Entity>,
    order: Vec<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self {
            current_tick: 0,
            entities: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// Adds an entity, appending it to the iteration order
    ///
    /// Re-inserting an id that is already present (or still parked in the
    /// order index) replaces the entity without duplicating its slot.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if !self.entities.contains_key(&id) && !self.order.contains(&id) {
            self.order.push(id);
        }
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Snapshot of live ids in insertion order
    pub fn ids(&self) -> Vec<EntityId> {
        self.order
            .iter()
            .filter(|id| self.entities.contains_key(id))
            .copied()
            .collect()
    }

    /// Ordered access by position, including stale slots
    ///
    /// Callers walking with a cursor check `get` on each id; ids whose
    /// entity was removed simply miss.
    pub fn order_at(&self, index: usize) -> Option<EntityId> {
        self.order.get(index).copied()
    }

    /// Live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// First entity carrying this label, in insertion order
    pub fn find_label(&self, label: &str) -> Option<&Entity> {
        self.iter()
            .find(|e| e.label.as_deref() == Some(label))
    }

    /// Drops stale ids from the order index
    pub fn compact(&mut self) {
        self.order.retain(|id| self.entities.contains_key(id));
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntityKind, Vec2};
    use crate::spatial::shape::Shape;

    fn mob() -> Entity {
        Entity::new(EntityKind::Mob, Shape::circle(Vec2::new(0.0, 0.0), 12.0))
    }

    fn zone() -> Entity {
        Entity::new(EntityKind::Zone, Shape::rect(Vec2::new(0.0, 0.0), 48.0, 48.0))
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut world = World::new();
        let a = world.insert(zone());
        let b = world.insert(mob());
        let c = world.insert(mob());

        let seen: Vec<EntityId> = world.iter().map(|e| e.id).collect();
        assert_eq!(seen, vec![a, b, c]);
    }

    #[test]
    fn test_removed_ids_are_skipped_then_compacted() {
        let mut world = World::new();
        let a = world.insert(mob());
        let b = world.insert(mob());
        let c = world.insert(mob());

        world.remove(b);
        assert_eq!(world.ids(), vec![a, c]);
        // The order index still holds the stale middle slot.
        assert_eq!(world.order_at(1), Some(b));

        world.compact();
        assert_eq!(world.order_at(1), Some(c));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_reinsert_keeps_single_order_slot() {
        let mut world = World::new();
        let entity = mob();
        let id = world.insert(entity);

        let removed = world.remove(id).unwrap();
        world.insert(removed);

        let seen: Vec<EntityId> = world.iter().map(|e| e.id).collect();
        assert_eq!(seen, vec![id]);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut world = World::new();
        world.insert(mob());
        assert!(world.remove(EntityId::new()).is_none());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_count_kind() {
        let mut world = World::new();
        world.insert(zone());
        world.insert(mob());
        world.insert(mob());
        assert_eq!(world.count_kind(EntityKind::Mob), 2);
        assert_eq!(world.count_kind(EntityKind::Zone), 1);
    }

    #[test]
    fn test_find_label() {
        let mut world = World::new();
        world.insert(zone().with_label("input"));
        world.insert(zone().with_label("destination"));

        assert!(world.find_label("input").is_some());
        assert!(world.find_label("nowhere").is_none());
    }
}
