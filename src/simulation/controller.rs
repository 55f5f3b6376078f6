//! Simulation controller - owns the world and drives the two-phase tick.
//!
//! Each tick runs in a fixed order:
//! 1. every trigger is evaluated against every entity (binding phase)
//! 2. every entity advances, executing its bound actions (advance phase)
//! 3. the renderer receives the full world for a complete redraw
//!
//! The phase split is the core ordering guarantee: no entity moves until
//! all trigger evaluations for the tick are done, so every trigger sees
//! the same world state.

use crate::action::interval::IntervalBook;
use crate::action::{Action, ActionKind, MoveTarget};
use crate::core::config::SimConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Tick, Vec2};
use crate::entity::Entity;
use crate::render::{NullRenderer, Renderer};
use crate::schedule::{Clock, FixedStep, Scheduler, SystemClock};
use crate::simulation::events::SimEvent;
use crate::trigger::Trigger;
use crate::world::World;

/// Owns the world, the trigger list, and the injected collaborators
pub struct Controller {
    pub world: World,
    triggers: Vec<Trigger>,
    gates: IntervalBook,
    config: SimConfig,
    renderer: Box<dyn Renderer>,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
}

impl Controller {
    /// A controller with a discarding renderer, the wall clock, and a
    /// frame scheduler paced at the configured tick interval.
    pub fn new(config: SimConfig) -> Self {
        let scheduler = FixedStep::new(config.tick_interval_ms);
        Self {
            world: World::new(),
            triggers: Vec::new(),
            gates: IntervalBook::new(),
            config,
            renderer: Box::new(NullRenderer),
            clock: Box::new(SystemClock::new()),
            scheduler: Box::new(scheduler),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Registers a trigger
    ///
    /// Gated actions begin their interval period here, so a non-immediate
    /// gate measures from registration rather than from its first check.
    pub fn add_trigger(&mut self, trigger: Trigger) {
        let now = self.clock.now_ms();
        for action in trigger.actions() {
            self.gates.register(action, now);
        }
        self.triggers.push(trigger);
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Adds an entity to the world
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.world.insert(entity)
    }

    /// Runs one tick and returns the events it produced
    pub fn tick(&mut self) -> Result<Vec<SimEvent>> {
        let now = self.clock.now_ms();
        let tick = self.world.current_tick;
        let tolerance = self.config.proximity_tolerance;
        let mut events = Vec::new();

        // Binding phase. The candidate list is snapshotted once; actions
        // only run in the advance phase, so membership is stable here.
        let candidates = self.world.ids();
        for trigger in &mut self.triggers {
            if trigger.is_latched() {
                continue;
            }
            for &id in &candidates {
                if trigger.is_latched() {
                    break;
                }
                let Some(candidate) = self.world.get(id) else {
                    continue;
                };
                if !trigger.matches(candidate, &self.world, tolerance) {
                    continue;
                }
                let bound = self
                    .world
                    .get_mut(id)
                    .map(|entity| entity.bind_trigger(trigger.id, trigger.actions()))
                    .unwrap_or(false);
                trigger.mark_fired();
                if bound {
                    tracing::debug!("Trigger {:?} bound to entity {:?}", trigger.id, id);
                    events.push(SimEvent::TriggerFired {
                        tick,
                        trigger: trigger.id,
                        entity: id,
                    });
                }
            }
        }

        // Advance phase. The cursor walks the order index directly so that
        // entities created by an action are advanced before the walk ends;
        // entities destroyed mid-walk simply miss their lookup.
        let mut cursor = 0;
        while let Some(id) = self.world.order_at(cursor) {
            cursor += 1;
            let Some(entity) = self.world.get_mut(id) else {
                continue;
            };
            entity.shape.advance();
            let bound = entity.bound_actions();
            for action in bound {
                self.dispatch(&action, Some(id), now, tick, &mut events);
            }
        }
        self.world.compact();

        self.renderer.draw(&self.world)?;
        self.world.tick();
        Ok(events)
    }

    /// Runs ticks until the scheduler stops granting frames
    pub fn run(&mut self) -> Result<()> {
        while self.scheduler.request_tick() {
            self.tick()?;
        }
        Ok(())
    }

    /// Stops the frame loop before its next tick
    ///
    /// Never interrupts a tick in flight; the current one completes.
    pub fn pause(&mut self) {
        self.scheduler.cancel();
    }

    /// Executes one action directly, outside any binding
    ///
    /// The action's configured source is the subject. Used for scripted
    /// effects; bound actions go through the advance phase instead.
    pub fn execute(&mut self, action: &Action) -> Vec<SimEvent> {
        let now = self.clock.now_ms();
        let tick = self.world.current_tick;
        let mut events = Vec::new();
        self.dispatch(action, None, now, tick, &mut events);
        events
    }

    /// Gate check, then the effect
    ///
    /// Malformed invocations (no usable source, vanished move target) are
    /// skipped without an error; the gate timestamp is still consumed,
    /// matching the gate-first execution order.
    fn dispatch(
        &mut self,
        action: &Action,
        invoking: Option<EntityId>,
        now: u64,
        tick: Tick,
        events: &mut Vec<SimEvent>,
    ) {
        let source = invoking.or(action.source);
        if !self.gates.try_fire(action, now) {
            return;
        }

        match &action.kind {
            ActionKind::Create(spec) => {
                let Some(source) = source else {
                    tracing::trace!("Create {:?} skipped: no source", action.id);
                    return;
                };
                let entity = Entity::new(spec.kind, spec.shape.clone());
                let id = self.world.insert(entity);
                tracing::debug!("Spawned {:?} from {:?}", id, source);
                events.push(SimEvent::Spawned {
                    tick,
                    entity: id,
                    source,
                });
            }
            ActionKind::Destroy => {
                let Some(source) = source else {
                    tracing::trace!("Destroy {:?} skipped: no source", action.id);
                    return;
                };
                if self.world.remove(source).is_some() {
                    tracing::debug!("Destroyed {:?}", source);
                    events.push(SimEvent::Destroyed {
                        tick,
                        entity: source,
                    });
                }
            }
            ActionKind::MoveTo(target) => {
                let Some(source) = source else {
                    tracing::trace!("Move {:?} skipped: no source", action.id);
                    return;
                };
                let Some(dest) = self.resolve_target(target) else {
                    tracing::trace!("Move {:?} skipped: target gone", action.id);
                    return;
                };
                if let Some(entity) = self.world.get_mut(source) {
                    entity.step_toward(dest, self.config.move_speed);
                }
            }
        }
    }

    fn resolve_target(&self, target: &MoveTarget) -> Option<Vec2> {
        match target {
            MoveTarget::Entity(id) => self.world.get(*id).map(|e| e.shape.center),
            MoveTarget::Point(p) => Some(*p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::interval::IntervalGate;
    use crate::action::SpawnSpec;
    use crate::core::types::EntityKind;
    use crate::render::color::Color;
    use crate::schedule::{ManualClock, ManualScheduler};
    use crate::spatial::shape::Shape;
    use crate::trigger::Condition;
    use std::sync::{Arc, Mutex};

    /// Captures the entity count handed to each draw call.
    struct RecordingRenderer {
        counts: Arc<Mutex<Vec<usize>>>,
    }

    impl Renderer for RecordingRenderer {
        fn draw(&mut self, world: &World) -> Result<()> {
            self.counts.lock().unwrap().push(world.len());
            Ok(())
        }
    }

    fn test_controller() -> (Controller, ManualClock) {
        let clock = ManualClock::new();
        let controller =
            Controller::new(SimConfig::default()).with_clock(Box::new(clock.clone()));
        (controller, clock)
    }

    fn zone_at(x: f32, y: f32) -> Entity {
        Entity::new(EntityKind::Zone, Shape::rect(Vec2::new(x, y), 48.0, 48.0))
    }

    fn mob_at(x: f32, y: f32) -> Entity {
        Entity::new(EntityKind::Mob, Shape::circle(Vec2::new(x, y), 12.0))
    }

    fn spawn_spec(x: f32, y: f32) -> SpawnSpec {
        SpawnSpec {
            kind: EntityKind::Mob,
            shape: Shape::circle(Vec2::new(x, y), 12.0).with_fill(Color::ORANGE),
        }
    }

    #[test]
    fn test_spawned_entity_is_drawn_same_tick() {
        let counts = Arc::new(Mutex::new(Vec::new()));
        let (controller, _clock) = test_controller();
        let mut controller = controller.with_renderer(Box::new(RecordingRenderer {
            counts: counts.clone(),
        }));

        let zone_id = controller.spawn(zone_at(360.0, 24.0));
        controller.add_trigger(
            Trigger::new(
                vec![Condition::Is(zone_id)],
                vec![Action::create(spawn_spec(360.0, 24.0)).shared()],
            )
            .once(),
        );

        let events = controller.tick().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::Spawned { tick: 0, .. })));
        // The frame for tick 0 already contains the zone and the new mob.
        assert_eq!(counts.lock().unwrap().as_slice(), &[2]);
    }

    #[test]
    fn test_once_trigger_binds_only_first_match() {
        let (mut controller, _clock) = test_controller();
        let a = controller.spawn(mob_at(0.0, 0.0));
        let b = controller.spawn(mob_at(100.0, 0.0));

        controller.add_trigger(
            Trigger::new(
                vec![Condition::IsKind(EntityKind::Mob)],
                vec![Action::move_to(MoveTarget::Point(Vec2::new(0.0, 300.0))).shared()],
            )
            .once(),
        );

        let events = controller.tick().unwrap();
        let fired: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SimEvent::TriggerFired { .. }))
            .collect();
        assert_eq!(fired.len(), 1);

        // The first mob moved on the binding tick; the latch kept the
        // second mob unbound.
        assert_eq!(controller.world.get(a).unwrap().shape.center.y, 3.0);
        assert_eq!(controller.world.get(b).unwrap().shape.center.y, 0.0);
    }

    #[test]
    fn test_repeating_trigger_reaches_later_entities() {
        let (mut controller, _clock) = test_controller();
        let a = controller.spawn(mob_at(0.0, 0.0));
        let b = controller.spawn(mob_at(100.0, 0.0));

        controller.add_trigger(Trigger::new(
            vec![Condition::IsKind(EntityKind::Mob)],
            vec![Action::move_to(MoveTarget::Point(Vec2::new(0.0, 300.0))).shared()],
        ));

        controller.tick().unwrap();
        assert_eq!(controller.world.get(a).unwrap().shape.center.y, 3.0);
        assert_eq!(controller.world.get(b).unwrap().shape.center.y, 3.0);
    }

    #[test]
    fn test_bound_destroy_executes_in_same_tick_advance() {
        let (mut controller, _clock) = test_controller();
        let dest = controller.spawn(zone_at(120.0, 168.0));
        let mob = controller.spawn(mob_at(120.0, 168.0));

        controller.add_trigger(Trigger::new(
            vec![
                Condition::IsKind(EntityKind::Mob),
                Condition::Overlaps(dest),
            ],
            vec![Action::destroy().shared()],
        ));

        // Tick 0 binds and, in the advance phase of the same walk,
        // executes the newly bound destroy.
        let events = controller.tick().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::TriggerFired { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::Destroyed { tick: 0, entity } if *entity == mob)));
        assert!(!controller.world.contains(mob));
        assert!(controller.world.contains(dest));
    }

    #[test]
    fn test_execute_without_source_is_a_noop() {
        let (mut controller, _clock) = test_controller();
        controller.spawn(zone_at(0.0, 0.0));

        let orphan_create = Action::create(spawn_spec(0.0, 0.0));
        let events = controller.execute(&orphan_create);
        assert!(events.is_empty());
        assert_eq!(controller.world.len(), 1);

        let orphan_destroy = Action::destroy();
        assert!(controller.execute(&orphan_destroy).is_empty());
    }

    #[test]
    fn test_destroy_of_absent_entity_is_a_noop() {
        let (mut controller, _clock) = test_controller();
        let gone = EntityId::new();
        let action = Action::destroy().with_source(gone);
        assert!(controller.execute(&action).is_empty());
    }

    #[test]
    fn test_move_with_vanished_target_is_a_noop() {
        let (mut controller, _clock) = test_controller();
        let mob = controller.spawn(mob_at(0.0, 0.0));

        let action = Action::move_to(MoveTarget::Entity(EntityId::new())).with_source(mob);
        controller.execute(&action);
        assert_eq!(controller.world.get(mob).unwrap().shape.center, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_gated_action_waits_for_its_period() {
        let (controller, clock) = test_controller();
        let mut controller = controller;
        let zone_id = controller.spawn(zone_at(360.0, 24.0));
        controller.add_trigger(
            Trigger::new(
                vec![Condition::Is(zone_id)],
                vec![Action::create(spawn_spec(360.0, 24.0))
                    .with_gate(IntervalGate::new(1000))
                    .shared()],
            )
            .once(),
        );

        // Gate registered at 0; nothing spawns while now <= 1000.
        for _ in 0..5 {
            clock.advance(16);
            controller.tick().unwrap();
        }
        assert_eq!(controller.world.count_kind(EntityKind::Mob), 0);

        clock.set(1001);
        controller.tick().unwrap();
        assert_eq!(controller.world.count_kind(EntityKind::Mob), 1);
    }

    #[test]
    fn test_run_honors_scheduler_budget() {
        let (controller, _clock) = test_controller();
        let mut controller = controller.with_scheduler(Box::new(ManualScheduler::new(5)));
        controller.run().unwrap();
        assert_eq!(controller.world.current_tick, 5);

        // Budget exhausted: another run adds nothing.
        controller.run().unwrap();
        assert_eq!(controller.world.current_tick, 5);
    }

    #[test]
    fn test_pause_forfeits_remaining_frames() {
        let (controller, _clock) = test_controller();
        let mut controller = controller.with_scheduler(Box::new(ManualScheduler::new(10)));
        controller.pause();
        controller.run().unwrap();
        assert_eq!(controller.world.current_tick, 0);
    }
}
