//! Scene assembly
//!
//! A scene is the declarative setup for a run: the zone entities and
//! the triggers wired to them. `Scene::standard` builds the built-in
//! course; `loader` reads the same structure from TOML.

pub mod loader;

use crate::action::interval::IntervalGate;
use crate::action::{Action, MoveTarget, SpawnSpec};
use crate::core::config::SimConfig;
use crate::core::types::{EntityKind, Vec2};
use crate::entity::Entity;
use crate::render::color::Color;
use crate::simulation::Controller;
use crate::spatial::shape::Shape;
use crate::trigger::{Condition, Trigger};

pub use loader::{load_file, load_str};

#[derive(Debug)]
pub struct Scene {
    pub name: String,
    pub zones: Vec<Entity>,
    pub triggers: Vec<Trigger>,
}

impl Scene {
    /// The built-in course: a spawn zone, four waypoints, a destination
    ///
    /// Zone centers sit on half-cell positions so every leg length is a
    /// multiple of the move speed and arrivals land exactly on center.
    pub fn standard(config: &SimConfig) -> Self {
        let c = config.cell_size;
        let zone = |label: &str, col: f32, row: f32, fill: Color| {
            Entity::new(
                EntityKind::Zone,
                Shape::rect(Vec2::new(col * c, row * c), c, c)
                    .with_fill(fill)
                    .with_opacity(0.0),
            )
            .with_label(label)
        };

        let input = zone("input", 7.5, 0.5, Color::GREEN);
        let wp1 = zone("wp1", 0.5, 0.5, Color::BLUE);
        let wp2 = zone("wp2", 0.5, 7.5, Color::BLUE);
        let wp3 = zone("wp3", 7.5, 7.5, Color::BLUE);
        let wp4 = zone("wp4", 7.5, 3.5, Color::BLUE);
        let dest = zone("dest", 2.5, 3.5, Color::RED);

        let spawn_shape = Shape::circle(input.shape.center, c / 4.0).with_fill(Color::ORANGE);
        let spawner = Trigger::new(
            vec![Condition::Is(input.id)],
            vec![Action::create(SpawnSpec {
                kind: EntityKind::Mob,
                shape: spawn_shape,
            })
            .with_gate(IntervalGate::new(config.spawn_interval_ms))
            .shared()],
        )
        .once()
        .with_label("spawner");

        let leg = |label: &str, from: &Entity, to: &Entity| {
            Trigger::new(
                vec![
                    Condition::IsKind(EntityKind::Mob),
                    Condition::Overlaps(from.id),
                ],
                vec![Action::move_to(MoveTarget::Entity(to.id)).shared()],
            )
            .with_label(label)
        };

        let triggers = vec![
            spawner,
            leg("to_wp1", &input, &wp1),
            leg("to_wp2", &wp1, &wp2),
            leg("to_wp3", &wp2, &wp3),
            leg("to_wp4", &wp3, &wp4),
            leg("to_dest", &wp4, &dest),
            Trigger::new(
                vec![
                    Condition::IsKind(EntityKind::Mob),
                    Condition::Overlaps(dest.id),
                ],
                vec![Action::destroy().shared()],
            )
            .with_label("arrive"),
        ];

        Self {
            name: "standard".to_string(),
            zones: vec![input, wp1, wp2, wp3, wp4, dest],
            triggers,
        }
    }

    /// Installs the scene into a controller
    ///
    /// Zones enter the world first, then triggers register. Gate periods
    /// start counting here.
    pub fn install(self, controller: &mut Controller) {
        for zone in self.zones {
            controller.spawn(zone);
        }
        for trigger in self.triggers {
            controller.add_trigger(trigger);
        }
        tracing::info!("Installed scene '{}'", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scene_shape() {
        let scene = Scene::standard(&SimConfig::default());
        assert_eq!(scene.zones.len(), 6);
        assert_eq!(scene.triggers.len(), 7);
        assert!(scene.zones.iter().all(|z| z.kind == EntityKind::Zone));
    }

    #[test]
    fn test_standard_zone_palette() {
        let scene = Scene::standard(&SimConfig::default());
        let fill = |label: &str| {
            scene
                .zones
                .iter()
                .find(|z| z.label.as_deref() == Some(label))
                .unwrap()
                .shape
                .fill
        };

        assert_eq!(fill("input"), Some(Color::GREEN));
        assert_eq!(fill("dest"), Some(Color::RED));
        for wp in ["wp1", "wp2", "wp3", "wp4"] {
            assert_eq!(fill(wp), Some(Color::BLUE));
        }
        // Fills are carried at zero opacity, matching the course data.
        assert!(scene.zones.iter().all(|z| z.shape.opacity == 0.0));
    }

    #[test]
    fn test_standard_legs_are_speed_aligned() {
        let config = SimConfig::default();
        let scene = Scene::standard(&config);
        let center = |label: &str| {
            scene
                .zones
                .iter()
                .find(|z| z.label.as_deref() == Some(label))
                .unwrap()
                .shape
                .center
        };

        let course = ["input", "wp1", "wp2", "wp3", "wp4", "dest"];
        for pair in course.windows(2) {
            let from = center(pair[0]);
            let to = center(pair[1]);
            let d = to - from;
            // Axis-aligned legs whose length divides evenly by the speed.
            assert!(d.x == 0.0 || d.y == 0.0);
            let len = d.x.abs() + d.y.abs();
            assert_eq!(len % config.move_speed, 0.0);
        }
    }

    #[test]
    fn test_install_populates_controller() {
        let mut controller = Controller::new(SimConfig::default());
        Scene::standard(&SimConfig::default()).install(&mut controller);
        assert_eq!(controller.world.len(), 6);
        assert_eq!(controller.trigger_count(), 7);
        assert!(controller.world.find_label("input").is_some());
    }
}
