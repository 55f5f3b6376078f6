//! TOML scene documents
//!
//! Positions in scene files are in cell units; they scale by the
//! configured cell size at load time, so one file works for any board
//! resolution.

use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;

use crate::action::interval::IntervalGate;
use crate::action::{Action, MoveTarget, SpawnSpec};
use crate::core::config::SimConfig;
use crate::core::error::{GridError, Result};
use crate::core::types::{EntityId, EntityKind, Vec2};
use crate::entity::Entity;
use crate::render::color::Color;
use crate::scene::Scene;
use crate::spatial::shape::Shape;
use crate::trigger::{Condition, Trigger};

#[derive(Debug, Deserialize)]
struct SceneDoc {
    name: String,
    #[serde(default)]
    zone: Vec<ZoneDoc>,
    #[serde(default)]
    trigger: Vec<TriggerDoc>,
}

#[derive(Debug, Deserialize)]
struct ZoneDoc {
    label: String,
    /// Center position in cell units
    at: [f32; 2],
    #[serde(default)]
    fill: Option<String>,
    #[serde(default)]
    stroke: Option<String>,
    #[serde(default)]
    opacity: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct TriggerDoc {
    label: String,
    #[serde(default)]
    once: bool,
    when: Vec<ConditionDoc>,
    then: Vec<ActionDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ConditionDoc {
    Kind { kind: EntityKind },
    Entity { label: String },
    Overlaps { label: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ActionDoc {
    Create {
        /// Label of the zone whose center is the spawn point
        at: String,
        #[serde(default)]
        radius: Option<f32>,
        #[serde(default)]
        fill: Option<String>,
        #[serde(default)]
        every_ms: Option<u64>,
        #[serde(default)]
        immediate: bool,
    },
    Destroy,
    MoveTo {
        to: MoveTargetDoc,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MoveTargetDoc {
    Label(String),
    Point([f32; 2]),
}

/// Parses a scene from TOML text
pub fn load_str(text: &str, config: &SimConfig) -> Result<Scene> {
    let doc: SceneDoc = toml::from_str(text).map_err(|e| GridError::SceneParse(e.to_string()))?;
    resolve(doc, config)
}

/// Loads a scene from a TOML file
pub fn load_file(path: &Path, config: &SimConfig) -> Result<Scene> {
    let text = std::fs::read_to_string(path)?;
    let doc: SceneDoc = toml::from_str(&text)
        .map_err(|e| GridError::SceneParse(format!("{}: {}", path.display(), e)))?;
    resolve(doc, config)
}

fn resolve(doc: SceneDoc, config: &SimConfig) -> Result<Scene> {
    let c = config.cell_size;
    let mut zones = Vec::with_capacity(doc.zone.len());
    let mut by_label: AHashMap<String, (EntityId, Vec2)> = AHashMap::new();

    for z in &doc.zone {
        let center = Vec2::new(z.at[0] * c, z.at[1] * c);
        let mut shape = Shape::rect(center, c, c).with_opacity(z.opacity.unwrap_or(0.0));
        if let Some(name) = &z.fill {
            shape.fill = Some(name.parse().map_err(GridError::SceneParse)?);
        }
        if let Some(name) = &z.stroke {
            shape.stroke = Some(name.parse().map_err(GridError::SceneParse)?);
        }
        let entity = Entity::new(EntityKind::Zone, shape).with_label(z.label.clone());
        if by_label
            .insert(z.label.clone(), (entity.id, center))
            .is_some()
        {
            return Err(GridError::DuplicateLabel(z.label.clone()));
        }
        zones.push(entity);
    }

    let lookup = |label: &str| -> Result<(EntityId, Vec2)> {
        by_label
            .get(label)
            .copied()
            .ok_or_else(|| GridError::UnknownLabel(label.to_string()))
    };

    let mut triggers = Vec::with_capacity(doc.trigger.len());
    for t in doc.trigger {
        let mut conditions = Vec::with_capacity(t.when.len());
        for cond in t.when {
            conditions.push(match cond {
                ConditionDoc::Kind { kind } => Condition::IsKind(kind),
                ConditionDoc::Entity { label } => Condition::Is(lookup(&label)?.0),
                ConditionDoc::Overlaps { label } => Condition::Overlaps(lookup(&label)?.0),
            });
        }

        let mut actions = Vec::with_capacity(t.then.len());
        for a in t.then {
            actions.push(match a {
                ActionDoc::Create {
                    at,
                    radius,
                    fill,
                    every_ms,
                    immediate,
                } => {
                    let (_, center) = lookup(&at)?;
                    let mut shape = Shape::circle(center, radius.unwrap_or(c / 4.0));
                    shape.fill = Some(match fill {
                        Some(name) => name.parse().map_err(GridError::SceneParse)?,
                        None => Color::ORANGE,
                    });
                    let mut action = Action::create(SpawnSpec {
                        kind: EntityKind::Mob,
                        shape,
                    });
                    if let Some(every_ms) = every_ms {
                        let gate = if immediate {
                            IntervalGate::immediate(every_ms)
                        } else {
                            IntervalGate::new(every_ms)
                        };
                        action = action.with_gate(gate);
                    }
                    action.shared()
                }
                ActionDoc::Destroy => Action::destroy().shared(),
                ActionDoc::MoveTo { to } => {
                    let target = match to {
                        MoveTargetDoc::Label(label) => MoveTarget::Entity(lookup(&label)?.0),
                        MoveTargetDoc::Point([x, y]) => MoveTarget::Point(Vec2::new(x * c, y * c)),
                    };
                    Action::move_to(target).shared()
                }
            });
        }

        let mut trigger = Trigger::new(conditions, actions).with_label(t.label);
        if t.once {
            trigger = trigger.once();
        }
        triggers.push(trigger);
    }

    Ok(Scene {
        name: doc.name,
        zones,
        triggers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, ActionSlot};

    const MINIMAL: &str = r#"
        name = "mini"

        [[zone]]
        label = "start"
        at = [7.5, 0.5]
        fill = "green"

        [[zone]]
        label = "end"
        at = [2.5, 3.5]
        fill = "red"
        stroke = "yellow"
        opacity = 0.5

        [[trigger]]
        label = "spawner"
        once = true
        when = [{ type = "entity", label = "start" }]
        then = [{ type = "create", at = "start", every_ms = 1000 }]

        [[trigger]]
        label = "walk"
        when = [{ type = "kind", kind = "mob" }, { type = "overlaps", label = "start" }]
        then = [{ type = "move_to", to = "end" }]

        [[trigger]]
        label = "arrive"
        when = [{ type = "kind", kind = "mob" }, { type = "overlaps", label = "end" }]
        then = [{ type = "destroy" }]
    "#;

    #[test]
    fn test_load_minimal_scene() {
        let config = SimConfig::default();
        let scene = load_str(MINIMAL, &config).unwrap();

        assert_eq!(scene.name, "mini");
        assert_eq!(scene.zones.len(), 2);
        assert_eq!(scene.triggers.len(), 3);

        // Cell coordinates scale by cell_size.
        let start = &scene.zones[0];
        assert_eq!(start.shape.center, Vec2::new(360.0, 24.0));
        assert_eq!(start.shape.opacity, 0.0);
        assert_eq!(start.shape.fill, Some(Color::GREEN));
        assert_eq!(start.shape.stroke, None);
        assert_eq!(scene.zones[1].shape.stroke, Some(Color::YELLOW));
        assert_eq!(scene.zones[1].shape.opacity, 0.5);
    }

    #[test]
    fn test_create_defaults_and_gate() {
        let config = SimConfig::default();
        let scene = load_str(MINIMAL, &config).unwrap();

        let spawner = &scene.triggers[0];
        assert!(spawner.is_once());
        let action = &spawner.actions()[0];
        assert_eq!(action.slot(), ActionSlot::Create);
        let gate = action.gate.as_ref().unwrap();
        assert_eq!(gate.every_ms, 1000);
        assert!(!gate.immediate);

        match &action.kind {
            ActionKind::Create(spec) => {
                assert_eq!(spec.kind, EntityKind::Mob);
                // Default radius is a quarter cell, default fill orange.
                assert_eq!(spec.shape.width(), config.cell_size / 2.0);
                assert_eq!(spec.shape.fill, Some(Color::ORANGE));
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_move_target_resolves_to_zone_entity() {
        let config = SimConfig::default();
        let scene = load_str(MINIMAL, &config).unwrap();

        let end_id = scene.zones[1].id;
        let walk = &scene.triggers[1];
        match &walk.actions()[0].kind {
            ActionKind::MoveTo(MoveTarget::Entity(id)) => assert_eq!(*id, end_id),
            other => panic!("expected entity move target, got {:?}", other),
        }
    }

    #[test]
    fn test_move_target_point_in_cell_units() {
        let toml = r#"
            name = "points"

            [[zone]]
            label = "a"
            at = [0.5, 0.5]

            [[trigger]]
            label = "drift"
            when = [{ type = "kind", kind = "mob" }]
            then = [{ type = "move_to", to = [2.0, 3.0] }]
        "#;
        let config = SimConfig::default();
        let scene = load_str(toml, &config).unwrap();
        match &scene.triggers[0].actions()[0].kind {
            ActionKind::MoveTo(MoveTarget::Point(p)) => {
                assert_eq!(*p, Vec2::new(96.0, 144.0));
            }
            other => panic!("expected point move target, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let toml = r#"
            name = "bad"

            [[trigger]]
            label = "walk"
            when = [{ type = "overlaps", label = "nowhere" }]
            then = [{ type = "destroy" }]
        "#;
        let err = load_str(toml, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::UnknownLabel(label) if label == "nowhere"));
    }

    #[test]
    fn test_duplicate_label_is_an_error() {
        let toml = r#"
            name = "bad"

            [[zone]]
            label = "twice"
            at = [0.5, 0.5]

            [[zone]]
            label = "twice"
            at = [1.5, 0.5]
        "#;
        let err = load_str(toml, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::DuplicateLabel(label) if label == "twice"));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = load_str("name = ", &SimConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::SceneParse(_)));
    }

    #[test]
    fn test_bad_color_name_is_a_parse_error() {
        let toml = r#"
            name = "bad"

            [[zone]]
            label = "z"
            at = [0.5, 0.5]
            fill = "chartreuse"
        "#;
        let err = load_str(toml, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::SceneParse(_)));
    }
}
