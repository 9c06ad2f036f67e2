use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in scenario or pipeline data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    UnknownKey { kind: &'static str, key: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::UnknownKey { kind, key } => {
                write!(f, "unknown {kind} '{key}'")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and value ranges in a `ScenarioDef`.
///
/// ```
/// use root_access_data::{AreaDef, PlayerDef, ScenarioDef, validate_scenario};
///
/// let scenario = ScenarioDef {
///     title: "Demo".into(),
///     player: PlayerDef {
///         name: "Player".into(),
///         description: "A hacker".into(),
///         start_area: "alley".into(),
///         max_hp: 100,
///     },
///     areas: vec![AreaDef {
///         id: "alley".into(),
///         name: "Alley".into(),
///         desc: "A damp alley.".into(),
///         sub_areas: Vec::new(),
///         exits: Vec::new(),
///         objects: Vec::new(),
///     }],
///     ..ScenarioDef::default()
/// };
/// assert!(validate_scenario(&scenario).is_empty());
/// ```
pub fn validate_scenario(scenario: &ScenarioDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut areas = HashSet::new();
    let mut gangs = HashSet::new();
    let mut npcs = HashSet::new();
    let mut items = HashSet::new();
    let mut objects = HashSet::new();

    track_ids("area", scenario.areas.iter().map(|a| a.id.as_str()), &mut areas, &mut errors);
    track_ids("gang", scenario.gangs.iter().map(|g| g.id.as_str()), &mut gangs, &mut errors);
    track_ids("npc", scenario.npcs.iter().map(|n| n.id.as_str()), &mut npcs, &mut errors);
    track_ids("item", scenario.items.iter().map(|i| i.id.as_str()), &mut items, &mut errors);
    track_ids(
        "object",
        scenario.areas.iter().flat_map(|a| a.objects.iter().map(|o| o.id.as_str())),
        &mut objects,
        &mut errors,
    );

    if scenario.player.start_area.trim().is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "player start area missing".to_string(),
        });
    } else {
        check_ref(
            "area",
            &scenario.player.start_area,
            &areas,
            "player start area".to_string(),
            &mut errors,
        );
    }
    if scenario.player.max_hp == 0 {
        errors.push(ValidationError::InvalidValue {
            context: "player max_hp must be positive".to_string(),
        });
    }

    for area in &scenario.areas {
        for exit in &area.exits {
            check_ref("area", exit, &areas, format!("area '{}' exits", area.id), &mut errors);
            if exit == &area.id {
                errors.push(ValidationError::InvalidValue {
                    context: format!("area '{}' has an exit to itself", area.id),
                });
            }
        }
        for object in &area.objects {
            if let ObjectKindDef::HidingSpot { stealth_bonus } = object.kind {
                check_fraction(
                    stealth_bonus,
                    format!("area '{}' hiding spot '{}' stealth_bonus", area.id, object.id),
                    &mut errors,
                );
            }
        }
    }

    for gang in &scenario.gangs {
        for rival in &gang.rivals {
            check_ref("gang", rival, &gangs, format!("gang '{}' rivals", gang.id), &mut errors);
            if rival == &gang.id {
                errors.push(ValidationError::InvalidValue {
                    context: format!("gang '{}' lists itself as a rival", gang.id),
                });
            }
        }
    }

    for npc in &scenario.npcs {
        check_ref("area", &npc.area, &areas, format!("npc '{}'", npc.id), &mut errors);
        if let Some(gang) = &npc.gang {
            check_ref("gang", gang, &gangs, format!("npc '{}'", npc.id), &mut errors);
        }
        if npc.max_hp == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("npc '{}' max_hp must be positive", npc.id),
            });
        }
        check_fraction(
            npc.detection_chance,
            format!("npc '{}' detection_chance", npc.id),
            &mut errors,
        );
        check_fraction(
            npc.hazard_resistance,
            format!("npc '{}' hazard_resistance", npc.id),
            &mut errors,
        );
    }

    for item in &scenario.items {
        match &item.location {
            LocationRef::Inventory | LocationRef::Nowhere => {},
            LocationRef::Area(area) => {
                check_ref("area", area, &areas, format!("item '{}'", item.id), &mut errors);
            },
            LocationRef::Npc(npc) => {
                check_ref("npc", npc, &npcs, format!("item '{}'", item.id), &mut errors);
            },
        }
        if item.abilities.contains(&ItemAbilityDef::Weapon) && item.power == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("weapon '{}' has zero power", item.id),
            });
        }
    }

    errors
}

/// Validate keys and ranges in a `PipelineDef`.
pub fn validate_pipeline(pipeline: &PipelineDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (key, behavior) in &pipeline.behaviors {
        if !BEHAVIOR_KEYS.contains(&key.as_str()) {
            errors.push(ValidationError::UnknownKey {
                kind: "behavior",
                key: key.clone(),
            });
        }
        if behavior.base_weight.is_some_and(|w| !w.is_finite() || w < 0.0) {
            errors.push(ValidationError::InvalidValue {
                context: format!("behavior '{key}' base_weight must be a non-negative number"),
            });
        }
        if behavior.frequency.is_some_and(|f| !f.is_finite() || f < 0.0) {
            errors.push(ValidationError::InvalidValue {
                context: format!("behavior '{key}' frequency must be a non-negative number"),
            });
        }
    }

    if !THROTTLE_PROFILES.contains(&pipeline.throttle.profile.as_str()) {
        errors.push(ValidationError::UnknownKey {
            kind: "throttle profile",
            key: pipeline.throttle.profile.clone(),
        });
    }
    for key in pipeline.throttle.quotas.keys() {
        if !MESSAGE_TYPE_KEYS.contains(&key.as_str()) {
            errors.push(ValidationError::UnknownKey {
                kind: "message type",
                key: key.clone(),
            });
        }
    }
    for key in pipeline.throttle.always_allowed.iter().flatten() {
        if !MESSAGE_TYPE_KEYS.contains(&key.as_str()) {
            errors.push(ValidationError::UnknownKey {
                kind: "message type",
                key: key.clone(),
            });
        }
    }

    if pipeline.coordinator.per_npc_cap == 0 {
        errors.push(ValidationError::InvalidValue {
            context: "coordinator per_npc_cap must be at least 1".to_string(),
        });
    }
    if pipeline.notifications.max_entries == 0 {
        errors.push(ValidationError::InvalidValue {
            context: "notifications max_entries must be at least 1".to_string(),
        });
    }

    errors
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !set.insert(id.to_string()) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<String>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

fn check_fraction(value: f32, context: String, errors: &mut Vec<ValidationError>) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context} must be within 0.0..=1.0 (got {value})"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: &str) -> AreaDef {
        AreaDef {
            id: id.to_string(),
            name: format!("Area {id}"),
            desc: "Test area".into(),
            sub_areas: Vec::new(),
            exits: Vec::new(),
            objects: Vec::new(),
        }
    }

    fn npc(id: &str, area: &str, gang: Option<&str>) -> NpcDef {
        NpcDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            desc: "Test npc".into(),
            area: area.to_string(),
            gang: gang.map(str::to_string),
            max_hp: 100,
            detection_chance: 0.05,
            hazard_resistance: 0.2,
        }
    }

    fn base_scenario() -> ScenarioDef {
        ScenarioDef {
            title: "Demo".into(),
            player: PlayerDef {
                name: "Player".into(),
                description: "A hacker".into(),
                start_area: "alley".into(),
                max_hp: 100,
            },
            areas: vec![area("alley")],
            gangs: vec![GangDef {
                id: "bloodhounds".into(),
                name: "Bloodhounds".into(),
                rivals: Vec::new(),
            }],
            ..ScenarioDef::default()
        }
    }

    #[test]
    fn minimal_scenario_is_valid() {
        assert!(validate_scenario(&base_scenario()).is_empty());
    }

    #[test]
    fn duplicate_npc_ids_are_reported() {
        let mut scenario = base_scenario();
        scenario.npcs = vec![npc("buck", "alley", None), npc("buck", "alley", None)];
        let errors = validate_scenario(&scenario);
        assert!(errors.contains(&ValidationError::DuplicateId {
            kind: "npc",
            id: "buck".into()
        }));
    }

    #[test]
    fn exits_must_lead_to_other_known_areas() {
        let mut scenario = base_scenario();
        scenario.areas[0].exits = vec!["alley".into(), "roof".into()];
        let errors = validate_scenario(&scenario);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::MissingReference {
            kind: "area",
            id: "roof".into(),
            context: "area 'alley' exits".into(),
        }));
        assert!(errors.iter().any(|e| e.to_string().contains("exit to itself")));
    }

    #[test]
    fn missing_gang_and_area_references_are_reported() {
        let mut scenario = base_scenario();
        scenario.npcs = vec![npc("buck", "docks", Some("vipers"))];
        let errors = validate_scenario(&scenario);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingReference { kind: "area", .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingReference { kind: "gang", .. })));
    }

    #[test]
    fn out_of_range_stealth_bonus_is_invalid() {
        let mut scenario = base_scenario();
        scenario.areas[0].objects.push(ObjectDef {
            id: "crate".into(),
            name: "Crate".into(),
            kind: ObjectKindDef::HidingSpot { stealth_bonus: 1.5 },
        });
        let errors = validate_scenario(&scenario);
        assert!(matches!(errors.as_slice(), [ValidationError::InvalidValue { .. }]));
    }

    #[test]
    fn pipeline_rejects_unknown_keys() {
        let mut pipeline = PipelineDef::default();
        pipeline.behaviors.insert("dance".into(), BehaviorDef::default());
        pipeline.throttle.quotas.insert("gossip".into(), 2);
        pipeline.throttle.profile = "lenient".into();
        let errors = validate_pipeline(&pipeline);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::UnknownKey { .. })));
    }

    #[test]
    fn default_pipeline_is_valid() {
        assert!(validate_pipeline(&PipelineDef::default()).is_empty());
    }
}
