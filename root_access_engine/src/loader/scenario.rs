//! Scenario loader: `ScenarioDef` (TOML) into a populated `RootWorld`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use root_access_data::{LocationRef, ObjectKindDef, ScenarioDef, validate_scenario};
use uuid::Uuid;

use crate::area::{Area, AreaObject, ObjectKind};
use crate::effect::EffectKind;
use crate::gang::Gang;
use crate::health::HealthState;
use crate::idgen::{NAMESPACE_AREA, NAMESPACE_CHARACTER, NAMESPACE_GANG, NAMESPACE_ITEM, NAMESPACE_OBJECT, uuid_from_token};
use crate::item::Item;
use crate::npc::Npc;
use crate::world::{Location, RootWorld};

/// Load, validate and build a world from a scenario file.
///
/// # Errors
/// - if the file cannot be read or parsed
/// - if the scenario fails validation (all problems are reported together)
pub fn load_scenario(toml_path: &Path) -> Result<RootWorld> {
    let text = fs::read_to_string(toml_path)
        .with_context(|| format!("reading scenario from '{}'", toml_path.display()))?;
    let def: ScenarioDef =
        toml::from_str(&text).with_context(|| format!("parsing scenario '{}'", toml_path.display()))?;
    let world = build_world(&def).with_context(|| format!("building world from '{}'", toml_path.display()))?;
    info!(
        "scenario \"{}\" loaded: {} areas, {} gangs, {} NPCs, {} items",
        world.title,
        world.areas.len(),
        world.gangs.len(),
        world.npcs.len(),
        world.items.len()
    );
    Ok(world)
}

/// Validate a scenario definition and build the world it describes.
///
/// # Errors
/// - if validation finds any problem, or a reference cannot be resolved while placing
pub fn build_world(def: &ScenarioDef) -> Result<RootWorld> {
    let errors = validate_scenario(def);
    if !errors.is_empty() {
        let details = errors
            .into_iter()
            .map(|err| format!("- {err}"))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("scenario validation failed:\n{details}");
    }

    let mut world = RootWorld::new_empty();
    world.title.clone_from(&def.title);
    world.intro.clone_from(&def.intro);

    for area_def in &def.areas {
        let id = uuid_from_token(&NAMESPACE_AREA, &area_def.id);
        let mut area = Area::new(id, &area_def.id, &area_def.name, &area_def.desc);
        area.sub_areas.clone_from(&area_def.sub_areas);
        area.exits = area_def
            .exits
            .iter()
            .map(|exit| uuid_from_token(&NAMESPACE_AREA, exit))
            .collect();
        area.objects = area_def
            .objects
            .iter()
            .map(|obj| AreaObject {
                id: uuid_from_token(&NAMESPACE_OBJECT, &format!("{}/{}", area_def.id, obj.id)),
                symbol: obj.id.clone(),
                name: obj.name.clone(),
                kind: object_kind(&obj.kind),
            })
            .collect();
        world.areas.insert(id, area);
    }

    let gang_ids: HashMap<&str, Uuid> = def
        .gangs
        .iter()
        .map(|g| (g.id.as_str(), uuid_from_token(&NAMESPACE_GANG, &g.id)))
        .collect();
    for gang_def in &def.gangs {
        let id = gang_ids[gang_def.id.as_str()];
        let mut gang = Gang::new(id, &gang_def.id, &gang_def.name);
        gang.rivals = gang_def
            .rivals
            .iter()
            .filter_map(|rival| gang_ids.get(rival.as_str()).copied())
            .collect();
        world.gangs.insert(id, gang);
    }

    for npc_def in &def.npcs {
        let id = uuid_from_token(&NAMESPACE_CHARACTER, &npc_def.id);
        let area_id = uuid_from_token(&NAMESPACE_AREA, &npc_def.area);
        let mut npc = Npc::new(id, &npc_def.id, &npc_def.name, &npc_def.desc, npc_def.max_hp);
        npc.location = Location::Area(area_id);
        npc.detection_chance = npc_def.detection_chance;
        npc.hazard_resistance = npc_def.hazard_resistance;
        world.npcs.insert(id, npc);
        world
            .areas
            .get_mut(&area_id)
            .with_context(|| format!("placing npc '{}' in unknown area '{}'", npc_def.id, npc_def.area))?
            .npcs
            .insert(id);
        if let Some(gang) = &npc_def.gang {
            world.enlist(id, uuid_from_token(&NAMESPACE_GANG, gang))?;
        }
    }

    let player = &def.player;
    world.player.id = uuid_from_token(&NAMESPACE_CHARACTER, "player");
    world.player.name.clone_from(&player.name);
    world.player.description.clone_from(&player.description);
    world.player.health = HealthState::new_at_max(player.max_hp);
    world.player.location = Location::Area(uuid_from_token(&NAMESPACE_AREA, &player.start_area));
    world.player.home = world.player.location;

    for item_def in &def.items {
        let item = Item {
            id: uuid_from_token(&NAMESPACE_ITEM, &item_def.id),
            symbol: item_def.id.clone(),
            name: item_def.name.clone(),
            description: item_def.desc.clone(),
            location: Location::Nowhere,
            abilities: item_def.abilities.iter().map(|&a| a.into()).collect(),
            power: item_def.power,
        };
        let location = match &item_def.location {
            LocationRef::Inventory => Location::Inventory,
            LocationRef::Nowhere => Location::Nowhere,
            LocationRef::Area(area) => Location::Area(uuid_from_token(&NAMESPACE_AREA, area)),
            LocationRef::Npc(npc) => Location::Npc(uuid_from_token(&NAMESPACE_CHARACTER, npc)),
        };
        world
            .spawn_item(item, location)
            .with_context(|| format!("placing item '{}'", item_def.id))?;
    }

    Ok(world)
}

fn object_kind(def: &ObjectKindDef) -> ObjectKind {
    match def {
        ObjectKindDef::SoilPlot => ObjectKind::SoilPlot {
            planted: None,
            watered: false,
        },
        ObjectKindDef::Device { hackable } => ObjectKind::Device { hackable: *hackable },
        ObjectKindDef::HidingSpot { stealth_bonus } => ObjectKind::HidingSpot {
            stealth_bonus: *stealth_bonus,
        },
        ObjectKindDef::Breakable => ObjectKind::Breakable { broken: false },
        ObjectKindDef::Hazard { effect, duration } => {
            let effect = EffectKind::from(*effect);
            let duration = duration.unwrap_or_else(|| effect.default_duration());
            ObjectKind::Hazard { effect, duration }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemAbility;
    use root_access_data::{AreaDef, EffectKindDef, GangDef, ItemAbilityDef, ItemDef, NpcDef, ObjectDef, PlayerDef};

    fn scenario() -> ScenarioDef {
        ScenarioDef {
            title: "Test Grid".into(),
            intro: "Lights flicker.".into(),
            player: PlayerDef {
                name: "Ghost".into(),
                description: "A hacker".into(),
                start_area: "alley".into(),
                max_hp: 80,
            },
            areas: vec![AreaDef {
                id: "alley".into(),
                name: "Back Alley".into(),
                desc: "Wet and narrow.".into(),
                sub_areas: vec!["doorway".into()],
                exits: Vec::new(),
                objects: vec![ObjectDef {
                    id: "vent".into(),
                    name: "Leaky Vent".into(),
                    kind: ObjectKindDef::Hazard {
                        effect: EffectKindDef::Hallucination,
                        duration: None,
                    },
                }],
            }],
            gangs: vec![
                GangDef {
                    id: "hounds".into(),
                    name: "Bloodhounds".into(),
                    rivals: vec!["vipers".into()],
                },
                GangDef {
                    id: "vipers".into(),
                    name: "Vipers".into(),
                    rivals: vec!["hounds".into()],
                },
            ],
            npcs: vec![NpcDef {
                id: "buck".into(),
                name: "Buck".into(),
                desc: "A wiry lookout.".into(),
                area: "alley".into(),
                gang: Some("hounds".into()),
                max_hp: 100,
                detection_chance: 0.5,
                hazard_resistance: 0.0,
            }],
            items: vec![ItemDef {
                id: "jammer".into(),
                name: "Signal Jammer".into(),
                desc: "Buzzes.".into(),
                location: LocationRef::Inventory,
                abilities: vec![ItemAbilityDef::Electronic],
                power: 0,
            }],
        }
    }

    #[test]
    fn builds_and_links_everything() {
        let world = build_world(&scenario()).unwrap();
        let alley = uuid_from_token(&NAMESPACE_AREA, "alley");
        let buck = uuid_from_token(&NAMESPACE_CHARACTER, "buck");
        assert_eq!(world.player.location, Location::Area(alley));
        assert_eq!(world.npcs_in_area(alley), vec![buck]);
        assert_eq!(world.gang_name(buck), Some("Bloodhounds"));
        assert!((world.npcs[&buck].detection_chance - 0.5).abs() < f32::EPSILON);

        let hounds = uuid_from_token(&NAMESPACE_GANG, "hounds");
        assert!(world.gangs[&hounds].is_rival(uuid_from_token(&NAMESPACE_GANG, "vipers")));

        let jammer = uuid_from_token(&NAMESPACE_ITEM, "jammer");
        assert!(world.player.inventory.contains(&jammer));
        assert!(world.items[&jammer].has_ability(ItemAbility::Electronic));

        let vent = &world.areas[&alley].objects[0];
        assert_eq!(
            vent.kind,
            ObjectKind::Hazard {
                effect: EffectKind::Hallucination,
                duration: 5
            }
        );
    }

    #[test]
    fn invalid_scenario_reports_all_problems() {
        let mut def = scenario();
        def.player.start_area = "rooftop".into();
        def.npcs[0].gang = Some("sharks".into());
        let err = build_world(&def).unwrap_err().to_string();
        assert!(err.contains("rooftop"));
        assert!(err.contains("sharks"));
    }
}
