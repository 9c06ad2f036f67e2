//! Executes a chosen behavior against the world.
//!
//! Every executor returns `None` when it finds nothing to act on; the behavior
//! step then falls back to idle text. Nothing in here is an error.

use std::collections::HashSet;

use log::{info, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use super::BehaviorType;
use super::phrases::{self, pick};
use crate::area::ObjectKind;
use crate::combat::{CombatTarget, resolve_attack};
use crate::idgen::new_id;
use crate::item::{Item, ItemAbility};
use crate::world::{Location, RootWorld};

/// Chance that a friendly NPC with the player nearby smiles instead of chatting.
const FRIENDLY_SMILE_CHANCE: f64 = 0.5;

/// Execute `kind` for `npc_id`, returning the resulting line if anything happened.
pub fn execute<R: Rng>(world: &mut RootWorld, npc_id: Uuid, kind: BehaviorType, rng: &mut R) -> Option<String> {
    let npc = world.npcs.get(&npc_id)?;
    if npc.is_hallucinating() && matches!(kind, BehaviorType::Idle | BehaviorType::Talk) {
        return Some(format!("{} {}.", npc.name, pick(phrases::HALLUCINATION, rng)));
    }
    match kind {
        BehaviorType::Idle => idle_text(world, npc_id, rng),
        BehaviorType::Talk => talk(world, npc_id, rng),
        BehaviorType::Fight => fight(world, npc_id, rng),
        BehaviorType::UseItem => use_item(world, npc_id, rng),
        BehaviorType::Gardening => garden(world, npc_id, rng),
        BehaviorType::Gift => gift(world, npc_id, rng),
        BehaviorType::Tech => tech(world, npc_id, rng),
        BehaviorType::Suspicious => Some(format!("{} {}.", npc.name, pick(phrases::SUSPICIOUS, rng))),
        BehaviorType::Craft => craft(world, npc_id, rng),
        BehaviorType::EnterSubArea => enter_sub_area(world, npc_id, rng),
        BehaviorType::ExitSubArea => exit_sub_area(world, npc_id),
    }
}

/// Idle line. Gang members who can't see a hidden player nearby say so instead.
pub fn idle_text<R: Rng>(world: &RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let npc = world.npcs.get(&npc_id)?;
    let player_hidden_here =
        world.player.hidden && matches!(npc.location, Location::Area(area) if world.player_in_area(area));
    let table = if npc.is_gang_member() && player_hidden_here {
        phrases::UNNOTICED
    } else {
        phrases::IDLE
    };
    Some(format!("{} {}.", npc.name, pick(table, rng)))
}

fn area_of(world: &RootWorld, npc_id: Uuid) -> Option<Uuid> {
    match world.npcs.get(&npc_id)?.location {
        Location::Area(area_id) => Some(area_id),
        _ => None,
    }
}

fn talk<R: Rng>(world: &RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let area_id = area_of(world, npc_id)?;
    let npc = world.npcs.get(&npc_id)?;
    if npc.is_friendly() && world.player_in_area(area_id) && rng.random_bool(FRIENDLY_SMILE_CHANCE) {
        return Some(format!("{} {}.", npc.name, pick(phrases::FRIENDLY, rng)));
    }
    let others: Vec<Uuid> = world
        .npcs_in_area(area_id)
        .into_iter()
        .filter(|id| *id != npc_id)
        .collect();
    let partner = world.npcs.get(others.choose(rng)?)?;
    Some(format!(
        "{} talks with {} about {}.",
        npc.name,
        partner.name,
        pick(phrases::TALK_TOPICS, rng)
    ))
}

fn fight<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let area_id = area_of(world, npc_id)?;
    let own_gang = world.npcs.get(&npc_id)?.gang;
    // only gang members pick fights
    let gang_name = world.gang_name(npc_id)?.to_string();

    let mut targets: Vec<CombatTarget> = world
        .npcs_in_area(area_id)
        .into_iter()
        .filter(|id| *id != npc_id)
        .filter(|id| world.npcs.get(id).is_some_and(|other| other.gang != own_gang))
        .map(CombatTarget::Npc)
        .collect();
    if world.player_in_area(area_id) && world.player.is_detected_by(&gang_name) {
        targets.push(CombatTarget::Player);
    }
    let target = *targets.choose(rng)?;

    match resolve_attack(world, npc_id, target, rng) {
        Ok(result) => Some(result.text),
        Err(e) => {
            warn!("attack by {npc_id} failed to resolve: {e}");
            None
        },
    }
}

fn use_item<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let name = world.npcs.get(&npc_id)?.name.clone();
    let held: Vec<(Uuid, String)> = world
        .npc_items(npc_id)
        .into_iter()
        .map(|item| (item.id, item.name.clone()))
        .collect();
    if let Some((_, item_name)) = held.choose(rng) {
        return Some(format!("{name} is using the {item_name}."));
    }

    // nothing in hand: grab something lying around
    let area_id = area_of(world, npc_id)?;
    let loose: Vec<(Uuid, String)> = world
        .area_items(area_id)
        .into_iter()
        .map(|item| (item.id, item.name.clone()))
        .collect();
    let (item_id, item_name) = loose.choose(rng)?.clone();
    if let Err(e) = world.move_item(item_id, Location::Npc(npc_id)) {
        warn!("{name} could not pick up {item_name}: {e}");
        return None;
    }
    Some(format!("{name} picks up the {item_name}."))
}

fn garden<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let area_id = area_of(world, npc_id)?;
    let name = world.npcs.get(&npc_id)?.name.clone();
    let seed = world
        .npc_items(npc_id)
        .into_iter()
        .find(|item| item.has_ability(ItemAbility::Seed))
        .map(|item| (item.id, item.name.clone()));

    let plots: Vec<(Uuid, String, ObjectKind)> = world
        .areas
        .get(&area_id)?
        .objects
        .iter()
        .filter(|o| o.is_soil())
        .map(|o| (o.id, o.name.clone(), o.kind.clone()))
        .collect();
    let empty: Vec<&(Uuid, String, ObjectKind)> = plots
        .iter()
        .filter(|(_, _, kind)| matches!(kind, ObjectKind::SoilPlot { planted: None, .. }))
        .collect();

    if let (Some((seed_id, seed_name)), Some((plot_id, plot_name, _))) = (seed, empty.choose(rng).copied()) {
        let plot_id = *plot_id;
        let plot_name = plot_name.clone();
        world.despawn_item(seed_id).ok()?;
        set_plot(world, area_id, plot_id, Some(seed_name.clone()), false);
        info!("{name} planted {seed_name} in {plot_name}");
        return Some(format!("{name} plants the {seed_name} in the {plot_name}."));
    }

    let (plot_id, plot_name, kind) = plots
        .iter()
        .filter(|(_, _, kind)| matches!(kind, ObjectKind::SoilPlot { planted: Some(_), .. }))
        .collect::<Vec<_>>()
        .choose(rng)
        .copied()?
        .clone();
    match kind {
        ObjectKind::SoilPlot {
            planted: Some(crop),
            watered: false,
        } => {
            set_plot(world, area_id, plot_id, Some(crop), true);
            Some(format!("{name} waters the {plot_name}."))
        },
        ObjectKind::SoilPlot {
            planted: Some(crop),
            watered: true,
        } => {
            set_plot(world, area_id, plot_id, None, false);
            Some(format!("{name} harvests the {crop} from the {plot_name}."))
        },
        _ => None,
    }
}

fn set_plot(world: &mut RootWorld, area_id: Uuid, plot_id: Uuid, planted: Option<String>, watered: bool) {
    if let Some(plot) = world.areas.get_mut(&area_id).and_then(|a| a.object_mut(plot_id)) {
        plot.kind = ObjectKind::SoilPlot { planted, watered };
    }
}

fn gift<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let area_id = area_of(world, npc_id)?;
    if !world.player_in_area(area_id) {
        return None;
    }
    let name = world.npcs.get(&npc_id)?.name.clone();
    let giftable: Vec<(Uuid, String)> = world
        .npc_items(npc_id)
        .into_iter()
        .filter(|item| item.has_ability(ItemAbility::Giftable))
        .map(|item| (item.id, item.name.clone()))
        .collect();
    let (item_id, item_name) = giftable.choose(rng)?.clone();
    world.move_item(item_id, Location::Inventory).ok()?;
    info!("{name} gave the player {item_name}");
    Some(format!("{name} gives you the {item_name}."))
}

fn tech<R: Rng>(world: &RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let area_id = area_of(world, npc_id)?;
    let name = &world.npcs.get(&npc_id)?.name;
    let area = world.areas.get(&area_id)?;
    let devices: Vec<&str> = area
        .objects
        .iter()
        .filter(|o| o.is_hackable())
        .map(|o| o.name.as_str())
        .collect();
    let gear: Vec<&str> = world
        .npc_items(npc_id)
        .into_iter()
        .filter(|item| item.is_tech())
        .map(|item| item.name.as_str())
        .collect();

    match (gear.choose(rng), devices.choose(rng)) {
        (Some(tool), Some(device)) => Some(format!("{name} is using the {tool} to probe the {device}.")),
        (Some(tool), None) => Some(format!("{name} is using the {tool} to scan for signals.")),
        (None, Some(device)) => Some(format!("{name} pokes at the {device}, trying to break in.")),
        (None, None) => None,
    }
}

fn craft<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let name = world.npcs.get(&npc_id)?.name.clone();
    let parts: Vec<(Uuid, String)> = world
        .npc_items(npc_id)
        .into_iter()
        .filter(|item| item.has_ability(ItemAbility::CraftPart))
        .map(|item| (item.id, item.name.clone()))
        .collect();
    let [(a_id, a_name), (b_id, b_name), ..] = parts.as_slice() else {
        return None;
    };
    let &(product, power) = phrases::CRAFTED.choose(rng)?;
    world.despawn_item(*a_id).ok()?;
    world.despawn_item(*b_id).ok()?;
    let crafted = Item {
        id: new_id(),
        symbol: product.replace(' ', "_"),
        name: product.to_string(),
        description: format!("Something {name} cobbled together."),
        location: Location::Nowhere,
        abilities: HashSet::from([ItemAbility::Weapon]),
        power,
    };
    world.spawn_item(crafted, Location::Npc(npc_id)).ok()?;
    info!("{name} crafted a {product}");
    Some(format!("{name} is using the {a_name} and the {b_name} to rig up a {product}."))
}

fn enter_sub_area<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let area_id = area_of(world, npc_id)?;
    let sub = world.areas.get(&area_id)?.sub_areas.choose(rng)?.clone();
    let npc = world.npcs.get_mut(&npc_id)?;
    if npc.sub_area.is_some() {
        return None;
    }
    npc.sub_area = Some(sub.clone());
    Some(format!("{} slips into the {sub}.", npc.name))
}

fn exit_sub_area(world: &mut RootWorld, npc_id: Uuid) -> Option<String> {
    let npc = world.npcs.get_mut(&npc_id)?;
    let sub = npc.sub_area.take()?;
    Some(format!("{} steps out of the {sub}.", npc.name))
}
