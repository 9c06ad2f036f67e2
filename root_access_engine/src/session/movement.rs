//! Moving the player between areas.

use anyhow::Context;
use log::info;
use uuid::Uuid;

use crate::command::CommandError;
use crate::world::{Location, RootWorld};

/// Names of the areas reachable from `area_id`, in scenario order.
pub fn exit_names(world: &RootWorld, area_id: Uuid) -> Vec<&str> {
    world
        .areas
        .get(&area_id)
        .map(|area| {
            area.exits
                .iter()
                .filter_map(|id| world.areas.get(id))
                .map(|dest| dest.name.as_str())
                .collect()
        })
        .unwrap_or_default()
}

/// `go <area>`: walk through an exit of the current area. Leaving also means leaving cover.
pub fn move_to_handler(world: &mut RootWorld, query: &str) -> Result<Vec<String>, CommandError> {
    let query = query.trim_start_matches("the ").trim();
    let here = world.player_area_ref()?;
    let leaving = here.name.clone();
    let dest_id = here
        .exits
        .iter()
        .copied()
        .find(|id| world.areas.get(id).is_some_and(|dest| dest.matches_name(query)))
        .ok_or_else(|| CommandError::NoSuchExit(query.to_string()))?;

    let mut lines = Vec::new();
    if let Some(spot) = world.player.unhide() {
        lines.push(format!("You slip out of the {}.", spot.name));
    }
    world.player.location = Location::Area(dest_id);

    let dest = world
        .areas
        .get(&dest_id)
        .with_context(|| format!("moving player to unknown area {dest_id}"))?;
    info!("{} moved from {leaving} to {} ({dest_id})", world.player.name, dest.name);
    lines.push(format!("You head to the {}.", dest.name));
    lines.push(dest.description.clone());

    let present: Vec<&str> = world
        .npcs_in_area(dest_id)
        .into_iter()
        .filter_map(|id| world.npcs.get(&id))
        .map(|npc| npc.name.as_str())
        .collect();
    if !present.is_empty() {
        lines.push(format!("Here: {}", present.join(", ")));
    }
    let exits = exit_names(world, dest_id);
    if !exits.is_empty() {
        lines.push(format!("Exits: {}", exits.join(", ")));
    }
    Ok(lines)
}
