//! Hacking NPCs and setting off hazards.

use log::info;
use rand::Rng;

use crate::behavior::BehaviorType;
use crate::command::CommandError;
use crate::hazard::apply_hazard;
use crate::message::MessagePipeline;
use crate::world::RootWorld;

/// Turns a hack overrides an NPC's behavior.
pub const HACK_DURATION: u32 = 3;

/// Forced behavior for each hack type.
pub fn hack_behavior(hack: &str) -> Option<BehaviorType> {
    match hack {
        "pacify" => Some(BehaviorType::Idle),
        "distract" => Some(BehaviorType::Talk),
        "scramble" => Some(BehaviorType::UseItem),
        _ => None,
    }
}

/// `hack <npc> <pacify|distract|scramble>`. Needs tech gear in the player's inventory.
pub fn hack_handler(world: &mut RootWorld, npc: &str, hack: &str) -> Result<String, CommandError> {
    let kind = hack_behavior(hack).ok_or_else(|| CommandError::UnknownHack(hack.to_string()))?;
    let area_id = world.player_area_id()?;
    let npc_id = world
        .find_npc_in_area(area_id, npc)
        .ok_or_else(|| CommandError::NoSuchNpc(npc.to_string()))?;
    let has_gear = world
        .player
        .inventory
        .iter()
        .filter_map(|id| world.items.get(id))
        .any(crate::item::Item::is_tech);
    if !has_gear {
        return Err(CommandError::MissingItem("anything to hack with".to_string()));
    }

    let Some(target) = world.npcs.get_mut(&npc_id) else {
        return Err(CommandError::NoSuchNpc(npc.to_string()));
    };
    target.install_override(kind, HACK_DURATION);
    info!("player hacked {} ({hack}) for {HACK_DURATION} turns", target.name);
    let name = &target.name;
    Ok(match kind {
        BehaviorType::Idle => format!("You pacify {name}. Their shoulders drop."),
        BehaviorType::Talk => format!("You distract {name} with a buzz in their earpiece."),
        _ => format!("You scramble {name}'s implant. They start fumbling through their pockets."),
    })
}

/// `trigger <hazard>`: resolve the hazard and push every resulting line into the pipeline.
pub fn trigger_handler<R: Rng>(
    world: &mut RootWorld,
    pipeline: &mut MessagePipeline,
    hazard: &str,
    rng: &mut R,
) -> Result<(), CommandError> {
    let query = hazard.trim_start_matches("the ").trim();
    let area = world.player_area_ref()?;
    let (area_id, hazard_id) = area
        .find_hazard(query)
        .map(|o| (area.id, o.id))
        .ok_or_else(|| CommandError::NoSuchHazard(query.to_string()))?;
    for line in apply_hazard(world, area_id, hazard_id, rng)? {
        pipeline.submit(&line.text, Some(&line.source));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::idgen::new_id;
    use crate::item::{Item, ItemAbility};
    use crate::npc::Npc;
    use crate::world::Location;
    use std::collections::HashSet;

    fn world_with_npc(with_gear: bool) -> (RootWorld, uuid::Uuid) {
        let mut world = RootWorld::new_empty();
        let area_id = new_id();
        world.areas.insert(area_id, Area::new(area_id, "lab", "Back Lab", "Humming."));
        world.player.location = Location::Area(area_id);
        let npc_id = new_id();
        let mut npc = Npc::new(npc_id, "buck", "Buck", "A bruiser.", 100);
        npc.location = Location::Area(area_id);
        npc.designation = Some(BehaviorType::Fight);
        world.npcs.insert(npc_id, npc);
        if let Some(area) = world.areas.get_mut(&area_id) {
            area.npcs.insert(npc_id);
        }
        if with_gear {
            let jammer = Item {
                id: new_id(),
                symbol: "jammer".into(),
                name: "Signal Jammer".into(),
                description: String::new(),
                location: Location::Nowhere,
                abilities: HashSet::from([ItemAbility::Electronic]),
                power: 0,
            };
            world.spawn_item(jammer, Location::Inventory).unwrap();
        }
        (world, npc_id)
    }

    #[test]
    fn unknown_hack_type_changes_nothing() {
        let (mut world, npc_id) = world_with_npc(true);
        let err = hack_handler(&mut world, "buck", "tickle").unwrap_err();
        assert_eq!(err.to_string(), "Unknown hack type: tickle. Try pacify, distract, or scramble.");
        assert!(world.npcs[&npc_id].behavior_override.is_none());
    }

    #[test]
    fn pacify_forces_idle_for_three_turns_then_restores() {
        let (mut world, npc_id) = world_with_npc(true);
        hack_handler(&mut world, "buck", "pacify").unwrap();
        let npc = world.npcs.get_mut(&npc_id).unwrap();
        for _ in 0..HACK_DURATION {
            assert_eq!(npc.tick_override(), Some(BehaviorType::Idle));
        }
        assert_eq!(npc.tick_override(), None);
        assert_eq!(npc.designation, Some(BehaviorType::Fight));
        assert!(npc.behavior_override.is_none());
    }

    #[test]
    fn hacking_needs_gear() {
        let (mut world, _) = world_with_npc(false);
        assert!(matches!(
            hack_handler(&mut world, "buck", "distract"),
            Err(CommandError::MissingItem(_))
        ));
    }
}
