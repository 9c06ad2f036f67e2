//! Hiding and escape items.

use log::info;
use uuid::Uuid;

use crate::command::CommandError;
use crate::item::ItemAbility;
use crate::player::HidingSpot;
use crate::world::RootWorld;

/// `hide [spot]`: duck into a named spot, or the first one in the area.
pub fn hide_handler(world: &mut RootWorld, spot: Option<&str>) -> Result<String, CommandError> {
    let query = spot.map(|s| s.trim_start_matches("the ").trim());
    let area = world.player_area_ref()?;
    let (name, stealth_bonus) = area
        .find_hiding_spot(query)
        .and_then(|o| o.stealth_bonus().map(|bonus| (o.name.clone(), bonus)))
        .ok_or_else(|| CommandError::NoSuchHidingSpot(query.unwrap_or("anywhere").to_string()))?;
    world.player.hide(HidingSpot {
        name: name.clone(),
        stealth_bonus,
    });
    Ok(format!("You hide in the {name}."))
}

pub fn unhide_handler(world: &mut RootWorld) -> String {
    match world.player.unhide() {
        Some(spot) => format!("You step out of the {}.", spot.name),
        None => "You aren't hiding.".to_string(),
    }
}

/// The first inventory item with `ability`, as (id, name).
fn held_with(world: &RootWorld, ability: ItemAbility) -> Option<(Uuid, String)> {
    let mut held: Vec<(Uuid, String)> = world
        .player
        .inventory
        .iter()
        .filter_map(|id| world.items.get(id))
        .filter(|item| item.has_ability(ability))
        .map(|item| (item.id, item.name.clone()))
        .collect();
    held.sort_by(|a, b| a.1.cmp(&b.1));
    held.into_iter().next()
}

/// `use smoke bomb` / `use decoy`: escape items that break gang detection.
///
/// A smoke bomb shakes off every gang; a decoy only those with members in the area.
pub fn use_item_handler(world: &mut RootWorld, item: &str) -> Result<String, CommandError> {
    let ability = match item.trim() {
        "smoke bomb" | "smoke" | "bomb" => ItemAbility::SmokeBomb,
        "decoy" => ItemAbility::Decoy,
        other => return Err(CommandError::MissingItem(format!("a way to use '{other}' here"))),
    };
    let (item_id, item_name) =
        held_with(world, ability).ok_or_else(|| CommandError::MissingItem(format!("a {ability}")))?;

    let cleared = match ability {
        ItemAbility::SmokeBomb => world.player.break_detection(None),
        _ => {
            let area_id = world.player_area_id()?;
            let mut gangs: Vec<String> = world
                .npcs_in_area(area_id)
                .into_iter()
                .filter_map(|id| world.gang_name(id).map(String::from))
                .collect();
            gangs.sort();
            gangs.dedup();
            gangs
                .iter()
                .flat_map(|gang| world.player.break_detection(Some(gang)))
                .collect()
        },
    };
    world.despawn_item(item_id)?;
    info!("player used {item_name}; cleared detection by {cleared:?}");

    let opener = if ability == ItemAbility::SmokeBomb {
        format!("You deploy the {item_name}, creating a smoke screen!")
    } else {
        format!("You deploy the {item_name}, creating a holographic decoy!")
    };
    Ok(match cleared.as_slice() {
        [] => format!("{opener} Nobody was looking for you anyway."),
        gangs => format!("{opener} The {} lose track of you.", gangs.join(" and the ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Area, AreaObject, ObjectKind};
    use crate::idgen::new_id;
    use crate::item::Item;
    use crate::world::Location;
    use std::collections::HashSet;

    fn world_with_spot() -> RootWorld {
        let mut world = RootWorld::new_empty();
        let area_id = new_id();
        let mut area = Area::new(area_id, "alley", "Back Alley", "Wet and narrow.");
        area.objects.push(AreaObject {
            id: new_id(),
            symbol: "dumpster".into(),
            name: "Dumpster".into(),
            kind: ObjectKind::HidingSpot { stealth_bonus: 0.5 },
        });
        world.areas.insert(area_id, area);
        world.player.location = Location::Area(area_id);
        world
    }

    fn give_player(world: &mut RootWorld, name: &str, ability: ItemAbility) {
        let item = Item {
            id: new_id(),
            symbol: name.to_lowercase(),
            name: name.into(),
            description: String::new(),
            location: Location::Nowhere,
            abilities: HashSet::from([ability]),
            power: 0,
        };
        world.spawn_item(item, Location::Inventory).unwrap();
    }

    #[test]
    fn hide_and_unhide() {
        let mut world = world_with_spot();
        assert_eq!(hide_handler(&mut world, Some("the dumpster")).unwrap(), "You hide in the Dumpster.");
        assert!(world.player.hidden);
        assert!((world.player.stealth_bonus() - 0.5).abs() < f32::EPSILON);
        assert_eq!(unhide_handler(&mut world), "You step out of the Dumpster.");
        assert_eq!(unhide_handler(&mut world), "You aren't hiding.");
    }

    #[test]
    fn hiding_in_missing_spot_fails_without_change() {
        let mut world = world_with_spot();
        assert!(matches!(
            hide_handler(&mut world, Some("fridge")),
            Err(CommandError::NoSuchHidingSpot(_))
        ));
        assert!(!world.player.hidden);
    }

    #[test]
    fn smoke_bomb_clears_all_detection_and_is_consumed() {
        let mut world = world_with_spot();
        give_player(&mut world, "Smoke Bomb", ItemAbility::SmokeBomb);
        world.player.mark_detected("Bloodhounds");
        world.player.mark_detected("Vipers");
        let line = use_item_handler(&mut world, "smoke bomb").unwrap();
        assert!(line.contains("The Bloodhounds and the Vipers lose track of you."));
        assert!(world.player.detected_by.is_empty());
        assert!(world.player.inventory.is_empty());
        assert!(matches!(
            use_item_handler(&mut world, "smoke bomb"),
            Err(CommandError::MissingItem(_))
        ));
    }
}
