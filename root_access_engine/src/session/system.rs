//! Look and help.

use std::fmt::Write as _;

use anyhow::Result;

use super::movement::exit_names;
use crate::area::ObjectKind;
use crate::world::RootWorld;

/// Describe the player's surroundings: the area, who is here, and what can be used.
///
/// # Errors
/// - if the player is not in a known area
pub fn look_handler(world: &RootWorld) -> Result<Vec<String>> {
    let area = world.player_area_ref()?;
    let mut lines = vec![area.name.clone(), area.description.clone()];

    for npc_id in world.npcs_in_area(area.id) {
        let Some(npc) = world.npcs.get(&npc_id) else {
            continue;
        };
        let mut line = match world.gang_name(npc_id) {
            Some(gang) => format!("{} ({gang})", npc.name),
            None => npc.name.clone(),
        };
        if let Some(sub) = &npc.sub_area {
            let _ = write!(line, ", over in the {sub}");
        }
        let (hp, max) = (npc.health.current_hp(), npc.health.max_hp());
        if hp < max {
            let _ = write!(line, " [{hp}/{max} hp]");
        }
        if !npc.effects.is_empty() {
            let effects: Vec<String> = npc.effects.iter().map(|fx| fx.name.clone()).collect();
            let _ = write!(line, " <{}>", effects.join(", "));
        }
        lines.push(line);
    }

    for object in &area.objects {
        let note = match &object.kind {
            ObjectKind::SoilPlot { planted: Some(crop), .. } => format!("{} (growing {crop})", object.name),
            ObjectKind::SoilPlot { planted: None, .. } => format!("{} (empty soil)", object.name),
            ObjectKind::HidingSpot { .. } => format!("{} (you could hide here)", object.name),
            ObjectKind::Hazard { .. } => format!("{} (looks dangerous)", object.name),
            ObjectKind::Device { .. } => format!("{} (a device)", object.name),
            ObjectKind::Breakable { broken: true } => format!("{} (broken)", object.name),
            ObjectKind::Breakable { broken: false } => object.name.clone(),
        };
        lines.push(note);
    }
    for item in world.area_items(area.id) {
        lines.push(format!("A {} lies here.", item.name));
    }
    if !area.sub_areas.is_empty() {
        lines.push(format!("Nooks: {}", area.sub_areas.join(", ")));
    }
    let exits = exit_names(world, area.id);
    if !exits.is_empty() {
        lines.push(format!("Exits: {}", exits.join(", ")));
    }
    if world.player.hidden {
        if let Some(spot) = &world.player.hiding_spot {
            lines.push(format!("You are hiding in the {}.", spot.name));
        }
    }
    if !world.player.detected_by.is_empty() {
        let gangs: Vec<&str> = world.player.detected_by.iter().map(String::as_str).collect();
        lines.push(format!("Known to: {}", gangs.join(", ")));
    }
    Ok(lines)
}

pub fn help_text() -> String {
    [
        "Commands:",
        "  look                         describe your surroundings",
        "  go <area>                    walk to a neighboring area",
        "  wait                         let a turn pass",
        "  hide [spot] / unhide         duck into cover, or leave it",
        "  use smoke bomb | decoy       shake off gangs that have spotted you",
        "  hack <npc> <pacify|distract|scramble>",
        "  trigger <hazard>             set off a hazard in the area",
        "  notifications [n] [category] / notifications clear",
        "  behavior-settings [<behavior|all> frequency <0-100> | cooldown <turns>]",
        "  npcs on|off                  toggle NPC behaviors",
        "  quit",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Area, AreaObject};
    use crate::idgen::new_id;
    use crate::world::Location;

    #[test]
    fn look_lists_area_and_fixtures() {
        let mut world = RootWorld::new_empty();
        let area_id = new_id();
        let mut area = Area::new(area_id, "yard", "Scrap Yard", "Rusting heaps.");
        area.objects.push(AreaObject {
            id: new_id(),
            symbol: "bed".into(),
            name: "Raised Bed".into(),
            kind: ObjectKind::SoilPlot {
                planted: None,
                watered: false,
            },
        });
        let gate_id = new_id();
        area.exits.push(gate_id);
        world.areas.insert(area_id, area);
        world.areas.insert(gate_id, Area::new(gate_id, "gate", "Front Gate", "Chain link."));
        world.player.location = Location::Area(area_id);
        let lines = look_handler(&world).unwrap();
        assert_eq!(lines[0], "Scrap Yard");
        assert!(lines.contains(&"Raised Bed (empty soil)".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Exits: Front Gate"));
    }

    #[test]
    fn look_without_area_is_an_error() {
        assert!(look_handler(&RootWorld::new_empty()).is_err());
    }
}
