//! Hazard resolver.
//!
//! When the player sets off a hazard, every live gang member in the area rolls
//! against its hazard resistance. Those who fail pick up the hazard's effect.
//! The lines produced here are pushed through the message pipeline like any NPC line.

use anyhow::{Context, Result, bail};
use log::info;
use rand::Rng;
use uuid::Uuid;

use crate::area::ObjectKind;
use crate::behavior::phrases::{self, pick};
use crate::effect::{Effect, EffectKind};
use crate::message::MessageSource;
use crate::world::RootWorld;

/// One line of hazard output and who it is about.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardLine {
    pub text: String,
    pub source: MessageSource,
}

/// Reaction line for an NPC that just picked up `effect`.
pub fn reaction_text<R: Rng>(name: &str, effect: &EffectKind, hazard: &str, rng: &mut R) -> String {
    match effect {
        EffectKind::Hallucination => format!("{name} {}.", pick(phrases::HALLUCINATION, rng)),
        EffectKind::Confusion => format!("{name} is confused by the {hazard}."),
        EffectKind::Friendliness => format!("{name} smiles at you warmly."),
        EffectKind::GiftGiving => format!("{name} looks ready to hand out a gift."),
        EffectKind::FallingObjects => format!("{name} is struck by falling debris."),
        EffectKind::Other(what) => format!("{name} is affected by {what}."),
    }
}

/// Trigger the hazard `hazard_id` in `area_id` on the player's behalf.
///
/// # Errors
/// - if the area is unknown, or the object is missing or not a hazard
pub fn apply_hazard<R: Rng>(
    world: &mut RootWorld,
    area_id: Uuid,
    hazard_id: Uuid,
    rng: &mut R,
) -> Result<Vec<HazardLine>> {
    let area = world
        .areas
        .get(&area_id)
        .with_context(|| format!("hazard in unknown area {area_id}"))?;
    let hazard = area
        .objects
        .iter()
        .find(|o| o.id == hazard_id)
        .with_context(|| format!("no object {hazard_id} in '{}'", area.name))?;
    let ObjectKind::Hazard { effect, duration } = &hazard.kind else {
        bail!("'{}' is not a hazard", hazard.name);
    };
    let (hazard_name, effect, duration) = (hazard.name.clone(), effect.clone(), *duration);

    let mut lines = vec![HazardLine {
        text: format!("{} triggers the {hazard_name}!", world.player.name),
        source: MessageSource::player(&world.player.name),
    }];
    info!("player triggered hazard '{hazard_name}' ({effect})");

    let members: Vec<Uuid> = world
        .npcs_in_area(area_id)
        .into_iter()
        .filter(|id| world.npcs.get(id).is_some_and(|npc| npc.is_gang_member()))
        .collect();
    for npc_id in members {
        let faction = world.gang_name(npc_id).map(String::from);
        let Some(npc) = world.npcs.get_mut(&npc_id) else {
            continue;
        };
        let source = MessageSource::npc(&npc.name, faction.as_deref());
        let text = if rng.random::<f32>() < npc.hazard_resistance {
            format!("{} resists the {hazard_name} effect!", npc.name)
        } else {
            npc.effects.add(Effect::new(effect.clone(), duration));
            reaction_text(&npc.name, &effect, &hazard_name, rng)
        };
        lines.push(HazardLine { text, source });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Area, AreaObject};
    use crate::gang::Gang;
    use crate::idgen::new_id;
    use crate::npc::Npc;
    use crate::world::Location;
    use rand::{SeedableRng, rngs::StdRng};

    fn hazard_world(resistance: f32) -> (RootWorld, Uuid, Uuid, Uuid) {
        let mut world = RootWorld::new_empty();
        world.player.name = "Neo".into();
        let area_id = new_id();
        let hazard_id = new_id();
        let mut area = Area::new(area_id, "lab", "Back Lab", "Humming machines.");
        area.objects.push(AreaObject {
            id: hazard_id,
            symbol: "vent".into(),
            name: "Gas Vent".into(),
            kind: ObjectKind::Hazard {
                effect: EffectKind::Hallucination,
                duration: 5,
            },
        });
        world.areas.insert(area_id, area);
        world.player.location = Location::Area(area_id);

        let gang_id = new_id();
        world.gangs.insert(gang_id, Gang::new(gang_id, "hounds", "Bloodhounds"));
        let npc_id = new_id();
        let mut npc = Npc::new(npc_id, "buck", "Buck", "A bruiser.", 100);
        npc.hazard_resistance = resistance;
        npc.location = Location::Area(area_id);
        world.npcs.insert(npc_id, npc);
        if let Some(area) = world.areas.get_mut(&area_id) {
            area.npcs.insert(npc_id);
        }
        world.enlist(npc_id, gang_id).unwrap();
        (world, area_id, hazard_id, npc_id)
    }

    #[test]
    fn unresisted_hazard_applies_effect() {
        let (mut world, area_id, hazard_id, npc_id) = hazard_world(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let lines = apply_hazard(&mut world, area_id, hazard_id, &mut rng).unwrap();
        assert_eq!(lines[0].text, "Neo triggers the Gas Vent!");
        assert!(lines[0].source.is_player);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].source.faction.as_deref(), Some("Bloodhounds"));
        assert!(world.npcs[&npc_id].is_hallucinating());
    }

    #[test]
    fn full_resistance_always_resists() {
        let (mut world, area_id, hazard_id, npc_id) = hazard_world(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let lines = apply_hazard(&mut world, area_id, hazard_id, &mut rng).unwrap();
        assert_eq!(lines[1].text, "Buck resists the Gas Vent effect!");
        assert!(!world.npcs[&npc_id].is_hallucinating());
    }

    #[test]
    fn non_hazard_object_is_an_error() {
        let (mut world, area_id, _, _) = hazard_world(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(apply_hazard(&mut world, area_id, new_id(), &mut rng).is_err());
    }
}
