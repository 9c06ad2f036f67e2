//! Gang detection of the player.
//!
//! A gang member that hasn't yet spotted the player rolls against its detection
//! chance at the start of its step. Hiding cuts that chance by the spot's stealth
//! bonus and then to a tenth. A hit drags the player out of hiding, adds the
//! gang to the player's detected-by set, and rests the spotter for a few turns.

use log::info;
use rand::Rng;
use uuid::Uuid;

use crate::player::Player;
use crate::world::{Location, RootWorld};

/// Hidden players are spotted this fraction as often (after the stealth bonus).
pub const HIDDEN_DETECTION_FACTOR: f32 = 0.1;
/// Turns a spotter waits before rolling detection again.
pub const DETECTION_COOLDOWN_TURNS: u32 = 3;

/// Per-check chance that an NPC with `base_chance` spots `player`.
pub fn detection_probability(base_chance: f32, player: &Player) -> f32 {
    if player.hidden {
        base_chance * (1.0 - player.stealth_bonus()) * HIDDEN_DETECTION_FACTOR
    } else {
        base_chance
    }
}

/// One detection roll.
pub fn roll_detection<R: Rng>(probability: f32, rng: &mut R) -> bool {
    rng.random::<f32>() < probability
}

/// Run the detection sub-rule for a gang member. Returns the detection line if the
/// player was spotted, `None` if the check didn't apply or failed.
pub fn detection_step<R: Rng>(world: &mut RootWorld, npc_id: Uuid, rng: &mut R) -> Option<String> {
    let npc = world.npcs.get(&npc_id)?;
    let Location::Area(area_id) = npc.location else {
        return None;
    };
    let gang_name = world.gang_name(npc_id)?.to_string();
    if !world.player_in_area(area_id)
        || npc.detection_cooldown > 0
        || npc.is_hallucinating()
        || world.player.is_detected_by(&gang_name)
    {
        return None;
    }
    let probability = detection_probability(npc.detection_chance, &world.player);
    if !roll_detection(probability, rng) {
        return None;
    }
    Some(apply_detection(world, npc_id, &gang_name))
}

/// Mark the player as spotted by `npc_id`'s gang.
pub fn apply_detection(world: &mut RootWorld, npc_id: Uuid, gang_name: &str) -> String {
    let spot = world.player.unhide();
    world.player.mark_detected(gang_name);
    let name = match world.npcs.get_mut(&npc_id) {
        Some(npc) => {
            npc.detection_cooldown = DETECTION_COOLDOWN_TURNS;
            npc.name.clone()
        },
        None => "Someone".to_string(),
    };
    info!("{name} ({gang_name}) detected the player");
    match spot {
        Some(spot) => format!("{name} of the {gang_name} spots you hiding in the {}!", spot.name),
        None => format!("{name} of the {gang_name} spots you!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::HidingSpot;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn hidden_probability_applies_stealth_and_factor() {
        let mut player = Player::default();
        assert!((detection_probability(0.05, &player) - 0.05).abs() < 1e-7);
        player.hide(HidingSpot {
            name: "Dumpster".into(),
            stealth_bonus: 0.5,
        });
        assert!((detection_probability(0.05, &player) - 0.0025).abs() < 1e-7);
    }

    #[test]
    fn hidden_detection_rate_matches_expectation() {
        let mut player = Player::default();
        player.hide(HidingSpot {
            name: "Dumpster".into(),
            stealth_bonus: 0.5,
        });
        let p = detection_probability(0.05, &player);
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 100_000;
        let hits = (0..trials).filter(|_| roll_detection(p, &mut rng)).count();
        // expected 250, standard deviation ~15.8
        assert!((180..=320).contains(&hits), "detected {hits} times in {trials}");
    }
}
