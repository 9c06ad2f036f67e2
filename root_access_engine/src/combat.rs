//! Combat resolution.
//!
//! The behavior pipeline treats this as a black box: it hands over an attacker and
//! a target and gets back a success flag plus the line to show. Defeats go through
//! `RootWorld::damage_npc`, which drops the loser from its gang in the same call.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::health::LifeState;
use crate::world::RootWorld;

/// Damage range for a fighter with no weapon.
pub const UNARMED_DAMAGE: RangeInclusive<u32> = 3..=8;

/// Who is on the receiving end of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatTarget {
    Npc(Uuid),
    Player,
}

/// Outcome of one attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatResult {
    pub success: bool,
    pub damage: u32,
    pub defeated: bool,
    pub text: String,
}

/// Roll damage: uniform in `[power/2, power]` with a weapon, `[3, 8]` without.
pub fn roll_damage<R: Rng>(weapon_power: Option<u32>, rng: &mut R) -> u32 {
    match weapon_power {
        Some(power) => rng.random_range(power / 2..=power),
        None => rng.random_range(UNARMED_DAMAGE),
    }
}

/// The strongest weapon an NPC is carrying, as (name, power).
pub fn best_weapon(world: &RootWorld, npc_id: Uuid) -> Option<(String, u32)> {
    world
        .npc_items(npc_id)
        .into_iter()
        .filter(|item| item.is_weapon())
        .max_by_key(|item| item.power)
        .map(|item| (item.name.clone(), item.power))
}

/// Resolve one attack by an NPC.
///
/// # Errors
/// - if the attacker or an NPC target is unknown
pub fn resolve_attack<R: Rng>(
    world: &mut RootWorld,
    attacker_id: Uuid,
    target: CombatTarget,
    rng: &mut R,
) -> Result<CombatResult> {
    let attacker = world
        .npcs
        .get(&attacker_id)
        .map(|npc| npc.name.clone())
        .with_context(|| format!("attack by unknown npc {attacker_id}"))?;
    let weapon = best_weapon(world, attacker_id);
    let damage = roll_damage(weapon.as_ref().map(|(_, power)| *power), rng);
    let with = match &weapon {
        Some((name, _)) => format!("with the {name}"),
        None => "bare-handed".to_string(),
    };

    match target {
        CombatTarget::Npc(target_id) => {
            let target_name = world
                .npcs
                .get(&target_id)
                .map(|npc| npc.name.clone())
                .with_context(|| format!("attack on unknown npc {target_id}"))?;
            let state = world.damage_npc(target_id, damage)?;
            let defeated = state == LifeState::Dead;
            let text = if defeated {
                format!("{attacker} attacks {target_name} {with}. {target_name} has been defeated!")
            } else {
                format!("{attacker} attacks {target_name} {with}, dealing {damage} damage.")
            };
            info!("{attacker} hit {target_name} for {damage} ({state:?})");
            Ok(CombatResult {
                success: true,
                damage,
                defeated,
                text,
            })
        },
        CombatTarget::Player => {
            let state = world.player.health.damage(damage);
            let defeated = state == LifeState::Dead;
            let text = if defeated {
                format!("{attacker} attacks you {with}, dealing {damage} damage. You collapse!")
            } else {
                format!("{attacker} attacks you {with}, dealing {damage} damage.")
            };
            if defeated {
                warn!("player knocked out by {attacker}");
            }
            Ok(CombatResult {
                success: true,
                damage,
                defeated,
                text,
            })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn armed_damage_stays_within_half_to_full_power() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let dmg = roll_damage(Some(12), &mut rng);
            assert!((6..=12).contains(&dmg));
        }
    }

    #[test]
    fn unarmed_damage_stays_within_three_to_eight() {
        let mut rng = StdRng::seed_from_u64(42);
        let rolls: Vec<u32> = (0..1_000).map(|_| roll_damage(None, &mut rng)).collect();
        assert!(rolls.iter().all(|d| UNARMED_DAMAGE.contains(d)));
        assert!(rolls.contains(&3) && rolls.contains(&8));
    }
}
