//! Weight vector construction and sampling for a single behavior step.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use uuid::Uuid;

use super::{BehaviorSettings, BehaviorType};
use crate::item::ItemAbility;
use crate::npc::Npc;
use crate::world::{Location, RootWorld};

/// Penalty applied per recent repetition of a behavior.
pub const RECENCY_PENALTY: f32 = 0.7;
/// Fraction of every other behavior's weight moved onto an opportunistic behavior.
pub const OPPORTUNITY_SHARE: f32 = 0.3;

/// Everything about an NPC's situation that shapes its weights this turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    pub gang_member: bool,
    /// The player is here and this NPC's gang already knows about them.
    pub player_detected: bool,
    pub combat_suppressed: bool,
    pub hallucinating: bool,
    pub friendly: bool,
    pub generous: bool,
    pub can_enter_sub_area: bool,
    pub can_exit_sub_area: bool,
    pub opportunities: Opportunities,
}

/// Environmental openings that pull weight toward a specific behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Opportunities {
    /// Soil in the area and a seed in hand.
    pub gardening: bool,
    /// A weapon in hand and a live rival in reach.
    pub fight: bool,
    /// Electronic or hackable gear in hand.
    pub tech: bool,
}

impl SelectionContext {
    /// Survey the NPC's surroundings. Returns `None` if the NPC is unknown or not in an area.
    pub fn gather<R: Rng>(world: &RootWorld, npc_id: Uuid, rng: &mut R) -> Option<SelectionContext> {
        let npc = world.npcs.get(&npc_id)?;
        let Location::Area(area_id) = npc.location else {
            return None;
        };
        let area = world.areas.get(&area_id)?;
        let held = world.npc_items(npc_id);
        let gang = world.gang_of(npc_id);

        let player_detected =
            world.player_in_area(area_id) && gang.is_some_and(|g| world.player.is_detected_by(&g.name));

        let rival_present = gang.is_some_and(|g| {
            world.npcs_in_area(area_id).iter().any(|other| {
                world
                    .npcs
                    .get(other)
                    .and_then(|o| o.gang)
                    .is_some_and(|other_gang| g.is_rival(other_gang))
            })
        });

        Some(SelectionContext {
            gang_member: npc.is_gang_member(),
            player_detected,
            combat_suppressed: npc.effects.suppresses_combat(rng),
            hallucinating: npc.is_hallucinating(),
            friendly: npc.is_friendly(),
            generous: npc.is_generous(),
            can_enter_sub_area: npc.sub_area.is_none() && !area.sub_areas.is_empty(),
            can_exit_sub_area: npc.sub_area.is_some(),
            opportunities: Opportunities {
                gardening: area.has_soil() && held.iter().any(|i| i.has_ability(ItemAbility::Seed)),
                fight: rival_present && held.iter().any(|i| i.is_weapon()),
                tech: held.iter().any(|i| i.is_tech()),
            },
        })
    }

    fn eligible(&self, kind: BehaviorType) -> bool {
        match kind {
            BehaviorType::Fight => !self.combat_suppressed,
            BehaviorType::Gift => !self.gang_member || self.generous,
            BehaviorType::EnterSubArea => self.can_enter_sub_area,
            BehaviorType::ExitSubArea => self.can_exit_sub_area,
            _ => true,
        }
    }
}

/// Weights for every behavior the NPC may perform on `turn`. Behaviors still on
/// cooldown or structurally impossible are left out entirely.
pub fn weight_vector(
    settings: &BehaviorSettings,
    npc: &Npc,
    ctx: &SelectionContext,
    turn: u64,
) -> Vec<(BehaviorType, f32)> {
    let mut vector = Vec::with_capacity(BehaviorType::ALL.len());
    for kind in BehaviorType::ALL {
        if !ctx.eligible(kind) || !settings.can_perform(&npc.memory, kind, turn) {
            continue;
        }
        let params = settings.params(kind);
        let repeats = i32::try_from(npc.memory.occurrences(kind)).unwrap_or(i32::MAX);
        let mut weight = params.base_weight * params.frequency * RECENCY_PENALTY.powi(repeats);

        if ctx.gang_member && kind == BehaviorType::Fight {
            weight *= if ctx.player_detected { 3.0 } else { 2.0 };
        }
        if ctx.hallucinating {
            match kind {
                BehaviorType::Fight => weight *= 0.3,
                BehaviorType::UseItem => weight *= 2.0,
                _ => {},
            }
        }
        if ctx.friendly {
            match kind {
                BehaviorType::Fight => weight = 0.0,
                BehaviorType::Talk => weight *= 2.0,
                _ => {},
            }
        }
        if ctx.generous && kind == BehaviorType::Gift {
            weight *= 3.0;
        }
        vector.push((kind, weight));
    }

    let opp = ctx.opportunities;
    if opp.gardening {
        boost(&mut vector, BehaviorType::Gardening);
    }
    if opp.fight {
        boost(&mut vector, BehaviorType::Fight);
    }
    if opp.tech {
        boost(&mut vector, BehaviorType::Tech);
    }
    vector
}

/// Move a share of every other behavior's weight onto `target`.
/// Total mass is conserved, and the target never ends up above it.
fn boost(vector: &mut [(BehaviorType, f32)], target: BehaviorType) {
    let Some(idx) = vector.iter().position(|(kind, w)| *kind == target && *w > 0.0) else {
        return;
    };
    let total: f32 = vector.iter().map(|(_, w)| *w).sum();
    let mut moved = 0.0;
    for (i, (_, weight)) in vector.iter_mut().enumerate() {
        if i != idx {
            let share = *weight * OPPORTUNITY_SHARE;
            *weight -= share;
            moved += share;
        }
    }
    vector[idx].1 = (vector[idx].1 + moved).min(total);
}

/// Weighted random choice; falls back to `Idle` when nothing carries any weight.
pub fn sample<R: Rng>(vector: &[(BehaviorType, f32)], rng: &mut R) -> BehaviorType {
    match WeightedIndex::new(vector.iter().map(|(_, w)| *w)) {
        Ok(dist) => vector[dist.sample(rng)].0,
        Err(_) => BehaviorType::Idle,
    }
}
