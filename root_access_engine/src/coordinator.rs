//! NPC Behavior Coordinator.
//!
//! Runs one behavior step for each NPC in the player's area, in shuffled order,
//! while enforcing a global action cap, a per-NPC cap and a short per-NPC cooldown
//! so that a crowded room doesn't drown the player in text.

use std::collections::HashMap;

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use root_access_data::CoordinatorDef;
use uuid::Uuid;

use crate::behavior::{BehaviorSettings, BehaviorType, behavior_step};
use crate::message::MessageSource;
use crate::world::RootWorld;

/// One NPC line produced during a coordinated turn.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcAction {
    pub npc_id: Uuid,
    pub behavior: BehaviorType,
    pub text: String,
    pub source: MessageSource,
}

#[derive(Debug, Clone)]
pub struct Coordinator {
    pub global_cap: usize,
    pub per_npc_cap: usize,
    pub cooldown_turns: u32,
    cooldowns: HashMap<Uuid, u32>,
    action_counts: HashMap<Uuid, usize>,
}
impl Default for Coordinator {
    fn default() -> Self {
        Coordinator::from_def(&CoordinatorDef::default())
    }
}
impl Coordinator {
    pub fn from_def(def: &CoordinatorDef) -> Coordinator {
        Coordinator {
            global_cap: def.global_cap,
            per_npc_cap: def.per_npc_cap,
            cooldown_turns: def.npc_cooldown,
            cooldowns: HashMap::new(),
            action_counts: HashMap::new(),
        }
    }

    /// Turns left before `npc_id` may act again (0 if free).
    pub fn cooldown_of(&self, npc_id: Uuid) -> u32 {
        self.cooldowns.get(&npc_id).copied().unwrap_or(0)
    }

    /// Actions `npc_id` took during the last processed turn.
    pub fn actions_of(&self, npc_id: Uuid) -> usize {
        self.action_counts.get(&npc_id).copied().unwrap_or(0)
    }

    /// Run behavior steps for `actors` and collect what they did.
    pub fn process_turn<R: Rng>(
        &mut self,
        world: &mut RootWorld,
        actors: &[Uuid],
        settings: &BehaviorSettings,
        rng: &mut R,
    ) -> Vec<NpcAction> {
        let mut order = actors.to_vec();
        order.shuffle(rng);
        self.action_counts.clear();

        let mut actions = Vec::new();
        for npc_id in order {
            if actions.len() >= self.global_cap {
                debug!("global action cap of {} reached", self.global_cap);
                break;
            }
            if self.cooldown_of(npc_id) > 0 || self.actions_of(npc_id) >= self.per_npc_cap {
                continue;
            }
            let Some(outcome) = behavior_step(world, npc_id, settings, rng) else {
                continue;
            };
            let Some(npc) = world.npcs.get(&npc_id) else {
                continue;
            };
            let source = MessageSource::npc(&npc.name, world.gang_name(npc_id));
            *self.action_counts.entry(npc_id).or_insert(0) += 1;
            if self.cooldown_turns > 0 {
                self.cooldowns.insert(npc_id, self.cooldown_turns);
            }
            actions.push(NpcAction {
                npc_id,
                behavior: outcome.behavior,
                text: outcome.text,
                source,
            });
        }

        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|_, turns| *turns > 0);
        info!("coordinator: {} of {} npc(s) acted", actions.len(), actors.len());
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::idgen::new_id;
    use crate::npc::Npc;
    use crate::world::Location;
    use rand::{SeedableRng, rngs::StdRng};

    fn crowded_world(count: usize) -> (RootWorld, Vec<Uuid>) {
        let mut world = RootWorld::new_empty();
        let area_id = new_id();
        world.areas.insert(area_id, Area::new(area_id, "lot", "Parking Lot", "Cracked asphalt."));
        world.player.location = Location::Area(area_id);
        let mut ids = Vec::new();
        for i in 0..count {
            let id = new_id();
            let mut npc = Npc::new(id, &format!("n{i}"), &format!("Npc{i}"), "Test.", 100);
            npc.location = Location::Area(area_id);
            world.npcs.insert(id, npc);
            if let Some(area) = world.areas.get_mut(&area_id) {
                area.npcs.insert(id);
            }
            ids.push(id);
        }
        (world, ids)
    }

    #[test]
    fn global_cap_limits_actions_per_turn() {
        let (mut world, ids) = crowded_world(15);
        let mut coordinator = Coordinator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let actions = coordinator.process_turn(&mut world, &ids, &BehaviorSettings::default(), &mut rng);
        assert_eq!(actions.len(), 10);
    }

    #[test]
    fn acting_npcs_sit_out_the_next_turn_with_longer_cooldown() {
        let (mut world, ids) = crowded_world(3);
        let def = CoordinatorDef {
            npc_cooldown: 2,
            ..CoordinatorDef::default()
        };
        let mut coordinator = Coordinator::from_def(&def);
        let settings = BehaviorSettings::default();
        let mut rng = StdRng::seed_from_u64(5);
        let first = coordinator.process_turn(&mut world, &ids, &settings, &mut rng);
        assert_eq!(first.len(), 3);
        assert!(ids.iter().all(|id| coordinator.cooldown_of(*id) == 1));
        world.turn_count += 1;
        let second = coordinator.process_turn(&mut world, &ids, &settings, &mut rng);
        assert!(second.is_empty());
        world.turn_count += 1;
        let third = coordinator.process_turn(&mut world, &ids, &settings, &mut rng);
        assert_eq!(third.len(), 3);
    }

    #[test]
    fn disabled_npcs_produce_nothing() {
        let (mut world, ids) = crowded_world(4);
        let mut coordinator = Coordinator::default();
        let mut settings = BehaviorSettings::default();
        settings.npcs_enabled = false;
        let mut rng = StdRng::seed_from_u64(9);
        assert!(coordinator.process_turn(&mut world, &ids, &settings, &mut rng).is_empty());
    }
}
