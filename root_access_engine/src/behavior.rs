//! NPC behavior state machine.
//!
//! Each turn an NPC runs one *behavior step*: it may be skipped (dead, NPCs disabled),
//! forced (an active override from hacking), or chosen by weighted sampling over
//! the behavior vocabulary. The chosen behavior is then executed against a target
//! picked from the NPC's surroundings and produces at most one line of text.
//!
//! Submodules:
//! - `settings`: weights, frequency multipliers and cooldowns per behavior type
//! - `weights`: builds the weight vector for one NPC and samples from it
//! - `actions`: executes a chosen behavior against the world
//! - `detection`: the gang "spot the player" sub-rule
//! - `phrases`: text fragments used by the actions

pub mod actions;
pub mod detection;
pub mod phrases;
pub mod settings;
pub mod weights;

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::health::LivingEntity;
use crate::world::RootWorld;

pub use settings::{BehaviorParams, BehaviorSettings};

/// How many past behaviors an NPC remembers when discouraging repeats.
pub const HISTORY_LEN: usize = 5;

/// The fixed behavior vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BehaviorType {
    Idle,
    Talk,
    Fight,
    UseItem,
    Gardening,
    Gift,
    Tech,
    Suspicious,
    Craft,
    EnterSubArea,
    ExitSubArea,
}
impl BehaviorType {
    pub const ALL: [BehaviorType; 11] = [
        BehaviorType::Idle,
        BehaviorType::Talk,
        BehaviorType::Fight,
        BehaviorType::UseItem,
        BehaviorType::Gardening,
        BehaviorType::Gift,
        BehaviorType::Tech,
        BehaviorType::Suspicious,
        BehaviorType::Craft,
        BehaviorType::EnterSubArea,
        BehaviorType::ExitSubArea,
    ];

    /// Stable key used in configuration files and admin commands.
    pub fn key(self) -> &'static str {
        match self {
            BehaviorType::Idle => "idle",
            BehaviorType::Talk => "talk",
            BehaviorType::Fight => "fight",
            BehaviorType::UseItem => "use_item",
            BehaviorType::Gardening => "gardening",
            BehaviorType::Gift => "gift",
            BehaviorType::Tech => "tech",
            BehaviorType::Suspicious => "suspicious",
            BehaviorType::Craft => "craft",
            BehaviorType::EnterSubArea => "enter_sub_area",
            BehaviorType::ExitSubArea => "exit_sub_area",
        }
    }

    /// Parse a key, tolerating dashes and a few common aliases.
    pub fn from_key(key: &str) -> Option<BehaviorType> {
        let key = key.trim().to_lowercase().replace('-', "_");
        let found = match key.as_str() {
            "idle" => BehaviorType::Idle,
            "talk" => BehaviorType::Talk,
            "fight" | "attack" => BehaviorType::Fight,
            "use_item" | "item" => BehaviorType::UseItem,
            "gardening" | "garden" | "plant" => BehaviorType::Gardening,
            "gift" => BehaviorType::Gift,
            "tech" | "hack" => BehaviorType::Tech,
            "suspicious" => BehaviorType::Suspicious,
            "craft" => BehaviorType::Craft,
            "enter_sub_area" | "enter" => BehaviorType::EnterSubArea,
            "exit_sub_area" | "exit" => BehaviorType::ExitSubArea,
            _ => return None,
        };
        Some(found)
    }
}
impl Display for BehaviorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A temporary forced behavior (installed by hacking an NPC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorOverride {
    pub kind: BehaviorType,
    pub remaining_turns: u32,
    /// Designation to restore once the override elapses.
    pub prior: Option<BehaviorType>,
}

/// Cooldown and recency record for one NPC.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorMemory {
    history: VecDeque<BehaviorType>,
    last_performed: HashMap<BehaviorType, u64>,
}
impl BehaviorMemory {
    /// Remember that `kind` was performed on `turn`.
    pub fn record(&mut self, kind: BehaviorType, turn: u64) {
        self.last_performed.insert(kind, turn);
        self.history.push_back(kind);
        while self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
    }

    /// How many times `kind` appears in the rolling history.
    pub fn occurrences(&self, kind: BehaviorType) -> usize {
        self.history.iter().filter(|&&k| k == kind).count()
    }

    pub fn last_performed(&self, kind: BehaviorType) -> Option<u64> {
        self.last_performed.get(&kind).copied()
    }

    pub fn history(&self) -> impl Iterator<Item = &BehaviorType> {
        self.history.iter()
    }
}

/// Result of one NPC behavior step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub behavior: BehaviorType,
    pub text: String,
}

/// Run one behavior step for `npc_id`. Returns `None` when the NPC does nothing visible.
pub fn behavior_step<R: Rng>(
    world: &mut RootWorld,
    npc_id: Uuid,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Option<StepOutcome> {
    let turn = world.turn_count;
    let npc = world.npcs.get_mut(&npc_id)?;
    if !npc.is_alive() || !settings.npcs_enabled {
        return None;
    }
    npc.detection_cooldown = npc.detection_cooldown.saturating_sub(1);
    let forced = npc.tick_override();

    // gang members that haven't spotted the player yet look for them first
    if forced.is_none() {
        if let Some(text) = detection::detection_step(world, npc_id, rng) {
            trace!("npc {npc_id} spent its step on detection");
            return Some(StepOutcome {
                behavior: BehaviorType::Suspicious,
                text,
            });
        }
    }

    let chosen = match forced {
        Some(kind) => kind,
        None => {
            let ctx = weights::SelectionContext::gather(world, npc_id, rng)?;
            let vector = weights::weight_vector(settings, world.npcs.get(&npc_id)?, &ctx, turn);
            weights::sample(&vector, rng)
        },
    };
    debug!("npc {npc_id} chose {chosen} on turn {turn}");

    let text = actions::execute(world, npc_id, chosen, rng)
        .or_else(|| actions::idle_text(world, npc_id, rng))?;

    if let Some(npc) = world.npcs.get_mut(&npc_id) {
        npc.memory.record(chosen, turn);
        npc.designation = Some(chosen);
    }
    Some(StepOutcome { behavior: chosen, text })
}
