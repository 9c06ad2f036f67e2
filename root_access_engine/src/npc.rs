//! NPC Module

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::behavior::{BehaviorMemory, BehaviorOverride, BehaviorType};
use crate::effect::{ActiveEffects, EffectKind};
use crate::health::{HealthState, LifeState, LivingEntity};
use crate::{ItemHolder, Location, WorldObject};

/// A non-playable character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub location: Location,
    /// Gang this NPC currently belongs to. Cleared when the NPC is defeated.
    pub gang: Option<Uuid>,
    pub health: HealthState,
    pub inventory: HashSet<Uuid>,
    pub effects: ActiveEffects,
    /// Per-check chance of spotting the player (before hiding modifiers).
    pub detection_chance: f32,
    /// Turns before this NPC may roll detection again.
    pub detection_cooldown: u32,
    /// Chance of shrugging off a hazard's effect.
    pub hazard_resistance: f32,
    /// Named nook of the current area the NPC is tucked into, if any.
    pub sub_area: Option<String>,
    /// Behavior chosen on the most recent step.
    pub designation: Option<BehaviorType>,
    pub behavior_override: Option<BehaviorOverride>,
    pub memory: BehaviorMemory,
}
impl Npc {
    pub fn new(id: Uuid, symbol: &str, name: &str, description: &str, max_hp: u32) -> Npc {
        Npc {
            id,
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            location: Location::Nowhere,
            gang: None,
            health: HealthState::new_at_max(max_hp),
            inventory: HashSet::new(),
            effects: ActiveEffects::new(),
            detection_chance: 0.05,
            detection_cooldown: 0,
            hazard_resistance: 0.2,
            sub_area: None,
            designation: None,
            behavior_override: None,
            memory: BehaviorMemory::default(),
        }
    }

    pub fn is_gang_member(&self) -> bool {
        self.gang.is_some()
    }

    pub fn is_hallucinating(&self) -> bool {
        self.effects.has(&EffectKind::Hallucination)
    }

    pub fn is_friendly(&self) -> bool {
        self.effects.has(&EffectKind::Friendliness)
    }

    pub fn is_generous(&self) -> bool {
        self.effects.has(&EffectKind::GiftGiving) || self.is_friendly()
    }

    /// Install a temporary forced behavior, remembering what the NPC was doing before.
    pub fn install_override(&mut self, kind: BehaviorType, turns: u32) {
        let prior = match &self.behavior_override {
            // re-hacking keeps the original designation to restore
            Some(existing) => existing.prior,
            None => self.designation,
        };
        self.behavior_override = Some(BehaviorOverride {
            kind,
            remaining_turns: turns,
            prior,
        });
    }

    /// Tick the active override. Returns the forced behavior while it lasts; restores the
    /// prior designation and returns `None` once it has elapsed.
    pub fn tick_override(&mut self) -> Option<BehaviorType> {
        let ovr = self.behavior_override.as_mut()?;
        if ovr.remaining_turns == 0 {
            self.designation = ovr.prior;
            self.behavior_override = None;
            return None;
        }
        ovr.remaining_turns -= 1;
        Some(ovr.kind)
    }
}
impl WorldObject for Npc {
    fn id(&self) -> Uuid {
        self.id
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn location(&self) -> &Location {
        &self.location
    }
}
impl LivingEntity for Npc {
    fn max_hp(&self) -> u32 {
        self.health.max_hp()
    }

    fn current_hp(&self) -> u32 {
        self.health.current_hp()
    }

    fn life_state(&self) -> LifeState {
        self.health.life_state()
    }
}
impl ItemHolder for Npc {
    fn add_item(&mut self, item_id: Uuid) {
        self.inventory.insert(item_id);
    }

    fn remove_item(&mut self, item_id: Uuid) {
        self.inventory.remove(&item_id);
    }

    fn contains_item(&self, item_id: Uuid) -> bool {
        self.inventory.contains(&item_id)
    }
}
