//! Player -- module for the player in Root Access
use std::collections::{BTreeSet, HashSet};

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::effect::ActiveEffects;
use crate::health::{HealthState, LifeState, LivingEntity};
use crate::{ItemHolder, Location, WorldObject};

/// Where the player is currently hiding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HidingSpot {
    pub name: String,
    pub stealth_bonus: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: Location,
    /// Where the player wakes up after being knocked out.
    pub home: Location,
    pub inventory: HashSet<Uuid>,
    pub health: HealthState,
    pub effects: ActiveEffects,
    pub hidden: bool,
    pub hiding_spot: Option<HidingSpot>,
    /// Names of gangs that currently know where the player is.
    pub detected_by: BTreeSet<String>,
}
impl Default for Player {
    fn default() -> Player {
        Self {
            id: Uuid::new_v4(),
            name: "default".into(),
            description: "default".into(),
            location: Location::default(),
            home: Location::default(),
            inventory: HashSet::<Uuid>::default(),
            health: HealthState::new_at_max(100),
            effects: ActiveEffects::new(),
            hidden: false,
            hiding_spot: None,
            detected_by: BTreeSet::new(),
        }
    }
}
impl Player {
    /// Duck into a hiding spot.
    pub fn hide(&mut self, spot: HidingSpot) {
        info!("{} hides in {} (stealth bonus {})", self.name, spot.name, spot.stealth_bonus);
        self.hidden = true;
        self.hiding_spot = Some(spot);
    }

    /// Leave cover, returning the spot that was left (if any).
    pub fn unhide(&mut self) -> Option<HidingSpot> {
        self.hidden = false;
        self.hiding_spot.take()
    }

    /// Stealth bonus currently in effect; zero when not hidden.
    pub fn stealth_bonus(&self) -> f32 {
        match (&self.hiding_spot, self.hidden) {
            (Some(spot), true) => spot.stealth_bonus,
            _ => 0.0,
        }
    }

    pub fn is_detected_by(&self, gang_name: &str) -> bool {
        self.detected_by.contains(gang_name)
    }

    /// Record that a gang has spotted the player.
    pub fn mark_detected(&mut self, gang_name: &str) {
        if self.detected_by.insert(gang_name.to_string()) {
            info!("{} has been detected by the {}", self.name, gang_name);
        }
    }

    /// Clear detection, either for one gang or all of them. Returns the gangs that lost track.
    pub fn break_detection(&mut self, gang_name: Option<&str>) -> Vec<String> {
        let cleared: Vec<String> = match gang_name {
            Some(name) => self.detected_by.take(name).into_iter().collect(),
            None => std::mem::take(&mut self.detected_by).into_iter().collect(),
        };
        if !cleared.is_empty() {
            info!("{} broke detection by: {}", self.name, cleared.join(", "));
        }
        cleared
    }

    /// Wake up at home after a knock-out: full health, no effects, out of hiding,
    /// and forgotten by every gang.
    pub fn respawn(&mut self) {
        let max = self.health.max_hp();
        self.health.heal(max);
        self.effects.clear();
        self.unhide();
        self.detected_by.clear();
        self.location = self.home;
        info!("{} respawned at {:?}", self.name, self.home);
    }
}
impl WorldObject for Player {
    fn id(&self) -> Uuid {
        self.id
    }

    fn symbol(&self) -> &str {
        "player"
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
impl LivingEntity for Player {
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
impl ItemHolder for Player {
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
