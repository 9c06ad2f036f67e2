//! Health Module
//!
//! Hit points and life state for the player and NPCs.
use std::cmp;

use serde::{Deserialize, Serialize};

use crate::WorldObject;

/// Represents the state of a living entity's health.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthState {
    max_hp: u32,
    current_hp: u32,
}
impl HealthState {
    /// Create a clean `HealthState` with specified maximum health
    pub fn new_at_max(max_hp: u32) -> HealthState {
        HealthState {
            max_hp,
            current_hp: max_hp,
        }
    }

    /// Get the maximum HP for this entity
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Get the current HP for this entity
    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// Return whether this entity is alive or dead.
    pub fn life_state(&self) -> LifeState {
        if self.current_hp > 0 {
            LifeState::Alive
        } else {
            LifeState::Dead
        }
    }

    /// Do damage to health. Saturates at zero.
    pub fn damage(&mut self, amount: u32) -> LifeState {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.life_state()
    }

    /// Heal the character. Saturates at max health.
    pub fn heal(&mut self, amount: u32) {
        self.current_hp = cmp::min(self.max_hp, self.current_hp.saturating_add(amount));
    }
}

/// Abilities common to game entities that are alive
pub trait LivingEntity: WorldObject {
    fn max_hp(&self) -> u32;
    fn current_hp(&self) -> u32;
    fn life_state(&self) -> LifeState;
    fn is_alive(&self) -> bool {
        self.life_state().is_alive()
    }
}

/// Possible life states for living entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, variantly::Variantly)]
pub enum LifeState {
    Alive,
    Dead,
}
