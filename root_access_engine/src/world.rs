//! Data structures representing the game world.
//!
//! This module defines [`RootWorld`] and related types used at runtime to
//! track areas, gangs, NPCs, items and the player.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use variantly::Variantly;

use crate::ROOT_ACCESS_VERSION;
use crate::area::Area;
use crate::effect::Effect;
use crate::gang::Gang;
use crate::health::{LifeState, LivingEntity};
use crate::npc::Npc;
use crate::{Item, ItemHolder, Player};

/// Kinds of places where a `WorldObject` may be located.
/// Areas *are* the locations, so their own location is always `Nowhere`.
/// Defeated NPCs and unspawned items are also located `Nowhere`.
#[derive(Copy, Debug, Default, Clone, Serialize, Deserialize, Variantly, PartialEq, Eq)]
pub enum Location {
    Area(Uuid),
    Inventory,
    #[default]
    Nowhere,
    Npc(Uuid),
}

/// Methods common to any object in the world.
pub trait WorldObject {
    fn id(&self) -> Uuid;
    fn symbol(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn location(&self) -> &Location;
}

/// Complete state of a running game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootWorld {
    pub title: String,
    pub intro: String,
    pub areas: HashMap<Uuid, Area>,
    pub gangs: HashMap<Uuid, Gang>,
    pub npcs: HashMap<Uuid, Npc>,
    pub items: HashMap<Uuid, Item>,
    pub player: Player,
    pub turn_count: u64,
    pub version: String,
}
impl RootWorld {
    /// Create a new empty world with a default player.
    pub fn new_empty() -> RootWorld {
        let world = Self {
            version: ROOT_ACCESS_VERSION.to_string(),
            ..RootWorld::default()
        };
        info!("new, empty 'RootWorld' created");
        world
    }

    /// Id of the area the player occupies.
    /// # Errors
    /// - if the player isn't in an area or the area's uuid is not found
    pub fn player_area_id(&self) -> Result<Uuid> {
        match self.player.location {
            Location::Area(uuid) if self.areas.contains_key(&uuid) => Ok(uuid),
            Location::Area(uuid) => Err(anyhow!("player's area UUID ({uuid}) not found in world")),
            other => Err(anyhow!("player not in an area - located at {other:?}")),
        }
    }

    /// Obtain a reference to the area the player occupies.
    /// # Errors
    /// - if the player isn't in an area or the area's uuid is not found
    pub fn player_area_ref(&self) -> Result<&Area> {
        let area_id = self.player_area_id()?;
        self.areas
            .get(&area_id)
            .ok_or_else(|| anyhow!("player's area UUID ({area_id}) not found in world"))
    }

    /// Obtain a mutable reference to the area the player occupies.
    /// # Errors
    /// - if the player isn't in an area or the area's uuid is not found
    pub fn player_area_mut(&mut self) -> Result<&mut Area> {
        let area_id = self.player_area_id()?;
        self.areas
            .get_mut(&area_id)
            .ok_or_else(|| anyhow!("player's area UUID ({area_id}) not found in world"))
    }

    pub fn player_in_area(&self, area_id: Uuid) -> bool {
        self.player.location == Location::Area(area_id)
    }

    /// Live NPCs in an area, ordered by name so seeded runs are repeatable.
    pub fn npcs_in_area(&self, area_id: Uuid) -> Vec<Uuid> {
        let Some(area) = self.areas.get(&area_id) else {
            return Vec::new();
        };
        let mut npcs: Vec<&Npc> = area
            .npcs
            .iter()
            .filter_map(|id| self.npcs.get(id))
            .filter(|npc| npc.is_alive())
            .collect();
        npcs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        npcs.into_iter().map(|npc| npc.id).collect()
    }

    /// Find a live NPC in an area by partial, case-insensitive name.
    pub fn find_npc_in_area(&self, area_id: Uuid, query: &str) -> Option<Uuid> {
        let query = query.to_lowercase();
        self.npcs_in_area(area_id).into_iter().find(|id| {
            self.npcs
                .get(id)
                .is_some_and(|npc| npc.name.to_lowercase().contains(&query) || npc.symbol == query)
        })
    }

    pub fn gang_of(&self, npc_id: Uuid) -> Option<&Gang> {
        let gang_id = self.npcs.get(&npc_id)?.gang?;
        self.gangs.get(&gang_id)
    }

    /// Name of the NPC's gang, if it has one.
    pub fn gang_name(&self, npc_id: Uuid) -> Option<&str> {
        self.gang_of(npc_id).map(|g| g.name.as_str())
    }

    /// Items held by an NPC, ordered by name.
    pub fn npc_items(&self, npc_id: Uuid) -> Vec<&Item> {
        let Some(npc) = self.npcs.get(&npc_id) else {
            return Vec::new();
        };
        let mut items: Vec<&Item> = npc.inventory.iter().filter_map(|id| self.items.get(id)).collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }

    /// Loose items lying in an area, ordered by name.
    pub fn area_items(&self, area_id: Uuid) -> Vec<&Item> {
        let Some(area) = self.areas.get(&area_id) else {
            return Vec::new();
        };
        let mut items: Vec<&Item> = area.items.iter().filter_map(|id| self.items.get(id)).collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }

    /// Add an NPC to a gang, keeping both sides of the membership in step.
    /// # Errors
    /// - if either the NPC or the gang is unknown
    pub fn enlist(&mut self, npc_id: Uuid, gang_id: Uuid) -> Result<()> {
        if !self.gangs.contains_key(&gang_id) {
            bail!("enlisting into unknown gang {gang_id}");
        }
        let npc = self
            .npcs
            .get_mut(&npc_id)
            .with_context(|| format!("enlisting unknown npc {npc_id}"))?;
        let previous = npc.gang.replace(gang_id);
        if let Some(old_gang) = previous.and_then(|old| self.gangs.get_mut(&old)) {
            old_gang.remove_member(npc_id);
        }
        if let Some(gang) = self.gangs.get_mut(&gang_id) {
            gang.add_member(npc_id);
        }
        Ok(())
    }

    /// Apply damage to an NPC. If the hit is lethal the NPC is removed from its gang and
    /// its area, and its inventory is dropped where it fell, all before returning.
    /// # Errors
    /// - if the NPC is unknown
    pub fn damage_npc(&mut self, npc_id: Uuid, amount: u32) -> Result<LifeState> {
        let npc = self
            .npcs
            .get_mut(&npc_id)
            .with_context(|| format!("damaging unknown npc {npc_id}"))?;
        let state = npc.health.damage(amount);
        if state.is_alive() {
            return Ok(state);
        }

        let gang_id = npc.gang.take();
        let fell_in = npc.location;
        npc.location = Location::Nowhere;
        npc.behavior_override = None;
        let dropped: Vec<Uuid> = npc.inventory.drain().collect();
        let name = npc.name.clone();

        if let Some(gang) = gang_id.and_then(|id| self.gangs.get_mut(&id)) {
            gang.remove_member(npc_id);
        }
        if let Location::Area(area_id) = fell_in {
            if let Some(area) = self.areas.get_mut(&area_id) {
                area.npcs.remove(&npc_id);
                for item_id in &dropped {
                    area.add_item(*item_id);
                }
            }
        }
        for item_id in dropped {
            if let Some(item) = self.items.get_mut(&item_id) {
                item.location = fell_in;
            }
        }
        info!("npc '{name}' ({npc_id}) defeated");
        Ok(state)
    }

    /// Move an item to a new location, updating whichever holders are involved.
    /// # Errors
    /// - if the item or the destination holder is unknown
    pub fn move_item(&mut self, item_id: Uuid, to: Location) -> Result<()> {
        let from = self
            .items
            .get(&item_id)
            .map(|item| item.location)
            .with_context(|| format!("moving unknown item {item_id}"))?;
        match to {
            Location::Area(id) => self
                .areas
                .get_mut(&id)
                .with_context(|| format!("moving item to unknown area {id}"))?
                .add_item(item_id),
            Location::Npc(id) => self
                .npcs
                .get_mut(&id)
                .with_context(|| format!("moving item to unknown npc {id}"))?
                .add_item(item_id),
            Location::Inventory => self.player.add_item(item_id),
            Location::Nowhere => {},
        }
        match from {
            Location::Area(id) => {
                if let Some(area) = self.areas.get_mut(&id) {
                    area.remove_item(item_id);
                }
            },
            Location::Npc(id) => {
                if let Some(npc) = self.npcs.get_mut(&id) {
                    npc.remove_item(item_id);
                }
            },
            Location::Inventory => self.player.remove_item(item_id),
            Location::Nowhere => {},
        }
        if let Some(item) = self.items.get_mut(&item_id) {
            item.location = to;
        }
        Ok(())
    }

    /// Place a newly created item into the world at `location`.
    /// # Errors
    /// - if the destination holder is unknown
    pub fn spawn_item(&mut self, mut item: Item, location: Location) -> Result<Uuid> {
        let id = item.id;
        item.location = Location::Nowhere;
        self.items.insert(id, item);
        self.move_item(id, location)?;
        Ok(id)
    }

    /// Remove an item from play entirely.
    /// # Errors
    /// - if the item is unknown
    pub fn despawn_item(&mut self, item_id: Uuid) -> Result<()> {
        self.move_item(item_id, Location::Nowhere)?;
        self.items.remove(&item_id);
        Ok(())
    }

    /// Tick every active effect in the world once. Returns `(holder name, effect)` for
    /// each effect that wore off on this pass.
    pub fn tick_effects(&mut self) -> Vec<(String, Effect)> {
        let mut expired = Vec::new();
        for npc in self.npcs.values_mut().filter(|npc| npc.is_alive()) {
            for fx in npc.effects.tick_all(&npc.name) {
                expired.push((npc.name.clone(), fx));
            }
        }
        for fx in self.player.effects.tick_all(&self.player.name) {
            expired.push((self.player.name.clone(), fx));
        }
        expired
    }
}
