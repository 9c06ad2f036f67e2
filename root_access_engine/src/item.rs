//! Item types and related helpers.
//!
//! Items are described by what they can do (`ItemAbility`) rather than by what
//! they are, so behavior code asks "is this a weapon?" instead of probing types.

use std::collections::HashSet;
use std::fmt::Display;

use root_access_data::ItemAbilityDef;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Location, WorldObject};

/// Anything that can be carried, used, planted, given, or thrown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    /// The symbol used to refer to this item in scenario data.
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub location: Location,
    /// Set of capabilities [`ItemAbility`] for this item.
    pub abilities: HashSet<ItemAbility>,
    /// Base damage when used as a weapon.
    pub power: u32,
}
impl Item {
    pub fn has_ability(&self, ability: ItemAbility) -> bool {
        self.abilities.contains(&ability)
    }

    pub fn is_weapon(&self) -> bool {
        self.has_ability(ItemAbility::Weapon)
    }

    /// Electronic or hackable gear that NPCs can fiddle with.
    pub fn is_tech(&self) -> bool {
        self.has_ability(ItemAbility::Electronic) || self.has_ability(ItemAbility::Hackable)
    }
}
impl WorldObject for Item {
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

/// Things an item can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemAbility {
    Weapon,
    Seed,
    Electronic,
    Hackable,
    Edible,
    CraftPart,
    Giftable,
    SmokeBomb,
    Decoy,
}
impl Display for ItemAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemAbility::Weapon => write!(f, "weapon"),
            ItemAbility::Seed => write!(f, "seed"),
            ItemAbility::Electronic => write!(f, "electronic"),
            ItemAbility::Hackable => write!(f, "hackable"),
            ItemAbility::Edible => write!(f, "edible"),
            ItemAbility::CraftPart => write!(f, "craft part"),
            ItemAbility::Giftable => write!(f, "giftable"),
            ItemAbility::SmokeBomb => write!(f, "smoke bomb"),
            ItemAbility::Decoy => write!(f, "decoy"),
        }
    }
}
impl From<ItemAbilityDef> for ItemAbility {
    fn from(value: ItemAbilityDef) -> Self {
        match value {
            ItemAbilityDef::Weapon => ItemAbility::Weapon,
            ItemAbilityDef::Seed => ItemAbility::Seed,
            ItemAbilityDef::Electronic => ItemAbility::Electronic,
            ItemAbilityDef::Hackable => ItemAbility::Hackable,
            ItemAbilityDef::Edible => ItemAbility::Edible,
            ItemAbilityDef::CraftPart => ItemAbility::CraftPart,
            ItemAbilityDef::Giftable => ItemAbility::Giftable,
            ItemAbilityDef::SmokeBomb => ItemAbility::SmokeBomb,
            ItemAbilityDef::Decoy => ItemAbility::Decoy,
        }
    }
}

/// Methods for entities that can hold items.
pub trait ItemHolder {
    fn add_item(&mut self, item_id: Uuid);
    fn remove_item(&mut self, item_id: Uuid);
    fn contains_item(&self, item_id: Uuid) -> bool;
}
