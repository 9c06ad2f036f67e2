//! Gangs (factions) of NPCs.
//!
//! Membership is exclusive: an NPC's `gang` field and the gang's `members` set
//! always agree. Only `RootWorld` mutates membership, and a defeated member is
//! dropped from its gang in the same call that kills it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of NPCs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gang {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub members: HashSet<Uuid>,
    pub rivals: HashSet<Uuid>,
}
impl Gang {
    pub fn new(id: Uuid, symbol: &str, name: &str) -> Gang {
        Gang {
            id,
            symbol: symbol.to_string(),
            name: name.to_string(),
            members: HashSet::new(),
            rivals: HashSet::new(),
        }
    }

    pub fn is_rival(&self, other: Uuid) -> bool {
        self.rivals.contains(&other)
    }

    pub fn has_member(&self, npc_id: Uuid) -> bool {
        self.members.contains(&npc_id)
    }

    pub(crate) fn add_member(&mut self, npc_id: Uuid) {
        self.members.insert(npc_id);
    }

    pub(crate) fn remove_member(&mut self, npc_id: Uuid) -> bool {
        self.members.remove(&npc_id)
    }
}
