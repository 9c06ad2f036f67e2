//! Areas and the fixtures inside them.
//!
//! An `Area` tracks which NPCs and loose items it holds plus a list of
//! `AreaObject` fixtures. Fixtures expose capabilities through `ObjectKind`
//! (soil to plant in, devices to hack, spots to hide in, hazards to set off).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use variantly::Variantly;

use crate::effect::EffectKind;
use crate::{ItemHolder, Location, WorldObject};

/// Capability of a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Variantly)]
pub enum ObjectKind {
    SoilPlot { planted: Option<String>, watered: bool },
    Device { hackable: bool },
    HidingSpot { stealth_bonus: f32 },
    Breakable { broken: bool },
    Hazard { effect: EffectKind, duration: i32 },
}

/// A fixed object in an area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaObject {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub kind: ObjectKind,
}
impl AreaObject {
    pub fn is_soil(&self) -> bool {
        self.kind.is_soil_plot()
    }

    pub fn is_hackable(&self) -> bool {
        matches!(self.kind, ObjectKind::Device { hackable: true })
    }

    /// Stealth bonus if this object can be hidden in.
    pub fn stealth_bonus(&self) -> Option<f32> {
        match self.kind {
            ObjectKind::HidingSpot { stealth_bonus } => Some(stealth_bonus),
            _ => None,
        }
    }

    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.symbol == query
    }
}

/// A location in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub location: Location,
    pub sub_areas: Vec<String>,
    /// Areas reachable in one move from here.
    pub exits: Vec<Uuid>,
    pub objects: Vec<AreaObject>,
    pub items: HashSet<Uuid>,
    pub npcs: HashSet<Uuid>,
}
impl Area {
    pub fn new(id: Uuid, symbol: &str, name: &str, description: &str) -> Area {
        Area {
            id,
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            location: Location::Nowhere,
            sub_areas: Vec::new(),
            exits: Vec::new(),
            objects: Vec::new(),
            items: HashSet::new(),
            npcs: HashSet::new(),
        }
    }

    /// Case-insensitive match on the area's name or exact symbol.
    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.symbol == query
    }

    /// Fixtures satisfying a capability predicate.
    pub fn objects_where(&self, pred: impl Fn(&AreaObject) -> bool) -> Vec<&AreaObject> {
        self.objects.iter().filter(|o| pred(o)).collect()
    }

    pub fn has_soil(&self) -> bool {
        self.objects.iter().any(AreaObject::is_soil)
    }

    pub fn has_hackable_device(&self) -> bool {
        self.objects.iter().any(AreaObject::is_hackable)
    }

    /// First hiding spot matching `query`, or the first hiding spot at all if `query` is `None`.
    pub fn find_hiding_spot(&self, query: Option<&str>) -> Option<&AreaObject> {
        self.objects
            .iter()
            .filter(|o| o.stealth_bonus().is_some())
            .find(|o| query.is_none_or(|q| o.matches_name(q)))
    }

    pub fn find_hazard(&self, query: &str) -> Option<&AreaObject> {
        self.objects
            .iter()
            .filter(|o| o.kind.is_hazard())
            .find(|o| o.matches_name(query))
    }

    pub fn object_mut(&mut self, object_id: Uuid) -> Option<&mut AreaObject> {
        self.objects.iter_mut().find(|o| o.id == object_id)
    }
}
impl WorldObject for Area {
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
impl ItemHolder for Area {
    fn add_item(&mut self, item_id: Uuid) {
        self.items.insert(item_id);
    }

    fn remove_item(&mut self, item_id: Uuid) {
        self.items.remove(&item_id);
    }

    fn contains_item(&self, item_id: Uuid) -> bool {
        self.items.contains(&item_id)
    }
}
