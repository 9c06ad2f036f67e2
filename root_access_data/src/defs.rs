use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier used across `ScenarioDef` references.
pub type Id = String;

/// Keys accepted for behavior entries in a `PipelineDef`.
pub const BEHAVIOR_KEYS: &[&str] = &[
    "idle",
    "talk",
    "fight",
    "use_item",
    "gardening",
    "gift",
    "tech",
    "suspicious",
    "craft",
    "enter_sub_area",
    "exit_sub_area",
];

/// Keys accepted for message types in throttle quotas and always-allowed lists.
pub const MESSAGE_TYPE_KEYS: &[&str] = &[
    "idle",
    "talk",
    "interact",
    "attack",
    "detection",
    "hallucination",
    "hallucination_detail",
    "friendly",
    "gift",
    "falling_object",
    "hazard_trigger",
    "gardening",
    "resist_hazard",
    "teleport",
    "unnoticed",
    "other",
];

/// Names of the built-in throttle profiles.
pub const THROTTLE_PROFILES: &[&str] = &["standard", "strict"];

/// Top-level scenario data: everything needed to populate a world.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScenarioDef {
    pub title: String,
    #[serde(default)]
    pub intro: String,
    pub player: PlayerDef,
    #[serde(default)]
    pub areas: Vec<AreaDef>,
    #[serde(default)]
    pub gangs: Vec<GangDef>,
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

/// Player definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    pub name: String,
    pub description: String,
    pub start_area: Id,
    #[serde(default = "default_player_hp")]
    pub max_hp: u32,
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            start_area: String::new(),
            max_hp: default_player_hp(),
        }
    }
}

fn default_player_hp() -> u32 {
    100
}

/// An area the player and NPCs can occupy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaDef {
    pub id: Id,
    pub name: String,
    pub desc: String,
    /// Named nooks inside the area that NPCs can slip in and out of.
    #[serde(default)]
    pub sub_areas: Vec<String>,
    /// Ids of neighboring areas the player can walk to. Exits are one-way.
    #[serde(default)]
    pub exits: Vec<Id>,
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

/// A fixture inside an area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub id: Id,
    pub name: String,
    pub kind: ObjectKindDef,
}

/// Capability of an area fixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectKindDef {
    SoilPlot,
    Device {
        #[serde(default)]
        hackable: bool,
    },
    HidingSpot {
        stealth_bonus: f32,
    },
    Breakable,
    Hazard {
        effect: EffectKindDef,
        #[serde(default)]
        duration: Option<i32>,
    },
}

/// Status effects a hazard can inflict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EffectKindDef {
    Hallucination,
    Confusion,
    Friendliness,
    GiftGiving,
    FallingObjects,
}

/// A gang (faction) of NPCs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GangDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub rivals: Vec<Id>,
}

/// A non-player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: Id,
    pub name: String,
    pub desc: String,
    pub area: Id,
    #[serde(default)]
    pub gang: Option<Id>,
    #[serde(default = "default_npc_hp")]
    pub max_hp: u32,
    #[serde(default = "default_detection_chance")]
    pub detection_chance: f32,
    #[serde(default = "default_hazard_resistance")]
    pub hazard_resistance: f32,
}

fn default_npc_hp() -> u32 {
    100
}

fn default_detection_chance() -> f32 {
    0.05
}

fn default_hazard_resistance() -> f32 {
    0.2
}

/// Capabilities an item can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemAbilityDef {
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

/// An item definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub name: String,
    pub desc: String,
    pub location: LocationRef,
    #[serde(default)]
    pub abilities: Vec<ItemAbilityDef>,
    /// Base damage for weapons, ignored otherwise.
    #[serde(default)]
    pub power: u32,
}

/// Authoring-time reference to an item's starting location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationRef {
    Inventory,
    Nowhere,
    Area(Id),
    Npc(Id),
}

/// Tunables for the NPC behavior and message pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDef {
    #[serde(default = "yes")]
    pub npcs_enabled: bool,
    /// Per-behavior overrides keyed by one of [`BEHAVIOR_KEYS`].
    #[serde(default)]
    pub behaviors: BTreeMap<String, BehaviorDef>,
    #[serde(default)]
    pub throttle: ThrottleDef,
    #[serde(default)]
    pub coordinator: CoordinatorDef,
    #[serde(default)]
    pub summary: SummaryDef,
    #[serde(default)]
    pub notifications: NotificationDef,
}

impl Default for PipelineDef {
    fn default() -> Self {
        Self {
            npcs_enabled: true,
            behaviors: BTreeMap::new(),
            throttle: ThrottleDef::default(),
            coordinator: CoordinatorDef::default(),
            summary: SummaryDef::default(),
            notifications: NotificationDef::default(),
        }
    }
}

fn yes() -> bool {
    true
}

/// Override for a single behavior type. Missing fields keep the built-in value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BehaviorDef {
    #[serde(default)]
    pub base_weight: Option<f32>,
    /// Multiplier; 1.0 leaves the base weight unchanged.
    #[serde(default)]
    pub frequency: Option<f32>,
    #[serde(default)]
    pub cooldown: Option<u32>,
}

/// Throttle profile selection plus optional overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleDef {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default)]
    pub global_cap: Option<usize>,
    #[serde(default)]
    pub quotas: BTreeMap<String, usize>,
    #[serde(default)]
    pub always_allowed: Option<Vec<String>>,
}

impl Default for ThrottleDef {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            global_cap: None,
            quotas: BTreeMap::new(),
            always_allowed: None,
        }
    }
}

fn default_profile() -> String {
    "standard".to_string()
}

/// Caps enforced by the turn coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoordinatorDef {
    #[serde(default = "default_global_actions")]
    pub global_cap: usize,
    #[serde(default = "default_per_npc_actions")]
    pub per_npc_cap: usize,
    #[serde(default = "default_npc_cooldown")]
    pub npc_cooldown: u32,
}

impl Default for CoordinatorDef {
    fn default() -> Self {
        Self {
            global_cap: default_global_actions(),
            per_npc_cap: default_per_npc_actions(),
            npc_cooldown: default_npc_cooldown(),
        }
    }
}

fn default_global_actions() -> usize {
    10
}

fn default_per_npc_actions() -> usize {
    2
}

fn default_npc_cooldown() -> u32 {
    1
}

/// End-of-turn summary limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryDef {
    #[serde(default = "default_summary_lines")]
    pub max_lines: usize,
}

impl Default for SummaryDef {
    fn default() -> Self {
        Self {
            max_lines: default_summary_lines(),
        }
    }
}

fn default_summary_lines() -> usize {
    6
}

/// Notification log limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationDef {
    #[serde(default = "default_max_notifications")]
    pub max_entries: usize,
    /// Turns between "unread notifications" reminders. 0 disables reminders.
    #[serde(default = "default_reminder_every")]
    pub reminder_every: u64,
}

impl Default for NotificationDef {
    fn default() -> Self {
        Self {
            max_entries: default_max_notifications(),
            reminder_every: default_reminder_every(),
        }
    }
}

fn default_max_notifications() -> usize {
    50
}

fn default_reminder_every() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pipeline_toml_uses_defaults() {
        let def: PipelineDef = toml::from_str("").expect("empty toml parses");
        assert!(def.npcs_enabled);
        assert_eq!(def.coordinator, CoordinatorDef::default());
        assert_eq!(def.throttle.profile, "standard");
        assert_eq!(def.summary.max_lines, 6);
        assert_eq!(def.notifications.max_entries, 50);
    }

    #[test]
    fn object_kinds_parse_from_tagged_tables() {
        let src = r#"
            id = "dumpster"
            name = "Dumpster"
            kind = { type = "hidingSpot", stealth_bonus = 0.5 }
        "#;
        let obj: ObjectDef = toml::from_str(src).expect("object parses");
        assert_eq!(obj.kind, ObjectKindDef::HidingSpot { stealth_bonus: 0.5 });

        let src = r#"
            id = "vent"
            name = "Leaky Vent"
            kind = { type = "hazard", effect = "hallucination" }
        "#;
        let obj: ObjectDef = toml::from_str(src).expect("hazard parses");
        assert_eq!(
            obj.kind,
            ObjectKindDef::Hazard {
                effect: EffectKindDef::Hallucination,
                duration: None
            }
        );
    }

    #[test]
    fn npc_defaults_fill_detection_and_resistance() {
        let src = r#"
            id = "buck"
            name = "Buck"
            desc = "A wiry lookout."
            area = "alley"
            gang = "bloodhounds"
        "#;
        let npc: NpcDef = toml::from_str(src).expect("npc parses");
        assert_eq!(npc.max_hp, 100);
        assert!((npc.detection_chance - 0.05).abs() < f32::EPSILON);
        assert!((npc.hazard_resistance - 0.2).abs() < f32::EPSILON);
    }
}
