//! Per-behavior tunables, owned by a session and adjustable at runtime.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use log::{info, warn};
use root_access_data::PipelineDef;

use super::{BehaviorMemory, BehaviorType};

/// Weight, frequency multiplier and cooldown for one behavior type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorParams {
    pub base_weight: f32,
    /// 1.0 leaves the base weight unchanged; shown to admins as a percentage.
    pub frequency: f32,
    /// Turns that must pass before the same NPC may repeat this behavior.
    pub cooldown: u32,
}
impl BehaviorParams {
    const fn new(base_weight: f32, cooldown: u32) -> BehaviorParams {
        BehaviorParams {
            base_weight,
            frequency: 1.0,
            cooldown,
        }
    }

    /// Frequency multiplier as a whole percentage.
    pub fn frequency_percent(&self) -> u32 {
        let pct = (self.frequency * 100.0).round().max(0.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = pct as u32;
        pct
    }
}

/// Behavior tunables for every NPC in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorSettings {
    params: BTreeMap<BehaviorType, BehaviorParams>,
    /// Master switch; when false no NPC takes a behavior step.
    pub npcs_enabled: bool,
}
impl Default for BehaviorSettings {
    fn default() -> Self {
        let params = BehaviorType::ALL
            .into_iter()
            .map(|kind| (kind, default_params(kind)))
            .collect();
        Self {
            params,
            npcs_enabled: true,
        }
    }
}
impl BehaviorSettings {
    /// Build settings from pipeline configuration, layering overrides over the defaults.
    /// Unknown behavior keys are skipped with a warning.
    pub fn from_def(def: &PipelineDef) -> BehaviorSettings {
        let mut settings = BehaviorSettings {
            npcs_enabled: def.npcs_enabled,
            ..BehaviorSettings::default()
        };
        for (key, over) in &def.behaviors {
            let Some(kind) = BehaviorType::from_key(key) else {
                warn!("ignoring settings for unknown behavior '{key}'");
                continue;
            };
            let params = settings.params_mut(kind);
            if let Some(weight) = over.base_weight {
                params.base_weight = weight.max(0.0);
            }
            if let Some(freq) = over.frequency {
                params.frequency = freq.max(0.0);
            }
            if let Some(cooldown) = over.cooldown {
                params.cooldown = cooldown;
            }
        }
        settings
    }

    pub fn params(&self, kind: BehaviorType) -> BehaviorParams {
        self.params.get(&kind).copied().unwrap_or_else(|| default_params(kind))
    }

    fn params_mut(&mut self, kind: BehaviorType) -> &mut BehaviorParams {
        self.params.entry(kind).or_insert_with(|| default_params(kind))
    }

    /// Set the frequency multiplier from a 0-100 percentage.
    pub fn set_frequency_percent(&mut self, kind: BehaviorType, percent: u32) {
        let percent = percent.min(100);
        #[allow(clippy::cast_precision_loss)]
        let multiplier = percent as f32 / 100.0;
        self.params_mut(kind).frequency = multiplier;
        info!("behavior '{kind}' frequency set to {percent}%");
    }

    pub fn set_cooldown(&mut self, kind: BehaviorType, turns: u32) {
        self.params_mut(kind).cooldown = turns;
        info!("behavior '{kind}' cooldown set to {turns} turns");
    }

    /// Whether an NPC with this memory may perform `kind` on `turn`.
    pub fn can_perform(&self, memory: &BehaviorMemory, kind: BehaviorType, turn: u64) -> bool {
        match memory.last_performed(kind) {
            Some(last) => turn.saturating_sub(last) >= u64::from(self.params(kind).cooldown),
            None => true,
        }
    }

    /// Human-readable listing for the `behavior-settings` admin command.
    pub fn describe(&self) -> String {
        let mut out = String::from("NPC Behavior Settings:");
        for kind in BehaviorType::ALL {
            let p = self.params(kind);
            let _ = write!(
                out,
                "\n  {kind}: frequency={}%, cooldown={} turns",
                p.frequency_percent(),
                p.cooldown
            );
        }
        if !self.npcs_enabled {
            out.push_str("\n  (NPC behaviors are currently disabled)");
        }
        out
    }
}

fn default_params(kind: BehaviorType) -> BehaviorParams {
    match kind {
        BehaviorType::Idle => BehaviorParams::new(0.2, 3),
        BehaviorType::Talk => BehaviorParams::new(0.3, 2),
        BehaviorType::Fight => BehaviorParams::new(0.1, 1),
        BehaviorType::UseItem => BehaviorParams::new(0.4, 1),
        BehaviorType::Gardening => BehaviorParams::new(0.1, 3),
        BehaviorType::Gift => BehaviorParams::new(0.05, 5),
        BehaviorType::Tech => BehaviorParams::new(0.05, 2),
        BehaviorType::Suspicious | BehaviorType::EnterSubArea | BehaviorType::ExitSubArea => {
            BehaviorParams::new(0.05, 2)
        },
        BehaviorType::Craft => BehaviorParams::new(0.05, 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use root_access_data::BehaviorDef;

    #[test]
    fn cooldown_blocks_repeat_until_elapsed() {
        let settings = BehaviorSettings::default();
        let mut memory = BehaviorMemory::default();
        memory.record(BehaviorType::Talk, 10);
        assert!(!settings.can_perform(&memory, BehaviorType::Talk, 10));
        assert!(!settings.can_perform(&memory, BehaviorType::Talk, 11));
        assert!(settings.can_perform(&memory, BehaviorType::Talk, 12));
        assert!(settings.can_perform(&memory, BehaviorType::Idle, 10));
    }

    #[test]
    fn zero_cooldown_allows_same_turn_repeat() {
        let mut settings = BehaviorSettings::default();
        settings.set_cooldown(BehaviorType::Fight, 0);
        let mut memory = BehaviorMemory::default();
        memory.record(BehaviorType::Fight, 4);
        assert!(settings.can_perform(&memory, BehaviorType::Fight, 4));
    }

    #[test]
    fn frequency_percent_round_trips() {
        let mut settings = BehaviorSettings::default();
        settings.set_frequency_percent(BehaviorType::Talk, 35);
        assert_eq!(settings.params(BehaviorType::Talk).frequency_percent(), 35);
        settings.set_frequency_percent(BehaviorType::Talk, 250);
        assert_eq!(settings.params(BehaviorType::Talk).frequency_percent(), 100);
    }

    #[test]
    fn describe_lists_every_behavior() {
        let text = BehaviorSettings::default().describe();
        assert!(text.starts_with("NPC Behavior Settings:"));
        assert!(text.contains("  talk: frequency=100%, cooldown=2 turns"));
        assert_eq!(text.lines().count(), 1 + BehaviorType::ALL.len());
    }

    #[test]
    fn config_overrides_layer_over_defaults() {
        let mut def = PipelineDef::default();
        def.behaviors.insert(
            "fight".into(),
            BehaviorDef {
                base_weight: Some(0.5),
                frequency: None,
                cooldown: Some(4),
            },
        );
        def.behaviors.insert("moonwalk".into(), BehaviorDef::default());
        let settings = BehaviorSettings::from_def(&def);
        let fight = settings.params(BehaviorType::Fight);
        assert!((fight.base_weight - 0.5).abs() < f32::EPSILON);
        assert_eq!(fight.cooldown, 4);
        assert!((fight.frequency - 1.0).abs() < f32::EPSILON);
    }
}
