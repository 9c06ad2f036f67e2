//! Per-turn message throttling.
//!
//! Each line passes these gates in order: empty/duplicate text, recording into the
//! summary, the global cap (bypassed by always-allowed types), then the per-type
//! quota. A quota of zero makes a type summary-only; `other` is always summary-only.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use root_access_data::ThrottleDef;

use super::summary::SummarySink;
use super::{Message, MessageSource, MessageType, classify};

/// Quotas and caps used by a [`ThrottleEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleProfile {
    pub name: String,
    pub global_cap: usize,
    pub quotas: HashMap<MessageType, usize>,
    pub always_allowed: HashSet<MessageType>,
}
impl ThrottleProfile {
    /// Default profile.
    pub fn standard() -> ThrottleProfile {
        let quotas = HashMap::from([
            (MessageType::Idle, 0),
            (MessageType::Talk, 1),
            (MessageType::Interact, 1),
            (MessageType::Attack, 2),
            (MessageType::Detection, 1),
            (MessageType::Hallucination, 0),
            (MessageType::HallucinationDetail, 5),
            (MessageType::Friendly, 2),
            (MessageType::Gift, 2),
            (MessageType::FallingObject, 2),
            (MessageType::HazardTrigger, 3),
            (MessageType::Gardening, 2),
            (MessageType::ResistHazard, 1),
            (MessageType::Teleport, 1),
            (MessageType::Unnoticed, 0),
        ]);
        ThrottleProfile {
            name: "standard".to_string(),
            global_cap: 10,
            quotas,
            always_allowed: HashSet::from([MessageType::Attack]),
        }
    }

    /// Tighter profile for crowded areas.
    pub fn strict() -> ThrottleProfile {
        ThrottleProfile {
            name: "strict".to_string(),
            global_cap: 5,
            always_allowed: HashSet::from([MessageType::Attack, MessageType::HazardTrigger]),
            ..ThrottleProfile::standard()
        }
    }

    pub fn by_name(name: &str) -> Option<ThrottleProfile> {
        match name.trim().to_lowercase().as_str() {
            "standard" => Some(ThrottleProfile::standard()),
            "strict" => Some(ThrottleProfile::strict()),
            _ => None,
        }
    }

    /// Build a profile from config: a named base with optional overrides.
    /// Unknown names and keys are logged and ignored.
    pub fn from_def(def: &ThrottleDef) -> ThrottleProfile {
        let mut profile = ThrottleProfile::by_name(&def.profile).unwrap_or_else(|| {
            warn!("unknown throttle profile '{}', using standard", def.profile);
            ThrottleProfile::standard()
        });
        if let Some(cap) = def.global_cap {
            profile.global_cap = cap;
        }
        for (key, quota) in &def.quotas {
            match MessageType::from_key(key) {
                Some(MessageType::Other) => warn!("'other' messages are never shown; quota ignored"),
                Some(kind) => {
                    profile.quotas.insert(kind, *quota);
                },
                None => warn!("unknown message type '{key}' in throttle quotas"),
            }
        }
        if let Some(keys) = &def.always_allowed {
            profile.always_allowed = keys
                .iter()
                .filter_map(|key| {
                    let kind = MessageType::from_key(key);
                    if kind.is_none() {
                        warn!("unknown message type '{key}' in always_allowed");
                    }
                    kind
                })
                .collect();
        }
        profile
    }

    /// How many lines of `kind` may be shown per turn.
    pub fn quota(&self, kind: MessageType) -> usize {
        if kind == MessageType::Other {
            return 0;
        }
        self.quotas.get(&kind).copied().unwrap_or(1)
    }
}
impl Default for ThrottleProfile {
    fn default() -> Self {
        ThrottleProfile::standard()
    }
}

/// Decides, line by line, what the player sees this turn.
#[derive(Debug, Clone)]
pub struct ThrottleEngine {
    profile: ThrottleProfile,
    shown_by_type: HashMap<MessageType, usize>,
    global_shown: usize,
    /// Always-allowed lines accepted after the global cap was reached.
    overflow_shown: usize,
    seen: HashSet<String>,
}
impl ThrottleEngine {
    pub fn new(profile: ThrottleProfile) -> ThrottleEngine {
        ThrottleEngine {
            profile,
            shown_by_type: HashMap::new(),
            global_shown: 0,
            overflow_shown: 0,
            seen: HashSet::new(),
        }
    }

    pub fn profile(&self) -> &ThrottleProfile {
        &self.profile
    }

    /// Lines counted against the global cap this turn. Never exceeds the cap.
    pub fn global_shown(&self) -> usize {
        self.global_shown
    }

    /// Always-allowed lines shown past the global cap this turn.
    pub fn overflow_shown(&self) -> usize {
        self.overflow_shown
    }

    pub fn shown_of(&self, kind: MessageType) -> usize {
        self.shown_by_type.get(&kind).copied().unwrap_or(0)
    }

    /// Reset per-turn counters and the duplicate filter.
    pub fn start_turn(&mut self) {
        self.shown_by_type.clear();
        self.global_shown = 0;
        self.overflow_shown = 0;
        self.seen.clear();
    }

    /// Run one line through the throttle. Returns the accepted message, or `None`
    /// if it is held back (it may still appear in the summary).
    pub fn submit<S: SummarySink>(
        &mut self,
        text: &str,
        source: Option<&MessageSource>,
        sink: &mut S,
    ) -> Option<Message> {
        let text = text.trim();
        if text.is_empty() || !self.seen.insert(text.to_string()) {
            trace!("dropped empty or duplicate line: {text:?}");
            return None;
        }

        let kind = classify(text);
        sink.record(
            kind,
            source.map(|s| s.name.as_str()),
            source.and_then(|s| s.faction.as_deref()),
            text,
        );

        let over_cap = self.global_shown >= self.profile.global_cap;
        if over_cap && !self.profile.always_allowed.contains(&kind) {
            debug!("global cap reached, summarizing [{kind}] {text}");
            return None;
        }
        if self.shown_of(kind) >= self.profile.quota(kind) {
            debug!("quota for {kind} reached, summarizing: {text}");
            return None;
        }

        *self.shown_by_type.entry(kind).or_insert(0) += 1;
        if over_cap {
            self.overflow_shown += 1;
        } else {
            self.global_shown += 1;
        }
        trace!("showing [{kind}] {text}");
        Some(Message {
            text: text.to_string(),
            kind,
            priority: kind.priority(),
            source: source.cloned(),
            target: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Summarizer;

    fn engine(profile: ThrottleProfile) -> (ThrottleEngine, Summarizer) {
        let mut engine = ThrottleEngine::new(profile);
        engine.start_turn();
        (engine, Summarizer::new(6))
    }

    #[test]
    fn duplicates_are_dropped_and_not_rebucketed() {
        let (mut throttle, mut summary) = engine(ThrottleProfile::standard());
        let src = MessageSource::npc("Mara", None);
        let line = "Mara gives you the Soda Can.";
        assert!(throttle.submit(line, Some(&src), &mut summary).is_some());
        assert!(throttle.submit(line, Some(&src), &mut summary).is_none());
        assert_eq!(summary.pending_entries(), 1);
        throttle.start_turn();
        assert!(throttle.submit(line, Some(&src), &mut summary).is_some());
    }

    #[test]
    fn empty_lines_are_ignored_entirely() {
        let (mut throttle, mut summary) = engine(ThrottleProfile::standard());
        assert!(throttle.submit("   ", None, &mut summary).is_none());
        assert_eq!(summary.pending_entries(), 0);
    }

    #[test]
    fn quota_limits_each_type_and_zero_means_summary_only() {
        let (mut throttle, mut summary) = engine(ThrottleProfile::standard());
        let talk_a = throttle.submit("A talks with B about turf lines.", None, &mut summary);
        let talk_b = throttle.submit("B talks with A about a botched deal.", None, &mut summary);
        assert!(talk_a.is_some());
        assert!(talk_b.is_none());
        assert!(throttle.submit("C is standing around.", None, &mut summary).is_none());
        assert!(throttle.submit("D glances over their shoulder.", None, &mut summary).is_none());
        assert_eq!(summary.pending_entries(), 4);
    }

    #[test]
    fn global_cap_holds_but_attacks_get_through() {
        let mut profile = ThrottleProfile::strict();
        profile.global_cap = 2;
        let (mut throttle, mut summary) = engine(profile);
        for i in 0..5 {
            throttle.submit(&format!("N{i} swats at invisible bats."), None, &mut summary);
        }
        assert_eq!(throttle.global_shown(), 2);
        let attack = throttle.submit("N9 attacks N1 bare-handed, dealing 4 damage.", None, &mut summary);
        assert!(attack.is_some());
        assert_eq!(throttle.global_shown(), 2);
        assert_eq!(throttle.overflow_shown(), 1);
    }

    #[test]
    fn config_overrides_apply_on_top_of_named_profile() {
        let def = ThrottleDef {
            profile: "strict".into(),
            global_cap: Some(7),
            quotas: [("idle".to_string(), 3), ("bogus".to_string(), 1)].into_iter().collect(),
            always_allowed: None,
        };
        let profile = ThrottleProfile::from_def(&def);
        assert_eq!(profile.name, "strict");
        assert_eq!(profile.global_cap, 7);
        assert_eq!(profile.quota(MessageType::Idle), 3);
        assert!(profile.always_allowed.contains(&MessageType::HazardTrigger));
        assert_eq!(profile.quota(MessageType::Other), 0);
    }
}
