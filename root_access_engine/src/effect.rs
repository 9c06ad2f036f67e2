//! Effect Module
//!
//! Timed status modifiers (hallucination, confusion, etc.) attached to actors.
//! Every effect counts down once per turn and is dropped from its holder on the
//! same pass that takes it to zero.

use std::fmt::Display;

use log::info;
use rand::Rng;
use root_access_data::EffectKindDef;
use serde::{Deserialize, Serialize};
use variantly::Variantly;

/// Chance that a confused actor loses its nerve on any single combat check.
pub const CONFUSION_COMBAT_CHANCE: f64 = 0.5;

/// Kinds of status effects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum EffectKind {
    Hallucination,
    Confusion,
    Friendliness,
    GiftGiving,
    FallingObjects,
    Other(String),
}
impl EffectKind {
    /// Duration applied when a hazard doesn't specify one.
    pub fn default_duration(&self) -> i32 {
        match self {
            EffectKind::Hallucination => 5,
            EffectKind::Confusion | EffectKind::GiftGiving => 3,
            EffectKind::Friendliness => 4,
            EffectKind::FallingObjects => 2,
            EffectKind::Other(_) => 1,
        }
    }

    fn default_description(&self) -> &'static str {
        match self {
            EffectKind::Hallucination => "Seeing things that aren't there.",
            EffectKind::Confusion => "Can't quite tell friend from foe.",
            EffectKind::Friendliness => "Feeling unusually warm toward everyone.",
            EffectKind::GiftGiving => "Overcome with generosity.",
            EffectKind::FallingObjects => "Dodging debris from above.",
            EffectKind::Other(_) => "Something odd is going on.",
        }
    }
}
impl Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::Hallucination => write!(f, "hallucinations"),
            EffectKind::Confusion => write!(f, "confusion"),
            EffectKind::Friendliness => write!(f, "friendliness"),
            EffectKind::GiftGiving => write!(f, "gift-giving"),
            EffectKind::FallingObjects => write!(f, "falling objects"),
            EffectKind::Other(name) => write!(f, "{name}"),
        }
    }
}
impl From<EffectKindDef> for EffectKind {
    fn from(value: EffectKindDef) -> Self {
        match value {
            EffectKindDef::Hallucination => EffectKind::Hallucination,
            EffectKindDef::Confusion => EffectKind::Confusion,
            EffectKindDef::Friendliness => EffectKind::Friendliness,
            EffectKindDef::GiftGiving => EffectKind::GiftGiving,
            EffectKindDef::FallingObjects => EffectKind::FallingObjects,
        }
    }
}

/// A timed status modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub name: String,
    pub description: String,
    pub remaining_turns: i32,
    pub stackable: bool,
}
impl Effect {
    /// Create a non-stackable effect of the given kind lasting `duration` turns.
    pub fn new(kind: EffectKind, duration: i32) -> Effect {
        Effect {
            name: kind.to_string(),
            description: kind.default_description().to_string(),
            kind,
            remaining_turns: duration,
            stackable: false,
        }
    }

    /// Create an effect with the default duration for its kind.
    pub fn with_default_duration(kind: EffectKind) -> Effect {
        let duration = kind.default_duration();
        Effect::new(kind, duration)
    }

    /// Count down one turn. Returns true once the effect has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining_turns -= 1;
        self.remaining_turns <= 0
    }

    /// Whether this effect keeps its holder from fighting on this check.
    ///
    /// Hallucinations always do. Confusion is re-rolled every time it is asked.
    pub fn affects_combat<R: Rng>(&self, rng: &mut R) -> bool {
        match self.kind {
            EffectKind::Hallucination => true,
            EffectKind::Confusion => rng.random_bool(CONFUSION_COMBAT_CHANCE),
            _ => false,
        }
    }
}
impl Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} turns left", self.name, self.remaining_turns)
    }
}

/// The set of effects currently active on one actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    effects: Vec<Effect>,
}
impl ActiveEffects {
    pub fn new() -> ActiveEffects {
        ActiveEffects::default()
    }

    /// Add an effect. A non-stackable effect refreshes an existing one of the same kind
    /// (keeping whichever has more turns left) instead of adding a second copy.
    pub fn add(&mut self, effect: Effect) {
        if !effect.stackable {
            if let Some(existing) = self.effects.iter_mut().find(|fx| fx.kind == effect.kind) {
                existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns);
                return;
            }
        }
        self.effects.push(effect);
    }

    pub fn has(&self, kind: &EffectKind) -> bool {
        self.effects.iter().any(|fx| &fx.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// True if any active effect suppresses combat on this check.
    pub fn suppresses_combat<R: Rng>(&self, rng: &mut R) -> bool {
        // every effect is consulted so each confusion roll is independent
        let mut suppressed = false;
        for fx in &self.effects {
            suppressed |= fx.affects_combat(rng);
        }
        suppressed
    }

    /// Tick every effect, removing and returning those that expired on this pass.
    pub fn tick_all(&mut self, holder: &str) -> Vec<Effect> {
        let mut expired = Vec::new();
        let mut ongoing = Vec::with_capacity(self.effects.len());
        for mut fx in self.effects.drain(..) {
            if fx.tick() {
                info!("{holder}: effect '{}' wore off", fx.name);
                expired.push(fx);
            } else {
                ongoing.push(fx);
            }
        }
        self.effects = ongoing;
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn tick_decrements_by_one_and_expires_at_zero() {
        let mut fx = Effect::new(EffectKind::Confusion, 3);
        assert!(!fx.tick());
        assert_eq!(fx.remaining_turns, 2);
        assert!(!fx.tick());
        assert_eq!(fx.remaining_turns, 1);
        assert!(fx.tick());
        assert_eq!(fx.remaining_turns, 0);
    }

    #[test]
    fn non_positive_duration_expires_on_first_tick() {
        let mut zero = Effect::new(EffectKind::Hallucination, 0);
        let mut negative = Effect::new(EffectKind::Hallucination, -2);
        assert!(zero.tick());
        assert!(negative.tick());
    }

    #[test]
    fn hallucination_always_blocks_combat() {
        let mut rng = StdRng::seed_from_u64(7);
        let fx = Effect::new(EffectKind::Hallucination, 5);
        assert!((0..100).all(|_| fx.affects_combat(&mut rng)));
    }

    #[test]
    fn confusion_blocks_combat_about_half_the_time() {
        let mut rng = StdRng::seed_from_u64(11);
        let fx = Effect::new(EffectKind::Confusion, 3);
        let blocked = (0..10_000).filter(|_| fx.affects_combat(&mut rng)).count();
        assert!((4_500..=5_500).contains(&blocked), "blocked {blocked} of 10000");
    }

    #[test]
    fn friendliness_never_blocks_combat_by_itself() {
        let mut rng = StdRng::seed_from_u64(3);
        let fx = Effect::new(EffectKind::Friendliness, 4);
        assert!(!(0..100).any(|_| fx.affects_combat(&mut rng)));
    }

    #[test]
    fn tick_all_removes_expired_in_same_pass() {
        let mut set = ActiveEffects::new();
        set.add(Effect::new(EffectKind::Confusion, 1));
        set.add(Effect::new(EffectKind::Hallucination, 2));
        let expired = set.tick_all("test");
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, EffectKind::Confusion);
        assert!(!set.has(&EffectKind::Confusion));
        assert!(set.has(&EffectKind::Hallucination));
    }

    #[test]
    fn non_stackable_effect_refreshes_instead_of_duplicating() {
        let mut set = ActiveEffects::new();
        set.add(Effect::new(EffectKind::Hallucination, 2));
        set.add(Effect::new(EffectKind::Hallucination, 5));
        assert_eq!(set.iter().count(), 1);
        assert_eq!(set.iter().next().map(|fx| fx.remaining_turns), Some(5));
    }
}
