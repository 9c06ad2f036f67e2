//! NPC message pipeline.
//!
//! Every line produced by the behavior coordinator or the hazard resolver goes
//! through [`MessagePipeline::submit`]. The line is classified, recorded for the
//! end-of-turn summary, and then either shown or held back by the throttle. Shown
//! lines that matter get copied into the notification log.
//!
//! Submodules:
//! - `classify`: the ordered rule table mapping raw text to a [`MessageType`]
//! - `throttle`: per-turn quotas, the global cap and within-turn dedup
//! - `summary`: buckets of suppressed activity rendered as compact sentences

pub mod classify;
pub mod summary;
pub mod throttle;

use std::fmt::Display;

use log::debug;
use root_access_data::PipelineDef;
use serde::{Deserialize, Serialize};

use crate::notification::{EscalationFilter, NotificationLog};

pub use classify::classify;
pub use summary::{PendingSummaryBucket, SummarySink, Summarizer};
pub use throttle::{ThrottleEngine, ThrottleProfile};

/// Message type tags, assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageType {
    Idle,
    Talk,
    Interact,
    Attack,
    Detection,
    Hallucination,
    HallucinationDetail,
    Friendly,
    Gift,
    FallingObject,
    HazardTrigger,
    Gardening,
    ResistHazard,
    Teleport,
    Unnoticed,
    Other,
}
impl MessageType {
    pub const ALL: [MessageType; 16] = [
        MessageType::Idle,
        MessageType::Talk,
        MessageType::Interact,
        MessageType::Attack,
        MessageType::Detection,
        MessageType::Hallucination,
        MessageType::HallucinationDetail,
        MessageType::Friendly,
        MessageType::Gift,
        MessageType::FallingObject,
        MessageType::HazardTrigger,
        MessageType::Gardening,
        MessageType::ResistHazard,
        MessageType::Teleport,
        MessageType::Unnoticed,
        MessageType::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MessageType::Idle => "idle",
            MessageType::Talk => "talk",
            MessageType::Interact => "interact",
            MessageType::Attack => "attack",
            MessageType::Detection => "detection",
            MessageType::Hallucination => "hallucination",
            MessageType::HallucinationDetail => "hallucination_detail",
            MessageType::Friendly => "friendly",
            MessageType::Gift => "gift",
            MessageType::FallingObject => "falling_object",
            MessageType::HazardTrigger => "hazard_trigger",
            MessageType::Gardening => "gardening",
            MessageType::ResistHazard => "resist_hazard",
            MessageType::Teleport => "teleport",
            MessageType::Unnoticed => "unnoticed",
            MessageType::Other => "other",
        }
    }

    /// Parse a configuration key (dashes allowed).
    pub fn from_key(key: &str) -> Option<MessageType> {
        let key = key.trim().to_lowercase().replace('-', "_");
        MessageType::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Fixed priority per type.
    pub fn priority(self) -> Priority {
        match self {
            MessageType::Detection => Priority::Critical,
            MessageType::Attack
            | MessageType::HazardTrigger
            | MessageType::Gardening
            | MessageType::HallucinationDetail => Priority::High,
            MessageType::Gift | MessageType::FallingObject | MessageType::Interact | MessageType::Teleport => {
                Priority::Medium
            },
            MessageType::Talk | MessageType::Friendly | MessageType::Hallucination | MessageType::Other => {
                Priority::Low
            },
            MessageType::ResistHazard | MessageType::Idle | MessageType::Unnoticed => Priority::Minimal,
        }
    }
}
impl Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Message priority, lowest first so that `>=` comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}
impl Priority {
    /// Notification importance on a 1-5 scale.
    pub fn importance(self) -> u8 {
        match self {
            Priority::Critical | Priority::High => 5,
            Priority::Medium => 3,
            Priority::Low => 2,
            Priority::Minimal => 1,
        }
    }
}

/// Who a message is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSource {
    pub name: String,
    /// Gang name, if any. Used only to separate summary groups.
    pub faction: Option<String>,
    pub is_player: bool,
}
impl MessageSource {
    pub fn npc(name: &str, faction: Option<&str>) -> MessageSource {
        MessageSource {
            name: name.to_string(),
            faction: faction.map(String::from),
            is_player: false,
        }
    }

    pub fn player(name: &str) -> MessageSource {
        MessageSource {
            name: name.to_string(),
            faction: None,
            is_player: true,
        }
    }
}

/// A classified line that made it past the throttle.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageType,
    pub priority: Priority,
    pub source: Option<MessageSource>,
    pub target: Option<String>,
}

/// The throttle, summarizer and notification log wired together for one session.
#[derive(Debug, Clone)]
pub struct MessagePipeline {
    pub throttle: ThrottleEngine,
    pub summarizer: Summarizer,
    pub escalation: EscalationFilter,
    pub notifications: NotificationLog,
    /// Lines accepted this turn, in submission order.
    shown: Vec<Message>,
}
impl Default for MessagePipeline {
    fn default() -> Self {
        MessagePipeline::from_def(&PipelineDef::default())
    }
}
impl MessagePipeline {
    pub fn from_def(def: &PipelineDef) -> MessagePipeline {
        MessagePipeline {
            throttle: ThrottleEngine::new(ThrottleProfile::from_def(&def.throttle)),
            summarizer: Summarizer::new(def.summary.max_lines),
            escalation: EscalationFilter,
            notifications: NotificationLog::new(def.notifications.max_entries, def.notifications.reminder_every),
            shown: Vec::new(),
        }
    }

    /// Reset per-turn state. Call once before any `submit` in a turn.
    pub fn start_turn(&mut self) {
        self.throttle.start_turn();
        self.shown.clear();
    }

    /// Push a raw line through the pipeline. Returns `true` if it is to be shown.
    pub fn submit(&mut self, text: &str, source: Option<&MessageSource>) -> bool {
        match self.throttle.submit(text, source, &mut self.summarizer) {
            Some(message) => {
                self.maybe_notify(&message);
                self.shown.push(message);
                true
            },
            None => false,
        }
    }

    /// Copy `message` into the notification log if it qualifies.
    pub fn maybe_notify(&mut self, message: &Message) {
        if let Some(note) = self.escalation.escalate(message) {
            debug!("escalating [{}] {}", note.category, message.text);
            self.notifications.push(note);
        }
    }

    /// Lines accepted so far this turn.
    pub fn shown(&self) -> &[Message] {
        &self.shown
    }

    /// Render and clear this turn's summary.
    pub fn flush_summary(&mut self) -> Option<String> {
        self.summarizer.flush_summary()
    }
}
