//! Command module
//!
//! Parses player and admin input into [`Command`]s. Parsing never fails; anything
//! unrecognized becomes [`Command::Unknown`] and bad arguments are reported by the
//! handlers as a [`CommandError`].

use thiserror::Error;
use variantly::Variantly;

/// Commands understood by a session.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum Command {
    /// List every behavior's frequency and cooldown.
    BehaviorSettings,
    SetFrequency {
        behavior: String,
        value: String,
    },
    SetCooldown {
        behavior: String,
        value: String,
    },
    SetNpcsEnabled(bool),
    Notifications {
        count: Option<String>,
        category: Option<String>,
    },
    ClearNotifications,
    Hide(Option<String>),
    Unhide,
    UseItem(String),
    Hack {
        npc: String,
        hack: String,
    },
    Trigger(String),
    /// Walk to a neighboring area.
    MoveTo(String),
    Wait,
    Look,
    Help,
    Quit,
    /// Recognized verb, wrong shape.
    Usage(&'static str),
    Unknown,
}
impl Command {
    /// Whether carrying out this command lets the world advance a turn.
    pub fn takes_turn(&self) -> bool {
        matches!(
            self,
            Command::Hide(_)
                | Command::Unhide
                | Command::UseItem(_)
                | Command::Hack { .. }
                | Command::Trigger(_)
                | Command::MoveTo(_)
                | Command::Wait
        )
    }
}

/// Failures reported back to the player. The `Display` text is what they see.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown behavior: {0}")]
    UnknownBehavior(String),
    #[error("Frequency must be between 0 and 100.")]
    FrequencyOutOfRange,
    #[error("Cooldown must be a non-negative integer.")]
    InvalidCooldown,
    #[error("Unknown hack type: {0}. Try pacify, distract, or scramble.")]
    UnknownHack(String),
    #[error("You don't see anyone called '{0}' here.")]
    NoSuchNpc(String),
    #[error("There's no '{0}' here to trigger.")]
    NoSuchHazard(String),
    #[error("You can't get to '{0}' from here.")]
    NoSuchExit(String),
    #[error("There's nowhere to hide like that here: {0}")]
    NoSuchHidingSpot(String),
    #[error("You don't have {0}.")]
    MissingItem(String),
    #[error("Unknown notification category: {0}")]
    UnknownCategory(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

const SETTINGS_USAGE: &str = "behavior-settings [<behavior|all> frequency <0-100> | <behavior|all> cooldown <turns>]";
const HACK_USAGE: &str = "hack <npc> <pacify|distract|scramble>";
const NOTIFY_USAGE: &str = "notifications [count] [category] | notifications clear";

/// Parse a line of input into a `Command`.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    match words.as_slice() {
        ["behavior-settings" | "behaviour-settings" | "bs"] => Command::BehaviorSettings,
        ["behavior-settings" | "behaviour-settings" | "bs", behavior, "frequency" | "freq", value] => {
            Command::SetFrequency {
                behavior: (*behavior).to_string(),
                value: (*value).to_string(),
            }
        },
        ["behavior-settings" | "behaviour-settings" | "bs", behavior, "cooldown" | "cd", value] => {
            Command::SetCooldown {
                behavior: (*behavior).to_string(),
                value: (*value).to_string(),
            }
        },
        ["behavior-settings" | "behaviour-settings" | "bs", ..] => Command::Usage(SETTINGS_USAGE),
        ["npcs", "on"] => Command::SetNpcsEnabled(true),
        ["npcs", "off"] => Command::SetNpcsEnabled(false),
        ["npcs", ..] => Command::Usage("npcs on|off"),
        ["notifications" | "notes", "clear"] => Command::ClearNotifications,
        ["notifications" | "notes"] => Command::Notifications {
            count: None,
            category: None,
        },
        ["notifications" | "notes", arg] => {
            if arg.chars().all(|c| c.is_ascii_digit()) {
                Command::Notifications {
                    count: Some((*arg).to_string()),
                    category: None,
                }
            } else {
                Command::Notifications {
                    count: None,
                    category: Some((*arg).to_string()),
                }
            }
        },
        ["notifications" | "notes", count, category] => Command::Notifications {
            count: Some((*count).to_string()),
            category: Some((*category).to_string()),
        },
        ["notifications" | "notes", ..] => Command::Usage(NOTIFY_USAGE),
        ["hide"] => Command::Hide(None),
        ["hide", "in" | "behind" | "under" | "inside", spot @ ..] | ["hide", spot @ ..] => {
            Command::Hide(Some(spot.join(" ")))
        },
        ["unhide"] | ["stop", "hiding"] | ["come", "out"] => Command::Unhide,
        ["use", item @ ..] if !item.is_empty() => Command::UseItem(item.join(" ")),
        ["hack", npc, hack] => Command::Hack {
            npc: (*npc).to_string(),
            hack: (*hack).to_string(),
        },
        ["hack", ..] => Command::Usage(HACK_USAGE),
        ["trigger" | "activate", hazard @ ..] if !hazard.is_empty() => Command::Trigger(hazard.join(" ")),
        ["go" | "move" | "walk" | "head" | "enter", "to" | "into", dest @ ..] | ["go" | "move" | "walk" | "head" | "enter", dest @ ..]
            if !dest.is_empty() =>
        {
            Command::MoveTo(dest.join(" "))
        },
        ["go" | "move" | "walk" | "head" | "enter"] => Command::Usage("go <area>"),
        ["wait" | "z"] => Command::Wait,
        ["look" | "l"] => Command::Look,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        _ => Command::Unknown,
    }
}
