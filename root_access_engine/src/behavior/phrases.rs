//! Text fragments for NPC behaviors.
//!
//! Wording matters here: the message classifier keys off phrases such as
//! "talks", "using", "plants the" or "swats at", so each table stays inside the
//! vocabulary of the message type it is meant to produce.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Classified as idle.
pub const IDLE: &[&str] = &[
    "is standing around",
    "is waiting for something to happen",
    "is standing guard by the wall",
    "is idle, humming off-key",
];

/// Classified as unnoticed; used by gang members while the player is hidden nearby.
pub const UNNOTICED: &[&str] = &[
    "walks past your hiding spot",
    "doesn't notice you",
    "is looking the other way",
];

/// Conversation topics for "{name} talks with {other} about {topic}."
pub const TALK_TOPICS: &[&str] = &[
    "turf lines",
    "a botched deal",
    "a rumor from the docks",
    "who owes whom money",
    "the new security drones",
];

/// Classified as detailed hallucination.
pub const HALLUCINATION: &[&str] = &[
    "swats at invisible bats",
    "stares at a blank wall, transfixed",
    "is talking to a lamppost",
    "hides from a shadow only they can see",
    "laughs at a joke no one told",
];

/// Classified as "other"; shifty behavior that only ever shows up in summaries.
pub const SUSPICIOUS: &[&str] = &[
    "glances over their shoulder",
    "whispers into a burner phone",
    "keeps one eye on the exits",
];

/// Classified as friendly.
pub const FRIENDLY: &[&str] = &["smiles at you warmly", "smiles at you and nods"];

/// Items produced by crafting: (name, weapon power).
pub const CRAFTED: &[(&str, u32)] = &[("makeshift shiv", 8), ("pipe club", 10), ("zip-tie flail", 6)];

/// Pick a phrase at random (empty string for an empty table).
pub fn pick<'a, R: Rng>(table: &'a [&'a str], rng: &mut R) -> &'a str {
    table.choose(rng).copied().unwrap_or_default()
}
