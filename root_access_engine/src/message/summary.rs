//! End-of-turn summaries.
//!
//! Every submitted line is recorded into a bucket keyed by (type, faction).
//! At the end of the turn each bucket becomes one sentence such as
//! "Rook, Vex, and 3 others are standing around." Buckets are cleared on every
//! flush whether or not anything was rendered.

use log::trace;

use super::MessageType;

/// Receives every classified line, shown or not.
pub trait SummarySink {
    fn record(&mut self, kind: MessageType, actor: Option<&str>, faction: Option<&str>, text: &str);
}

/// Activity of one type by one faction during the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSummaryBucket {
    pub kind: MessageType,
    /// Empty for faction-less actors.
    pub faction: String,
    /// (actor name, raw text); actor is `None` for anonymous lines.
    pub entries: Vec<(Option<String>, String)>,
}
impl PendingSummaryBucket {
    /// Actor names without repeats, in the order first seen.
    pub fn unique_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.entries.iter().filter_map(|(actor, _)| actor.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Distinct raw texts of anonymous entries, in the order first seen.
    fn anonymous_texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = Vec::new();
        for (_, text) in self.entries.iter().filter(|(actor, _)| actor.is_none()) {
            if !texts.contains(&text.as_str()) {
                texts.push(text);
            }
        }
        texts
    }
}

/// Verb phrase for a bucket: (one actor, several actors).
pub fn verb_phrase(kind: MessageType) -> (&'static str, &'static str) {
    match kind {
        MessageType::Idle => ("is standing around", "are standing around"),
        MessageType::Talk => ("is talking", "are talking to each other"),
        MessageType::Interact => ("is interacting with objects", "are interacting with objects"),
        MessageType::Attack => ("is on the attack", "are on the attack"),
        MessageType::Detection => ("has spotted you", "have spotted you"),
        MessageType::Hallucination => ("is hallucinating", "are hallucinating"),
        MessageType::HallucinationDetail => ("is seeing things", "are seeing things"),
        MessageType::Friendly => ("is acting unusually friendly", "are acting unusually friendly"),
        MessageType::Gift => ("gave you an item", "gave you items"),
        MessageType::FallingObject => ("was struck by a falling object", "were struck by falling objects"),
        MessageType::HazardTrigger => ("triggered a hazard", "triggered hazards"),
        MessageType::Gardening => ("is tending to plants", "are tending to plants"),
        MessageType::ResistHazard => ("resisted a hazard effect", "resisted hazard effects"),
        MessageType::Teleport => ("teleported", "teleported"),
        MessageType::Unnoticed => ("doesn't notice you", "don't notice you"),
        MessageType::Other => ("is up to something", "are up to something"),
    }
}

/// Sort rank: urgent activity first, background noise last.
fn rank(kind: MessageType) -> u8 {
    match kind {
        MessageType::Attack | MessageType::Detection | MessageType::HazardTrigger => 0,
        MessageType::FallingObject
        | MessageType::Gift
        | MessageType::Gardening
        | MessageType::HallucinationDetail
        | MessageType::ResistHazard => 1,
        MessageType::Talk
        | MessageType::Interact
        | MessageType::Friendly
        | MessageType::Hallucination
        | MessageType::Teleport => 2,
        MessageType::Other => 3,
        MessageType::Idle | MessageType::Unnoticed => 4,
    }
}

/// Render a group of names with the matching verb phrase.
pub fn render_names(names: &[&str], kind: MessageType) -> String {
    let (singular, plural) = verb_phrase(kind);
    match names {
        [] => String::new(),
        [one] => format!("{one} {singular}."),
        [_, _] | [_, _, _] => format!("{} {plural}.", names.join(", ")),
        [a, b, rest @ ..] => format!("{a}, {b}, and {} others {plural}.", rest.len()),
    }
}

/// Collects buckets during a turn and renders them at the end of it.
#[derive(Debug, Clone)]
pub struct Summarizer {
    buckets: Vec<PendingSummaryBucket>,
    max_lines: usize,
}
impl Summarizer {
    pub fn new(max_lines: usize) -> Summarizer {
        Summarizer {
            buckets: Vec::new(),
            max_lines,
        }
    }

    pub fn buckets(&self) -> &[PendingSummaryBucket] {
        &self.buckets
    }

    /// Total entries across all buckets.
    pub fn pending_entries(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }

    /// Render every bucket into at most `max_lines` lines joined by newlines,
    /// then clear all buckets. `None` if nothing was recorded.
    pub fn flush_summary(&mut self) -> Option<String> {
        let mut buckets = std::mem::take(&mut self.buckets);
        // stable: buckets of equal rank keep first-seen order
        buckets.sort_by_key(|b| rank(b.kind));

        let mut lines: Vec<String> = Vec::new();
        for bucket in &buckets {
            let names = bucket.unique_names();
            if !names.is_empty() {
                lines.push(render_names(&names, bucket.kind));
            }
            lines.extend(bucket.anonymous_texts().into_iter().map(String::from));
        }
        lines.truncate(self.max_lines);
        trace!("summary flushed {} bucket(s) into {} line(s)", buckets.len(), lines.len());
        if lines.is_empty() { None } else { Some(lines.join("\n")) }
    }
}
impl SummarySink for Summarizer {
    fn record(&mut self, kind: MessageType, actor: Option<&str>, faction: Option<&str>, text: &str) {
        let faction = faction.unwrap_or_default();
        let entry = (actor.map(String::from), text.to_string());
        match self
            .buckets
            .iter_mut()
            .find(|b| b.kind == kind && b.faction == faction)
        {
            Some(bucket) => bucket.entries.push(entry),
            None => self.buckets.push(PendingSummaryBucket {
                kind,
                faction: faction.to_string(),
                entries: vec![entry],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_idle(summarizer: &mut Summarizer, names: &[&str], faction: Option<&str>) {
        for name in names {
            summarizer.record(
                MessageType::Idle,
                Some(name),
                faction,
                &format!("{name} is standing around."),
            );
        }
    }

    #[test]
    fn five_idlers_collapse_to_two_names_and_a_count() {
        let mut summarizer = Summarizer::new(6);
        record_idle(&mut summarizer, &["A", "B", "C", "D", "E"], Some("Bloodhounds"));
        assert_eq!(
            summarizer.flush_summary().as_deref(),
            Some("A, B, and 3 others are standing around.")
        );
    }

    #[test]
    fn small_groups_list_every_name_once() {
        let mut summarizer = Summarizer::new(6);
        record_idle(&mut summarizer, &["A", "B", "A", "C"], None);
        assert_eq!(
            summarizer.flush_summary().as_deref(),
            Some("A, B, C are standing around.")
        );
        record_idle(&mut summarizer, &["Solo"], None);
        assert_eq!(summarizer.flush_summary().as_deref(), Some("Solo is standing around."));
    }

    #[test]
    fn factions_split_groups_and_attacks_sort_first() {
        let mut summarizer = Summarizer::new(6);
        record_idle(&mut summarizer, &["A"], Some("Bloodhounds"));
        record_idle(&mut summarizer, &["B"], Some("Vipers"));
        summarizer.record(MessageType::Attack, Some("C"), Some("Vipers"), "C attacks A.");
        let summary = summarizer.flush_summary().unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines,
            vec!["C is on the attack.", "A is standing around.", "B is standing around."]
        );
    }

    #[test]
    fn anonymous_text_renders_raw_and_lines_are_capped() {
        let mut summarizer = Summarizer::new(2);
        summarizer.record(MessageType::FallingObject, None, None, "A ceiling tile falls.");
        summarizer.record(MessageType::FallingObject, None, None, "A ceiling tile falls.");
        record_idle(&mut summarizer, &["A"], None);
        summarizer.record(MessageType::Talk, Some("B"), None, "B talks.");
        let summary = summarizer.flush_summary().unwrap();
        assert_eq!(summary, "A ceiling tile falls.\nB is talking.");
    }

    #[test]
    fn flush_always_empties_buckets() {
        let mut summarizer = Summarizer::new(0);
        record_idle(&mut summarizer, &["A", "B"], None);
        assert_eq!(summarizer.pending_entries(), 2);
        assert_eq!(summarizer.flush_summary(), None);
        assert!(summarizer.buckets().is_empty());
        assert_eq!(summarizer.flush_summary(), None);
    }
}
