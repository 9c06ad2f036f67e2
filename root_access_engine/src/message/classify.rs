//! Text classifier: one ordered rule table, first match wins.

use super::MessageType;

/// How a rule's keywords must appear in the lowercased text.
#[derive(Debug, Clone, Copy)]
enum Needles {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}
impl Needles {
    fn matches(self, text: &str) -> bool {
        match self {
            Needles::Any(words) => words.iter().any(|w| text.contains(w)),
            Needles::All(words) => words.iter().all(|w| text.contains(w)),
        }
    }
}

// Order matters: hazard and gardening phrasing would otherwise be caught by the
// broader attack / interact keywords further down.
const RULES: &[(MessageType, Needles)] = &[
    (
        MessageType::HazardTrigger,
        Needles::Any(&[
            "triggers the",
            "sets off the",
            "activates the",
            "fumbles with",
            "accidentally triggers",
        ]),
    ),
    (
        MessageType::Gardening,
        Needles::Any(&[
            "waters the",
            "plants the",
            "harvests the",
            "applies fertilizer",
            "garden",
            "planting",
            "watering",
        ]),
    ),
    (MessageType::Teleport, Needles::Any(&["teleport"])),
    (MessageType::ResistHazard, Needles::All(&["resists the", "effect"])),
    (MessageType::Detection, Needles::Any(&["spots you", "has spotted you"])),
    (
        MessageType::HallucinationDetail,
        Needles::Any(&[
            "sees ",
            "imagines ",
            "thinks ",
            "believes ",
            "hallucinates ",
            "visualizes ",
            "perceives ",
            "screams about ",
            "yells about ",
            "mutters about ",
            "swats at ",
            "runs from ",
            "hides from ",
            "stares at ",
            "points at ",
            "laughs at ",
            "confused by ",
            "startled by ",
            "terrified of ",
            "dancing with ",
            "talking to ",
            "arguing with ",
            "fighting with ",
            "fleeing from ",
            "cowering from ",
        ]),
    ),
    (MessageType::Attack, Needles::Any(&["attack", "damage", "health"])),
    (
        MessageType::Hallucination,
        Needles::Any(&[
            "hallucinating",
            "hallucination",
            "seeing things",
            "affected by hallucinations",
        ]),
    ),
    (
        MessageType::Friendly,
        Needles::Any(&["friendly", "friendliness", "smiles at you"]),
    ),
    (MessageType::Gift, Needles::Any(&["gives you", "gift"])),
    (
        MessageType::FallingObject,
        Needles::Any(&["falls", "falling", "struck by"]),
    ),
    (
        MessageType::Unnoticed,
        Needles::Any(&[
            "doesn't notice",
            "unaware",
            "looking away",
            "hasn't spotted",
            "looking the other way",
            "distracted",
            "fails to notice",
            "oblivious",
            "walks past your hiding spot",
        ]),
    ),
    (MessageType::Talk, Needles::Any(&["talk", "says", "speaking"])),
    (MessageType::Interact, Needles::Any(&["interact", "using", "picks up"])),
    (MessageType::Idle, Needles::Any(&["standing", "idle", "waiting"])),
];

/// Tag `text` with its message type. Anything unmatched is [`MessageType::Other`].
pub fn classify(text: &str) -> MessageType {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, needles)| needles.matches(&lowered))
        .map_or(MessageType::Other, |(kind, _)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavior_lines_land_in_expected_types() {
        let cases = [
            ("Rook is standing around.", MessageType::Idle),
            ("Rook talks with Vex about turf lines.", MessageType::Talk),
            ("Rook is using the Rusty Wrench.", MessageType::Interact),
            ("Rook picks up the Soda Can.", MessageType::Interact),
            ("Rook attacks Vex bare-handed, dealing 5 damage.", MessageType::Attack),
            ("Buck of the Bloodhounds spots you!", MessageType::Detection),
            ("Rook swats at invisible bats.", MessageType::HallucinationDetail),
            ("Mara smiles at you warmly.", MessageType::Friendly),
            ("Mara gives you the Soda Can.", MessageType::Gift),
            ("Rook is struck by falling debris.", MessageType::FallingObject),
            ("Rook walks past your hiding spot.", MessageType::Unnoticed),
            ("Mara plants the Tomato Seed in the Planter.", MessageType::Gardening),
            ("Rook glances over their shoulder.", MessageType::Other),
        ];
        for (text, expected) in cases {
            assert_eq!(classify(text), expected, "{text}");
        }
    }

    #[test]
    fn earlier_rules_win() {
        // "triggers the" beats the attack keyword in "attack drone"
        assert_eq!(classify("Neo triggers the attack drone!"), MessageType::HazardTrigger);
        // "talking to " is hallucination detail, not talk
        assert_eq!(classify("Rook is talking to a lamppost."), MessageType::HallucinationDetail);
        assert_eq!(classify("Rook resists the Gas Vent effect!"), MessageType::ResistHazard);
    }

    #[test]
    fn resist_requires_every_keyword() {
        assert_eq!(classify("Rook resists the urge to leave."), MessageType::Other);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("ROOK IS STANDING AROUND"), MessageType::Idle);
    }
}
