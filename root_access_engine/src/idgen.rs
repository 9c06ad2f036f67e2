//! ** idgen module **
//! Namespaces and helpers for generating stable v5 uuids for scenario-loaded objects.
//! Objects created during play (crafted items, etc.) use v4 (random) UUIDs instead.
use uuid::Uuid;

pub const NAMESPACE_AREA: Uuid = uuid::uuid!("5e0f3c2a-8b1d-4c7e-9a46-3d2b7f10c8e1");

pub const NAMESPACE_ITEM: Uuid = uuid::uuid!("b8a4d0e2-61f7-4f3a-8c55-0e9d27a4b6f3");

pub const NAMESPACE_CHARACTER: Uuid = uuid::uuid!("c17e92b4-3a58-4d0f-b6e1-7f4a2c9d8e05");

pub const NAMESPACE_GANG: Uuid = uuid::uuid!("0d3f6a19-e2c4-47b8-a5d0-94b1c6e7f2a8");

pub const NAMESPACE_OBJECT: Uuid = uuid::uuid!("e6a21b7c-9d40-4f85-8e3b-1c5f0a7d9b24");

/// Generate a v5 UUID for a given token id from the scenario data files.
///
/// Uses the namespaces above to keep areas / items / characters / gangs / objects apart.
pub fn uuid_from_token(namespace: &Uuid, token: &str) -> Uuid {
    Uuid::new_v5(namespace, token.as_bytes())
}

/// Random id for something that did not come from a scenario file.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_separate_identical_tokens() {
        let npc = uuid_from_token(&NAMESPACE_CHARACTER, "buck");
        let gang = uuid_from_token(&NAMESPACE_GANG, "buck");
        assert_ne!(npc, gang);
        assert_eq!(npc, uuid_from_token(&NAMESPACE_CHARACTER, "buck"));
    }
}
