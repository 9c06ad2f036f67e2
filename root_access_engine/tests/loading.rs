use std::io::Write;
use std::path::{Path, PathBuf};

use root_access_engine::{Session, load_pipeline_config, load_scenario};
use tempfile::NamedTempFile;

fn bundled(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn temp_toml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

const SMALL_SCENARIO: &str = r#"
title = "Small"

[player]
name = "Wren"
description = "an intruder"
start_area = "alley"

[[areas]]
id = "alley"
name = "Back Alley"
desc = "Wet."

[[areas.objects]]
id = "dumpster"
name = "Dumpster"
kind = { type = "hidingSpot", stealth_bonus = 0.5 }

[[gangs]]
id = "hounds"
name = "Bloodhounds"

[[npcs]]
id = "buck"
name = "Buck"
desc = "A lookout."
area = "alley"
gang = "hounds"

[[items]]
id = "smoke"
name = "Smoke Bomb"
desc = "Pull the ring."
location = "Inventory"
abilities = ["smoke_bomb"]
"#;

#[test]
fn bundled_data_loads() {
    let world = load_scenario(&bundled("scenario.toml")).expect("bundled scenario loads");
    assert_eq!(world.title, "ROOT ACCESS");
    assert_eq!(world.gangs.len(), 2);
    assert!(world.player_area_ref().is_ok());
    assert!(!world.player.inventory.is_empty());

    let config = load_pipeline_config(&bundled("pipeline.toml"));
    assert_eq!(config.throttle.profile, "standard");
    assert_eq!(config.behaviors["fight"].cooldown, Some(2));
}

#[test]
fn scenario_from_temp_file_plays() {
    let file = temp_toml(SMALL_SCENARIO);
    let world = load_scenario(file.path()).expect("scenario loads");
    let config = load_pipeline_config(Path::new("/no/such/pipeline.toml"));
    let mut session = Session::new(world, &config, Some(5));

    let report = session.handle_input("hide dumpster");
    assert_eq!(report.response, vec!["You hide in the Dumpster.".to_string()]);
    assert!(report.turn_advanced);
    assert_eq!(session.world.turn_count, 1);

    session.world.player.mark_detected("Bloodhounds");
    let report = session.handle_input("use smoke bomb");
    assert!(report.response[0].contains("The Bloodhounds lose track of you."));
    assert!(session.world.player.inventory.is_empty());
}

#[test]
fn broken_scenario_is_an_error() {
    let file = temp_toml(&SMALL_SCENARIO.replace("start_area = \"alley\"", "start_area = \"roof\""));
    let err = load_scenario(file.path()).expect_err("unknown start area");
    assert!(format!("{err:#}").contains("roof"));

    let file = temp_toml("title = ");
    assert!(load_scenario(file.path()).is_err());
}

#[test]
fn bad_pipeline_config_falls_back_to_defaults() {
    let file = temp_toml("[coordinator]\nper_npc_cap = 0\n");
    let config = load_pipeline_config(file.path());
    assert_eq!(config.coordinator.per_npc_cap, 2);
}

#[test]
fn triggering_a_hazard_reports_the_player_first() {
    let world = load_scenario(&bundled("scenario.toml")).expect("bundled scenario loads");
    let mut session = Session::new(world, &Default::default(), Some(3));
    let report = session.handle_input("trigger vent");
    assert!(report.turn_advanced);
    assert_eq!(report.shown.first().map(String::as_str), Some("Wren triggers the Leaky Vent!"));
    assert!(session.pipeline.notifications.unread_count() >= 1);

    let report = session.handle_input("trigger piano");
    assert!(!report.turn_advanced);
}

#[test]
fn seeded_sessions_repeat_exactly() {
    let run = |seed| {
        let world = load_scenario(&bundled("scenario.toml")).expect("bundled scenario loads");
        let config = load_pipeline_config(&bundled("pipeline.toml"));
        let mut session = Session::new(world, &config, Some(seed));
        (0..15).map(|_| session.handle_input("wait")).collect::<Vec<_>>()
    };
    assert_eq!(run(99), run(99));
}
