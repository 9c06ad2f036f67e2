#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Root Access **
//! Text adventure in a gang-run cyberpunk district.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use root_access_engine::repl::{run_script, run_unattended};
use root_access_engine::{Session, load_pipeline_config, load_scenario, run_repl};

const DEFAULT_SCENARIO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/scenario.toml");
const DEFAULT_PIPELINE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/pipeline.toml");

#[derive(Parser)]
#[command(author, version, about = "Root Access: a text adventure with a living, noisy cast.")]
struct Cli {
    /// Scenario file (TOML) describing areas, gangs, NPCs and items.
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    scenario: PathBuf,
    /// NPC behavior and message pipeline tuning (TOML). Falls back to defaults if unusable.
    #[arg(long, default_value = DEFAULT_PIPELINE)]
    config: PathBuf,
    /// Seed the random source for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,
    /// Run this many turns with the player waiting, then exit.
    #[arg(long, conflicts_with = "script")]
    turns: Option<u32>,
    /// Read commands from a file instead of the terminal.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Keep command history in this file.
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    info!("Start: loading scenario from '{}'", cli.scenario.display());
    let world = load_scenario(&cli.scenario).context("while loading scenario")?;
    let config = load_pipeline_config(&cli.config);
    let mut session = Session::new(world, &config, cli.seed);
    info!("Starting the game!");

    if let Some(turns) = cli.turns {
        run_unattended(&mut session, turns);
        return Ok(());
    }
    if let Some(script) = &cli.script {
        return run_script(&mut session, script);
    }
    run_repl(&mut session, cli.history)
}
