#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const ROOT_ACCESS_VERSION: &str = env!("CARGO_PKG_VERSION");

// World model
pub mod area;
pub mod combat;
pub mod effect;
pub mod gang;
pub mod health;
pub mod idgen;
pub mod item;
pub mod npc;
pub mod player;
pub mod world;

// NPC behavior and message pipeline
pub mod behavior;
pub mod coordinator;
pub mod hazard;
pub mod message;
pub mod notification;

// Game surface
pub mod command;
pub mod loader;
pub mod repl;
pub mod session;
pub mod style;
pub mod view;

// Re-exports for convenience
pub use area::Area;
pub use item::{Item, ItemHolder};
pub use loader::{load_pipeline_config, load_scenario};
pub use npc::Npc;
pub use player::Player;
pub use repl::run_repl;
pub use session::{Session, TurnReport};
pub use view::{View, ViewItem};
pub use world::{Location, RootWorld, WorldObject};
