//! Loader utilities for building a `RootWorld` and the pipeline configuration
//! from TOML data files.
//!
//! Scenarios are required: a scenario that fails to parse or validate is an error.
//! The pipeline configuration is optional: anything wrong with it is logged and
//! the built-in defaults are used instead.

pub mod config;
pub mod scenario;

pub use config::load_pipeline_config;
pub use scenario::{build_world, load_scenario};
