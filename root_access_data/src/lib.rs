//! Shared data model for Root Access scenarios and pipeline configuration.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_pipeline, validate_scenario};
