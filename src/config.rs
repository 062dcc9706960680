//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to locate the config and persisted-state files.

mod load;
mod schema;

pub use load::{resolve_config_path, resolve_state_path};
pub use schema::*;
