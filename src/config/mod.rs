// src/config/mod.rs

//! Optional TOML configuration.
//!
//! - `model.rs`: the data model and its defaults.
//! - `loader.rs`: reading from disk.
//! - `validate.rs`: `RawConfigFile` → `ConfigFile` checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ChildSection, ConfigFile, DisplaySection, LaunchSection, RawConfigFile};
