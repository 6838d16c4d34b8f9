// src/config/mod.rs

//! Configuration loading and validation for devloop.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated [`Config`] (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn raw stages into a checked `Pipeline` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path};
pub use model::{Config, ConfigSection, RawConfigFile, RawStage, WatchSection};
