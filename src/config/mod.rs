// src/config/mod.rs

//! Flow descriptions and configuration loading.
//!
//! Responsibilities:
//! - Define the declarative flow input and the TOML-backed file model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate flow structure: duplicates, self-loops, undeclared deps, cycles (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, ExecutorSection, FlowSpec, LoggingSection, RawConfigFile, TaskDescriptor,
};
pub use validate::validate_flow;
