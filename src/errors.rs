// src/errors.rs

//! Crate-wide error type.
//!
//! Everything that can go wrong *before* a flow starts executing (unknown
//! tasks, duplicate names, cycles, unreadable config) is reported through
//! [`TaskflowError`]. Unit failures at run time are not errors: they are
//! folded into the outcome of the node that produced them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskflowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Duplicate task: {0}")]
    DuplicateTask(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskflowError>;
