// src/types.rs

use clap::ValueEnum;
use serde::Deserialize;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Final state of a single node once its run is over.
///
/// Only `Succeeded` counts as success; the three other variants all fold
/// into a `false` boolean outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// The unit ran and reported success.
    Succeeded,
    /// The unit ran and reported failure, returned an error or panicked.
    Failed,
    /// The unit never ran because one of its dependencies did not succeed.
    Skipped,
    /// Dispatch stopped before this node was launched.
    NotLaunched,
}

impl NodeOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, NodeOutcome::Succeeded)
    }
}

impl From<bool> for NodeOutcome {
    fn from(success: bool) -> Self {
        if success {
            NodeOutcome::Succeeded
        } else {
            NodeOutcome::Failed
        }
    }
}

/// Log level, accepted both on the CLI and in the `[logging]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
