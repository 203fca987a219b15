// src/dag/report.rs

//! Aggregate result of one flow run.

use std::time::Duration;

use crate::types::{NodeOutcome, TaskName};

/// Structured result of a single run.
///
/// `run_flow` only exposes [`success`](Self::success); tests and callers
/// that need to know *why* a run failed can inspect the rest.
#[derive(Debug, Clone)]
pub struct FlowReport {
    /// Per-task outcome, in FlowSpec order.
    outcomes: Vec<(TaskName, NodeOutcome)>,
    /// Why the flow was refused before any unit ran, if it was.
    rejection: Option<String>,
    /// Task whose launch was refused because a dependency had already failed.
    halted_at: Option<TaskName>,
    elapsed: Duration,
}

impl FlowReport {
    pub(crate) fn completed(
        outcomes: Vec<(TaskName, NodeOutcome)>,
        halted_at: Option<TaskName>,
        elapsed: Duration,
    ) -> Self {
        Self {
            outcomes,
            rejection: None,
            halted_at,
            elapsed,
        }
    }

    pub(crate) fn rejected(reason: String, elapsed: Duration) -> Self {
        Self {
            outcomes: Vec::new(),
            rejection: Some(reason),
            halted_at: None,
            elapsed,
        }
    }

    /// True iff the flow was accepted and every node succeeded.
    pub fn success(&self) -> bool {
        self.rejection.is_none() && self.outcomes.iter().all(|(_, o)| o.is_success())
    }

    pub fn outcomes(&self) -> &[(TaskName, NodeOutcome)] {
        &self.outcomes
    }

    pub fn outcome_of(&self, task: &str) -> Option<NodeOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == task)
            .map(|(_, outcome)| *outcome)
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    pub fn halted_at(&self) -> Option<&str> {
        self.halted_at.as_deref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn succeeded_tasks(&self) -> Vec<&str> {
        self.tasks_with(NodeOutcome::Succeeded)
    }

    pub fn failed_tasks(&self) -> Vec<&str> {
        self.tasks_with(NodeOutcome::Failed)
    }

    pub fn skipped_tasks(&self) -> Vec<&str> {
        self.tasks_with(NodeOutcome::Skipped)
    }

    pub fn not_launched_tasks(&self) -> Vec<&str> {
        self.tasks_with(NodeOutcome::NotLaunched)
    }

    fn tasks_with(&self, wanted: NodeOutcome) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == wanted)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
