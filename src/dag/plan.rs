// src/dag/plan.rs

//! Dry-run view of dispatch order.

use tracing::debug;

use crate::config::model::FlowSpec;
use crate::config::validate::validate_flow;
use crate::dag::frontier::Frontier;
use crate::errors::Result;
use crate::types::TaskName;

/// Successive ready sets the dispatch loop would extract for `flow`,
/// assuming no task fails.
///
/// Wave `n + 1` only contains tasks whose dependencies all appear in
/// waves `0..=n`. Within a wave, tasks keep FlowSpec order.
pub fn launch_waves(flow: &FlowSpec) -> Result<Vec<Vec<TaskName>>> {
    validate_flow(flow)?;

    let names: Vec<&str> = flow.names().collect();
    let adjacency: Vec<Vec<usize>> = flow
        .iter()
        .map(|task| {
            let mut deps: Vec<usize> = Vec::with_capacity(task.dependencies.len());
            for dep in task.dependencies.iter() {
                if let Some(id) = names.iter().position(|name| name == dep) {
                    if !deps.contains(&id) {
                        deps.push(id);
                    }
                }
            }
            deps
        })
        .collect();

    let mut frontier = Frontier::new(adjacency.iter().map(Vec::as_slice));
    let mut waves = Vec::new();

    while !frontier.is_empty() {
        let ready = frontier.take_ready();
        if ready.is_empty() {
            break;
        }
        let wave: Vec<TaskName> = ready.into_iter().map(|id| names[id].to_string()).collect();
        debug!(wave = waves.len(), tasks = ?wave, "launch wave");
        waves.push(wave);
    }

    Ok(waves)
}
