// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::{ConfigFile, ExecutorSection, FlowSpec, RawConfigFile};
use crate::errors::{Result, TaskflowError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.executor, raw.logging, raw.flow))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_executor(&cfg.executor)?;
    for (name, flow) in cfg.flow.iter() {
        ensure_has_tasks(name, flow)?;
        validate_flow(flow).inspect_err(|err| {
            warn!(flow = %name, error = %err, "flow failed validation");
        })?;
    }
    Ok(())
}

fn validate_executor(executor: &ExecutorSection) -> Result<()> {
    if executor.thread_name.trim().is_empty() {
        return Err(TaskflowError::ConfigError(
            "[executor].thread_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_has_tasks(name: &str, flow: &FlowSpec) -> Result<()> {
    if flow.is_empty() {
        return Err(TaskflowError::ConfigError(format!(
            "flow '{name}' must contain at least one [[flow.{name}]] entry"
        )));
    }
    Ok(())
}

/// Check the structure of a single flow, independently of any registry.
///
/// Rejects duplicate task names, tasks depending on themselves,
/// dependencies on tasks not declared in the flow, and cycles.
pub fn validate_flow(flow: &FlowSpec) -> Result<()> {
    let declared = ensure_unique_names(flow)?;
    validate_task_dependencies(flow, &declared)?;
    validate_dag(flow)?;
    Ok(())
}

fn ensure_unique_names(flow: &FlowSpec) -> Result<HashSet<&str>> {
    let mut declared = HashSet::with_capacity(flow.len());
    for name in flow.names() {
        if !declared.insert(name) {
            return Err(TaskflowError::DuplicateTask(format!(
                "task '{name}' is declared more than once in the flow"
            )));
        }
    }
    Ok(declared)
}

fn validate_task_dependencies(flow: &FlowSpec, declared: &HashSet<&str>) -> Result<()> {
    for task in flow.iter() {
        for dep in task.dependencies.iter() {
            if dep == &task.name {
                return Err(TaskflowError::ConfigError(format!(
                    "task '{}' cannot depend on itself",
                    task.name
                )));
            }
            if !declared.contains(dep.as_str()) {
                return Err(TaskflowError::ConfigError(format!(
                    "task '{}' depends on '{}', which is not declared in the flow",
                    task.name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(flow: &FlowSpec) -> Result<()> {
    // Edge direction: dep -> task
    // For:
    //   [[flow.main]]
    //   task = "B"
    //   dependencies = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in flow.names() {
        graph.add_node(name);
    }

    for task in flow.iter() {
        for dep in task.dependencies.iter() {
            graph.add_edge(dep.as_str(), task.name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(TaskflowError::DagCycle(format!(
                "cycle detected in task DAG involving task '{}'",
                node
            )))
        }
    }
}
