// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::model::FlowSpec;
use crate::config::validate::validate_flow;
use crate::dag::frontier::Frontier;
use crate::dag::node::{ExecutionNode, NodeId};
use crate::errors::{Result, TaskflowError};
use crate::exec::task_runner::BoundTask;
use crate::registry::TaskRegistry;
use crate::session::TaskSession;
use crate::task::TaskUnit;

/// Per-run dependency graph: an arena of [`ExecutionNode`]s indexed by
/// [`NodeId`], each listing the nodes it depends on.
///
/// Built fresh for every run; nodes are never shared between runs.
#[derive(Debug)]
pub struct DependencyGraph {
    nodes: Vec<ExecutionNode>,
    index: HashMap<String, NodeId>,
    session: Arc<TaskSession>,
}

impl DependencyGraph {
    /// Build the graph for one run of `flow`, binding every unit to `session`.
    ///
    /// Fails, without creating any node, if:
    /// - a task or dependency name is unknown to `registry`,
    /// - the flow is structurally invalid (duplicate names, self or
    ///   undeclared dependencies, cycles).
    pub fn build(
        flow: &FlowSpec,
        registry: &dyn TaskRegistry,
        session: Arc<TaskSession>,
    ) -> Result<Self> {
        let units = resolve_units(flow, registry)?;
        validate_flow(flow).inspect_err(|err| {
            warn!(error = %err, "flow structure is invalid");
        })?;

        let index: HashMap<String, NodeId> = flow
            .names()
            .enumerate()
            .map(|(id, name)| (name.to_string(), id))
            .collect();

        let mut nodes = Vec::with_capacity(flow.len());
        for task in flow.iter() {
            info!(task = %task.name, "add task");

            let unit = units
                .get(task.name.as_str())
                .cloned()
                .ok_or_else(|| TaskflowError::TaskNotFound(task.name.clone()))?;
            let mut bound = BoundTask::new(task.name.clone(), unit);
            bound.bind_session(Arc::clone(&session));

            let mut dependencies: Vec<NodeId> = Vec::with_capacity(task.dependencies.len());
            for dep in task.dependencies.iter() {
                let dep_id = index.get(dep.as_str()).copied().ok_or_else(|| {
                    TaskflowError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dep.clone(),
                    }
                })?;
                if dependencies.contains(&dep_id) {
                    debug!(task = %task.name, dep = %dep, "ignoring repeated dependency");
                    continue;
                }
                dependencies.push(dep_id);
            }
            debug!(task = %task.name, deps = ?task.dependencies, "task add deps");

            nodes.push(ExecutionNode::new(bound, dependencies));
        }

        Ok(Self {
            nodes,
            index,
            session,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn session(&self) -> &Arc<TaskSession> {
        &self.session
    }

    pub fn nodes(&self) -> &[ExecutionNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&ExecutionNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut ExecutionNode> {
        self.nodes.get_mut(id)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Immediate dependencies of a node.
    pub fn dependencies_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.dependencies())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a node (nodes listing it as a dependency).
    pub fn dependents_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.dependencies().contains(&id))
            .map(|(other, _)| other)
            .collect()
    }

    /// Dispatch frontier over the nodes that have not been launched yet.
    pub(crate) fn frontier(&self) -> Frontier {
        let mut frontier = Frontier::new(self.nodes.iter().map(|n| n.dependencies()));
        for (id, node) in self.nodes.iter().enumerate() {
            if node.is_launched() {
                frontier.exclude(id);
            }
        }
        frontier
    }
}

/// Look every task and dependency name up in the registry, once per
/// distinct name.
fn resolve_units<'a>(
    flow: &'a FlowSpec,
    registry: &dyn TaskRegistry,
) -> Result<HashMap<&'a str, Arc<dyn TaskUnit>>> {
    let mut units: HashMap<&str, Arc<dyn TaskUnit>> = HashMap::new();

    for task in flow.iter() {
        if !units.contains_key(task.name.as_str()) {
            let Some(unit) = registry.lookup(&task.name) else {
                warn!(task = %task.name, "task is not registered");
                return Err(TaskflowError::TaskNotFound(task.name.clone()));
            };
            units.insert(task.name.as_str(), unit);
        }

        for dep in task.dependencies.iter() {
            if units.contains_key(dep.as_str()) {
                continue;
            }
            let Some(unit) = registry.lookup(dep) else {
                warn!(task = %task.name, dep = %dep, "dependency is not registered");
                return Err(TaskflowError::UnknownDependency {
                    task: task.name.clone(),
                    dependency: dep.clone(),
                });
            };
            units.insert(dep.as_str(), unit);
        }
    }

    Ok(units)
}
