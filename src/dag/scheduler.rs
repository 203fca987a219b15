// src/dag/scheduler.rs

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::model::{ExecutorSection, FlowSpec};
use crate::dag::graph::DependencyGraph;
use crate::dag::node::{NodeId, ResultHandle, result_channel};
use crate::dag::report::FlowReport;
use crate::errors::Result;
use crate::exec::pool::WorkerPool;
use crate::exec::task_runner::{run_after, run_direct};
use crate::registry::TaskRegistry;
use crate::session::TaskSession;
use crate::types::{NodeOutcome, TaskName};

/// Entry point for running flows.
///
/// A scheduler owns a registry and a worker pool and can run any number of
/// flows, one after another or from several threads at once. Each run gets
/// its own [`DependencyGraph`] and (unless supplied) its own
/// [`TaskSession`].
pub struct FlowScheduler {
    registry: Box<dyn TaskRegistry>,
    pool: WorkerPool,
}

impl FlowScheduler {
    pub fn new(registry: impl TaskRegistry + 'static, pool: WorkerPool) -> Self {
        Self {
            registry: Box::new(registry),
            pool,
        }
    }

    /// Build the worker pool from an `[executor]` section.
    pub fn from_config(registry: impl TaskRegistry + 'static, cfg: &ExecutorSection) -> Result<Self> {
        Ok(Self::new(registry, WorkerPool::new(cfg)?))
    }

    pub fn registry(&self) -> &dyn TaskRegistry {
        self.registry.as_ref()
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Check that `spec` would be accepted by [`run_flow`](Self::run_flow)
    /// without running any unit.
    pub fn validate(&self, spec: &FlowSpec) -> Result<()> {
        DependencyGraph::build(spec, self.registry(), Arc::new(TaskSession::new())).map(|_| ())
    }

    /// Run every task of `spec` honoring dependencies.
    ///
    /// Returns `true` iff the flow was accepted and every task succeeded.
    /// Never panics and never returns an error: configuration problems and
    /// unit failures all come back as `false`.
    pub fn run_flow(&self, spec: &FlowSpec) -> bool {
        self.run_flow_report(spec).success()
    }

    /// Like [`run_flow`](Self::run_flow), returning per-task outcomes.
    pub fn run_flow_report(&self, spec: &FlowSpec) -> FlowReport {
        self.run_flow_in(spec, Arc::new(TaskSession::new()))
    }

    /// Run `spec` with a caller-supplied session.
    pub fn run_flow_in(&self, spec: &FlowSpec, session: Arc<TaskSession>) -> FlowReport {
        let started = Instant::now();

        if tokio::runtime::Handle::try_current().is_ok() {
            warn!("run_flow called from inside an async runtime; refusing to block it");
            return FlowReport::rejected(
                "run_flow cannot be called from inside an async runtime".to_string(),
                started.elapsed(),
            );
        }

        let mut graph = match DependencyGraph::build(spec, self.registry(), session) {
            Ok(graph) => graph,
            Err(err) => {
                warn!(error = %err, "flow rejected; no task was run");
                return FlowReport::rejected(err.to_string(), started.elapsed());
            }
        };

        let halted_at = dispatch(&mut graph, &self.pool);
        let outcomes = self.pool.block_on(join_outcomes(&graph));
        let report = FlowReport::completed(outcomes, halted_at, started.elapsed());

        let elapsed_ms = report.elapsed().as_millis() as u64;
        if report.success() {
            info!(tasks = graph.len(), elapsed_ms, "flow finished successfully");
        } else {
            warn!(
                tasks = graph.len(),
                elapsed_ms,
                failed = ?report.failed_tasks(),
                skipped = ?report.skipped_tasks(),
                not_launched = ?report.not_launched_tasks(),
                "flow finished with failures"
            );
        }
        report
    }
}

impl fmt::Debug for FlowScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowScheduler")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// Launch every node of `graph` in dependency order.
///
/// Runs on the calling thread and never waits on a unit. Returns the task
/// at which launching stopped because one of its dependencies had already
/// failed, if that happened.
fn dispatch(graph: &mut DependencyGraph, pool: &WorkerPool) -> Option<TaskName> {
    let mut frontier = graph.frontier();

    while !frontier.is_empty() {
        let ready = frontier.take_ready();
        if ready.is_empty() {
            // Unreachable for a validated graph.
            error!(
                remaining = frontier.remaining(),
                "no task is ready but some are still pending; stopping dispatch"
            );
            break;
        }
        debug!(ready = ready.len(), remaining = frontier.remaining(), "dispatch pass");

        for id in ready {
            let pending = match pending_dependencies(graph, id) {
                Ok(pending) => pending,
                Err(failed_dep) => {
                    let name = graph.nodes()[id].name().to_string();
                    let blocked: Vec<&str> = graph
                        .dependents_of(id)
                        .into_iter()
                        .map(|other| graph.nodes()[other].name())
                        .collect();
                    warn!(
                        task = %name,
                        dep = %failed_dep,
                        ?blocked,
                        "dependency already failed; no further tasks will be launched"
                    );
                    return Some(name);
                }
            };
            launch(graph, pool, id, pending);
        }
    }

    None
}

/// Handles of a node's dependencies that have not resolved yet.
///
/// Returns the name of the first dependency that has already completed
/// without success.
fn pending_dependencies(
    graph: &DependencyGraph,
    id: NodeId,
) -> std::result::Result<Vec<ResultHandle>, String> {
    let mut pending = Vec::new();

    for &dep in graph.dependencies_of(id) {
        let Some(node) = graph.node(dep) else {
            continue;
        };
        let Some(handle) = node.handle() else {
            // A taken dependency is always launched before its dependents.
            return Err(node.name().to_string());
        };
        match handle.peek() {
            Some(outcome) if !outcome.is_success() => return Err(node.name().to_string()),
            Some(_) => {}
            None => pending.push(handle.clone()),
        }
    }

    Ok(pending)
}

fn launch(graph: &mut DependencyGraph, pool: &WorkerPool, id: NodeId, pending: Vec<ResultHandle>) {
    let Some(node) = graph.node_mut(id) else {
        return;
    };
    let task = Arc::clone(node.task());
    let (slot, handle) = result_channel();

    if pending.is_empty() {
        debug!(task = %task.name(), "launching task");
        pool.spawn(run_direct(task, slot));
    } else {
        debug!(task = %task.name(), waiting_on = pending.len(), "launching task after dependencies");
        pool.spawn(run_after(pending, task, slot));
    }

    node.set_handle(handle);
}

/// Wait for every launched node and pair each task with its outcome, in
/// FlowSpec order.
async fn join_outcomes(graph: &DependencyGraph) -> Vec<(TaskName, NodeOutcome)> {
    let mut outcomes = Vec::with_capacity(graph.len());
    for node in graph.nodes() {
        outcomes.push((node.name().to_string(), node.final_outcome().await));
    }
    outcomes
}
