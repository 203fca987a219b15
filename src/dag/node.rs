// src/dag/node.rs

//! Per-run execution nodes and their write-once result slots.

use std::sync::Arc;

use tokio::sync::watch;

use crate::exec::task_runner::BoundTask;
use crate::types::NodeOutcome;

/// Index of a node inside a [`DependencyGraph`](crate::dag::DependencyGraph).
///
/// Ids follow FlowSpec order: the n-th descriptor becomes node `n`.
pub type NodeId = usize;

/// Create a connected slot/handle pair for one node.
pub fn result_channel() -> (ResultSlot, ResultHandle) {
    let (tx, rx) = watch::channel(None);
    (ResultSlot { tx }, ResultHandle { rx })
}

/// Writing side of a node's result. Consumed by [`complete`](Self::complete),
/// so an outcome is written at most once.
#[derive(Debug)]
pub struct ResultSlot {
    tx: watch::Sender<Option<NodeOutcome>>,
}

impl ResultSlot {
    pub fn complete(self, outcome: NodeOutcome) {
        // send_replace stores the value even when no handle is listening.
        self.tx.send_replace(Some(outcome));
    }
}

/// Reading side of a node's result; cheap to clone.
///
/// If the slot is dropped without being completed (the driving task was
/// torn down), waiters observe `Failed`.
#[derive(Debug, Clone)]
pub struct ResultHandle {
    rx: watch::Receiver<Option<NodeOutcome>>,
}

impl ResultHandle {
    /// The outcome if it is already known, without waiting.
    pub fn peek(&self) -> Option<NodeOutcome> {
        *self.rx.borrow()
    }

    pub fn is_resolved(&self) -> bool {
        self.peek().is_some()
    }

    /// Wait until the outcome is written.
    pub async fn wait(&self) -> NodeOutcome {
        let mut rx = self.rx.clone();
        match rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).unwrap_or(NodeOutcome::Failed),
            Err(_) => NodeOutcome::Failed,
        }
    }
}

/// A task bound to one run: its logic, its resolved dependencies, and the
/// handle created when it is launched.
#[derive(Debug)]
pub struct ExecutionNode {
    task: Arc<BoundTask>,
    dependencies: Vec<NodeId>,
    handle: Option<ResultHandle>,
}

impl ExecutionNode {
    pub(crate) fn new(task: BoundTask, dependencies: Vec<NodeId>) -> Self {
        Self {
            task: Arc::new(task),
            dependencies,
            handle: None,
        }
    }

    pub fn name(&self) -> &str {
        self.task.name()
    }

    pub fn task(&self) -> &Arc<BoundTask> {
        &self.task
    }

    /// Nodes this one depends on.
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    /// Result handle, present once the node has been launched.
    pub fn handle(&self) -> Option<&ResultHandle> {
        self.handle.as_ref()
    }

    pub fn is_launched(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn set_handle(&mut self, handle: ResultHandle) {
        self.handle = Some(handle);
    }

    /// Outcome to record for this node once every launched handle has
    /// resolved: a node that never got a handle did not run.
    pub(crate) async fn final_outcome(&self) -> NodeOutcome {
        match &self.handle {
            Some(handle) => handle.wait().await,
            None => NodeOutcome::NotLaunched,
        }
    }
}
