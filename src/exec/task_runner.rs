// src/exec/task_runner.rs

//! Execution wrapper around a unit's logic, plus the async drivers that
//! write each launched node's result slot.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::dag::node::{ResultHandle, ResultSlot};
use crate::session::TaskSession;
use crate::task::TaskUnit;
use crate::types::{NodeOutcome, TaskName};

/// A unit paired with the session of the run it belongs to.
///
/// [`execute`](Self::execute) is the only way the scheduler invokes unit
/// logic; it never propagates an error or a panic.
pub struct BoundTask {
    name: TaskName,
    unit: Arc<dyn TaskUnit>,
    session: Option<Arc<TaskSession>>,
}

impl BoundTask {
    /// Create an unbound task. It will refuse to run until a session is bound.
    pub fn new(name: impl Into<TaskName>, unit: Arc<dyn TaskUnit>) -> Self {
        Self {
            name: name.into(),
            unit,
            session: None,
        }
    }

    pub fn bind_session(&mut self, session: Arc<TaskSession>) {
        self.session = Some(session);
    }

    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> Option<&Arc<TaskSession>> {
        self.session.as_ref()
    }

    /// Run the unit, timing it and converting every failure mode into `false`.
    pub fn execute(&self) -> bool {
        let Some(session) = self.session.as_deref() else {
            warn!(task = %self.name, "task has no bound session; not running it");
            return false;
        };

        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.unit.run(session)));
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(true)) => {
                info!(task = %self.name, elapsed_ms, "task run success");
                true
            }
            Ok(Ok(false)) => {
                warn!(task = %self.name, elapsed_ms, "task run fail");
                false
            }
            Ok(Err(err)) => {
                warn!(task = %self.name, elapsed_ms, error = %err, "task returned an error");
                false
            }
            Err(payload) => {
                warn!(
                    task = %self.name,
                    elapsed_ms,
                    panic = %panic_message(payload.as_ref()),
                    "task panicked"
                );
                false
            }
        }
    }
}

impl fmt::Debug for BoundTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundTask")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Drive a node whose dependencies are all known to have succeeded.
pub async fn run_direct(task: Arc<BoundTask>, slot: ResultSlot) {
    let outcome = execute_on_pool(task).await;
    slot.complete(outcome);
}

/// Drive a node that still has unresolved dependencies.
///
/// Waits for every handle in `pending`, then runs the node only if all of
/// them succeeded; otherwise records it as skipped without invoking it.
pub async fn run_after(pending: Vec<ResultHandle>, task: Arc<BoundTask>, slot: ResultSlot) {
    let mut all_succeeded = true;
    for dep in pending.iter() {
        all_succeeded &= dep.wait().await.is_success();
    }

    let outcome = if all_succeeded {
        execute_on_pool(task).await
    } else {
        info!(task = %task.name(), "skipping task; an upstream dependency did not succeed");
        NodeOutcome::Skipped
    };
    slot.complete(outcome);
}

/// Run the unit's (blocking) logic on the pool's blocking threads.
async fn execute_on_pool(task: Arc<BoundTask>) -> NodeOutcome {
    let name = task.name().to_string();
    debug!(task = %name, "starting task");

    match tokio::task::spawn_blocking(move || task.execute()).await {
        Ok(success) => NodeOutcome::from(success),
        Err(err) => {
            error!(task = %name, error = %err, "task execution was aborted");
            NodeOutcome::Failed
        }
    }
}
