// src/task.rs

//! The unit-of-work abstraction.
//!
//! A [`TaskUnit`] is plain synchronous logic: it receives the run's
//! [`TaskSession`] and reports whether it succeeded. Timing, logging and
//! failure isolation are added by the execution wrapper in
//! [`crate::exec::task_runner`], so implementations stay small.

use std::fmt;

use crate::session::TaskSession;

/// Result of a unit's logic: `Ok(true)` on success, `Ok(false)` on an
/// orderly failure, `Err` for an internal error.
pub type TaskResult = anyhow::Result<bool>;

/// A named unit of work that can take part in a flow.
///
/// Implementations must be shareable across worker threads; the same unit
/// may be referenced by several concurrent runs, each with its own session.
pub trait TaskUnit: Send + Sync {
    fn run(&self, session: &TaskSession) -> TaskResult;
}

/// Adaptor turning a closure into a [`TaskUnit`].
pub struct FnTask<F> {
    f: F,
}

impl<F> FnTask<F>
where
    F: Fn(&TaskSession) -> TaskResult + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TaskUnit for FnTask<F>
where
    F: Fn(&TaskSession) -> TaskResult + Send + Sync,
{
    fn run(&self, session: &TaskSession) -> TaskResult {
        (self.f)(session)
    }
}

impl<F> fmt::Debug for FnTask<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").finish_non_exhaustive()
    }
}

/// Shorthand for [`FnTask::new`].
pub fn task_fn<F>(f: F) -> FnTask<F>
where
    F: Fn(&TaskSession) -> TaskResult + Send + Sync,
{
    FnTask::new(f)
}
