// src/exec/mod.rs

//! Execution layer.
//!
//! - [`pool`] owns the worker pool (a Tokio multi-thread runtime).
//! - [`task_runner`] wraps unit logic with timing and failure isolation,
//!   and drives each launched node until its result slot is written.

pub mod pool;
pub mod task_runner;

pub use pool::WorkerPool;
pub use task_runner::BoundTask;
