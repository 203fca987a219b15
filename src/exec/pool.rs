// src/exec/pool.rs

//! Worker pool backing flow execution.
//!
//! The pool is a Tokio multi-thread (work-stealing) runtime:
//! - async worker threads run the cheap continuations that join a node's
//!   dependencies;
//! - unit logic, which is synchronous and may block, runs on the runtime's
//!   blocking threads, capped by `max_blocking_threads`.

use std::fmt;
use std::future::Future;

use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::config::model::ExecutorSection;
use crate::errors::Result;

pub struct WorkerPool {
    runtime: Runtime,
    worker_threads: usize,
    max_blocking_threads: usize,
}

impl WorkerPool {
    /// Build a pool from an `[executor]` section.
    pub fn new(cfg: &ExecutorSection) -> Result<Self> {
        let worker_threads = cfg.effective_worker_threads();
        let max_blocking_threads = cfg.effective_max_blocking_threads();

        info!(
            worker_threads,
            max_blocking_threads,
            thread_name = %cfg.thread_name,
            "creating worker pool"
        );

        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .max_blocking_threads(max_blocking_threads)
            .thread_name(cfg.thread_name.clone())
            .enable_time()
            .build()?;

        Ok(Self {
            runtime,
            worker_threads,
            max_blocking_threads,
        })
    }

    /// Pool with `worker_threads` workers and default settings otherwise.
    pub fn with_threads(worker_threads: usize) -> Result<Self> {
        Self::new(&ExecutorSection::with_worker_threads(worker_threads))
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn max_blocking_threads(&self) -> usize {
        self.max_blocking_threads
    }

    /// Submit a detached future; its result is observed through the node's
    /// result handle, not through the join handle.
    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.runtime.spawn(future));
    }

    /// Block the calling thread until `future` completes.
    ///
    /// Must not be called from inside an async context.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_threads", &self.worker_threads)
            .field("max_blocking_threads", &self.max_blocking_threads)
            .finish_non_exhaustive()
    }
}
