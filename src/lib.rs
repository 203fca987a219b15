// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod session;
pub mod task;
pub mod types;

use std::fmt::Write as _;

use anyhow::{Result, bail};
use tracing::debug;

pub use crate::config::model::{ConfigFile, FlowSpec, TaskDescriptor};
pub use crate::dag::{FlowReport, FlowScheduler};
pub use crate::errors::TaskflowError;
pub use crate::exec::WorkerPool;
pub use crate::registry::{TaskRegistry, UnitRegistry};
pub use crate::session::TaskSession;
pub use crate::task::{FnTask, TaskResult, TaskUnit, task_fn};
pub use crate::types::{NodeOutcome, TaskName};

/// Print the executor settings and the launch plan of one flow (or all of
/// them) to stdout. Used by `main.rs`.
pub fn print_plan(cfg: &ConfigFile, flow: Option<&str>) -> Result<()> {
    let text = render_plan(cfg, flow)?;
    print!("{text}");
    debug!("plan printed (no execution)");
    Ok(())
}

/// Text printed by [`print_plan`].
pub fn render_plan(cfg: &ConfigFile, flow: Option<&str>) -> Result<String> {
    let selected: Vec<(&str, &FlowSpec)> = match flow {
        Some(name) => match cfg.flow(name) {
            Some(spec) => vec![(name, spec)],
            None => bail!(
                "unknown flow '{name}' (available: {})",
                cfg.flow_names().collect::<Vec<_>>().join(", ")
            ),
        },
        None => cfg.flow.iter().map(|(n, s)| (n.as_str(), s)).collect(),
    };

    let mut out = String::new();
    writeln!(out, "taskflow plan")?;
    writeln!(
        out,
        "  executor.worker_threads = {}",
        cfg.executor.effective_worker_threads()
    )?;
    writeln!(
        out,
        "  executor.max_blocking_threads = {}",
        cfg.executor.effective_max_blocking_threads()
    )?;
    writeln!(out, "  executor.thread_name = {}", cfg.executor.thread_name)?;

    for (name, spec) in selected {
        writeln!(out)?;
        writeln!(out, "flow {name} ({} tasks):", spec.len())?;
        for task in spec.iter() {
            writeln!(out, "  - {}", task.name)?;
            if !task.dependencies.is_empty() {
                writeln!(out, "      dependencies: {:?}", task.dependencies)?;
            }
        }

        writeln!(out, "  launch waves:")?;
        for (i, wave) in dag::launch_waves(spec)?.iter().enumerate() {
            writeln!(out, "    {i}: {}", wave.join(", "))?;
        }
    }

    Ok(out)
}
