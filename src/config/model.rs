// src/config/model.rs

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::types::{LogLevel, TaskName};

/// One entry of a flow: a task name plus the names it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskDescriptor {
    /// Registry name of the task; unique within a flow.
    #[serde(rename = "task")]
    pub name: TaskName,

    /// Tasks that must finish successfully before this one may run.
    #[serde(default)]
    pub dependencies: Vec<TaskName>,
}

impl TaskDescriptor {
    pub fn new<I, S>(name: impl Into<TaskName>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered list of task descriptors making up one run.
///
/// Deserializes from a plain array, so a flow is written in TOML as an
/// array of tables:
///
/// ```toml
/// [[flow.nightly]]
/// task = "fetch"
///
/// [[flow.nightly]]
/// task = "transform"
/// dependencies = ["fetch"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FlowSpec {
    tasks: Vec<TaskDescriptor>,
}

impl FlowSpec {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Self {
        Self { tasks }
    }

    pub fn push(&mut self, descriptor: TaskDescriptor) {
        self.tasks.push(descriptor);
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskDescriptor> {
        self.tasks.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<TaskDescriptor> for FlowSpec {
    fn from_iter<I: IntoIterator<Item = TaskDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FlowSpec {
    type Item = &'a TaskDescriptor;
    type IntoIter = std::slice::Iter<'a, TaskDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [executor]
/// worker_threads = 4
///
/// [logging]
/// level = "debug"
///
/// [[flow.main]]
/// task = "A"
///
/// [[flow.main]]
/// task = "B"
/// dependencies = ["A"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Worker pool settings from `[executor]`.
    #[serde(default)]
    pub executor: ExecutorSection,

    /// Logging settings from `[logging]`.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Named flows from `[[flow.<name>]]`.
    #[serde(default)]
    pub flow: BTreeMap<String, FlowSpec>,
}

/// Validated configuration.
///
/// Produced by `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so every flow in here is structurally sound.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub executor: ExecutorSection,
    pub logging: LoggingSection,
    pub flow: BTreeMap<String, FlowSpec>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        executor: ExecutorSection,
        logging: LoggingSection,
        flow: BTreeMap<String, FlowSpec>,
    ) -> Self {
        Self {
            executor,
            logging,
            flow,
        }
    }

    /// Look up a flow by name.
    pub fn flow(&self, name: &str) -> Option<&FlowSpec> {
        self.flow.get(name)
    }

    pub fn flow_names(&self) -> impl Iterator<Item = &str> {
        self.flow.keys().map(|s| s.as_str())
    }
}

/// `[executor]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutorSection {
    /// Async worker threads driving dependency joins. `0` means the
    /// machine's available parallelism.
    #[serde(default)]
    pub worker_threads: usize,

    /// Upper bound on threads executing unit logic at the same time.
    /// `0` means eight per worker thread.
    #[serde(default)]
    pub max_blocking_threads: usize,

    /// Name given to pool threads.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_thread_name() -> String {
    "taskflow-worker".to_string()
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            max_blocking_threads: 0,
            thread_name: default_thread_name(),
        }
    }
}

impl ExecutorSection {
    /// Config with a fixed number of worker threads and default everything else.
    pub fn with_worker_threads(worker_threads: usize) -> Self {
        Self {
            worker_threads,
            ..Self::default()
        }
    }

    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads > 0 {
            return self.worker_threads;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }

    pub fn effective_max_blocking_threads(&self) -> usize {
        if self.max_blocking_threads > 0 {
            return self.max_blocking_threads;
        }
        self.effective_worker_threads() * 8
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Level used when `--log-level` is absent; wins over `TASKFLOW_LOG`.
    #[serde(default)]
    pub level: Option<LogLevel>,
}
