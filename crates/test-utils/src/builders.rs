#![allow(dead_code)]

use std::collections::BTreeMap;

use taskflow::config::{
    ConfigFile, ExecutorSection, FlowSpec, LoggingSection, RawConfigFile, TaskDescriptor,
};
use taskflow::types::LogLevel;

/// Builder for `FlowSpec` to simplify test setup.
///
/// ```ignore
/// let flow = FlowSpecBuilder::new()
///     .task("a", &[])
///     .task("b", &["a"])
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct FlowSpecBuilder {
    tasks: Vec<TaskDescriptor>,
}

impl FlowSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(mut self, name: &str, deps: &[&str]) -> Self {
        self.tasks.push(TaskDescriptor::new(name, deps.iter().copied()));
        self
    }

    pub fn build(self) -> FlowSpec {
        FlowSpec::new(self.tasks)
    }
}

/// Builder for `RawConfigFile` / `ConfigFile`.
pub struct RawConfigFileBuilder {
    config: RawConfigFile,
}

impl RawConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                executor: ExecutorSection::default(),
                logging: LoggingSection::default(),
                flow: BTreeMap::new(),
            },
        }
    }

    pub fn with_flow(mut self, name: &str, flow: FlowSpec) -> Self {
        self.config.flow.insert(name.to_string(), flow);
        self
    }

    pub fn worker_threads(mut self, n: usize) -> Self {
        self.config.executor.worker_threads = n;
        self
    }

    pub fn max_blocking_threads(mut self, n: usize) -> Self {
        self.config.executor.max_blocking_threads = n;
        self
    }

    pub fn thread_name(mut self, name: &str) -> Self {
        self.config.executor.thread_name = name.to_string();
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = Some(level);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
