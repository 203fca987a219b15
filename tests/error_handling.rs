// tests/error_handling.rs

use std::io::Write;

use tempfile::NamedTempFile;
use taskflow::config::{
    ConfigFile, default_config_path, load_and_validate, load_from_path, validate_flow,
};
use taskflow::errors::TaskflowError;
use taskflow::types::LogLevel;
use taskflow_test_utils::builders::{FlowSpecBuilder, RawConfigFileBuilder};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_full_config_loads_with_defaults() {
    let file = config_file(
        r#"
[executor]
worker_threads = 3

[logging]
level = "debug"

[[flow.nightly]]
task = "fetch"

[[flow.nightly]]
task = "transform"
dependencies = ["fetch"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.executor.worker_threads, 3);
    assert_eq!(cfg.executor.effective_worker_threads(), 3);
    assert_eq!(cfg.executor.effective_max_blocking_threads(), 24);
    assert_eq!(cfg.executor.thread_name, "taskflow-worker");
    assert!(matches!(cfg.logging.level, Some(LogLevel::Debug)));

    let flow = cfg.flow("nightly").unwrap();
    let names: Vec<&str> = flow.names().collect();
    assert_eq!(names, vec!["fetch", "transform"]);
    assert_eq!(flow.tasks()[1].dependencies, vec!["fetch".to_string()]);
    assert!(flow.tasks()[0].dependencies.is_empty());
}

#[test]
fn test_zero_worker_threads_means_available_parallelism() {
    let file = config_file(
        r#"
[[flow.main]]
task = "a"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.executor.worker_threads, 0);
    assert!(cfg.executor.effective_worker_threads() >= 1);
    assert_eq!(
        cfg.executor.effective_max_blocking_threads(),
        cfg.executor.effective_worker_threads() * 8
    );
    assert!(cfg.logging.level.is_none());
}

#[test]
fn test_dag_cycle_returns_structured_error() {
    let file = config_file(
        r#"
[[flow.main]]
task = "A"
dependencies = ["B"]

[[flow.main]]
task = "B"
dependencies = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskflowError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_undeclared_dependency_returns_config_error() {
    let file = config_file(
        r#"
[[flow.main]]
task = "A"
dependencies = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskflowError::ConfigError(msg)) => {
            assert!(msg.contains("not declared"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_duplicate_task_returns_duplicate_error() {
    let file = config_file(
        r#"
[[flow.main]]
task = "A"

[[flow.main]]
task = "A"
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskflowError::DuplicateTask(msg)) => assert!(msg.contains("'A'")),
        Err(e) => panic!("Expected DuplicateTask, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_invalid_toml_returns_toml_error() {
    let file = config_file("[[flow.main]\ntask = ");

    assert!(matches!(
        load_from_path(file.path()),
        Err(TaskflowError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(default_config_path());

    assert!(matches!(
        load_and_validate(&path),
        Err(TaskflowError::IoError(_))
    ));
}

#[test]
fn test_empty_thread_name_is_rejected() {
    let raw = RawConfigFileBuilder::new()
        .thread_name("  ")
        .with_flow("main", FlowSpecBuilder::new().task("a", &[]).build())
        .raw();

    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(TaskflowError::ConfigError(_))
    ));
}

#[test]
fn test_flow_without_tasks_is_rejected() {
    let raw = RawConfigFileBuilder::new()
        .with_flow("empty", FlowSpecBuilder::new().build())
        .raw();

    match ConfigFile::try_from(raw) {
        Err(TaskflowError::ConfigError(msg)) => assert!(msg.contains("empty")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_self_dependency_is_rejected() {
    let flow = FlowSpecBuilder::new().task("a", &["a"]).build();

    match validate_flow(&flow) {
        Err(TaskflowError::ConfigError(msg)) => assert!(msg.contains("itself")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_builder_config_round_trips_through_validation() {
    let cfg = RawConfigFileBuilder::new()
        .worker_threads(2)
        .max_blocking_threads(4)
        .log_level(LogLevel::Warn)
        .with_flow(
            "main",
            FlowSpecBuilder::new().task("a", &[]).task("b", &["a"]).build(),
        )
        .build();

    assert_eq!(cfg.executor.effective_max_blocking_threads(), 4);
    assert_eq!(cfg.flow_names().collect::<Vec<_>>(), vec!["main"]);
}
