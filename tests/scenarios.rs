// tests/scenarios.rs

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use taskflow::dag::FlowScheduler;
use taskflow::exec::WorkerPool;
use taskflow::registry::UnitRegistry;
use taskflow::session::TaskSession;
use taskflow::task::task_fn;
use taskflow::types::NodeOutcome;
use taskflow_test_utils::builders::FlowSpecBuilder;
use taskflow_test_utils::fake_units::{Behaviour, Recorder, ScriptedTask, scripted_registry};
use taskflow_test_utils::{init_tracing, with_timeout};

fn scheduler(registry: UnitRegistry) -> FlowScheduler {
    FlowScheduler::new(registry, WorkerPool::with_threads(2).unwrap())
}

#[test]
fn test_chain_of_two_successes_runs_in_order() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["A", "B"], &[], &recorder);
    let flow = FlowSpecBuilder::new().task("A", &[]).task("B", &["A"]).build();

    let scheduler = scheduler(registry);
    assert!(scheduler.run_flow(&flow));

    assert_eq!(recorder.invocations("A"), 1);
    assert_eq!(recorder.invocations("B"), 1);
    assert!(recorder.finished_before_start("A", "B"));
}

#[test]
fn test_failed_dependency_prevents_dependent_run() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["A", "B"], &["A"], &recorder);
    let flow = FlowSpecBuilder::new().task("A", &[]).task("B", &["A"]).build();

    let scheduler = scheduler(registry);
    let report = scheduler.run_flow_report(&flow);

    assert!(!report.success());
    assert!(recorder.ran("A"));
    assert!(!recorder.ran("B"));
    assert_eq!(report.outcome_of("A"), Some(NodeOutcome::Failed));
    // B is either skipped by its async chain or never launched because
    // dispatch already saw A fail; both are failures and B never ran.
    assert!(matches!(
        report.outcome_of("B"),
        Some(NodeOutcome::Skipped) | Some(NodeOutcome::NotLaunched)
    ));
}

#[test]
fn test_cycle_is_rejected_before_any_run() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["A", "B"], &[], &recorder);
    let flow = FlowSpecBuilder::new().task("A", &["B"]).task("B", &["A"]).build();

    let scheduler = scheduler(registry);
    let report = scheduler.run_flow_report(&flow);

    assert!(!report.success());
    assert!(report.is_rejected());
    assert!(report.rejection().unwrap().contains("cycle"));
    assert!(recorder.events().is_empty());
}

#[test]
fn test_unregistered_dependency_is_rejected_before_any_run() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["A"], &[], &recorder);
    let flow = FlowSpecBuilder::new().task("A", &["X"]).build();

    let scheduler = scheduler(registry);
    let report = scheduler.run_flow_report(&flow);

    assert!(!report.success());
    assert!(report.rejection().unwrap().contains("X"));
    assert!(!recorder.ran("A"));
}

#[test]
fn test_unregistered_primary_task_is_rejected_before_any_run() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["A"], &[], &recorder);
    let flow = FlowSpecBuilder::new().task("A", &[]).task("Missing", &["A"]).build();

    let scheduler = scheduler(registry);
    assert!(!scheduler.run_flow(&flow));
    assert!(!recorder.ran("A"));
}

#[derive(Debug, PartialEq)]
struct Greeting(String);

#[test]
fn test_session_value_flows_from_dependency_to_dependent() {
    init_tracing();
    let (tx, rx) = mpsc::channel();

    let mut registry = UnitRegistry::new();
    registry.register(
        "A",
        task_fn(|session| {
            session.put(Greeting("hello from A".to_string()));
            Ok(true)
        }),
    );
    registry.register(
        "B",
        task_fn(move |session| {
            let greeting = session.get::<Greeting>();
            tx.send(greeting.map(|g| g.0.clone())).unwrap();
            Ok(true)
        }),
    );
    let flow = FlowSpecBuilder::new().task("A", &[]).task("B", &["A"]).build();

    let scheduler = scheduler(registry);
    assert!(scheduler.run_flow(&flow));
    assert_eq!(rx.recv().unwrap(), Some("hello from A".to_string()));
}

#[test]
fn test_run_flow_in_exposes_session_to_caller() {
    init_tracing();
    let mut registry = UnitRegistry::new();
    registry.register(
        "double",
        task_fn(|session| {
            let input = session.get_cloned::<u64>().unwrap_or(0);
            session.put(input * 2);
            Ok(true)
        }),
    );
    let flow = FlowSpecBuilder::new().task("double", &[]).build();

    let session = Arc::new(TaskSession::new());
    session.put(21u64);

    let scheduler = scheduler(registry);
    let report = scheduler.run_flow_in(&flow, Arc::clone(&session));

    assert!(report.success());
    assert_eq!(session.get_cloned::<u64>(), Some(42));
}

#[test]
fn test_each_run_gets_a_fresh_session() {
    init_tracing();
    let mut registry = UnitRegistry::new();
    registry.register(
        "count",
        task_fn(|session| {
            let seen = session.get_cloned::<u32>().unwrap_or(0);
            session.put(seen + 1);
            Ok(seen == 0)
        }),
    );
    let flow = FlowSpecBuilder::new().task("count", &[]).build();

    let scheduler = scheduler(registry);
    assert!(scheduler.run_flow(&flow));
    assert!(scheduler.run_flow(&flow));
}

#[test]
fn test_zero_dependency_outcome_matches_unit_result() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["ok", "bad"], &["bad"], &recorder);
    let flow = FlowSpecBuilder::new().task("ok", &[]).task("bad", &[]).build();

    let scheduler = scheduler(registry);
    let report = scheduler.run_flow_report(&flow);

    assert!(!report.success());
    assert_eq!(report.outcome_of("ok"), Some(NodeOutcome::Succeeded));
    assert_eq!(report.outcome_of("bad"), Some(NodeOutcome::Failed));
    assert_eq!(report.failed_tasks(), vec!["bad"]);
}

#[test]
fn test_unit_error_and_panic_become_failures() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = UnitRegistry::new()
        .with(
            "errs",
            ScriptedTask::new("errs", Behaviour::Error("boom".into()), &recorder),
        )
        .with(
            "panics",
            ScriptedTask::new("panics", Behaviour::Panic("kaboom".into()), &recorder),
        )
        .with("fine", ScriptedTask::succeeding("fine", &recorder));
    let flow = FlowSpecBuilder::new()
        .task("errs", &[])
        .task("panics", &[])
        .task("fine", &[])
        .build();

    let scheduler = scheduler(registry);
    let report = with_timeout(move || scheduler.run_flow_report(&flow));

    assert!(!report.success());
    assert_eq!(report.outcome_of("errs"), Some(NodeOutcome::Failed));
    assert_eq!(report.outcome_of("panics"), Some(NodeOutcome::Failed));
    assert_eq!(report.outcome_of("fine"), Some(NodeOutcome::Succeeded));
}

#[test]
fn test_slow_failure_skips_whole_downstream_chain() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = UnitRegistry::new()
        .with(
            "root",
            ScriptedTask::failing("root", &recorder).with_delay(Duration::from_millis(100)),
        )
        .with("mid", ScriptedTask::succeeding("mid", &recorder))
        .with("leaf", ScriptedTask::succeeding("leaf", &recorder));
    let flow = FlowSpecBuilder::new()
        .task("root", &[])
        .task("mid", &["root"])
        .task("leaf", &["mid"])
        .build();

    let scheduler = scheduler(registry);
    let report = scheduler.run_flow_report(&flow);

    assert!(!report.success());
    assert!(!recorder.ran("mid"));
    assert!(!recorder.ran("leaf"));
    assert_eq!(report.outcome_of("root"), Some(NodeOutcome::Failed));
    // root is still running while dispatch composes the chain.
    assert_eq!(report.outcome_of("mid"), Some(NodeOutcome::Skipped));
    assert_eq!(report.outcome_of("leaf"), Some(NodeOutcome::Skipped));
    assert_eq!(report.halted_at(), None);
}

#[test]
fn test_diamond_runs_join_after_both_branches() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["top", "left", "right", "join"], &[], &recorder);
    let flow = FlowSpecBuilder::new()
        .task("top", &[])
        .task("left", &["top"])
        .task("right", &["top"])
        .task("join", &["left", "right"])
        .build();

    let scheduler = scheduler(registry);
    assert!(scheduler.run_flow(&flow));

    assert!(recorder.finished_before_start("top", "left"));
    assert!(recorder.finished_before_start("top", "right"));
    assert!(recorder.finished_before_start("left", "join"));
    assert!(recorder.finished_before_start("right", "join"));
    assert_eq!(recorder.invocations("join"), 1);
}

#[test]
fn test_empty_flow_succeeds() {
    init_tracing();
    let scheduler = scheduler(UnitRegistry::new());
    let report = scheduler.run_flow_report(&FlowSpecBuilder::new().build());

    assert!(report.success());
    assert!(report.outcomes().is_empty());
}

#[test]
fn test_independent_tasks_run_concurrently() {
    init_tracing();
    // Each unit waits for the other to start; sequential execution would
    // time out and fail both.
    let (to_b, from_a) = mpsc::sync_channel::<()>(1);
    let (to_a, from_b) = mpsc::sync_channel::<()>(1);
    let from_a = std::sync::Mutex::new(from_a);
    let from_b = std::sync::Mutex::new(from_b);

    let registry = UnitRegistry::new()
        .with(
            "a",
            task_fn(move |_| {
                to_b.send(())?;
                Ok(from_b
                    .lock()
                    .unwrap()
                    .recv_timeout(Duration::from_secs(5))
                    .is_ok())
            }),
        )
        .with(
            "b",
            task_fn(move |_| {
                to_a.send(())?;
                Ok(from_a
                    .lock()
                    .unwrap()
                    .recv_timeout(Duration::from_secs(5))
                    .is_ok())
            }),
        );
    let flow = FlowSpecBuilder::new().task("a", &[]).task("b", &[]).build();

    let scheduler = scheduler(registry);
    assert!(with_timeout(move || scheduler.run_flow(&flow)));
}

#[test]
fn test_run_flow_refuses_inside_async_runtime() {
    init_tracing();
    let recorder = Recorder::new();
    let registry = scripted_registry(&["A"], &[], &recorder);
    let flow = FlowSpecBuilder::new().task("A", &[]).build();
    let scheduler = scheduler(registry);

    let outer = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let report = outer.block_on(async { scheduler.run_flow_report(&flow) });

    assert!(!report.success());
    assert!(report.is_rejected());
    assert!(!recorder.ran("A"));
}
