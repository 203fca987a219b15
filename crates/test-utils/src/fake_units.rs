use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use taskflow::registry::UnitRegistry;
use taskflow::session::TaskSession;
use taskflow::task::{TaskResult, TaskUnit};

/// One observable step of a scripted unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Finished(String),
}

/// Shared, ordered log of unit starts and ends across threads.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Number of times `task` was started.
    pub fn invocations(&self, task: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Started(n) if n == task))
            .count()
    }

    pub fn ran(&self, task: &str) -> bool {
        self.invocations(task) > 0
    }

    pub fn started_at(&self, task: &str) -> Option<usize> {
        self.events()
            .iter()
            .position(|e| matches!(e, Event::Started(n) if n == task))
    }

    pub fn finished_at(&self, task: &str) -> Option<usize> {
        self.events()
            .iter()
            .position(|e| matches!(e, Event::Finished(n) if n == task))
    }

    /// True if `earlier` finished before `later` started.
    pub fn finished_before_start(&self, earlier: &str, later: &str) -> bool {
        match (self.finished_at(earlier), self.started_at(later)) {
            (Some(end), Some(start)) => end < start,
            _ => false,
        }
    }
}

/// What a scripted unit does when run.
#[derive(Debug, Clone)]
pub enum Behaviour {
    Succeed,
    Fail,
    Error(String),
    Panic(String),
}

/// Fake unit with a fixed behaviour and optional delay, recording every
/// invocation.
#[derive(Debug, Clone)]
pub struct ScriptedTask {
    name: String,
    behaviour: Behaviour,
    delay: Option<Duration>,
    recorder: Recorder,
}

impl ScriptedTask {
    pub fn new(name: &str, behaviour: Behaviour, recorder: &Recorder) -> Self {
        Self {
            name: name.to_string(),
            behaviour,
            delay: None,
            recorder: recorder.clone(),
        }
    }

    pub fn succeeding(name: &str, recorder: &Recorder) -> Self {
        Self::new(name, Behaviour::Succeed, recorder)
    }

    pub fn failing(name: &str, recorder: &Recorder) -> Self {
        Self::new(name, Behaviour::Fail, recorder)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl TaskUnit for ScriptedTask {
    fn run(&self, _session: &TaskSession) -> TaskResult {
        self.recorder.push(Event::Started(self.name.clone()));
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.recorder.push(Event::Finished(self.name.clone()));

        match &self.behaviour {
            Behaviour::Succeed => Ok(true),
            Behaviour::Fail => Ok(false),
            Behaviour::Error(msg) => Err(anyhow::anyhow!("{msg}")),
            Behaviour::Panic(msg) => panic!("{msg}"),
        }
    }
}

/// Registry with a succeeding unit for every name, except the ones in
/// `failing`, which return `Ok(false)`.
pub fn scripted_registry(names: &[&str], failing: &[&str], recorder: &Recorder) -> UnitRegistry {
    let mut registry = UnitRegistry::new();
    for name in names {
        let behaviour = if failing.contains(name) {
            Behaviour::Fail
        } else {
            Behaviour::Succeed
        };
        registry.register(*name, ScriptedTask::new(name, behaviour, recorder));
    }
    registry
}
