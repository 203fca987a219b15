// src/registry.rs

//! Name → unit lookup used when building a flow's graph.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::task::TaskUnit;
use crate::types::TaskName;

/// Trait abstracting how task names resolve to implementations.
///
/// The scheduler only ever calls [`lookup`](TaskRegistry::lookup), once per
/// distinct name per run.
pub trait TaskRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<dyn TaskUnit>>;
}

/// Map-backed registry populated by explicit `register` calls at startup.
#[derive(Clone, Default)]
pub struct UnitRegistry {
    units: HashMap<TaskName, Arc<dyn TaskUnit>>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `unit` under `name`, replacing any previous registration.
    pub fn register<U>(&mut self, name: impl Into<TaskName>, unit: U) -> &mut Self
    where
        U: TaskUnit + 'static,
    {
        self.register_shared(name, Arc::new(unit))
    }

    /// Register an already shared unit (e.g. one instance under two names).
    pub fn register_shared(
        &mut self,
        name: impl Into<TaskName>,
        unit: Arc<dyn TaskUnit>,
    ) -> &mut Self {
        let name = name.into();
        if self.units.insert(name.clone(), unit).is_some() {
            warn!(task = %name, "task registered twice; keeping the latest registration");
        } else {
            debug!(task = %name, "task registered");
        }
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with<U>(mut self, name: impl Into<TaskName>, unit: U) -> Self
    where
        U: TaskUnit + 'static,
    {
        self.register(name, unit);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl TaskRegistry for UnitRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn TaskUnit>> {
        self.units.get(name).cloned()
    }
}

impl<R: TaskRegistry + ?Sized> TaskRegistry for Arc<R> {
    fn lookup(&self, name: &str) -> Option<Arc<dyn TaskUnit>> {
        (**self).lookup(name)
    }
}

impl fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("UnitRegistry")
            .field("units", &names)
            .finish()
    }
}
