// src/session.rs

//! Per-run shared store that lets units hand intermediate results to each
//! other.
//!
//! Values are keyed by their concrete type: a session holds at most one
//! live value per type, and the last `put` for a type wins. Lookups for a
//! type that was never stored simply return `None`.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

type Slot = Arc<dyn Any + Send + Sync>;

/// Type-keyed slot store shared by every unit of one flow run.
///
/// All methods take `&self`; the store is safe to use from any number of
/// worker threads at once.
#[derive(Default)]
pub struct TaskSession {
    slots: RwLock<HashMap<TypeId, Slot>>,
}

impl TaskSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any previous value of the same type.
    pub fn put<T: Any + Send + Sync>(&self, value: T) {
        let replaced = self
            .slots
            .write()
            .insert(TypeId::of::<T>(), Arc::new(value))
            .is_some();
        trace!(ty = type_name::<T>(), replaced, "session put");
    }

    /// Shared handle to the stored value of type `T`, if any.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let slot = self.slots.read().get(&TypeId::of::<T>()).cloned()?;
        slot.downcast::<T>().ok()
    }

    /// Owned copy of the stored value of type `T`, if any.
    pub fn get_cloned<T: Any + Send + Sync + Clone>(&self) -> Option<T> {
        self.get::<T>().map(|value| T::clone(&value))
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.slots.read().contains_key(&TypeId::of::<T>())
    }

    /// Remove and return the stored value of type `T`.
    pub fn remove<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let slot = self.slots.write().remove(&TypeId::of::<T>())?;
        slot.downcast::<T>().ok()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl fmt::Debug for TaskSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSession")
            .field("slots", &self.len())
            .finish()
    }
}
