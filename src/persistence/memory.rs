//! In-memory backend recording every save.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::MotorDefaults;
use crate::error::PersistenceError;

use super::{LoadedState, PersistedState, StateStore};

#[derive(Debug, Default)]
struct Inner {
    current: Option<PersistedState>,
    saves: Vec<PersistedState>,
    failing: bool,
}

/// Store kept in memory. Clones share the same record.
///
/// Every successful save is kept in a list that is never trimmed, so this
/// store is meant for tests and short-lived simulations.
#[derive(Debug, Clone)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<Inner>>,
    defaults: MotorDefaults,
}

impl MemoryStateStore {
    /// Empty store; the first load yields defaults.
    pub fn new(defaults: MotorDefaults) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            defaults,
        }
    }

    /// Store pre-populated with `state`.
    pub fn with_state(state: PersistedState, defaults: MotorDefaults) -> Self {
        let store = Self::new(defaults);
        store.lock().current = Some(state);
        store
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Last successfully saved (or initial) record.
    pub fn current(&self) -> Option<PersistedState> {
        self.lock().current
    }

    /// Every successful save, oldest first.
    pub fn saves(&self) -> Vec<PersistedState> {
        self.lock().saves.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> LoadedState {
        match self.lock().current {
            Some(state) => LoadedState::intact(state),
            None => LoadedState::defaults(&self.defaults),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        let mut inner = self.lock();
        if inner.failing {
            return Err(PersistenceError::Write {
                path: "<memory>".into(),
                source: std::io::Error::other("store marked failing"),
            });
        }
        inner.current = Some(*state);
        inner.saves.push(*state);
        Ok(())
    }
}
