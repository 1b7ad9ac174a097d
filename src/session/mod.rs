//! Per-tab translation state.
//!
//! Each browser tab drives at most one translation at a time. The state
//! lives here, outside the orchestrator, so that the orchestrator itself
//! stays stateless and reentrant.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{BridgeError, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Lifecycle of a tab's translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl SessionState {
    /// Idle/Succeeded/Failed -> Pending. A pending tab cannot start again.
    pub fn begin(self) -> Result<Self> {
        match self {
            SessionState::Pending => Err(BridgeError::AlreadyInProgress),
            _ => Ok(SessionState::Pending),
        }
    }

    /// Pending -> Succeeded/Failed. Any other state is left untouched.
    pub fn finish(self, success: bool) -> Self {
        match (self, success) {
            (SessionState::Pending, true) => SessionState::Succeeded,
            (SessionState::Pending, false) => SessionState::Failed,
            (other, _) => other,
        }
    }
}

/// Tracks the state of tabs with a request in flight.
///
/// A settled tab keeps its final state until the next `begin` on any tab,
/// which drops every entry that is no longer pending. The map therefore
/// never outgrows the number of concurrent requests.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    tabs: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, tab_id: &str) -> SessionState {
        self.tabs
            .lock()
            .get(tab_id)
            .copied()
            .unwrap_or(SessionState::Idle)
    }

    /// Marks the tab pending and returns a guard that records the outcome.
    ///
    /// Dropping the guard without calling [`SessionGuard::finish`] counts as
    /// a failure, so an abandoned request never leaves the tab stuck.
    pub fn begin(&self, tab_id: &str) -> Result<SessionGuard> {
        let mut tabs = self.tabs.lock();
        let current = tabs.get(tab_id).copied().unwrap_or(SessionState::Idle);
        let next = current.begin()?;
        tabs.retain(|_, state| *state == SessionState::Pending);
        tabs.insert(tab_id.to_string(), next);

        Ok(SessionGuard {
            registry: self.clone(),
            tab_id: tab_id.to_string(),
            finished: false,
        })
    }

    /// Number of tabs with a request in flight.
    pub fn pending(&self) -> usize {
        self.tabs
            .lock()
            .values()
            .filter(|state| **state == SessionState::Pending)
            .count()
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.tabs.lock().len()
    }

    fn finish(&self, tab_id: &str, success: bool) {
        let mut tabs = self.tabs.lock();
        if let Some(state) = tabs.get_mut(tab_id) {
            *state = state.finish(success);
        }
    }
}

/// Holds a tab in `Pending` until finished or dropped.
pub struct SessionGuard {
    registry: SessionRegistry,
    tab_id: String,
    finished: bool,
}

impl SessionGuard {
    pub fn finish(mut self, success: bool) {
        self.registry.finish(&self.tab_id, success);
        self.finished = true;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.registry.finish(&self.tab_id, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert_eq!(SessionState::Idle.begin().unwrap(), SessionState::Pending);
        assert_eq!(SessionState::Failed.begin().unwrap(), SessionState::Pending);
        assert!(matches!(
            SessionState::Pending.begin(),
            Err(BridgeError::AlreadyInProgress)
        ));
        assert_eq!(SessionState::Pending.finish(true), SessionState::Succeeded);
        assert_eq!(SessionState::Pending.finish(false), SessionState::Failed);
        assert_eq!(SessionState::Idle.finish(true), SessionState::Idle);
    }

    #[test]
    fn test_second_begin_rejected_while_pending() {
        let registry = SessionRegistry::new();
        let guard = registry.begin("tab-1").unwrap();
        assert_eq!(registry.state("tab-1"), SessionState::Pending);
        assert!(registry.begin("tab-1").is_err());

        // Other tabs are independent
        let other = registry.begin("tab-2").unwrap();
        other.finish(true);

        guard.finish(true);
        assert_eq!(registry.state("tab-1"), SessionState::Succeeded);
        assert!(registry.begin("tab-1").is_ok());
    }

    #[test]
    fn test_dropped_guard_marks_failed() {
        let registry = SessionRegistry::new();
        {
            let _guard = registry.begin("tab-1").unwrap();
        }
        assert_eq!(registry.state("tab-1"), SessionState::Failed);
        assert!(registry.begin("tab-1").is_ok());
    }

    #[test]
    fn test_settled_tabs_are_evicted() {
        let registry = SessionRegistry::new();
        for i in 0..100 {
            registry.begin(&format!("tab-{}", i)).unwrap().finish(i % 2 == 0);
        }
        // Only the last settled tab is still remembered
        assert_eq!(registry.tracked(), 1);
        assert_eq!(registry.state("tab-99"), SessionState::Failed);
        assert_eq!(registry.state("tab-0"), SessionState::Idle);

        let pending = registry.begin("busy").unwrap();
        registry.begin("other").unwrap().finish(true);
        assert_eq!(registry.state("busy"), SessionState::Pending);
        assert_eq!(registry.tracked(), 2);
        assert_eq!(registry.pending(), 1);

        pending.finish(true);
        registry.begin("next").unwrap().finish(true);
        assert_eq!(registry.tracked(), 1);
        assert_eq!(registry.pending(), 0);
    }
}
