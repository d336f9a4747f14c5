//! Per-session trip history and selection
//!
//! Every browser session gets its own [`Session`]; nothing is shared between
//! sessions except the store that holds them.

use crate::trip::TripRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[cfg(test)]
mod proptests;

pub type SessionId = Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("No trip at history index {index} (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No trip selected")]
    NoSelection,
}

/// Observable state of a session's history/selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Empty,
    HasHistoryNoSelection,
    HasSelection,
}

/// Append-only history plus an optional pointer into it
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<Arc<TripRecord>>,
    /// Always `< history.len()` when set
    selected: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly generated trip and select it.
    pub fn record(&mut self, trip: TripRecord) -> Arc<TripRecord> {
        let trip = Arc::new(trip);
        self.history.push(trip.clone());
        self.selected = Some(self.history.len() - 1);
        trip
    }

    /// Point the selection at an earlier trip.
    pub fn select(&mut self, index: usize) -> Result<Arc<TripRecord>, SessionError> {
        let trip = self
            .history
            .get(index)
            .cloned()
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.history.len(),
            })?;
        self.selected = Some(index);
        Ok(trip)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<Arc<TripRecord>> {
        self.selected.map(|i| self.history[i].clone())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn history(&self) -> &[Arc<TripRecord>] {
        &self.history
    }

    pub fn state(&self) -> SelectionState {
        match (self.history.is_empty(), self.selected) {
            (true, _) => SelectionState::Empty,
            (false, None) => SelectionState::HasHistoryNoSelection,
            (false, Some(_)) => SelectionState::HasSelection,
        }
    }
}

/// All live sessions, keyed by id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionId {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, Session::new());
        tracing::info!(session = %id, "Session created");
        id
    }

    /// Run `f` against a session under the read lock.
    pub async fn read<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&Session) -> T,
    ) -> Result<T, SessionError> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(f).ok_or(SessionError::NotFound(id))
    }

    /// Run `f` against a session under the write lock.
    pub async fn update<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(f).ok_or(SessionError::NotFound(id))
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::trip_request;

    fn trip(destination: &str) -> TripRecord {
        TripRecord::new(trip_request(destination), format!("plan for {destination}"))
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.state(), SelectionState::Empty);
        assert!(session.selected().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_record_selects_newest() {
        let mut session = Session::new();
        session.record(trip("Goa"));
        let latest = session.record(trip("Agra"));

        assert_eq!(session.state(), SelectionState::HasSelection);
        assert_eq!(session.history().len(), 2);
        assert!(Arc::ptr_eq(&session.selected().unwrap(), &latest));
    }

    #[test]
    fn test_select_older_trip() {
        let mut session = Session::new();
        let first = session.record(trip("Goa"));
        session.record(trip("Agra"));

        let picked = session.select(0).unwrap();
        assert!(Arc::ptr_eq(&picked, &first));
        assert_eq!(session.selected_index(), Some(0));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_out_of_range_select_keeps_state() {
        let mut session = Session::new();
        session.record(trip("Goa"));

        assert_eq!(
            session.select(3).unwrap_err(),
            SessionError::IndexOutOfRange { index: 3, len: 1 }
        );
        assert_eq!(session.selected_index(), Some(0));
    }

    #[test]
    fn test_clear_selection_keeps_history() {
        let mut session = Session::new();
        session.record(trip("Goa"));
        session.clear_selection();

        assert_eq!(session.state(), SelectionState::HasHistoryNoSelection);
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;

        store.update(a, |s| s.record(trip("Goa"))).await.unwrap();

        assert_eq!(store.read(a, |s| s.history().len()).await.unwrap(), 1);
        assert_eq!(store.read(b, |s| s.history().len()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert_eq!(
            store.read(id, Session::state).await.unwrap_err(),
            SessionError::NotFound(id)
        );
        assert!(!store.contains(id).await);
    }
}
