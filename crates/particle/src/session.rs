// File: src/session.rs
// Purpose: In-memory session store with lazy expiry

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Key/value bag stored per session
pub type SessionData = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub data: SessionData,
    pub created_at: DateTime<Utc>,
    pub max_age: Duration,
}

impl SessionRecord {
    fn new(data: SessionData, max_age: Duration) -> Self {
        Self {
            data,
            created_at: Utc::now(),
            max_age,
        }
    }

    /// A record is expired once its age reaches `max_age`, so a zero
    /// `max_age` is expired immediately.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let age = now
            .signed_duration_since(self.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        age >= self.max_age
    }
}

/// Shared session store handle.
///
/// Cloning is cheap and every clone sees the same records. Nothing is
/// persisted; records live for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SessionRecord>> {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionRecord>> {
        self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a session and return its fresh id
    pub fn create(&self, data: SessionData, max_age: Duration) -> String {
        let id = Uuid::new_v4().to_string();
        self.write().insert(id.clone(), SessionRecord::new(data, max_age));
        debug!(session_id = %id, max_age_secs = max_age.as_secs(), "session created");
        id
    }

    /// Session data, or `None` when unknown or expired.
    ///
    /// An expired record is removed as a side effect.
    pub fn get(&self, id: &str) -> Option<SessionData> {
        let now = Utc::now();
        {
            let sessions = self.read();
            match sessions.get(id) {
                None => return None,
                Some(record) if !record.is_expired_at(now) => return Some(record.data.clone()),
                Some(_) => {}
            }
        }

        let mut sessions = self.write();
        // Re-check under the write lock; another request may have replaced it
        if sessions.get(id).is_some_and(|record| record.is_expired_at(now)) {
            sessions.remove(id);
            debug!(session_id = %id, "session expired");
        }
        None
    }

    /// Shallow-merge `data` into an existing session. Returns `false` when
    /// the session does not exist.
    pub fn update(&self, id: &str, data: SessionData) -> bool {
        match self.write().get_mut(id) {
            Some(record) => {
                record.data.extend(data);
                true
            }
            None => false,
        }
    }

    pub fn destroy(&self, id: &str) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            debug!(session_id = %id, "session destroyed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every expired record; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired_at(now));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> SessionData {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let id = store.create(data(json!({"user": "ada"})), Duration::from_secs(60));
        assert_eq!(store.get(&id), Some(data(json!({"user": "ada"}))));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = SessionStore::new();
        let a = store.create(SessionData::new(), Duration::from_secs(60));
        let b = store.create(SessionData::new(), Duration::from_secs(60));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_zero_max_age_expires_on_get() {
        let store = SessionStore::new();
        let id = store.create(data(json!({"user": "ada"})), Duration::ZERO);
        assert_eq!(store.get(&id), None);
        assert!(store.is_empty());
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn test_update_shallow_merges() {
        let store = SessionStore::new();
        let id = store.create(data(json!({"a": 1, "b": {"x": 1}})), Duration::from_secs(60));
        assert!(store.update(&id, data(json!({"b": {"y": 2}, "c": 3}))));
        assert_eq!(store.get(&id), Some(data(json!({"a": 1, "b": {"y": 2}, "c": 3}))));
    }

    #[test]
    fn test_update_unknown_session() {
        let store = SessionStore::new();
        assert!(!store.update("missing", SessionData::new()));
    }

    #[test]
    fn test_destroy() {
        let store = SessionStore::new();
        let id = store.create(SessionData::new(), Duration::from_secs(60));
        assert!(store.destroy(&id));
        assert!(!store.destroy(&id));
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn test_clones_share_records() {
        let store = SessionStore::new();
        let other = store.clone();
        let id = store.create(SessionData::new(), Duration::from_secs(60));
        assert!(other.get(&id).is_some());
    }

    #[test]
    fn test_purge_expired() {
        let store = SessionStore::new();
        store.create(SessionData::new(), Duration::ZERO);
        store.create(SessionData::new(), Duration::ZERO);
        let keep = store.create(SessionData::new(), Duration::from_secs(60));
        assert_eq!(store.purge_expired(), 2);
        assert!(store.get(&keep).is_some());
    }
}
