use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::model::HistoryEntry;

/// In-memory state behind the mock server: users, live sessions and
/// per-user query history.
///
/// Constructed explicitly, once per process or once per test case, and
/// handed to the mock server; nothing here is module-level state. All
/// collections sit behind one mutex and no operation awaits while holding
/// it, so each call is atomic from the caller's perspective.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// username -> password. Plaintext; a known simplification of this design.
    users: HashMap<String, String>,
    /// token -> username. One entry per login; never expires.
    sessions: HashMap<String, String>,
    /// username -> past queries, most recent first.
    history: HashMap<String, Vec<HistoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the `demo`/`demo` account used by demo mode.
    pub fn with_demo_user() -> Self {
        let store = Self::new();
        store.create_user("demo", "demo");
        store
    }

    /// Adds a user. Returns `false` when the username is already taken.
    pub fn create_user(&self, username: &str, password: &str) -> bool {
        let mut inner = self.lock();
        if inner.users.contains_key(username) {
            return false;
        }
        inner.users.insert(username.to_string(), password.to_string());
        true
    }

    /// True when the exact username/password pair is on record.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.lock().users.get(username).is_some_and(|stored| stored == password)
    }

    /// Mints a fresh opaque token and records the session under it.
    pub fn create_session(&self, username: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.lock().sessions.insert(token.clone(), username.to_string());
        token
    }

    /// Resolves a bearer token to the logged-in username.
    pub fn session_user(&self, token: &str) -> Option<String> {
        self.lock().sessions.get(token).cloned()
    }

    /// Prepends one entry to the user's history.
    pub fn record_query(&self, username: &str, entry: HistoryEntry) {
        self.lock().history.entry(username.to_string()).or_default().insert(0, entry);
    }

    /// The user's past queries, most recent first. Empty when none.
    pub fn history_for(&self, username: &str) -> Vec<HistoryEntry> {
        self.lock().history.get(username).cloned().unwrap_or_default()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn entry(city: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc::now(),
            city: city.to_string(),
            summary: format!("Location: {city}\n"),
        }
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let store = MemoryStore::new();
        assert!(store.create_user("demo", "demo"));
        assert!(!store.create_user("demo", "other"));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn authenticate_requires_the_exact_pair() {
        let store = MemoryStore::with_demo_user();
        assert!(store.authenticate("demo", "demo"));
        assert!(!store.authenticate("demo", "wrong"));
        assert!(!store.authenticate("nobody", "demo"));
    }

    #[test]
    fn each_login_mints_a_distinct_token() {
        let store = MemoryStore::with_demo_user();
        let first = store.create_session("demo");
        let second = store.create_session("demo");

        assert_ne!(first, second);
        assert_eq!(store.session_user(&first).as_deref(), Some("demo"));
        assert_eq!(store.session_user(&second).as_deref(), Some("demo"));
        assert_eq!(store.session_user("unknown"), None);
    }

    #[test]
    fn history_is_prepended() {
        let store = MemoryStore::new();
        store.record_query("demo", entry("A"));
        store.record_query("demo", entry("B"));

        let history = store.history_for("demo");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].city, "B");
        assert_eq!(history[1].city, "A");
    }

    #[test]
    fn history_is_empty_for_unknown_users() {
        let store = MemoryStore::new();
        assert!(store.history_for("nobody").is_empty());
    }
}
