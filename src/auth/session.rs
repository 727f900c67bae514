//! Session management
//!
//! Opaque session identifiers mapped to user ids, carried in the
//! `session_id` cookie. Sessions live in process memory only: a
//! restart logs everyone out. That is a known durability limit, not
//! a feature; `SessionStore` is a trait so a replicated cache can be
//! substituted without touching the handlers.

use std::collections::HashMap;
use std::sync::RwLock;

use super::state::generate_nonce;
use crate::metrics::SESSIONS_ACTIVE;

/// Mapping from session id to user id.
///
/// All operations are O(1) and must not block on I/O.
pub trait SessionStore: Send + Sync {
    /// Mint a fresh session for `user_id` and return its id.
    fn create(&self, user_id: &str) -> String;

    /// Look up the user behind a session id.
    fn resolve(&self, session_id: &str) -> Option<String>;

    /// Remove a session. Destroying an absent id is a no-op.
    fn destroy(&self, session_id: &str);
}

/// Process-local session store backed by an RwLock-guarded map.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, user_id: &str) -> String {
        // 16 bytes of entropy; collisions are negligible, so no check.
        let session_id = generate_nonce();
        let mut sessions = match self.sessions.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sessions.insert(session_id.clone(), user_id.to_string());
        SESSIONS_ACTIVE.set(sessions.len() as i64);
        session_id
    }

    fn resolve(&self, session_id: &str) -> Option<String> {
        let sessions = match self.sessions.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sessions.get(session_id).cloned()
    }

    fn destroy(&self, session_id: &str) {
        let mut sessions = match self.sessions.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sessions.remove(session_id);
        SESSIONS_ACTIVE.set(sessions.len() as i64);
    }
}
