//! Process local session transcripts.
//!
//! Each session is guarded by its own async mutex so requests for the
//! same session id are serialized while different sessions never
//! contend on a shared lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::models::ChatTurn;

#[derive(Debug)]
pub struct Session {
    turns: Vec<ChatTurn>,
    last_active: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            turns: Vec::new(),
            last_active: Instant::now(),
        }
    }

    /// Append a turn and return the new transcript length. Turns are
    /// never edited or removed.
    pub fn push(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.last_active = Instant::now();
        self.turns.len()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_active)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `session_id`, creating an empty one if it
    /// doesn't exist yet.
    pub fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(existing) = self.sessions.get(session_id) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())));
        Arc::clone(entry.value())
    }

    /// Lock the session for `session_id`, creating it if needed. The
    /// returned guard always belongs to the session currently stored
    /// under that id.
    pub async fn lock(&self, session_id: &str) -> OwnedMutexGuard<Session> {
        loop {
            let session = self.get_or_create(session_id);
            let guard = Arc::clone(&session).lock_owned().await;
            // The entry may have been evicted or cleared while waiting
            // for the lock. Eviction skips locked sessions so the check
            // holds for as long as the guard lives.
            let current = self
                .sessions
                .get(session_id)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &session));
            if current {
                return guard;
            }
        }
    }

    pub async fn append(&self, session_id: &str, turn: ChatTurn) -> usize {
        let mut session = self.lock(session_id).await;
        session.push(turn)
    }

    /// Snapshot of the transcript or `None` for unknown sessions.
    pub async fn transcript(&self, session_id: &str) -> Option<Vec<ChatTurn>> {
        let session = self
            .sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))?;
        let session = session.lock().await;
        Some(session.turns().to_vec())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions that have been idle longer than `ttl`. Sessions
    /// with an exchange in flight are skipped. Returns how many were
    /// removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.idle_for(now) <= ttl,
            Err(_) => true,
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn clear(&self) {
        self.sessions.clear();
    }
}
