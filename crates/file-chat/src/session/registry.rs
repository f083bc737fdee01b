//! Registry of live sessions with idle expiry

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::state::SessionState;

/// Shared handle to one session. Holding the lock serializes that session's events.
pub type SessionHandle = Arc<tokio::sync::Mutex<SessionState>>;

struct SessionEntry {
    state: SessionHandle,
    last_active: Mutex<Instant>,
}

impl SessionEntry {
    fn new(summary_chars: usize) -> Self {
        Self {
            state: Arc::new(tokio::sync::Mutex::new(SessionState::new(summary_chars))),
            last_active: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_active.lock() = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_active.lock().elapsed()
    }
}

/// All open sessions keyed by ID
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionEntry>,
    summary_chars: usize,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(summary_chars: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            summary_chars,
        }
    }

    /// Open a session. Resuming an existing ID returns it untouched; an unknown
    /// or missing ID creates a fresh empty session.
    ///
    /// Returns the ID, the handle and whether the session was created.
    pub fn open(&self, session_id: Option<Uuid>) -> (Uuid, SessionHandle, bool) {
        if let Some(id) = session_id {
            if let Ok(handle) = self.get(&id) {
                return (id, handle, false);
            }
        }

        let id = Uuid::new_v4();
        let entry = SessionEntry::new(self.summary_chars);
        let handle = Arc::clone(&entry.state);
        self.sessions.insert(id, entry);
        tracing::info!("Opened session {} ({} active)", id, self.sessions.len());
        (id, handle, true)
    }

    /// Look up a session and mark it active
    pub fn get(&self, session_id: &Uuid) -> Result<SessionHandle> {
        let entry = self
            .sessions
            .get(session_id)
            .ok_or(Error::SessionNotFound(*session_id))?;
        entry.touch();
        Ok(Arc::clone(&entry.state))
    }

    /// End a session, dropping its transcript, summary and upload
    pub fn remove(&self, session_id: &Uuid) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::info!("Closed session {}", session_id);
        }
        removed
    }

    /// Drop sessions idle for at least `ttl`. Sessions with an event in flight are kept.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.idle_for() < ttl || entry.state.try_lock().is_err());
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no session is open
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Periodically evict idle sessions
    pub fn spawn_sweeper(self: Arc<Self>, ttl: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.evict_idle(ttl);
            }
        })
    }
}
