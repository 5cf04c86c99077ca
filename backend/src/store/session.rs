//! Per-session table caches.
//!
//! Each dashboard session owns a [`SessionCache`]. Its tables are loaded on
//! first access and shared by every later render pass of that session. Ending
//! the session (or letting it idle past the TTL) drops the cache.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::error::DashboardResult;
use super::source::TableSource;
use crate::models::Tables;

/// Session identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

/// Lazily populated tables for one session.
pub struct SessionCache {
    id: SessionId,
    tables: OnceCell<Arc<Tables>>,
    created_at: DateTime<Utc>,
    last_access: Mutex<Instant>,
}

impl SessionCache {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            tables: OnceCell::new(),
            created_at: Utc::now(),
            last_access: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Tables for this session, loading them from `source` on first use.
    /// A failed load leaves the cache empty so the next call retries.
    pub fn tables(&self, source: &dyn TableSource) -> DashboardResult<Arc<Tables>> {
        self.touch();
        self.tables
            .get_or_try_init(|| {
                tracing::debug!(session = %self.id, source = %source.describe(), "Populating session cache");
                source.load_tables().map(Arc::new)
            })
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.get().is_some()
    }

    pub fn touch(&self) {
        *self.last_access.lock() = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_access.lock())
    }
}

/// Registry of open sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<SessionCache>>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Open a new, empty session.
    pub fn create(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions
            .write()
            .insert(id, Arc::new(SessionCache::new(id)));
        tracing::info!(session = %id, "Session opened");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<SessionCache>> {
        let cache = self.sessions.read().get(&id).cloned()?;
        cache.touch();
        Some(cache)
    }

    /// End a session and drop its cached tables. Returns `false` if the
    /// session did not exist.
    pub fn end(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "Session closed");
        }
        removed
    }

    /// Drop sessions idle longer than the TTL. Returns how many were dropped.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, cache| cache.idle_for(now) <= self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
