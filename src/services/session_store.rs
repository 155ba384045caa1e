use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{Session, SessionId};

/// Trait for session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session, replacing any with the same id
    async fn insert(&self, session: Session) -> Result<(), ApiError>;

    /// Snapshot of a session
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, ApiError>;

    /// Apply `f` to a stored session and return the updated snapshot.
    ///
    /// Read, change and write happen under one lock, so concurrent edits
    /// to the same session never overwrite each other. When `f` fails the
    /// stored session is left untouched.
    async fn modify<F>(&self, id: &SessionId, f: F) -> Result<Session, ApiError>
    where
        F: FnOnce(&mut Session) -> Result<(), ApiError> + Send;

    /// Drop a session, returning whether it existed
    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError>;

    async fn len(&self) -> Result<usize, ApiError>;

    async fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.len().await? == 0)
    }
}

struct StoredSession {
    session: Session,
    last_access: Instant,
}

/// In-memory session storage
///
/// Sessions idle for longer than `idle_ttl` are dropped, and inserting past
/// `max_sessions` evicts the least recently used one.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, StoredSession>>>,
    idle_ttl: Option<Duration>,
    max_sessions: Option<usize>,
}

impl InMemorySessionStore {
    /// Store without expiry or size limit.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl: None,
            max_sessions: None,
        }
    }

    /// Store with an idle timeout and a session cap.
    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            idle_ttl: Some(idle_ttl),
            max_sessions: Some(max_sessions.max(1)),
            ..Self::new()
        }
    }

    /// Limits from `session_idle_secs` and `max_sessions`; zero disables each.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            idle_ttl: (config.session_idle_secs > 0)
                .then(|| Duration::from_secs(config.session_idle_secs)),
            max_sessions: (config.max_sessions > 0).then_some(config.max_sessions),
            ..Self::new()
        }
    }

    fn is_expired(&self, entry: &StoredSession, now: Instant) -> bool {
        self.idle_ttl
            .is_some_and(|ttl| now.duration_since(entry.last_access) > ttl)
    }

    /// Drop every idle session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        if self.idle_ttl.is_none() {
            return 0;
        }
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Expired idle sessions");
        }
        removed
    }

    /// Live entry for `id`, dropping it first if it has expired.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<SessionId, StoredSession>,
        id: &SessionId,
        now: Instant,
    ) -> Option<&'a mut StoredSession> {
        if sessions
            .get(id)
            .is_some_and(|entry| self.is_expired(entry, now))
        {
            sessions.remove(id);
            tracing::debug!(session_id = %id, "Session expired");
            return None;
        }
        sessions.get_mut(id)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), ApiError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| !self.is_expired(entry, now));

        if let Some(max) = self.max_sessions {
            while sessions.len() >= max && !sessions.contains_key(session.id()) {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_access)
                    .map(|(id, _)| id.clone());
                let Some(oldest) = oldest else {
                    break;
                };
                sessions.remove(&oldest);
                tracing::info!(session_id = %oldest, max, "Evicted least recently used session");
            }
        }

        sessions.insert(
            session.id().clone(),
            StoredSession {
                session,
                last_access: now,
            },
        );
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, ApiError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        Ok(self.live_entry(&mut sessions, id, now).map(|entry| {
            entry.last_access = now;
            entry.session.clone()
        }))
    }

    async fn modify<F>(&self, id: &SessionId, f: F) -> Result<Session, ApiError>
    where
        F: FnOnce(&mut Session) -> Result<(), ApiError> + Send,
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = self
            .live_entry(&mut sessions, id, now)
            .ok_or(ApiError::SessionNotFound)?;

        let mut updated = entry.session.clone();
        f(&mut updated)?;
        entry.session = updated.clone();
        entry.last_access = now;
        Ok(updated)
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn len(&self) -> Result<usize, ApiError> {
        Ok(self.sessions.read().await.len())
    }
}
