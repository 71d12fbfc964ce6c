use crate::error::{AdweaveError, Result};
use crate::playback::session::PlaybackSession;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Registry of live playback sessions.
///
/// Sessions are in-memory only and never survive a restart, so the
/// registry is a shared map with a TTL sweep for sessions whose viewer
/// vanished without a teardown call.
/// Dropping a session from the map cancels its timers (the skip gate
/// aborts on drop).
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<DashMap<String, PlaybackSession>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Register a freshly created session
    pub fn insert(&self, session: PlaybackSession) {
        self.sessions
            .insert(session.session_id().to_string(), session);
    }

    /// Run a closure against a session, refreshing its idle clock.
    ///
    /// The closure runs under the map shard lock, so it must stay
    /// synchronous — every session event method is.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut PlaybackSession) -> R,
    ) -> Result<R> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AdweaveError::SessionNotFound(session_id.to_string()))?;
        entry.touch();
        Ok(f(&mut entry))
    }

    /// Remove a session (viewer closed the player, or the session ended)
    pub fn remove(&self, session_id: &str) -> Option<PlaybackSession> {
        self.sessions
            .remove(session_id)
            .map(|(_, session)| session)
    }

    /// Sweep sessions idle past the TTL, plus ended sessions whose
    /// removal was missed
    pub fn cleanup_expired(&self) {
        let ttl_secs = self.ttl.as_secs();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_ended() && session.idle_secs() < ttl_secs);
        let swept = before.saturating_sub(self.sessions.len());
        if swept > 0 {
            debug!("Swept {} expired playback session(s)", swept);
        }
    }

    /// Get the count of active sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
