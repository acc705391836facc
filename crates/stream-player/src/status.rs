use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use panel_types::{PlaybackBackend, PlaybackState, PlayerStatus};

use crate::orchestrator::SessionInfo;

/// Generic failure message surfaced to clients; backend details stay in logs.
pub const START_FAILED_MESSAGE: &str = "could not start playback";

/// Shared player status updated by the playback worker.
#[derive(Debug, Default)]
pub struct PlayerStatusState {
    /// Backend that owns the active session.
    pub backend: Option<PlaybackBackend>,
    /// Stream URL being played.
    pub url: Option<String>,
    /// Output device the session is bound to.
    pub device: Option<String>,
    /// Session start time (unix epoch milliseconds).
    pub started_at_ms: Option<u64>,
    /// Message from the last failed start.
    pub last_error: Option<String>,
}

impl PlayerStatusState {
    /// Create a shared, mutex-protected status store.
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Return a snapshot suitable for API responses.
    pub fn snapshot(&self) -> PlayerStatus {
        let state = if self.backend.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        };
        PlayerStatus {
            state,
            backend: self.backend,
            url: self.url.clone(),
            device: self.device.clone(),
            started_at_ms: self.started_at_ms,
            last_error: self.last_error.clone(),
        }
    }

    /// Record a freshly started session.
    pub fn mark_playing(&mut self, session: &SessionInfo) {
        self.backend = Some(session.backend);
        self.url = Some(session.url.clone());
        self.device = Some(session.device.clone());
        self.started_at_ms = Some(now_ms());
        self.last_error = None;
    }

    /// Record a failed start. Any previous session was already torn down.
    pub fn mark_failed(&mut self) {
        self.clear_playback();
        self.last_error = Some(START_FAILED_MESSAGE.to_string());
    }

    /// Record an explicit stop.
    pub fn mark_stopped(&mut self) {
        self.clear_playback();
        self.last_error = None;
    }

    /// Clear session-specific fields.
    fn clear_playback(&mut self) {
        self.backend = None;
        self.url = None;
        self.device = None;
        self.started_at_ms = None;
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
