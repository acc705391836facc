//! Playback session orchestrator.
//!
//! Owns at most one playback session. `start` always tears down the previous
//! session before spawning, tries the backends in [`FALLBACK_ORDER`], and
//! cleans up after itself when none of them comes up. `stop` is idempotent and
//! bounded: handle-based SIGTERM first, then a name-based sweep for orphans,
//! then SIGKILL + reap for anything still tracked.
//!
//! Calls are not internally synchronized; the caller serializes them (see
//! [`crate::worker`]).

use std::process::Child;

use crate::backend::{self, BackendKind, FALLBACK_ORDER, Launch};
use crate::config::PlayerConfig;
use crate::locate::BinaryLocator;
use crate::process;

/// Description of the active session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub backend: BackendKind,
    pub url: String,
    pub device: String,
}

struct Session {
    info: SessionInfo,
    primary: Child,
    /// PCM sink fed by the decoder; only present for the pipeline backend.
    secondary: Option<Child>,
}

impl Session {
    fn into_children(self) -> Vec<Child> {
        let mut children = vec![self.primary];
        children.extend(self.secondary);
        children
    }

    fn process_ids(&self) -> Vec<u32> {
        std::iter::once(self.primary.id())
            .chain(self.secondary.as_ref().map(Child::id))
            .collect()
    }
}

/// Single-session player orchestrator.
pub struct Orchestrator {
    config: PlayerConfig,
    locator: BinaryLocator,
    session: Option<Session>,
}

impl Orchestrator {
    pub fn new(config: PlayerConfig, locator: BinaryLocator) -> Self {
        Self {
            config,
            locator,
            session: None,
        }
    }

    /// Backend of the active session, if any.
    pub fn active_backend(&self) -> Option<BackendKind> {
        self.session.as_ref().map(|s| s.info.backend)
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref().map(|s| &s.info)
    }

    /// Pids of the processes owned by the active session (primary first).
    pub fn process_ids(&self) -> Vec<u32> {
        self.session
            .as_ref()
            .map(Session::process_ids)
            .unwrap_or_default()
    }

    /// Start playing `url` on `device` (default device when absent or blank).
    ///
    /// Returns `false` when no backend stayed alive through the settle
    /// interval; in that case nothing spawned by this call is left running.
    pub fn start(&mut self, url: &str, device: Option<&str>) -> bool {
        if url.trim().is_empty() {
            tracing::warn!("start rejected: empty url");
            return false;
        }

        self.stop();

        let device = self.config.resolve_device(device);
        for kind in FALLBACK_ORDER {
            if let Some(session) = self.try_backend(kind, url, &device) {
                tracing::info!(
                    backend = kind.label(),
                    url = %url,
                    device = %device,
                    pids = ?session.process_ids(),
                    "playback started"
                );
                self.session = Some(session);
                return true;
            }
        }

        tracing::warn!(url = %url, device = %device, "could not start playback on any backend");
        self.stop();
        false
    }

    /// Stop the active session and sweep orphaned backend processes.
    ///
    /// Safe to call at any time; never fails.
    pub fn stop(&mut self) {
        let had_session = self.session.is_some();
        let mut children = self
            .session
            .take()
            .map(Session::into_children)
            .unwrap_or_default();

        for child in children.iter_mut() {
            process::terminate(child, self.config.stop_timeout, self.config.poll_interval);
        }
        process::sweep_by_name(&self.config.sweep_names);
        for child in children.iter_mut() {
            process::reap(child);
        }

        if had_session {
            tracing::info!("playback stopped");
        }
    }

    fn try_backend(&self, kind: BackendKind, url: &str, device: &str) -> Option<Session> {
        let (mut primary, mut secondary) = match backend::launch(kind, &self.locator, url, device) {
            Launch::Unavailable { program } => {
                tracing::debug!(backend = kind.label(), program, "backend unavailable");
                return None;
            }
            Launch::Failed(e) => {
                tracing::warn!(backend = kind.label(), error = %format!("{e:#}"), "backend spawn failed");
                return None;
            }
            Launch::Spawned { primary, secondary } => (primary, secondary),
        };

        let alive = {
            let mut children: Vec<&mut Child> = std::iter::once(&mut primary)
                .chain(secondary.as_mut())
                .collect();
            process::settle(
                &mut children,
                self.config.settle_interval,
                self.config.poll_interval,
            )
        };

        if alive {
            return Some(Session {
                info: SessionInfo {
                    backend: kind,
                    url: url.to_string(),
                    device: device.to_string(),
                },
                primary,
                secondary,
            });
        }

        tracing::info!(backend = kind.label(), "backend did not stay up; falling back");
        process::reap(&mut primary);
        if let Some(child) = secondary.as_mut() {
            process::reap(child);
        }
        None
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.stop();
        }
    }
}
