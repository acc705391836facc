//! Playback worker.
//!
//! A single thread owns the [`Orchestrator`] and handles commands one at a
//! time, which is what keeps concurrent HTTP requests from racing on the
//! session. A `Stop` queued behind a `Start` runs after the start returns.

use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};
use panel_types::PlayerStatus;

use crate::orchestrator::Orchestrator;
use crate::status::{PlayerStatusState, START_FAILED_MESSAGE};

/// Commands accepted by the playback worker thread.
#[derive(Debug)]
pub enum PlayerCommand {
    Start {
        url: String,
        device: Option<String>,
        reply: Sender<bool>,
    },
    Stop {
        reply: Sender<()>,
    },
    /// Stop playback and exit the worker.
    Quit,
}

/// Cloneable handle for sending commands to the playback worker.
#[derive(Clone)]
pub struct PlayerHandle {
    cmd_tx: Sender<PlayerCommand>,
    status: Arc<Mutex<PlayerStatusState>>,
}

impl PlayerHandle {
    /// Start playback and block until the worker reports the outcome.
    ///
    /// Returns `false` when the worker is gone.
    pub fn start(&self, url: impl Into<String>, device: Option<String>) -> bool {
        let (reply, rx) = crossbeam_channel::bounded(1);
        let cmd = PlayerCommand::Start {
            url: url.into(),
            device,
            reply,
        };
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("player worker offline; start dropped");
            return false;
        }
        rx.recv().unwrap_or(false)
    }

    /// Stop playback and block until the worker has torn the session down.
    pub fn stop(&self) {
        let (reply, rx) = crossbeam_channel::bounded(1);
        if self.cmd_tx.send(PlayerCommand::Stop { reply }).is_err() {
            tracing::warn!("player worker offline; stop dropped");
            return;
        }
        let _ = rx.recv();
    }

    /// Ask the worker to stop playback and exit, without waiting.
    pub fn quit(&self) {
        let _ = self.cmd_tx.send(PlayerCommand::Quit);
    }

    /// Current status snapshot.
    pub fn status(&self) -> PlayerStatus {
        self.status
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .snapshot()
    }
}

/// Running worker thread plus its command handle.
pub struct PlayerWorker {
    pub handle: PlayerHandle,
    join: std::thread::JoinHandle<()>,
}

impl PlayerWorker {
    /// Send `Quit` and wait for the worker to finish its final stop.
    pub fn shutdown(self) {
        self.handle.quit();
        if self.join.join().is_err() {
            tracing::error!("player worker panicked");
        }
    }
}

/// Spawn the playback worker thread.
pub fn spawn_player(orchestrator: Orchestrator) -> PlayerWorker {
    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let status = PlayerStatusState::shared();
    let worker_status = status.clone();
    let join = std::thread::spawn(move || player_thread_main(orchestrator, worker_status, cmd_rx));
    PlayerWorker {
        handle: PlayerHandle { cmd_tx, status },
        join,
    }
}

/// Main loop for the playback worker.
fn player_thread_main(
    mut orchestrator: Orchestrator,
    status: Arc<Mutex<PlayerStatusState>>,
    cmd_rx: Receiver<PlayerCommand>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            PlayerCommand::Start { url, device, reply } => {
                tracing::info!(url = %url, device = ?device, "start requested");
                let ok = orchestrator.start(&url, device.as_deref());
                {
                    let mut s = status.lock().unwrap_or_else(|err| err.into_inner());
                    match orchestrator.session() {
                        Some(session) if ok => s.mark_playing(session),
                        // Rejected before teardown; the previous session still runs.
                        Some(_) => s.last_error = Some(START_FAILED_MESSAGE.to_string()),
                        None => s.mark_failed(),
                    }
                }
                let _ = reply.send(ok);
            }
            PlayerCommand::Stop { reply } => {
                tracing::info!("stop requested");
                orchestrator.stop();
                status
                    .lock()
                    .unwrap_or_else(|err| err.into_inner())
                    .mark_stopped();
                let _ = reply.send(());
            }
            PlayerCommand::Quit => break,
        }
    }

    orchestrator.stop();
    status
        .lock()
        .unwrap_or_else(|err| err.into_inner())
        .mark_stopped();
    tracing::info!("player worker exited");
}
