//! Shared application state.

use stream_player::{DeviceLister, PlayerHandle};

/// State shared by all HTTP handlers.
pub struct AppState {
    /// Command handle of the single playback worker.
    pub player: PlayerHandle,
    /// System command used to enumerate output devices.
    pub devices: DeviceLister,
}

impl AppState {
    pub fn new(player: PlayerHandle, devices: DeviceLister) -> Self {
        Self { player, devices }
    }
}
