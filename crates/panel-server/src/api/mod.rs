//! HTTP API handlers.
//!
//! Defines the Actix routes for playback control, device listing, and health.

pub mod devices;
pub mod health;
pub mod playback;

mod error;

pub use devices::devices_list;
pub use error::json_config;
pub use playback::{start, status, stop};
