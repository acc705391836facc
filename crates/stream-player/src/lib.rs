//! Network stream player orchestration for an ALSA DAC.
//!
//! Audio decoding is delegated to external programs; this crate only picks a
//! backend, launches its processes, and supervises them.

pub mod backend;
pub mod config;
pub mod devices;
pub mod locate;
pub mod orchestrator;
pub mod status;
pub mod worker;

mod process;

pub use backend::BackendKind;
pub use config::PlayerConfig;
pub use devices::DeviceLister;
pub use locate::BinaryLocator;
pub use orchestrator::{Orchestrator, SessionInfo};
pub use worker::{PlayerHandle, PlayerWorker, spawn_player};
