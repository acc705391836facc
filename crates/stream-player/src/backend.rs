//! Backend launch strategies.
//!
//! - **Integrated**: `cvlc` connects to the stream, decodes, and writes to ALSA.
//! - **Pipeline**: `ffmpeg` decodes to raw s16le/44.1 kHz/stereo on stdout,
//!   `aplay` reads that pipe and writes to ALSA.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

use crate::locate::BinaryLocator;
use crate::process;

pub use panel_types::PlaybackBackend as BackendKind;

/// Integrated player program name.
pub const INTEGRATED_PLAYER: &str = "cvlc";
/// Decoder program name for the pipeline backend.
pub const DECODER: &str = "ffmpeg";
/// Raw PCM sink program name for the pipeline backend.
pub const PCM_SINK: &str = "aplay";

/// Every backend process name, swept on stop.
pub const PROCESS_NAMES: [&str; 3] = [INTEGRATED_PLAYER, DECODER, PCM_SINK];

/// Backends in the order they are attempted.
pub const FALLBACK_ORDER: [BackendKind; 2] = [BackendKind::Integrated, BackendKind::Pipeline];

const PCM_SAMPLE_RATE: &str = "44100";
const PCM_CHANNELS: &str = "2";

/// Outcome of trying to launch one backend.
pub(crate) enum Launch {
    /// A required executable is not installed.
    Unavailable { program: &'static str },
    /// All backend processes were spawned.
    Spawned {
        primary: Child,
        secondary: Option<Child>,
    },
    /// Spawning failed; anything spawned before the failure is already reaped.
    Failed(anyhow::Error),
}

/// `cvlc` arguments: no interface or video, ALSA output on `device`, and deep
/// network/live caching to ride out jitter.
pub fn integrated_args(url: &str, device: &str) -> Vec<String> {
    vec![
        "--intf".to_string(),
        "dummy".to_string(),
        "--no-video".to_string(),
        "--quiet".to_string(),
        "--aout".to_string(),
        "alsa".to_string(),
        format!("--alsa-audio-device={device}"),
        "--network-caching".to_string(),
        "8000".to_string(),
        "--live-caching".to_string(),
        "12000".to_string(),
        url.to_string(),
    ]
}

/// `ffmpeg` arguments: reconnect on drop, emit raw PCM on stdout.
pub fn decoder_args(url: &str) -> Vec<String> {
    [
        "-nostdin",
        "-reconnect",
        "1",
        "-reconnect_streamed",
        "1",
        "-reconnect_delay_max",
        "10",
        "-i",
        url,
        "-f",
        "s16le",
        "-ac",
        PCM_CHANNELS,
        "-ar",
        PCM_SAMPLE_RATE,
        "-",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

/// `aplay` arguments matching the decoder's output format.
pub fn sink_args(device: &str) -> Vec<String> {
    [
        "-D",
        device,
        "-f",
        "cd",
        "-c",
        PCM_CHANNELS,
        "-r",
        PCM_SAMPLE_RATE,
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

/// Locate and spawn the processes for `kind`.
pub(crate) fn launch(kind: BackendKind, locator: &BinaryLocator, url: &str, device: &str) -> Launch {
    match kind {
        BackendKind::Integrated => {
            let Some(player) = locator.find(INTEGRATED_PLAYER) else {
                return Launch::Unavailable {
                    program: INTEGRATED_PLAYER,
                };
            };
            match spawn_integrated(&player, url, device) {
                Ok(child) => Launch::Spawned {
                    primary: child,
                    secondary: None,
                },
                Err(e) => Launch::Failed(e),
            }
        }
        BackendKind::Pipeline => {
            let Some(decoder) = locator.find(DECODER) else {
                return Launch::Unavailable { program: DECODER };
            };
            let Some(sink) = locator.find(PCM_SINK) else {
                return Launch::Unavailable { program: PCM_SINK };
            };
            match spawn_pipeline(&decoder, &sink, url, device) {
                Ok((decoder, sink)) => Launch::Spawned {
                    primary: decoder,
                    secondary: Some(sink),
                },
                Err(e) => Launch::Failed(e),
            }
        }
    }
}

fn spawn_integrated(player: &Path, url: &str, device: &str) -> Result<Child> {
    Command::new(player)
        .args(integrated_args(url, device))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {}", player.display()))
}

fn spawn_pipeline(decoder: &Path, sink: &Path, url: &str, device: &str) -> Result<(Child, Child)> {
    let mut decoder_child = Command::new(decoder)
        .args(decoder_args(url))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {}", decoder.display()))?;

    let Some(pcm_out) = decoder_child.stdout.take() else {
        process::reap(&mut decoder_child);
        return Err(anyhow::anyhow!("decoder stdout not captured"));
    };

    // The command owns our copy of the pipe; dropping it after spawn leaves
    // the two children as the only holders.
    let mut sink_cmd = Command::new(sink);
    sink_cmd
        .args(sink_args(device))
        .stdin(Stdio::from(pcm_out))
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    let sink_result = sink_cmd.spawn();
    drop(sink_cmd);

    match sink_result {
        Ok(sink_child) => Ok((decoder_child, sink_child)),
        Err(e) => {
            process::reap(&mut decoder_child);
            Err(anyhow::Error::new(e).context(format!("spawn {}", sink.display())))
        }
    }
}
