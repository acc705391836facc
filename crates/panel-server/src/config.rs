//! Configuration loading and parsing.
//!
//! The config file is optional; every field has a default and CLI flags
//! override whatever the file sets.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use stream_player::PlayerConfig;

/// Default HTTP bind address of the control panel.
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Top-level server configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    pub bind: Option<String>,
    /// Output device used when a start request names none.
    pub default_device: Option<String>,
    /// How long a backend must stay alive after spawn, in milliseconds.
    pub settle_ms: Option<u64>,
    /// Graceful termination wait per process on stop, in milliseconds.
    pub stop_timeout_ms: Option<u64>,
    /// Directory holding the control panel `index.html`.
    pub web_root: Option<String>,
}

impl ServerConfig {
    /// Load configuration from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
        let cfg = toml::from_str::<ServerConfig>(&raw)
            .with_context(|| format!("parse config {:?}", path))?;
        Ok(cfg)
    }
}

/// Parse an optional bind address from config.
pub fn bind_from_config(cfg: &ServerConfig) -> Result<Option<SocketAddr>> {
    let Some(bind) = cfg.bind.as_deref() else {
        return Ok(None);
    };
    let addr = bind.parse().with_context(|| format!("parse bind {bind}"))?;
    Ok(Some(addr))
}

/// Extract the optional web root from config.
pub fn web_root_from_config(cfg: &ServerConfig) -> Option<PathBuf> {
    non_blank(cfg.web_root.as_deref()).map(PathBuf::from)
}

/// Build player settings from config plus an optional device override.
///
/// Zero intervals are rejected: a zero settle would accept any backend that
/// survives its first poll.
pub fn player_config(
    cfg: &ServerConfig,
    device_override: Option<&str>,
) -> Result<PlayerConfig> {
    let mut player = PlayerConfig::default();
    if let Some(device) = non_blank(device_override).or_else(|| non_blank(cfg.default_device.as_deref())) {
        player.default_device = device.to_string();
    }
    if let Some(ms) = cfg.settle_ms {
        player.settle_interval = positive_millis("settle_ms", ms)?;
    }
    if let Some(ms) = cfg.stop_timeout_ms {
        player.stop_timeout = positive_millis("stop_timeout_ms", ms)?;
    }
    Ok(player)
}

fn positive_millis(key: &str, ms: u64) -> Result<Duration> {
    if ms == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_millis(ms))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
