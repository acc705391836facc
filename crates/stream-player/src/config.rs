use std::time::Duration;

/// Primary DAC device used when a start request names no device.
pub const DEFAULT_DEVICE: &str = "hw:0,0";

/// Orchestrator tuning and process supervision parameters.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Output device used when a start request leaves it empty.
    pub default_device: String,
    /// How long a freshly spawned backend must stay alive to count as started.
    pub settle_interval: Duration,
    /// Bounded wait for a graceful exit after SIGTERM.
    pub stop_timeout: Duration,
    /// Liveness polling period used during settle and stop waits.
    pub poll_interval: Duration,
    /// Process names swept with `pkill -x` on every stop.
    ///
    /// The sweep catches orphans from a previous crash of the service, but it
    /// also signals unrelated processes with the same names.
    pub sweep_names: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_device: DEFAULT_DEVICE.to_string(),
            settle_interval: Duration::from_millis(1500),
            stop_timeout: Duration::from_secs(1),
            poll_interval: Duration::from_millis(50),
            sweep_names: crate::backend::PROCESS_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl PlayerConfig {
    /// Pick the requested device, or the default when it is absent or blank.
    ///
    /// A non-blank device is returned verbatim.
    pub fn resolve_device(&self, device: Option<&str>) -> String {
        match device {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.default_device.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dac_deployment() {
        let cfg = PlayerConfig::default();
        assert_eq!(cfg.default_device, "hw:0,0");
        assert_eq!(cfg.settle_interval, Duration::from_millis(1500));
        assert_eq!(cfg.stop_timeout, Duration::from_secs(1));
        assert_eq!(cfg.sweep_names, vec!["cvlc", "ffmpeg", "aplay"]);
    }

    #[test]
    fn resolve_device_falls_back_on_blank() {
        let cfg = PlayerConfig::default();
        assert_eq!(cfg.resolve_device(None), "hw:0,0");
        assert_eq!(cfg.resolve_device(Some("")), "hw:0,0");
        assert_eq!(cfg.resolve_device(Some("   ")), "hw:0,0");
    }

    #[test]
    fn resolve_device_passes_names_through() {
        let cfg = PlayerConfig::default();
        assert_eq!(cfg.resolve_device(Some("hw:2,0")), "hw:2,0");
        assert_eq!(cfg.resolve_device(Some("plughw:1,0")), "plughw:1,0");
    }
}
