//! ALSA output device enumeration via `aplay -l`.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Runs the system device listing command and filters its output.
#[derive(Clone, Debug)]
pub struct DeviceLister {
    program: PathBuf,
    args: Vec<String>,
}

impl DeviceLister {
    /// Custom listing command, e.g. for tests.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Return device lines in listing order.
    pub fn list(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("run {}", self.program.display()))?;
        if !output.status.success() {
            tracing::debug!(
                program = %self.program.display(),
                status = %output.status,
                "device listing exited unsuccessfully"
            );
        }
        Ok(parse_device_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for DeviceLister {
    fn default() -> Self {
        Self::new("aplay", vec!["-l".to_string()])
    }
}

/// Keep the `card N: ...` lines of an `aplay -l` listing, trimmed.
pub fn parse_device_lines(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter(|line| line.to_lowercase().contains("card") && line.contains(':'))
        .map(|line| line.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
**** List of PLAYBACK Hardware Devices ****
card 0: sndrpihifiberry [snd_rpi_hifiberry_dac], device 0: HifiBerry DAC HiFi pcm5102a-hifi-0 [HifiBerry DAC HiFi pcm5102a-hifi-0]
  Subdevices: 1/1
  Subdevice #0: subdevice #0
card 2: Device [USB Audio Device], device 0: USB Audio [USB Audio]
  Subdevices: 1/1
";

    #[test]
    fn keeps_card_lines_in_order() {
        let devices = parse_device_lines(LISTING);
        assert_eq!(devices.len(), 2);
        assert!(devices[0].starts_with("card 0: sndrpihifiberry"));
        assert!(devices[1].starts_with("card 2: Device"));
    }

    #[test]
    fn card_match_is_case_insensitive_and_trims() {
        let devices = parse_device_lines("   CARD 1: Loopback [Loopback]   \nno colon card line\n");
        assert_eq!(devices, vec!["CARD 1: Loopback [Loopback]"]);
    }

    #[test]
    fn empty_listing_yields_no_devices() {
        assert!(parse_device_lines("").is_empty());
    }

    #[test]
    fn missing_program_is_an_error() {
        let lister = DeviceLister::new("/nonexistent/aplay", vec!["-l".to_string()]);
        assert!(lister.list().is_err());
    }

    #[test]
    fn runs_listing_command() {
        let lister = DeviceLister::new(
            "sh",
            vec!["-c".to_string(), "echo 'card 0: test [Test], device 0: x'".to_string()],
        );
        let devices = lister.list().expect("list");
        assert_eq!(devices, vec!["card 0: test [Test], device 0: x"]);
    }
}
