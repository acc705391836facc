use serde::{Deserialize, Serialize};

/// Playback strategy used to turn a network stream into sound on a device.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PlaybackBackend {
    /// Single player process that connects, decodes, and writes to the device.
    Integrated,
    /// Decoder process piping raw PCM into a separate sink process.
    Pipeline,
}

impl PlaybackBackend {
    /// Stable lowercase label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            PlaybackBackend::Integrated => "integrated",
            PlaybackBackend::Pipeline => "pipeline",
        }
    }
}

/// Coarse player state.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

/// Player status reported by the control panel.
///
/// Only describes the orchestrator's own record of the session; it does not
/// probe the stream or the device.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlayerStatus {
    /// `idle` or `playing`.
    pub state: PlaybackState,
    /// Backend that owns the active session.
    pub backend: Option<PlaybackBackend>,
    /// Stream URL of the active session.
    pub url: Option<String>,
    /// Output device the active session is bound to.
    pub device: Option<String>,
    /// Session start time (unix epoch milliseconds).
    pub started_at_ms: Option<u64>,
    /// Message from the last failed start; cleared by a successful start or stop.
    pub last_error: Option<String>,
}

/// Start playback request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StartRequest {
    /// Stream URL (HTTP/HTTPS/ICY).
    #[serde(default)]
    pub url: String,
    /// ALSA output device, e.g. `hw:0,0`. Blank means the default DAC.
    #[serde(default)]
    pub device: Option<String>,
}

/// Result of a start request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StartResponse {
    pub success: bool,
}

/// Result of a stop request. Always successful.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StopResponse {
    pub success: bool,
}

/// Output devices as reported by the system listing command.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DevicesResponse {
    pub success: bool,
    /// Matching listing lines, in listing order.
    pub devices: Vec<String>,
}

/// Error body shared by all control endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Health check payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_request_accepts_missing_fields() {
        let req: StartRequest = serde_json::from_str("{}").expect("parse");
        assert!(req.url.is_empty());
        assert!(req.device.is_none());
    }

    #[test]
    fn backend_serializes_snake_case() {
        let json = serde_json::to_string(&PlaybackBackend::Pipeline).expect("encode");
        assert_eq!(json, "\"pipeline\"");
        assert_eq!(PlaybackBackend::Integrated.label(), "integrated");
    }

    #[test]
    fn default_status_is_idle() {
        let status = PlayerStatus::default();
        assert_eq!(status.state, PlaybackState::Idle);
        assert!(status.backend.is_none());
        let json = serde_json::to_value(&status).expect("encode");
        assert_eq!(json["state"], "idle");
    }

    #[test]
    fn error_response_is_unsuccessful() {
        let err = ErrorResponse::new("Missing url");
        assert!(!err.success);
        assert_eq!(err.message, "Missing url");
    }
}
