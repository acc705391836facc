use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::playback::start,
        api::playback::stop,
        api::playback::status,
        api::devices::devices_list,
        api::health::health,
    ),
    components(
        schemas(
            panel_types::StartRequest,
            panel_types::StartResponse,
            panel_types::StopResponse,
            panel_types::DevicesResponse,
            panel_types::ErrorResponse,
            panel_types::HealthResponse,
            panel_types::PlayerStatus,
            panel_types::PlaybackState,
            panel_types::PlaybackBackend,
        )
    ),
    tags(
        (name = "panel-server", description = "DAC stream control panel API")
    )
)]
pub struct ApiDoc;
