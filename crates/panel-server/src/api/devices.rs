use actix_web::{get, web, HttpResponse, Responder};
use panel_types::{DevicesResponse, ErrorResponse};

use super::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/audio/devices",
    responses(
        (status = 200, description = "Output devices from the system listing", body = DevicesResponse),
        (status = 500, description = "Listing command failed", body = ErrorResponse)
    )
)]
#[get("/api/audio/devices")]
/// List audio output devices.
pub async fn devices_list(state: web::Data<AppState>) -> impl Responder {
    let lister = state.devices.clone();
    match web::block(move || lister.list()).await {
        Ok(Ok(devices)) => HttpResponse::Ok().json(DevicesResponse {
            success: true,
            devices,
        }),
        Ok(Err(e)) => {
            tracing::warn!(error = %format!("{e:#}"), "device listing failed");
            ApiError::Internal(format!("{e:#}")).into_response()
        }
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}
