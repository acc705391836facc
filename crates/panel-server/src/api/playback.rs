//! Playback control handlers.
//!
//! Every call goes through the player worker, which serializes them. The
//! settle and stop waits block, so replies are awaited on the blocking pool.

use actix_web::{get, post, web, HttpResponse, Responder};
use panel_types::{ErrorResponse, PlayerStatus, StartRequest, StartResponse, StopResponse};

use super::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/start",
    request_body = StartRequest,
    responses(
        (status = 200, description = "Start attempted; `success` reports the outcome", body = StartResponse),
        (status = 400, description = "Missing url", body = ErrorResponse)
    )
)]
#[post("/api/start")]
/// Start playing a network stream on an output device.
pub async fn start(state: web::Data<AppState>, body: web::Json<StartRequest>) -> impl Responder {
    let req = body.into_inner();
    let url = req.url.trim().to_string();
    if url.is_empty() {
        tracing::warn!(reason = "missing_url", "start rejected");
        return ApiError::BadRequest("Missing url".to_string()).into_response();
    }
    let device = req
        .device
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let player = state.player.clone();
    match web::block(move || player.start(url, device)).await {
        Ok(success) => HttpResponse::Ok().json(StartResponse { success }),
        Err(e) => {
            tracing::error!(error = %e, "start dispatch failed");
            ApiError::Internal("could not start playback".to_string()).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/stop",
    responses(
        (status = 200, description = "Playback stopped", body = StopResponse)
    )
)]
#[post("/api/stop")]
/// Stop playback. Succeeds whether or not anything was playing.
pub async fn stop(state: web::Data<AppState>) -> impl Responder {
    let player = state.player.clone();
    if let Err(e) = web::block(move || player.stop()).await {
        tracing::error!(error = %e, "stop dispatch failed");
    }
    HttpResponse::Ok().json(StopResponse { success: true })
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current player status", body = PlayerStatus)
    )
)]
#[get("/api/status")]
/// Return the player's view of the current session.
pub async fn status(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.player.status())
}
