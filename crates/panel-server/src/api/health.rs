use actix_web::{get, HttpResponse, Responder};
use panel_types::HealthResponse;

/// Basic health check for clients.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Control panel is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
