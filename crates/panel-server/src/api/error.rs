use actix_web::HttpResponse;
use panel_types::ErrorResponse;

/// Errors returned by the control API.
#[derive(Debug)]
pub(crate) enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    /// Convert an API error into a JSON HTTP response.
    pub(crate) fn into_response(self) -> HttpResponse {
        match self {
            ApiError::BadRequest(message) => {
                HttpResponse::BadRequest().json(ErrorResponse::new(message))
            }
            ApiError::Internal(message) => {
                HttpResponse::InternalServerError().json(ErrorResponse::new(message))
            }
        }
    }
}

/// JSON extractor config: accept bodies regardless of content type and
/// report malformed payloads as `{success: false, message}`.
pub fn json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            let response = ApiError::BadRequest(format!("invalid json: {err}")).into_response();
            actix_web::error::InternalError::from_response(err, response).into()
        })
}
