use crate::application::classifier::{ErrorCategory, classify};
use crate::error::GatewayError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// A gateway error on its way out as an HTTP response.
///
/// The status code and envelope come from the error classifier, so every
/// failure answers with `{success: false, errorCode, errorMessage}`.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let classified = classify(&self.0);
        if classified.category == ErrorCategory::Integration {
            error!(error = %self.0, "processor integration failure");
        }
        let status = StatusCode::from_u16(classified.status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(classified.envelope)).into_response()
    }
}
