use crate::domain::outcome::PaymentFailure;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Everything that can stop an operation from producing a success envelope.
///
/// The variants line up with the three failure categories callers care about:
/// bad input, a processor decline, and a broken integration. The last group
/// (`Http`, `Json`) is folded into the integration category.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The caller sent a malformed or incomplete request.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The processor answered with a non-success status.
    #[error("Processor rejected the request: {} ({})", .0.error_message, .0.error_code)]
    Rejected(PaymentFailure),
    /// The processor could not be reached or answered with something unusable.
    #[error("Integration error: {0}")]
    IntegrationError(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn integration(message: impl Into<String>) -> Self {
        Self::IntegrationError(message.into())
    }
}
