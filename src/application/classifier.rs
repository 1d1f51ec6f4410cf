use crate::domain::outcome::PaymentFailure;
use crate::error::GatewayError;

pub const VALIDATION_ERROR_CODE: &str = "validation_error";
pub const SERVER_ERROR_CODE: &str = "server_error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller's input was malformed or incomplete.
    Validation,
    /// The processor declined for a domain reason.
    BusinessRejection,
    /// The processor was unreachable or answered with something unusable.
    Integration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    ClientError,
    ServerError,
}

impl TransportStatus {
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::ClientError => 400,
            Self::ServerError => 500,
        }
    }
}

/// How an error is reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub category: ErrorCategory,
    pub status: TransportStatus,
    pub envelope: PaymentFailure,
}

impl ErrorCategory {
    pub fn of(error: &GatewayError) -> Self {
        match error {
            GatewayError::ValidationError(_) => Self::Validation,
            GatewayError::Rejected(_) => Self::BusinessRejection,
            GatewayError::IntegrationError(_) | GatewayError::Http(_) | GatewayError::Json(_) => {
                Self::Integration
            }
        }
    }

    pub fn transport_status(&self) -> TransportStatus {
        match self {
            Self::Validation | Self::BusinessRejection => TransportStatus::ClientError,
            Self::Integration => TransportStatus::ServerError,
        }
    }
}

/// Maps any error to its category, transport status and failure envelope.
///
/// Every path keeps the `success: false` envelope shape. Processor rejections
/// pass their envelope through untouched; integration failures get the generic
/// `server_error` code with the underlying description as the message.
pub fn classify(error: &GatewayError) -> Classified {
    let category = ErrorCategory::of(error);
    let envelope = match error {
        GatewayError::Rejected(failure) => failure.clone(),
        GatewayError::ValidationError(message) => {
            PaymentFailure::new(VALIDATION_ERROR_CODE, message.clone())
        }
        other => PaymentFailure::new(SERVER_ERROR_CODE, other.to_string()),
    };
    Classified {
        category,
        status: category.transport_status(),
        envelope,
    }
}
