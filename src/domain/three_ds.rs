use crate::domain::outcome::{PaymentFailure, PaymentResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreeDSStatus {
    Pending,
    Completed,
    Failed,
}

/// A 3-D Secure handshake as this layer sees it.
///
/// Nothing here is stored: the processor owns the authoritative state and the
/// session only lives for the duration of one init or one complete call.
/// Correlation between the two calls is by `transaction_id` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreeDSSession {
    pub transaction_id: String,
    pub status: ThreeDSStatus,
    pub html_content: Option<String>,
    pub completion: Option<Result<PaymentResult, PaymentFailure>>,
}

impl ThreeDSSession {
    /// Session entered after a successful initialization.
    pub fn pending(transaction_id: impl Into<String>, html_content: Option<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            status: ThreeDSStatus::Pending,
            html_content,
            completion: None,
        }
    }

    /// Session reconstructed from a completion callback, before the confirm call.
    pub fn awaiting_confirmation(transaction_id: impl Into<String>) -> Self {
        Self::pending(transaction_id, None)
    }

    /// Moves a pending session to its terminal state.
    ///
    /// Terminal sessions are left untouched.
    pub fn resolve(mut self, outcome: Result<PaymentResult, PaymentFailure>) -> Self {
        if self.status != ThreeDSStatus::Pending {
            return self;
        }
        self.status = if outcome.is_ok() {
            ThreeDSStatus::Completed
        } else {
            ThreeDSStatus::Failed
        };
        self.html_content = None;
        self.completion = Some(outcome);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status != ThreeDSStatus::Pending
    }
}
