use crate::application::gateway::PaymentGateway;
use std::sync::Arc;

/// Shared by every handler; cloning only bumps the reference count.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PaymentGateway>,
}

impl AppState {
    pub fn new(gateway: PaymentGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
