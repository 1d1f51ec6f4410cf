//! The client-facing HTTP API.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post},
};
use handlers::*;
pub use state::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the API router. Browser clients call it directly, so CORS mirrors
/// any origin and allows credentials, any method and any header.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/payment/create", post(create_payment))
        .route("/payment/3ds/init", post(init_three_ds))
        .route("/payment/3ds/complete", post(complete_three_ds))
        .route("/payment/installments", get(query_installments))
        .route("/payment/refund", post(refund))
        .route("/payment/status/{payment_id}", get(retrieve_status))
        .route("/payment/cards", get(list_cards))
        .route("/payment/cards/charge", post(charge_saved_card))
        .route("/payment/cards/{card_token}", delete(delete_card))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
