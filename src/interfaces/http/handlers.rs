//! HTTP endpoint handlers.
//!
//! Each handler extracts the client request, hands it to the gateway and
//! wraps the result in the success envelope. Failures leave through
//! [`ApiError`].

use super::error::ApiError;
use super::extract::{ValidatedJson, ValidatedQuery};
use super::state::AppState;
use crate::domain::outcome::{
    Approved, CardDeleted, InstallmentPlan, PaymentResult, PaymentStatusReport, RefundReceipt,
    SavedCards, ThreeDSChallenge,
};
use crate::domain::payment::{
    CardDeleteRequest, CardListQuery, ChargeRequest, InstallmentQuery, PaymentRequest,
    RefundRequest, ThreeDSCompleteRequest,
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

type ApiResult<T> = Result<Json<Approved<T>>, ApiError>;

fn approved<T>(body: T) -> Json<Approved<T>> {
    Json(Approved::new(body))
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
}

/// Liveness check. Does not call the processor.
pub async fn health() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn create_payment(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> ApiResult<PaymentResult> {
    Ok(approved(state.gateway.create_payment(&req).await?))
}

pub async fn init_three_ds(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> ApiResult<ThreeDSChallenge> {
    Ok(approved(state.gateway.init_three_ds(&req).await?))
}

pub async fn complete_three_ds(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ThreeDSCompleteRequest>,
) -> ApiResult<PaymentResult> {
    Ok(approved(state.gateway.complete_three_ds(&req).await?))
}

/// `GET /payment/installments?binNumber=..&amount=..`
pub async fn query_installments(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<InstallmentQuery>,
) -> ApiResult<InstallmentPlan> {
    Ok(approved(state.gateway.query_installments(&query).await?))
}

pub async fn refund(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefundRequest>,
) -> ApiResult<RefundReceipt> {
    Ok(approved(state.gateway.refund(&req).await?))
}

pub async fn retrieve_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> ApiResult<PaymentStatusReport> {
    Ok(approved(state.gateway.retrieve_status(&payment_id).await?))
}

pub async fn list_cards(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<CardListQuery>,
) -> ApiResult<SavedCards> {
    Ok(approved(state.gateway.list_cards(&query).await?))
}

pub async fn charge_saved_card(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ChargeRequest>,
) -> ApiResult<PaymentResult> {
    Ok(approved(state.gateway.charge_saved_card(&req).await?))
}

/// `DELETE /payment/cards/{cardToken}?cardUserKey=..`
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_token): Path<String>,
    ValidatedQuery(owner): ValidatedQuery<CardListQuery>,
) -> ApiResult<CardDeleted> {
    let req = CardDeleteRequest {
        card_token,
        card_user_key: owner.card_user_key,
    };
    Ok(approved(state.gateway.delete_card(&req).await?))
}
