use crate::application::builders;
use crate::application::normalizer::{self, OperationKind, Outcome};
use crate::application::three_ds;
use crate::domain::outcome::{
    CardDeleted, InstallmentPlan, PaymentResult, PaymentStatusReport, RefundReceipt,
    SavedCards, ThreeDSChallenge,
};
use crate::domain::payment::{
    self, CardDeleteRequest, CardListQuery, ChargeRequest, InstallmentQuery, PaymentRequest,
    RefundRequest, ThreeDSCompleteRequest,
};
use crate::domain::ports::ProcessorBox;
use crate::error::{GatewayError, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{Span, field, info, instrument, warn};
use uuid::Uuid;

/// Source of conversation ids for calls that have no client-chosen identifier.
pub type ConversationIdSource = fn() -> String;

/// Random v4 UUIDs: unique across concurrent requests, unlike clock readings.
pub fn random_conversation_id() -> String {
    Uuid::new_v4().to_string()
}

/// The entry point for every client operation.
///
/// `PaymentGateway` owns the processor port and runs each operation through
/// the same pipeline: validate, build, dispatch, decode, normalize. It keeps
/// no per-request state, so a single instance is shared by all concurrent
/// requests. Processor declines come back as [`GatewayError::Rejected`]; the
/// caller decides how to report them through the error classifier.
pub struct PaymentGateway {
    processor: ProcessorBox,
    conversation_ids: ConversationIdSource,
}

impl PaymentGateway {
    /// Creates a new `PaymentGateway` instance.
    ///
    /// # Arguments
    ///
    /// * `processor` - The port every operation dispatches through.
    pub fn new(processor: ProcessorBox) -> Self {
        Self {
            processor,
            conversation_ids: random_conversation_id,
        }
    }

    /// Replaces the conversation id source, e.g. with a fixed one in tests.
    pub fn with_conversation_ids(mut self, source: ConversationIdSource) -> Self {
        self.conversation_ids = source;
        self
    }

    /// Builds the processor request, performs the single outbound call and
    /// normalizes the reply. Declines become `Rejected`; transport and decode
    /// failures propagate unchanged. Nothing is retried.
    async fn execute<P, T, N>(&self, kind: OperationKind, payload: &P, normalize: N) -> Result<T>
    where
        P: Serialize,
        N: FnOnce(&Value) -> Result<Outcome<T>>,
    {
        let request = builders::into_request(kind.processor_operation(), payload)?;
        let raw = self.processor.dispatch(request).await.inspect_err(|e| {
            warn!(operation = kind.name(), error = %e, "processor call failed");
        })?;
        let reply = normalizer::decode_reply(raw)?;
        match normalize(&reply)? {
            Ok(body) => {
                info!(operation = kind.name(), "processor accepted request");
                Ok(body)
            }
            Err(failure) => {
                warn!(
                    operation = kind.name(),
                    error_code = %failure.error_code,
                    "processor declined request"
                );
                Err(GatewayError::Rejected(failure))
            }
        }
    }

    /// Draws a fresh conversation id and records it on the current span.
    fn next_conversation_id(&self) -> String {
        let id = (self.conversation_ids)();
        Span::current().record("conversation_id", id.as_str());
        id
    }

    #[instrument(skip_all, fields(operation = "create-payment", conversation_id = %req.order_id))]
    pub async fn create_payment(&self, req: &PaymentRequest) -> Result<PaymentResult> {
        req.validate()?;
        let kind = OperationKind::CreatePayment;
        let payload = builders::build_create_payment(req);
        self.execute(kind, &payload, |reply| {
            normalizer::normalize_payment(reply, kind)
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "init-3ds", conversation_id = %req.order_id))]
    pub async fn init_three_ds(&self, req: &PaymentRequest) -> Result<ThreeDSChallenge> {
        let payload = three_ds::initiation_payload(req)?;
        let challenge = self
            .execute(
                OperationKind::InitThreeDS,
                &payload,
                normalizer::normalize_three_ds_init,
            )
            .await?;
        let session = three_ds::open_session(req, &challenge);
        info!(transaction_id = %session.transaction_id, status = ?session.status, "3DS session opened");
        // The client keys completion on the same id the session holds.
        Ok(ThreeDSChallenge {
            transaction_id: Some(session.transaction_id),
            ..challenge
        })
    }

    #[instrument(skip_all, fields(operation = "complete-3ds", conversation_id = %req.transaction_id))]
    pub async fn complete_three_ds(&self, req: &ThreeDSCompleteRequest) -> Result<PaymentResult> {
        let (session, payload) = three_ds::completion_payload(req)?;
        let kind = OperationKind::CompleteThreeDS;
        let outcome = match self
            .execute(kind, &payload, |reply| {
                normalizer::normalize_payment(reply, kind)
            })
            .await
        {
            Ok(payment) => Ok(payment),
            Err(GatewayError::Rejected(failure)) => Err(failure),
            Err(other) => return Err(other),
        };
        let session = three_ds::close_session(session, &outcome);
        info!(status = ?session.status, "3DS session closed");
        outcome.map_err(GatewayError::Rejected)
    }

    #[instrument(skip_all, fields(operation = "query-installments", conversation_id = field::Empty))]
    pub async fn query_installments(&self, query: &InstallmentQuery) -> Result<InstallmentPlan> {
        query.validate()?;
        let payload = builders::build_installment_query(query, &self.next_conversation_id());
        self.execute(
            OperationKind::QueryInstallments,
            &payload,
            normalizer::normalize_installments,
        )
        .await
    }

    #[instrument(skip_all, fields(operation = "refund", conversation_id = field::Empty))]
    pub async fn refund(&self, req: &RefundRequest) -> Result<RefundReceipt> {
        req.validate()?;
        let payload = builders::build_refund(req, &self.next_conversation_id());
        self.execute(OperationKind::Refund, &payload, normalizer::normalize_refund)
            .await
    }

    #[instrument(skip(self), fields(operation = "retrieve-status", conversation_id = field::Empty))]
    pub async fn retrieve_status(&self, payment_id: &str) -> Result<PaymentStatusReport> {
        payment::require("paymentId", payment_id)?;
        let payload = builders::build_payment_detail(payment_id, &self.next_conversation_id());
        self.execute(
            OperationKind::RetrieveStatus,
            &payload,
            normalizer::normalize_status,
        )
        .await
    }

    #[instrument(skip_all, fields(operation = "list-cards", conversation_id = field::Empty))]
    pub async fn list_cards(&self, query: &CardListQuery) -> Result<SavedCards> {
        query.validate()?;
        let payload = builders::build_card_list(query, &self.next_conversation_id());
        self.execute(
            OperationKind::ListCards,
            &payload,
            normalizer::normalize_card_list,
        )
        .await
    }

    #[instrument(skip_all, fields(operation = "charge-saved-card", conversation_id = %req.order_id))]
    pub async fn charge_saved_card(&self, req: &ChargeRequest) -> Result<PaymentResult> {
        req.validate()?;
        let kind = OperationKind::ChargeSavedCard;
        let payload = builders::build_charge_saved_card(req);
        self.execute(kind, &payload, |reply| {
            normalizer::normalize_payment(reply, kind)
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "delete-card", conversation_id = field::Empty))]
    pub async fn delete_card(&self, req: &CardDeleteRequest) -> Result<CardDeleted> {
        req.validate()?;
        let payload = builders::build_card_delete(req, &self.next_conversation_id());
        self.execute(
            OperationKind::DeleteCard,
            &payload,
            normalizer::normalize_card_delete,
        )
        .await
    }
}
