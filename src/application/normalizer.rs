//! Response normalization: processor replies in, client envelopes out.
//!
//! Every processor reply carries a `status` discriminator. `"success"` takes the
//! success branch and projects the fields the client contract exposes;
//! anything else takes the failure branch, which keeps the processor's error
//! code and message when present and falls back to a per-operation default
//! otherwise. Normalizers are pure: the same reply always yields the same
//! outcome.

use crate::domain::outcome::{
    CardDeleted, InstallmentOption, InstallmentPlan, PaymentFailure, PaymentResult,
    PaymentState, PaymentStatusReport, RefundReceipt, SavedCard, SavedCards, ThreeDSChallenge,
};
use crate::domain::ports::{ProcessorOperation, RawReply};
use crate::error::{GatewayError, Result};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

pub type Outcome<T> = std::result::Result<T, PaymentFailure>;

/// Client operations, as far as normalization and error defaults care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreatePayment,
    InitThreeDS,
    CompleteThreeDS,
    QueryInstallments,
    Refund,
    RetrieveStatus,
    ListCards,
    ChargeSavedCard,
    DeleteCard,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePayment => "create-payment",
            Self::InitThreeDS => "init-3ds",
            Self::CompleteThreeDS => "complete-3ds",
            Self::QueryInstallments => "query-installments",
            Self::Refund => "refund",
            Self::RetrieveStatus => "retrieve-status",
            Self::ListCards => "list-cards",
            Self::ChargeSavedCard => "charge-saved-card",
            Self::DeleteCard => "delete-card",
        }
    }

    /// The processor endpoint behind each client operation.
    pub fn processor_operation(&self) -> ProcessorOperation {
        match self {
            Self::CreatePayment | Self::ChargeSavedCard => ProcessorOperation::Payment,
            Self::InitThreeDS => ProcessorOperation::ThreeDSInitialize,
            Self::CompleteThreeDS => ProcessorOperation::ThreeDSAuth,
            Self::QueryInstallments => ProcessorOperation::InstallmentInfo,
            Self::Refund => ProcessorOperation::Refund,
            Self::RetrieveStatus => ProcessorOperation::PaymentDetail,
            Self::ListCards => ProcessorOperation::CardList,
            Self::DeleteCard => ProcessorOperation::CardDelete,
        }
    }

    /// Error code and message used when the processor fails without saying why.
    pub fn default_failure(&self) -> (&'static str, &'static str) {
        match self {
            Self::CreatePayment | Self::CompleteThreeDS | Self::ChargeSavedCard => {
                ("unknown", "Unknown error")
            }
            Self::InitThreeDS => ("3ds_init_failed", "3DS initialization failed"),
            Self::QueryInstallments => ("no_installments", "No installment options found"),
            Self::Refund => ("refund_failed", "Refund failed"),
            Self::RetrieveStatus => ("status_check_failed", "Status check failed"),
            Self::ListCards => ("cards_list_failed", "Failed to list cards"),
            Self::DeleteCard => ("card_delete_failed", "Failed to delete card"),
        }
    }
}

/// Resolves the string-or-structured ambiguity of processor replies.
///
/// This is the only place that knows a reply may arrive as a serialized JSON
/// string; everything downstream sees a structured value.
pub fn decode_reply(raw: RawReply) -> Result<Value> {
    let value = match raw {
        RawReply::Structured(Value::String(text)) | RawReply::Serialized(text) => {
            serde_json::from_str(&text)?
        }
        RawReply::Structured(value) => value,
    };
    if value.is_object() {
        Ok(value)
    } else {
        Err(GatewayError::integration(
            "processor reply is not a JSON object",
        ))
    }
}

/// Status and error fields every processor reply shares. Read on its own so
/// a failure never depends on the shape of the success-only fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyHeader {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    error_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    error_message: Option<String>,
}

impl ReplyHeader {
    fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Blank processor fields count as absent.
    fn failure(self, kind: OperationKind) -> PaymentFailure {
        let (code, message) = kind.default_failure();
        PaymentFailure::new(
            non_blank(self.error_code).unwrap_or_else(|| code.to_string()),
            non_blank(self.error_message).unwrap_or_else(|| message.to_string()),
        )
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// Splits a reply into its success body or the failure envelope. The body
/// is only deserialized once the status says success.
fn branch<T: DeserializeOwned>(reply: &Value, kind: OperationKind) -> Result<Outcome<T>> {
    let header = ReplyHeader::deserialize(reply)?;
    if !header.is_success() {
        return Ok(Err(header.failure(kind)));
    }
    Ok(Ok(T::deserialize(reply)?))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Money fields: numbers or numeric strings, absent (or unparseable) as zero.
fn money<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentBody {
    #[serde(default, deserialize_with = "lenient_string")]
    payment_id: Option<String>,
    #[serde(default, deserialize_with = "money")]
    price: Decimal,
    #[serde(default, deserialize_with = "money")]
    paid_price: Decimal,
    #[serde(default, deserialize_with = "lenient_u32")]
    installment: Option<u32>,
    #[serde(default)]
    card_type: Option<String>,
    #[serde(default)]
    card_association: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    bin_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    last_four_digits: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreeDSInitBody {
    #[serde(default, deserialize_with = "lenient_string")]
    conversation_id: Option<String>,
    #[serde(default, rename = "threeDSHtmlContent")]
    three_ds_html_content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallmentBody {
    #[serde(default)]
    installment_details: Vec<InstallmentDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallmentDetail {
    #[serde(default, deserialize_with = "lenient_string")]
    bin_number: Option<String>,
    #[serde(default)]
    bank_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    bank_code: Option<i64>,
    #[serde(default)]
    card_type: Option<String>,
    #[serde(default)]
    card_association: Option<String>,
    #[serde(default)]
    installment_prices: Vec<InstallmentPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallmentPrice {
    #[serde(default, deserialize_with = "lenient_u32")]
    installment_number: Option<u32>,
    #[serde(default, deserialize_with = "money")]
    installment_price: Decimal,
    #[serde(default, deserialize_with = "money")]
    total_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefundBody {
    #[serde(default, deserialize_with = "lenient_string")]
    payment_transaction_id: Option<String>,
    #[serde(default, deserialize_with = "money")]
    price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentDetailBody {
    #[serde(default, deserialize_with = "lenient_string")]
    payment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardListBody {
    #[serde(default)]
    card_details: Vec<CardDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardDetail {
    #[serde(default)]
    card_token: Option<String>,
    #[serde(default)]
    card_alias: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    bin_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    last_four_digits: Option<String>,
    #[serde(default)]
    card_type: Option<String>,
    #[serde(default)]
    card_association: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmptyBody {}

/// Charge-like replies: create-payment, 3DS completion and saved-card charges.
pub fn normalize_payment(reply: &Value, kind: OperationKind) -> Result<Outcome<PaymentResult>> {
    Ok(branch::<PaymentBody>(reply, kind)?.map(|body| PaymentResult {
        transaction_id: body.payment_id.clone(),
        payment_id: body.payment_id,
        amount: body.price,
        paid_amount: body.paid_price,
        installment: body.installment,
        card_type: body.card_type,
        card_association: body.card_association,
        bin_number: body.bin_number,
        last_four_digits: body.last_four_digits,
    }))
}

pub fn normalize_three_ds_init(reply: &Value) -> Result<Outcome<ThreeDSChallenge>> {
    Ok(
        branch::<ThreeDSInitBody>(reply, OperationKind::InitThreeDS)?.map(|body| {
            ThreeDSChallenge {
                status: "pending",
                transaction_id: body.conversation_id,
                html_content: body.three_ds_html_content,
            }
        }),
    )
}

/// A success status without installment details is still a failure for the
/// client: there is nothing to offer.
pub fn normalize_installments(reply: &Value) -> Result<Outcome<InstallmentPlan>> {
    let kind = OperationKind::QueryInstallments;
    let mut details = match branch::<InstallmentBody>(reply, kind)? {
        Ok(body) if !body.installment_details.is_empty() => body.installment_details,
        Ok(_) => return Ok(Err(ReplyHeader::deserialize(reply)?.failure(kind))),
        Err(failure) => return Ok(Err(failure)),
    };
    let detail = details.swap_remove(0);
    Ok(Ok(InstallmentPlan {
        bin_number: detail.bin_number,
        bank_name: detail.bank_name,
        bank_code: detail.bank_code,
        card_type: detail.card_type,
        card_association: detail.card_association,
        options: detail
            .installment_prices
            .into_iter()
            .map(|price| InstallmentOption {
                installment_number: price.installment_number,
                installment_price: price.installment_price,
                total_price: price.total_price,
            })
            .collect(),
    }))
}

pub fn normalize_refund(reply: &Value) -> Result<Outcome<RefundReceipt>> {
    Ok(
        branch::<RefundBody>(reply, OperationKind::Refund)?.map(|body| RefundReceipt {
            refund_id: body.payment_transaction_id,
            refunded_amount: body.price,
        }),
    )
}

pub fn normalize_status(reply: &Value) -> Result<Outcome<PaymentStatusReport>> {
    Ok(
        branch::<PaymentDetailBody>(reply, OperationKind::RetrieveStatus)?.map(|body| {
            let settled = matches!(
                body.payment_status.as_deref(),
                Some(s) if s == "1" || s.eq_ignore_ascii_case("success")
            );
            PaymentStatusReport {
                status: if settled {
                    PaymentState::Success
                } else {
                    PaymentState::Pending
                },
            }
        }),
    )
}

pub fn normalize_card_list(reply: &Value) -> Result<Outcome<SavedCards>> {
    Ok(
        branch::<CardListBody>(reply, OperationKind::ListCards)?.map(|body| SavedCards {
            cards: body
                .card_details
                .into_iter()
                .map(|card| SavedCard {
                    card_token: card.card_token,
                    card_alias: card.card_alias,
                    bin_number: card.bin_number,
                    last_four_digits: card.last_four_digits,
                    card_type: card.card_type,
                    card_association: card.card_association,
                })
                .collect(),
        }),
    )
}

pub fn normalize_card_delete(reply: &Value) -> Result<Outcome<CardDeleted>> {
    Ok(branch::<EmptyBody>(reply, OperationKind::DeleteCard)?.map(|_| CardDeleted {}))
}
