//! Outbound envelope types of the client contract.
//!
//! Every response carries a `success` flag so clients can branch on a single
//! field. Success bodies are wrapped in [`Approved`]; failures are always a
//! [`PaymentFailure`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The failure half of the envelope: `{success: false, errorCode, errorMessage}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailure {
    #[serde(default)]
    success: bool,
    pub error_code: String,
    pub error_message: String,
}

impl PaymentFailure {
    pub fn new(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: error_code.into(),
            error_message: error_message.into(),
        }
    }
}

/// The success half of the envelope: `{success: true, ...body}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Approved<T> {
    success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Approved<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

/// Result of a card charge (direct, 3DS-completed, or saved card).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub transaction_id: Option<String>,
    pub payment_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    pub installment: Option<u32>,
    pub card_type: Option<String>,
    pub card_association: Option<String>,
    pub bin_number: Option<String>,
    pub last_four_digits: Option<String>,
}

/// Response of a successful 3DS initialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSChallenge {
    pub status: &'static str,
    pub transaction_id: Option<String>,
    pub html_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentOption {
    pub installment_number: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    pub installment_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub bin_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_code: Option<i64>,
    pub card_type: Option<String>,
    pub card_association: Option<String>,
    pub options: Vec<InstallmentOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    pub refund_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub refunded_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Success,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentStatusReport {
    pub status: PaymentState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub card_token: Option<String>,
    pub card_alias: Option<String>,
    pub bin_number: Option<String>,
    pub last_four_digits: Option<String>,
    pub card_type: Option<String>,
    pub card_association: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedCards {
    pub cards: Vec<SavedCard>,
}

/// Deleting a card reports nothing beyond the success flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDeleted {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_failure_serializes_success_false() {
        let failure = PaymentFailure::new("5006", "Invalid card");
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"success": false, "errorCode": "5006", "errorMessage": "Invalid card"})
        );
    }

    #[test]
    fn test_approved_flattens_body_with_numeric_money() {
        let result = PaymentResult {
            transaction_id: Some("PAY1".to_string()),
            payment_id: Some("PAY1".to_string()),
            amount: dec!(100.0),
            paid_amount: dec!(100.0),
            installment: Some(1),
            card_type: None,
            card_association: None,
            bin_number: None,
            last_four_digits: None,
        };
        let value = serde_json::to_value(Approved::new(result)).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["transactionId"], json!("PAY1"));
        assert_eq!(value["amount"], json!(100.0));
        assert_eq!(value["paidAmount"], json!(100.0));
        assert_eq!(value["cardType"], json!(null));
    }

    #[test]
    fn test_card_deleted_is_bare_success() {
        let value = serde_json::to_value(Approved::new(CardDeleted {})).unwrap();
        assert_eq!(value, json!({"success": true}));
    }
}
