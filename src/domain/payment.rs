//! Inbound request types of the client contract.
//!
//! Field names follow the client's camelCase wire format. Value-level checks
//! (positive amounts) happen during deserialization through the money
//! newtypes; structural checks that need more than one field live in the
//! `validate` methods and run before any builder sees the request.

use crate::domain::money::{Amount, Currency, Price};
use crate::error::{GatewayError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Placeholder national identity number the processor accepts when the buyer
/// did not provide one.
pub const PLACEHOLDER_IDENTITY_NUMBER: &str = "11111111111";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    #[default]
    Physical,
    Virtual,
}

impl From<String> for ItemKind {
    fn from(kind: String) -> Self {
        if kind == "physical" {
            Self::Physical
        } else {
            Self::Virtual
        }
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Raw card data. Its `Debug` output never includes the PAN or CVC.
#[derive(Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    pub card_holder_name: String,
    pub card_number: String,
    pub expire_month: String,
    pub expire_year: String,
    pub cvc: String,
    #[serde(default)]
    pub register_card: bool,
}

impl fmt::Debug for CardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardInfo")
            .field("card_number", &"<redacted>")
            .field("register_card", &self.register_card)
            .finish_non_exhaustive()
    }
}

impl CardInfo {
    fn validate(&self) -> Result<()> {
        require("card.cardHolderName", &self.card_holder_name)?;
        require("card.cardNumber", &self.card_number)?;
        require("card.cvc", &self.cvc)?;
        let month_ok = self.expire_month.len() == 2
            && self
                .expire_month
                .parse::<u8>()
                .is_ok_and(|m| (1..=12).contains(&m));
        if !month_ok {
            return Err(GatewayError::validation(
                "card.expireMonth must be a two-digit month",
            ));
        }
        let year_ok = matches!(self.expire_year.len(), 2 | 4)
            && self.expire_year.bytes().all(|b| b.is_ascii_digit());
        if !year_ok {
            return Err(GatewayError::validation(
                "card.expireYear must be a two or four digit year",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInfo {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub ip: String,
    pub city: String,
    pub country: String,
    pub address: String,
    #[serde(default)]
    pub identity_number: Option<String>,
}

impl BuyerInfo {
    /// The buyer's identity number, or the processor placeholder.
    pub fn identity_number_or_placeholder(&self) -> &str {
        self.identity_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(PLACEHOLDER_IDENTITY_NUMBER)
    }

    /// Contact name used for the derived shipping and billing addresses.
    pub fn contact_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    fn validate(&self) -> Result<()> {
        require("buyer.id", &self.id)?;
        require("buyer.name", &self.name)?;
        require("buyer.surname", &self.surname)?;
        require("buyer.city", &self.city)?;
        require("buyer.country", &self.country)?;
        require("buyer.address", &self.address)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasketItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Amount,
    #[serde(default)]
    pub item_type: ItemKind,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount: Amount,
    #[serde(default)]
    pub paid_price: Option<Price>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_installment")]
    pub installment: u32,
    pub card: CardInfo,
    pub buyer: BuyerInfo,
    pub basket_items: Vec<BasketItem>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

fn default_installment() -> u32 {
    1
}

impl PaymentRequest {
    /// The price to charge; falls back to `amount` when not supplied.
    pub fn effective_paid_price(&self) -> Price {
        self.paid_price.unwrap_or_else(|| self.amount.into())
    }

    pub fn validate(&self) -> Result<()> {
        validate_order_id(&self.order_id)?;
        if self.installment == 0 {
            return Err(GatewayError::validation("installment must be at least 1"));
        }
        self.card.validate()?;
        self.buyer.validate()?;
        validate_basket(&self.basket_items)
    }

    /// Validation for the 3DS initialization, which also needs a callback URL.
    pub fn validate_for_three_ds(&self) -> Result<Url> {
        self.validate()?;
        let raw = self
            .callback_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GatewayError::validation("callbackUrl is required for 3DS"))?;
        Url::parse(raw)
            .map_err(|e| GatewayError::validation(format!("callbackUrl is not a valid URL: {e}")))
    }
}

/// A charge against a card previously vaulted at the processor.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub card_token: String,
    pub card_user_key: String,
    pub order_id: String,
    pub amount: Amount,
    pub buyer: BuyerInfo,
    pub basket_items: Vec<BasketItem>,
}

impl ChargeRequest {
    pub fn validate(&self) -> Result<()> {
        require("cardToken", &self.card_token)?;
        require("cardUserKey", &self.card_user_key)?;
        validate_order_id(&self.order_id)?;
        self.buyer.validate()?;
        validate_basket(&self.basket_items)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Amount,
    #[serde(default)]
    pub currency: Currency,
}

impl RefundRequest {
    pub fn validate(&self) -> Result<()> {
        require("transactionId", &self.transaction_id)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentQuery {
    pub bin_number: String,
    pub amount: Amount,
}

impl InstallmentQuery {
    pub fn validate(&self) -> Result<()> {
        let len_ok = (6..=8).contains(&self.bin_number.len());
        if !len_ok || !self.bin_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GatewayError::validation("binNumber must be 6 to 8 digits"));
        }
        Ok(())
    }
}

/// Completion call for a 3DS payment, issued after the browser redirect.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSCompleteRequest {
    pub transaction_id: String,
    #[serde(default)]
    pub callback_data: Option<BTreeMap<String, serde_json::Value>>,
}

impl ThreeDSCompleteRequest {
    pub fn validate(&self) -> Result<()> {
        require("transactionId", &self.transaction_id)
    }

    fn callback_str(&self, key: &str) -> Option<String> {
        let value = self.callback_data.as_ref()?.get(key)?;
        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `paymentId` delivered through the browser redirect, if any.
    pub fn callback_payment_id(&self) -> Option<String> {
        self.callback_str("paymentId")
    }

    pub fn callback_conversation_data(&self) -> Option<String> {
        self.callback_str("conversationData")
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardListQuery {
    pub card_user_key: String,
}

impl CardListQuery {
    pub fn validate(&self) -> Result<()> {
        require("cardUserKey", &self.card_user_key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardDeleteRequest {
    pub card_token: String,
    pub card_user_key: String,
}

impl CardDeleteRequest {
    pub fn validate(&self) -> Result<()> {
        require("cardToken", &self.card_token)?;
        require("cardUserKey", &self.card_user_key)
    }
}

pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(GatewayError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn validate_order_id(order_id: &str) -> Result<()> {
    require("orderId", order_id)?;
    if !order_id.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(GatewayError::validation(
            "orderId must be printable ASCII without spaces",
        ));
    }
    Ok(())
}

fn validate_basket(items: &[BasketItem]) -> Result<()> {
    if items.is_empty() {
        return Err(GatewayError::validation("basketItems must not be empty"));
    }
    for item in items {
        require("basketItems.id", &item.id)?;
        require("basketItems.name", &item.name)?;
        require("basketItems.category", &item.category)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_json() -> serde_json::Value {
        json!({
            "orderId": "ORD1",
            "amount": 100.0,
            "card": {
                "cardHolderName": "John Doe",
                "cardNumber": "5528790000000008",
                "expireMonth": "12",
                "expireYear": "30",
                "cvc": "123"
            },
            "buyer": {
                "id": "BY1", "name": "John", "surname": "Doe",
                "email": "john@example.com", "phone": "+905350000000",
                "ip": "85.34.78.112", "city": "Istanbul", "country": "Turkey",
                "address": "Nidakule Goztepe"
            },
            "basketItems": [
                { "id": "BI1", "name": "Book", "category": "Books", "price": 100.0 }
            ]
        })
    }

    #[test]
    fn test_defaults_applied_on_deserialization() {
        let req: PaymentRequest = serde_json::from_value(request_json()).unwrap();
        assert_eq!(req.currency, Currency::Try);
        assert_eq!(req.installment, 1);
        assert!(!req.card.register_card);
        assert_eq!(req.basket_items[0].item_type, ItemKind::Physical);
        assert_eq!(req.effective_paid_price().value(), req.amount.value());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_identity_placeholder() {
        let req: PaymentRequest = serde_json::from_value(request_json()).unwrap();
        assert_eq!(
            req.buyer.identity_number_or_placeholder(),
            PLACEHOLDER_IDENTITY_NUMBER
        );
    }

    #[test]
    fn test_empty_basket_rejected() {
        let mut value = request_json();
        value["basketItems"] = json!([]);
        let req: PaymentRequest = serde_json::from_value(value).unwrap();
        assert!(matches!(
            req.validate(),
            Err(GatewayError::ValidationError(_))
        ));
    }

    #[test]
    fn test_order_id_must_be_ascii() {
        let mut value = request_json();
        value["orderId"] = json!("sipariş 1");
        let req: PaymentRequest = serde_json::from_value(value).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_three_ds_requires_callback() {
        let req: PaymentRequest = serde_json::from_value(request_json()).unwrap();
        assert!(req.validate_for_three_ds().is_err());

        let mut value = request_json();
        value["callbackUrl"] = json!("https://shop.example.com/3ds/callback");
        let req: PaymentRequest = serde_json::from_value(value).unwrap();
        assert!(req.validate_for_three_ds().is_ok());
    }

    #[test]
    fn test_card_debug_is_redacted() {
        let req: PaymentRequest = serde_json::from_value(request_json()).unwrap();
        let printed = format!("{:?}", req.card);
        assert!(!printed.contains("5528790000000008"));
        assert!(!printed.contains("123"));
    }

    #[test]
    fn test_bin_number_length() {
        let query = |bin: &str| InstallmentQuery {
            bin_number: bin.to_string(),
            amount: Amount::new(rust_decimal_macros::dec!(10)).unwrap(),
        };
        assert!(query("55287").validate().is_err());
        assert!(query("552879").validate().is_ok());
        assert!(query("55287900").validate().is_ok());
        assert!(query("552879001").validate().is_err());
        assert!(query("55287a").validate().is_err());
    }

    #[test]
    fn test_callback_payment_id() {
        let req = ThreeDSCompleteRequest {
            transaction_id: "T1".to_string(),
            callback_data: Some(BTreeMap::from([("paymentId".to_string(), json!("P9"))])),
        };
        assert_eq!(req.callback_payment_id().as_deref(), Some("P9"));

        let bare = ThreeDSCompleteRequest {
            transaction_id: "T1".to_string(),
            callback_data: None,
        };
        assert_eq!(bare.callback_payment_id(), None);
    }
}
