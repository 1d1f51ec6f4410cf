//! Request builders: one pure function per operation, turning a domain request
//! into the processor's payload shape.
//!
//! Builders never look at credentials (those only matter for signing, which the
//! processor adapter does) and never mutate their input. Fields the domain
//! model does not carry are filled with processor constants or with the
//! conversation id handed in by the caller.

use crate::application::mapper::{
    self, LOCALE, PAYMENT_CHANNEL, PAYMENT_GROUP, ProcessorCurrency, ProcessorItemType,
};
use crate::domain::money::Currency;
use crate::domain::payment::{
    BasketItem, BuyerInfo, CardDeleteRequest, CardInfo, CardListQuery, ChargeRequest,
    InstallmentQuery, PaymentRequest, RefundRequest, ThreeDSCompleteRequest,
};
use crate::domain::ports::{ProcessorOperation, ProcessorRequest};
use crate::error::Result;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerPayload {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub gsm_number: String,
    pub email: String,
    pub identity_number: String,
    pub registration_address: String,
    pub ip: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub contact_name: String,
    pub city: String,
    pub country: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItemPayload {
    pub id: String,
    pub name: String,
    pub category1: String,
    pub item_type: ProcessorItemType,
    pub price: String,
}

#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCardPayload {
    pub card_holder_name: String,
    pub card_number: String,
    pub expire_month: String,
    pub expire_year: String,
    pub cvc: String,
    pub register_card: &'static str,
}

impl fmt::Debug for RawCardPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCardPayload")
            .field("register_card", &self.register_card)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCardPayload {
    pub card_token: String,
    pub card_user_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaymentCardPayload {
    Raw(RawCardPayload),
    Stored(StoredCardPayload),
}

/// Payload shared by create-payment, 3DS initialization and saved-card charges.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub price: String,
    pub paid_price: String,
    pub currency: ProcessorCurrency,
    pub installment: String,
    pub basket_id: String,
    pub payment_channel: &'static str,
    pub payment_group: &'static str,
    pub payment_card: PaymentCardPayload,
    pub buyer: BuyerPayload,
    pub shipping_address: AddressPayload,
    pub billing_address: AddressPayload,
    pub basket_items: Vec<BasketItemPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSAuthPayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub bin_number: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub payment_transaction_id: String,
    pub price: String,
    pub currency: ProcessorCurrency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailPayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub payment_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardListPayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub card_user_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDeletePayload {
    pub locale: &'static str,
    pub conversation_id: String,
    pub card_token: String,
    pub card_user_key: String,
}

/// Serializes a typed payload into the request handed to the processor port.
pub fn into_request<P: Serialize>(
    operation: ProcessorOperation,
    payload: &P,
) -> Result<ProcessorRequest> {
    Ok(ProcessorRequest {
        operation,
        body: serde_json::to_value(payload)?,
    })
}

pub fn build_buyer(buyer: &BuyerInfo) -> BuyerPayload {
    BuyerPayload {
        id: buyer.id.clone(),
        name: buyer.name.clone(),
        surname: buyer.surname.clone(),
        gsm_number: buyer.phone.clone(),
        email: buyer.email.clone(),
        identity_number: buyer.identity_number_or_placeholder().to_string(),
        registration_address: buyer.address.clone(),
        ip: buyer.ip.clone(),
        city: buyer.city.clone(),
        country: buyer.country.clone(),
    }
}

/// Shipping and billing addresses are both derived from the buyer's single
/// address; clients rely on the two being identical.
pub fn build_address(buyer: &BuyerInfo) -> AddressPayload {
    AddressPayload {
        contact_name: buyer.contact_name(),
        city: buyer.city.clone(),
        country: buyer.country.clone(),
        address: buyer.address.clone(),
    }
}

pub fn build_basket(items: &[BasketItem]) -> Vec<BasketItemPayload> {
    items
        .iter()
        .map(|item| BasketItemPayload {
            id: item.id.clone(),
            name: item.name.clone(),
            category1: item.category.clone(),
            item_type: mapper::map_item_kind(item.item_type),
            price: mapper::render_amount(item.price),
        })
        .collect()
}

fn build_raw_card(card: &CardInfo) -> PaymentCardPayload {
    PaymentCardPayload::Raw(RawCardPayload {
        card_holder_name: card.card_holder_name.clone(),
        card_number: card.card_number.clone(),
        expire_month: card.expire_month.clone(),
        expire_year: card.expire_year.clone(),
        cvc: card.cvc.clone(),
        register_card: mapper::render_flag(card.register_card),
    })
}

pub fn build_create_payment(req: &PaymentRequest) -> PaymentPayload {
    PaymentPayload {
        locale: LOCALE,
        conversation_id: req.order_id.clone(),
        price: mapper::render_amount(req.amount),
        paid_price: mapper::render_amount(req.effective_paid_price()),
        currency: mapper::map_currency(req.currency),
        installment: req.installment.to_string(),
        basket_id: req.order_id.clone(),
        payment_channel: PAYMENT_CHANNEL,
        payment_group: PAYMENT_GROUP,
        payment_card: build_raw_card(&req.card),
        buyer: build_buyer(&req.buyer),
        shipping_address: build_address(&req.buyer),
        billing_address: build_address(&req.buyer),
        basket_items: build_basket(&req.basket_items),
        callback_url: None,
    }
}

pub fn build_three_ds_init(req: &PaymentRequest, callback_url: &str) -> PaymentPayload {
    PaymentPayload {
        callback_url: Some(callback_url.to_string()),
        ..build_create_payment(req)
    }
}

/// Confirmation is keyed by the `paymentId` from the browser callback; the
/// transaction id only stands in when the callback did not carry one.
pub fn build_three_ds_complete(req: &ThreeDSCompleteRequest) -> ThreeDSAuthPayload {
    ThreeDSAuthPayload {
        locale: LOCALE,
        conversation_id: req.transaction_id.clone(),
        payment_id: req
            .callback_payment_id()
            .unwrap_or_else(|| req.transaction_id.clone()),
        conversation_data: req.callback_conversation_data(),
    }
}

pub fn build_installment_query(req: &InstallmentQuery, conversation_id: &str) -> InstallmentPayload {
    InstallmentPayload {
        locale: LOCALE,
        conversation_id: conversation_id.to_string(),
        bin_number: req.bin_number.clone(),
        price: mapper::render_amount(req.amount),
    }
}

pub fn build_refund(req: &RefundRequest, conversation_id: &str) -> RefundPayload {
    RefundPayload {
        locale: LOCALE,
        conversation_id: conversation_id.to_string(),
        payment_transaction_id: req.transaction_id.clone(),
        price: mapper::render_amount(req.amount),
        currency: mapper::map_currency(req.currency),
    }
}

pub fn build_payment_detail(payment_id: &str, conversation_id: &str) -> PaymentDetailPayload {
    PaymentDetailPayload {
        locale: LOCALE,
        conversation_id: conversation_id.to_string(),
        payment_id: payment_id.to_string(),
    }
}

pub fn build_card_list(req: &CardListQuery, conversation_id: &str) -> CardListPayload {
    CardListPayload {
        locale: LOCALE,
        conversation_id: conversation_id.to_string(),
        card_user_key: req.card_user_key.clone(),
    }
}

/// Saved-card charges are always domestic, single-installment, full-price.
pub fn build_charge_saved_card(req: &ChargeRequest) -> PaymentPayload {
    let price = mapper::render_amount(req.amount);
    PaymentPayload {
        locale: LOCALE,
        conversation_id: req.order_id.clone(),
        price: price.clone(),
        paid_price: price,
        currency: mapper::map_currency(Currency::Try),
        installment: "1".to_string(),
        basket_id: req.order_id.clone(),
        payment_channel: PAYMENT_CHANNEL,
        payment_group: PAYMENT_GROUP,
        payment_card: PaymentCardPayload::Stored(StoredCardPayload {
            card_token: req.card_token.clone(),
            card_user_key: req.card_user_key.clone(),
        }),
        buyer: build_buyer(&req.buyer),
        shipping_address: build_address(&req.buyer),
        billing_address: build_address(&req.buyer),
        basket_items: build_basket(&req.basket_items),
        callback_url: None,
    }
}

pub fn build_card_delete(req: &CardDeleteRequest, conversation_id: &str) -> CardDeletePayload {
    CardDeletePayload {
        locale: LOCALE,
        conversation_id: conversation_id.to_string(),
        card_token: req.card_token.clone(),
        card_user_key: req.card_user_key.clone(),
    }
}
