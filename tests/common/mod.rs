#![allow(dead_code)]

use payhub_proxy::application::gateway::PaymentGateway;
use payhub_proxy::domain::payment::PaymentRequest;
use payhub_proxy::infrastructure::stub::StubProcessor;
use serde_json::{Value, json};

/// A complete create-payment request body as a client would send it.
pub fn payment_body() -> Value {
    json!({
        "orderId": "ORD1",
        "amount": 100.0,
        "currency": "try",
        "installment": 1,
        "card": {
            "cardHolderName": "John Doe",
            "cardNumber": "5528790000000008",
            "expireMonth": "12",
            "expireYear": "2030",
            "cvc": "123"
        },
        "buyer": {
            "id": "BY789",
            "name": "John",
            "surname": "Doe",
            "email": "john.doe@example.com",
            "phone": "+905350000000",
            "ip": "85.34.78.112",
            "city": "Istanbul",
            "country": "Turkey",
            "address": "Nidakule Goztepe, Merdivenkoy Mah. Bora Sok. No:1"
        },
        "basketItems": [
            {"id": "BI101", "name": "Binocular", "category": "Collectibles", "price": 60.0},
            {"id": "BI102", "name": "Game code", "category": "Game", "price": 40.0,
             "itemType": "virtual"}
        ]
    })
}

pub fn payment_request() -> PaymentRequest {
    serde_json::from_value(payment_body()).unwrap()
}

/// The processor's reply to an approved single-installment charge.
pub fn approved_payment_reply() -> Value {
    json!({
        "status": "success",
        "locale": "tr",
        "systemTime": 1700000000000u64,
        "conversationId": "ORD1",
        "price": 100.0,
        "paidPrice": 100.0,
        "installment": 1,
        "paymentId": "PAY1",
        "currency": "TRY",
        "binNumber": "552879",
        "lastFourDigits": "0008",
        "cardType": "CREDIT_CARD",
        "cardAssociation": "MASTER_CARD"
    })
}

pub fn declined_reply(code: &str, message: &str) -> Value {
    json!({
        "status": "failure",
        "errorCode": code,
        "errorMessage": message,
        "locale": "tr",
        "systemTime": 1700000000000u64,
        "conversationId": "ORD1"
    })
}

pub fn gateway_with(stub: &StubProcessor) -> PaymentGateway {
    PaymentGateway::new(Box::new(stub.clone()))
}
