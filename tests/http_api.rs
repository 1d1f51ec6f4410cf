mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use common::{approved_payment_reply, declined_reply, gateway_with, payment_body};
use payhub_proxy::domain::ports::{ProcessorOperation, RawReply};
use payhub_proxy::infrastructure::stub::StubProcessor;
use payhub_proxy::interfaces::http::{AppState, create_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(stub: &StubProcessor) -> Router {
    create_router(AppState::new(gateway_with(stub)))
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bare_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let stub = StubProcessor::new();
    let (status, body) = send(app(&stub), bare_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert!(body["timestamp"].is_string());
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_create_payment_success_envelope() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::Payment,
        RawReply::Structured(approved_payment_reply()),
    );

    let (status, body) = send(
        app(&stub),
        json_request(Method::POST, "/payment/create", &payment_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["paymentId"], json!("PAY1"));
    assert_eq!(body["transactionId"], json!("PAY1"));
    assert_eq!(body["amount"], json!(100.0));
    assert_eq!(body["paidAmount"], json!(100.0));
    assert_eq!(body["installment"], json!(1));
}

#[tokio::test]
async fn test_create_payment_decline_envelope() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::Payment,
        RawReply::Structured(declined_reply("5006", "Invalid card")),
    );

    let (status, body) = send(
        app(&stub),
        json_request(Method::POST, "/payment/create", &payment_body()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "errorCode": "5006", "errorMessage": "Invalid card"})
    );
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let stub = StubProcessor::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/payment/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"orderId\": "))
        .unwrap();

    let (status, body) = send(app(&stub), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("validation_error"));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_negative_amount_is_validation_error() {
    let stub = StubProcessor::new();
    let mut payload = payment_body();
    payload["amount"] = json!(-5);

    let (status, body) = send(
        app(&stub),
        json_request(Method::POST, "/payment/create", &payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], json!("validation_error"));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_three_ds_init_requires_callback() {
    let stub = StubProcessor::new();

    let (status, body) = send(
        app(&stub),
        json_request(Method::POST, "/payment/3ds/init", &payment_body()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], json!("validation_error"));
}

#[tokio::test]
async fn test_three_ds_complete_keys_on_callback_payment() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::ThreeDSAuth,
        RawReply::Structured(approved_payment_reply()),
    );

    let (status, body) = send(
        app(&stub),
        json_request(
            Method::POST,
            "/payment/3ds/complete",
            &json!({"transactionId": "T1", "callbackData": {"paymentId": "P9"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(stub.requests()[0].body["paymentId"], json!("P9"));
}

#[tokio::test]
async fn test_installments_query() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::InstallmentInfo,
        RawReply::Structured(json!({
            "status": "success",
            "installmentDetails": [{
                "binNumber": "552879",
                "bankName": "Halkbank",
                "bankCode": 12,
                "installmentPrices": [
                    {"installmentNumber": 1, "installmentPrice": 100.0, "totalPrice": 100.0}
                ]
            }]
        })),
    );

    let (status, body) = send(
        app(&stub),
        bare_request(Method::GET, "/payment/installments?binNumber=552879&amount=100"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["binNumber"], json!("552879"));
    assert_eq!(body["bankName"], json!("Halkbank"));
    assert_eq!(body["options"][0]["installmentNumber"], json!(1));
    assert_eq!(body["options"][0]["totalPrice"], json!(100.0));
    assert_eq!(stub.requests()[0].body["binNumber"], json!("552879"));
}

#[tokio::test]
async fn test_short_bin_is_rejected_without_processor_call() {
    let stub = StubProcessor::new();

    let (status, body) = send(
        app(&stub),
        bare_request(Method::GET, "/payment/installments?binNumber=55287&amount=100"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], json!("validation_error"));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_missing_query_parameter_is_validation_error() {
    let stub = StubProcessor::new();

    let (status, body) = send(
        app(&stub),
        bare_request(Method::GET, "/payment/installments?binNumber=552879"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], json!("validation_error"));
}

#[tokio::test]
async fn test_refund_and_status() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::Refund,
        RawReply::Structured(json!({
            "status": "success",
            "paymentTransactionId": "PTX1",
            "price": 10.5
        })),
    );
    stub.reply_with(
        ProcessorOperation::PaymentDetail,
        RawReply::Structured(json!({"status": "success", "paymentStatus": 1})),
    );

    let (status, body) = send(
        app(&stub),
        json_request(
            Method::POST,
            "/payment/refund",
            &json!({"transactionId": "PTX1", "amount": 10.5, "currency": "usd"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refundId"], json!("PTX1"));
    assert_eq!(body["refundedAmount"], json!(10.5));
    assert_eq!(stub.requests()[0].body["currency"], json!("USD"));

    let (status, body) = send(app(&stub), bare_request(Method::GET, "/payment/status/PAY1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "status": "success"}));
}

#[tokio::test]
async fn test_refund_failure_default_code() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::Refund,
        RawReply::Structured(json!({"status": "failure"})),
    );

    let (status, body) = send(
        app(&stub),
        json_request(
            Method::POST,
            "/payment/refund",
            &json!({"transactionId": "PTX1", "amount": 10}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "errorCode": "refund_failed", "errorMessage": "Refund failed"})
    );
}

#[tokio::test]
async fn test_card_routes() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::CardList,
        RawReply::Structured(json!({
            "status": "success",
            "cardDetails": [{"cardToken": "CT1", "cardAlias": "Work", "lastFourDigits": "0008"}]
        })),
    );
    stub.reply_with(
        ProcessorOperation::CardDelete,
        RawReply::Structured(json!({"status": "success"})),
    );

    let (status, body) = send(
        app(&stub),
        bare_request(Method::GET, "/payment/cards?cardUserKey=CUK1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cards"][0]["cardToken"], json!("CT1"));

    let (status, body) = send(
        app(&stub),
        bare_request(Method::DELETE, "/payment/cards/CT1?cardUserKey=CUK1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let sent = stub.requests();
    assert_eq!(sent[1].operation, ProcessorOperation::CardDelete);
    assert_eq!(sent[1].body["cardToken"], json!("CT1"));
    assert_eq!(sent[1].body["cardUserKey"], json!("CUK1"));
}

#[tokio::test]
async fn test_charge_saved_card_route() {
    let stub = StubProcessor::new();
    stub.reply_with(
        ProcessorOperation::Payment,
        RawReply::Structured(approved_payment_reply()),
    );
    let base = payment_body();
    let charge = json!({
        "cardToken": "CT1",
        "cardUserKey": "CUK1",
        "orderId": "ORD3",
        "amount": 100,
        "buyer": base["buyer"],
        "basketItems": base["basketItems"]
    });

    let (status, body) = send(
        app(&stub),
        json_request(Method::POST, "/payment/cards/charge", &charge),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paymentId"], json!("PAY1"));
    assert_eq!(
        stub.requests()[0].body["paymentCard"],
        json!({"cardToken": "CT1", "cardUserKey": "CUK1"})
    );
}

#[tokio::test]
async fn test_unreachable_processor_is_server_error() {
    let stub = StubProcessor::new();
    stub.fail_with(ProcessorOperation::PaymentDetail, "processor returned HTTP 503");

    let (status, body) = send(app(&stub), bare_request(Method::GET, "/payment/status/PAY1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("server_error"));
    assert!(
        body["errorMessage"]
            .as_str()
            .unwrap()
            .contains("processor returned HTTP 503")
    );
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let stub = StubProcessor::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/payment/create")
        .header(header::ORIGIN, "https://shop.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(&stub).oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://shop.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_cors_headers_on_simple_request() {
    let stub = StubProcessor::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://shop.example.com")
        .body(Body::empty())
        .unwrap();

    let response = app(&stub).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://shop.example.com"
    );
}
