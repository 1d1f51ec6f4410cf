use crate::config::MerchantCredentials;
use crate::domain::ports::{HttpMethod, Processor, ProcessorRequest, RawReply};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use reqwest::{Client, Method, header};
use ring::hmac;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const AUTH_SCHEME: &str = "IYZWSv2";
const RANDOM_KEY_HEADER: &str = "x-iyzi-rnd";

/// The iyzico REST API behind the `Processor` port.
///
/// Each dispatch is one signed HTTPS call. The underlying `reqwest` client
/// pools connections and is shared by every in-flight request.
#[derive(Debug, Clone)]
pub struct IyzicoClient {
    client: Client,
    credentials: Arc<MerchantCredentials>,
}

impl IyzicoClient {
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialised.
    pub fn new(credentials: Arc<MerchantCredentials>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(32)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.credentials.base_url.as_str().trim_end_matches('/'),
            path
        )
    }
}

/// Per-request nonce: current epoch millis followed by a random suffix.
pub fn random_key() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
    format!("{}{}", chrono::Utc::now().timestamp_millis(), suffix)
}

/// `Authorization` header value for one request.
///
/// The signature is the hex HMAC-SHA256, keyed with the merchant secret, of
/// the random key, the URI path and the exact JSON body sent, concatenated.
pub fn authorization_header(
    credentials: &MerchantCredentials,
    random_key: &str,
    path: &str,
    body: &str,
) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, credentials.secret_key.as_bytes());
    let mut message = String::with_capacity(random_key.len() + path.len() + body.len());
    message.push_str(random_key);
    message.push_str(path);
    message.push_str(body);
    let signature = hex::encode(hmac::sign(&key, message.as_bytes()).as_ref());

    let params = format!(
        "apiKey:{}&randomKey:{}&signature:{}",
        credentials.api_key, random_key, signature
    );
    format!("{AUTH_SCHEME} {}", STANDARD.encode(params))
}

/// Interprets a processor HTTP reply.
///
/// A 5xx, or a body that is not JSON, is an integration failure. Any JSON
/// body goes on to normalization whatever its status field says; a JSON
/// string is handed over as the serialized document it contains.
fn interpret(status: reqwest::StatusCode, text: &str) -> Result<RawReply> {
    if status.is_server_error() {
        return Err(GatewayError::integration(format!(
            "processor returned HTTP {status}"
        )));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::String(inner)) => Ok(RawReply::Serialized(inner)),
        Ok(value) => Ok(RawReply::Structured(value)),
        Err(e) => Err(GatewayError::integration(format!(
            "processor returned a non-JSON body (HTTP {status}): {e}"
        ))),
    }
}

#[async_trait]
impl Processor for IyzicoClient {
    #[instrument(skip_all, fields(path = request.operation.path()))]
    async fn dispatch(&self, request: ProcessorRequest) -> Result<RawReply> {
        let path = request.operation.path();
        let body = serde_json::to_string(&request.body)?;
        let nonce = random_key();
        let authorization = authorization_header(&self.credentials, &nonce, path, &body);
        let method = match request.operation.method() {
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let response = self
            .client
            .request(method, self.endpoint(path))
            .header(header::AUTHORIZATION, authorization)
            .header(RANDOM_KEY_HEADER, nonce)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "processor unreachable"))?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "processor replied");
        interpret(status, &text)
    }
}
