use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Processor endpoints this proxy calls, one per client operation
/// (create-payment and charge-saved-card share `Payment`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorOperation {
    Payment,
    ThreeDSInitialize,
    ThreeDSAuth,
    InstallmentInfo,
    Refund,
    PaymentDetail,
    CardList,
    CardDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Delete,
}

impl ProcessorOperation {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Payment => "/payment/auth",
            Self::ThreeDSInitialize => "/payment/3dsecure/initialize",
            Self::ThreeDSAuth => "/payment/3dsecure/auth",
            Self::InstallmentInfo => "/payment/iyzipos/installment",
            Self::Refund => "/payment/refund",
            Self::PaymentDetail => "/payment/detail",
            Self::CardList => "/cardstorage/cards",
            Self::CardDelete => "/cardstorage/card",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Self::CardDelete => HttpMethod::Delete,
            _ => HttpMethod::Post,
        }
    }
}

/// A fully built processor payload, ready to be signed and sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorRequest {
    pub operation: ProcessorOperation,
    pub body: Value,
}

/// What came back from the processor before any interpretation.
///
/// Some processor SDKs hand the result over as a JSON document serialized
/// into a string; `Serialized` keeps that shape so it can be decoded in one
/// place.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReply {
    Structured(Value),
    Serialized(String),
}

/// The single outbound call each operation makes.
///
/// Implementations must be safe to share across concurrent requests and must
/// not retry on their own: payment calls are not idempotent.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn dispatch(&self, request: ProcessorRequest) -> Result<RawReply>;
}

pub type ProcessorBox = Box<dyn Processor>;
