//! Application layer: the translation pipeline between client and processor.
//!
//! [`gateway::PaymentGateway`] is the entry point. Each operation validates the
//! client request, builds the processor payload, performs a single outbound
//! call through the `Processor` port and normalizes the reply into the
//! client envelope.

pub mod builders;
pub mod classifier;
pub mod gateway;
pub mod mapper;
pub mod normalizer;
pub mod three_ds;
