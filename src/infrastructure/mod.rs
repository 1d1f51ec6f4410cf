//! Adapters for the `Processor` port.

pub mod iyzico;
pub mod stub;
