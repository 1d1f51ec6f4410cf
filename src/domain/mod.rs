//! Neutral domain model shared by every operation, plus the outbound port.

pub mod money;
pub mod outcome;
pub mod payment;
pub mod ports;
pub mod three_ds;
