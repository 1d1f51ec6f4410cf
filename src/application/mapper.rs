//! Translation of domain vocabulary into processor vocabulary.
//!
//! All functions here are total and pure.

use crate::domain::money::Currency;
use crate::domain::payment::ItemKind;
use rust_decimal::Decimal;
use serde::Serialize;

pub const LOCALE: &str = "tr";
pub const PAYMENT_CHANNEL: &str = "WEB";
pub const PAYMENT_GROUP: &str = "PRODUCT";

/// Currency codes the processor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessorCurrency {
    #[serde(rename = "TRY")]
    Try,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
}

impl ProcessorCurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Try => "TRY",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessorItemType {
    Physical,
    Virtual,
}

pub fn map_currency(currency: Currency) -> ProcessorCurrency {
    match currency {
        Currency::Try => ProcessorCurrency::Try,
        Currency::Usd => ProcessorCurrency::Usd,
        Currency::Eur => ProcessorCurrency::Eur,
        Currency::Gbp => ProcessorCurrency::Gbp,
    }
}

pub fn map_item_kind(kind: ItemKind) -> ProcessorItemType {
    match kind {
        ItemKind::Physical => ProcessorItemType::Physical,
        ItemKind::Virtual => ProcessorItemType::Virtual,
    }
}

/// Renders a major-unit amount exactly as given, without rounding.
pub fn render_amount(value: impl Into<Decimal>) -> String {
    value.into().to_string()
}

pub fn render_flag(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}
