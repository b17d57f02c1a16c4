//! Domain change events
//!
//! Event payloads name their own event type through [`NamedEvent`]. The type
//! name is a compile-time constant so publishers never depend on runtime type
//! information to route an event.

use crate::{CryptoOrdinalSpotPriceData, CurrencyCode, FxSpotPriceData, MarketDataEntity, PriceSide};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payload that knows the logical event type it is published under
pub trait NamedEvent {
    /// Upper-camel-case event type name, e.g. `FxSpotPriceChanged`
    const EVENT_TYPE: &'static str;
}

/// An FX spot price was stored or updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxSpotPriceChanged {
    pub asset_id: String,
    pub region: String,
    pub as_of_date: NaiveDate,
    pub price: Decimal,
    pub side: PriceSide,
    pub version: Option<u32>,
    pub changed_at: DateTime<Utc>,
}

impl FxSpotPriceChanged {
    pub fn from_data(data: &FxSpotPriceData) -> Self {
        Self {
            asset_id: data.asset_id().to_string(),
            region: data.base.region.clone(),
            as_of_date: data.base.as_of_date,
            price: data.price,
            side: data.side,
            version: data.version(),
            changed_at: Utc::now(),
        }
    }
}

impl NamedEvent for FxSpotPriceChanged {
    const EVENT_TYPE: &'static str = "FxSpotPriceChanged";
}

/// A crypto ordinal spot price was stored or updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoOrdinalSpotPriceChanged {
    pub asset_id: String,
    pub inscription_id: String,
    pub inscription_number: u64,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub version: Option<u32>,
    pub changed_at: DateTime<Utc>,
}

impl CryptoOrdinalSpotPriceChanged {
    pub fn from_data(data: &CryptoOrdinalSpotPriceData) -> Self {
        Self {
            asset_id: data.asset_id().to_string(),
            inscription_id: data.inscription_id.clone(),
            inscription_number: data.inscription_number,
            price: data.price,
            currency: data.currency,
            version: data.version(),
            changed_at: Utc::now(),
        }
    }
}

impl NamedEvent for CryptoOrdinalSpotPriceChanged {
    const EVENT_TYPE: &'static str = "CryptoOrdinalSpotPriceChanged";
}
