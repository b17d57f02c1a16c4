//! Market-data entities
//!
//! Every entity carries the common identity block held by [`BaseMarketData`]:
//! what kind of data it is (`data_type`), which asset it describes
//! (`asset_class` / `asset_id`) and a document `version` that increments on
//! every update. The event publisher reads these through [`MarketDataEntity`]
//! to decide between "created" and "changed" notifications.

use crate::{CurrencyCode, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read access to the identity block of a market-data document
pub trait MarketDataEntity {
    fn data_type(&self) -> &str;
    fn asset_class(&self) -> &str;
    fn asset_id(&self) -> &str;
    fn schema_version(&self) -> &str;

    /// Document version; `None` for documents that were never stored
    fn version(&self) -> Option<u32>;

    /// Routing subject in the form `{dataType}.{assetClass}/{assetId}`
    fn subject(&self) -> String {
        format!(
            "{}.{}/{}",
            self.data_type(),
            self.asset_class(),
            self.asset_id()
        )
    }
}

/// Common fields shared by all market-data documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMarketData {
    pub id: String,
    pub schema_version: String,
    pub version: Option<u32>,
    pub asset_id: String,
    pub asset_class: String,
    pub data_type: String,
    pub region: String,
    pub document_type: String,
    pub create_timestamp: DateTime<Utc>,
    pub as_of_date: NaiveDate,
    pub as_of_time: Option<NaiveTime>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BaseMarketData {
    pub const DEFAULT_SCHEMA_VERSION: &'static str = "1.0.0";

    /// Create a new, never-stored document
    pub fn new(
        data_type: impl Into<String>,
        asset_class: impl Into<String>,
        asset_id: impl Into<String>,
        region: impl Into<String>,
        document_type: impl Into<String>,
        as_of_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let data_type = non_empty("dataType", data_type.into())?;
        let asset_class = non_empty("assetClass", asset_class.into())?;
        let asset_id = non_empty("assetId", asset_id.into())?;
        let region = non_empty("region", region.into())?;
        let document_type = non_empty("documentType", document_type.into())?;

        let id = format!(
            "{}.{}.{}.{}.{}.{}",
            data_type,
            asset_class,
            asset_id,
            region,
            as_of_date.format("%Y-%m-%d"),
            document_type
        );

        Ok(Self {
            id,
            schema_version: Self::DEFAULT_SCHEMA_VERSION.to_string(),
            version: None,
            asset_id,
            asset_class,
            data_type,
            region,
            document_type,
            create_timestamp: Utc::now(),
            as_of_date,
            as_of_time: None,
            tags: Vec::new(),
        })
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_as_of_time(mut self, time: NaiveTime) -> Self {
        self.as_of_time = Some(time);
        self
    }

    /// Add a tag, ignoring blanks and duplicates
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return;
        }
        self.tags.push(tag.to_string());
    }

    /// Bump the document version for an update
    pub fn increment_version(&mut self) {
        self.version = Some(self.version.unwrap_or(0) + 1);
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}

impl MarketDataEntity for BaseMarketData {
    fn data_type(&self) -> &str {
        &self.data_type
    }

    fn asset_class(&self) -> &str {
        &self.asset_class
    }

    fn asset_id(&self) -> &str {
        &self.asset_id
    }

    fn schema_version(&self) -> &str {
        &self.schema_version
    }

    fn version(&self) -> Option<u32> {
        self.version
    }
}

/// Side of a quoted price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSide {
    Bid,
    Ask,
    Mid,
}

/// FX spot price document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxSpotPriceData {
    #[serde(flatten)]
    pub base: BaseMarketData,
    pub price: Decimal,
    pub side: PriceSide,
}

impl FxSpotPriceData {
    pub fn new(base: BaseMarketData, price: Decimal, side: PriceSide) -> Self {
        Self { base, price, side }
    }

    /// EUR/USD mid, New York official close
    pub fn example() -> Self {
        let as_of_date = NaiveDate::from_ymd_opt(2025, 5, 13).unwrap_or_default();
        let mut base = BaseMarketData {
            id: format!("price.spot.fx.eurusd.ny.{}.official", as_of_date),
            schema_version: BaseMarketData::DEFAULT_SCHEMA_VERSION.to_string(),
            version: None,
            asset_id: "eurusd".to_string(),
            asset_class: "fx".to_string(),
            data_type: "price.spot".to_string(),
            region: "ny".to_string(),
            document_type: "official".to_string(),
            create_timestamp: Utc::now(),
            as_of_date,
            as_of_time: NaiveTime::from_hms_opt(15, 30, 5),
            tags: Vec::new(),
        };
        base.add_tag("spot");
        Self::new(base, Decimal::new(109, 2), PriceSide::Mid)
    }
}

/// Spot price of a crypto ordinal inscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoOrdinalSpotPriceData {
    #[serde(flatten)]
    pub base: BaseMarketData,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub side: PriceSide,
    pub inscription_number: u64,
    pub inscription_id: String,
    pub parent_inscription_id: Option<String>,
    pub collection_name: Option<String>,
}

impl CryptoOrdinalSpotPriceData {
    /// Inscription priced in BTC, end-of-day snapshot
    pub fn example() -> Self {
        let as_of_date = NaiveDate::from_ymd_opt(2025, 5, 13).unwrap_or_default();
        let base = BaseMarketData {
            id: format!("price.spot.cryptoordinal.inscription-71828.global.{}.eod", as_of_date),
            schema_version: BaseMarketData::DEFAULT_SCHEMA_VERSION.to_string(),
            version: None,
            asset_id: "inscription-71828".to_string(),
            asset_class: "cryptoordinal".to_string(),
            data_type: "price.spot".to_string(),
            region: "global".to_string(),
            document_type: "eod".to_string(),
            create_timestamp: Utc::now(),
            as_of_date,
            as_of_time: None,
            tags: Vec::new(),
        };
        Self {
            base,
            price: Decimal::new(125, 3),
            currency: CurrencyCode::Btc,
            side: PriceSide::Bid,
            inscription_number: 71828,
            inscription_id: "6fb976ab49dcec017f1e201e84395983204ae1a7c2abf7ced0a85d692e442799i0"
                .to_string(),
            parent_inscription_id: None,
            collection_name: Some("runestone".to_string()),
        }
    }
}

macro_rules! delegate_entity {
    ($ty:ty) => {
        impl MarketDataEntity for $ty {
            fn data_type(&self) -> &str {
                self.base.data_type()
            }

            fn asset_class(&self) -> &str {
                self.base.asset_class()
            }

            fn asset_id(&self) -> &str {
                self.base.asset_id()
            }

            fn schema_version(&self) -> &str {
                self.base.schema_version()
            }

            fn version(&self) -> Option<u32> {
                self.base.version()
            }
        }
    };
}

delegate_entity!(FxSpotPriceData);
delegate_entity!(CryptoOrdinalSpotPriceData);
