//! # vv Market-Data Types
//!
//! Domain types shared by the market-data platform and the event publisher.
//!
//! ## Contents
//!
//! - **Market-data entities**: [`BaseMarketData`], [`FxSpotPriceData`] and
//!   [`CryptoOrdinalSpotPriceData`], all exposing the [`MarketDataEntity`]
//!   accessors used to build change notifications
//! - **Change events**: payloads such as [`FxSpotPriceChanged`] that carry an
//!   explicit event type name through [`NamedEvent`]
//! - **Currency codes**: ISO 4217 constants plus the supported crypto codes
//!
//! ## Usage
//!
//! ```rust
//! use types::{FxSpotPriceChanged, FxSpotPriceData, MarketDataEntity, NamedEvent};
//!
//! let data = FxSpotPriceData::example();
//! assert_eq!(data.subject(), "price.spot.fx/eurusd");
//!
//! let changed = FxSpotPriceChanged::from_data(&data);
//! assert_eq!(FxSpotPriceChanged::EVENT_TYPE, "FxSpotPriceChanged");
//! # let _ = changed;
//! ```

pub mod currency;
pub mod errors;
pub mod events;
pub mod market_data;

pub use currency::CurrencyCode;
pub use errors::ValidationError;
pub use events::{CryptoOrdinalSpotPriceChanged, FxSpotPriceChanged, NamedEvent};
pub use market_data::{
    BaseMarketData, CryptoOrdinalSpotPriceData, FxSpotPriceData, MarketDataEntity, PriceSide,
};
