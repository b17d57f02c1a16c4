//! Standardized currency codes (ISO 4217 plus established crypto assets)

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported currency codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
    Zar,
    Jpy,
    Chf,
    Aud,
    Cad,
    Cny,
    Btc,
    Eth,
}

impl CurrencyCode {
    /// All defined codes, in declaration order
    pub const ALL: [CurrencyCode; 11] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Zar,
        CurrencyCode::Jpy,
        CurrencyCode::Chf,
        CurrencyCode::Aud,
        CurrencyCode::Cad,
        CurrencyCode::Cny,
        CurrencyCode::Btc,
        CurrencyCode::Eth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Zar => "ZAR",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Chf => "CHF",
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Btc => "BTC",
            CurrencyCode::Eth => "ETH",
        }
    }

    /// Whether the code names a crypto asset rather than a fiat currency
    pub fn is_crypto(self) -> bool {
        matches!(self, CurrencyCode::Btc | CurrencyCode::Eth)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        CurrencyCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| ValidationError::UnsupportedCurrency(s.to_string()))
    }
}
