//! Currency codes attached to instruments and accounts.
//!
//! A currency here is a property of the holding, never of the viewer's locale.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum CurrencyCode {
    Inr,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Aud,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 6] = [
        CurrencyCode::Inr,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Aud,
    ];

    pub fn iso_code(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "INR",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Aud => "AUD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "₹",
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
            CurrencyCode::Jpy => "¥",
            CurrencyCode::Aud => "A$",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.iso_code() == code)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = UnknownCurrency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}
