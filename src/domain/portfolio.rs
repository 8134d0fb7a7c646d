//! Holding valuation and portfolio aggregation.
//!
//! invested = quantity * average_price
//! current  = quantity * (current_price or average_price)
//! profit_loss_pct = profit_loss / invested * 100, or 0 when nothing is invested
//!
//! All holdings in one aggregate are expected to share a reporting currency;
//! no conversion happens here.

use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::currency::CurrencyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum AssetClass {
    Stock,
    Etf,
    Bond,
    MutualFund,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Stock,
        AssetClass::Etf,
        AssetClass::Bond,
        AssetClass::MutualFund,
    ];

    pub fn all() -> HashSet<AssetClass> {
        Self::ALL.into_iter().collect()
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "stock" | "stocks" | "equity" => Ok(AssetClass::Stock),
            "etf" | "etfs" => Ok(AssetClass::Etf),
            "bond" | "bonds" => Ok(AssetClass::Bond),
            "mutual_fund" | "mutual_funds" | "mf" => Ok(AssetClass::MutualFund),
            _ => Err(format!("unknown asset class: {}", s)),
        }
    }
}

impl TryFrom<String> for AssetClass {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Stock => write!(f, "stock"),
            AssetClass::Etf => write!(f, "etf"),
            AssetClass::Bond => write!(f, "bond"),
            AssetClass::MutualFund => write!(f, "mutual_fund"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HoldingError {
    #[error("quantity must be non-negative, got {quantity}")]
    NegativeQuantity { quantity: f64 },

    #[error("average price must be non-negative, got {average_price}")]
    NegativeAveragePrice { average_price: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldingValuation {
    pub quantity: f64,
    pub average_price: f64,
    pub current_price: Option<f64>,
    pub currency: CurrencyCode,
}

impl HoldingValuation {
    pub fn new(
        quantity: f64,
        average_price: f64,
        current_price: Option<f64>,
        currency: CurrencyCode,
    ) -> Result<Self, HoldingError> {
        if quantity.is_nan() || quantity < 0.0 {
            return Err(HoldingError::NegativeQuantity { quantity });
        }
        if average_price.is_nan() || average_price < 0.0 {
            return Err(HoldingError::NegativeAveragePrice { average_price });
        }
        Ok(HoldingValuation {
            quantity,
            average_price,
            current_price,
            currency,
        })
    }

    pub fn invested_value(&self) -> f64 {
        self.quantity * self.average_price
    }

    pub fn current_value(&self) -> f64 {
        self.quantity * self.current_price.unwrap_or(self.average_price)
    }

    pub fn profit_loss(&self) -> f64 {
        self.current_value() - self.invested_value()
    }

    pub fn profit_loss_pct(&self) -> f64 {
        pct_of(self.profit_loss(), self.invested_value())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub valuation: HoldingValuation,
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioSummary {
    pub invested: f64,
    pub current: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub count: usize,
}

fn pct_of(profit_loss: f64, invested: f64) -> f64 {
    if invested > 0.0 {
        (profit_loss / invested) * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Default)]
struct Totals {
    invested: f64,
    current: f64,
    count: usize,
    currency: Option<CurrencyCode>,
    mixed_currency: bool,
}

impl Totals {
    fn add(&mut self, valuation: &HoldingValuation) {
        self.invested += valuation.invested_value();
        self.current += valuation.current_value();
        self.count += 1;
        match self.currency {
            None => self.currency = Some(valuation.currency),
            Some(c) if c != valuation.currency => self.mixed_currency = true,
            Some(_) => {}
        }
    }

    fn finish(self) -> PortfolioSummary {
        if self.mixed_currency {
            warn!(
                holdings = self.count,
                "aggregating holdings in more than one currency without conversion"
            );
        }
        let profit_loss = self.current - self.invested;
        PortfolioSummary {
            invested: self.invested,
            current: self.current,
            profit_loss,
            profit_loss_pct: pct_of(profit_loss, self.invested),
            count: self.count,
        }
    }
}

/// Totals over the holdings whose asset class is in `include`, in one pass.
pub fn aggregate(holdings: &[Holding], include: &HashSet<AssetClass>) -> PortfolioSummary {
    let mut totals = Totals::default();
    for holding in holdings.iter().filter(|h| include.contains(&h.asset_class)) {
        totals.add(&holding.valuation);
    }
    totals.finish()
}

/// Per-class totals, in one pass. Classes with no holdings are absent.
pub fn aggregate_by_class(holdings: &[Holding]) -> HashMap<AssetClass, PortfolioSummary> {
    let mut by_class: HashMap<AssetClass, Totals> = HashMap::new();
    for holding in holdings {
        by_class
            .entry(holding.asset_class)
            .or_default()
            .add(&holding.valuation);
    }
    by_class
        .into_iter()
        .map(|(class, totals)| (class, totals.finish()))
        .collect()
}
