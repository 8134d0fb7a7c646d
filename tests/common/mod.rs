#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use folioscope::domain::currency::CurrencyCode;
use folioscope::domain::error::EngineError;
use folioscope::domain::portfolio::{AssetClass, Holding, HoldingValuation};
use folioscope::domain::snapshot::{InstrumentSnapshot, PriceSnapshot};
use folioscope::domain::strategy::{CallType, FormulaEntry, StrategyDefinition};
use folioscope::ports::record_port::RecordPort;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

pub const HOLDINGS_CSV: &str = "\
symbol,asset_class,quantity,average_price,current_price,currency,last_updated
INFY,stock,10,100,120,INR,2024-03-10
TCS,stock,2,3000,2900,INR,2024-03-01T15:30:00
NIFTYBEES,etf,100,200,210,INR,
GSEC30,bond,1,100000,,INR,2024-03-09
";

pub const SNAPSHOTS_CSV: &str = "\
symbol,last_close,low_52w,high_52w,ma20,ma200,pe_ratio,pegy_index
INFY,1500,1200,2400,1450,1400,24.5,1.1
TCS,3900,3000,4000,3950,3700,38,2.2
NEWCO,95,,,,,,
";

pub const BUY_STRATEGY_INI: &str = "\
[strategy]
call_type = BUY
formula = pe_ratio:0.5, pegy_index:0.3, 52w_range:0.2
";

/// Serves fixed records without touching the filesystem.
pub struct MockRecordPort {
    pub holdings: Vec<Holding>,
    pub snapshots: Vec<InstrumentSnapshot>,
}

impl MockRecordPort {
    pub fn new() -> Self {
        Self {
            holdings: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn with_holding(mut self, holding: Holding) -> Self {
        self.holdings.push(holding);
        self
    }

    pub fn with_snapshot(mut self, snapshot: InstrumentSnapshot) -> Self {
        self.snapshots.push(snapshot);
        self
    }
}

impl RecordPort for MockRecordPort {
    fn fetch_holdings(&self) -> Result<Vec<Holding>, EngineError> {
        Ok(self.holdings.clone())
    }

    fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, EngineError> {
        Ok(self.snapshots.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn make_holding(
    symbol: &str,
    class: AssetClass,
    quantity: f64,
    average_price: f64,
    current_price: Option<f64>,
) -> Holding {
    Holding {
        symbol: symbol.to_string(),
        asset_class: class,
        valuation: HoldingValuation::new(quantity, average_price, current_price, CurrencyCode::Inr)
            .unwrap(),
        last_updated: None,
    }
}

pub fn make_instrument(
    symbol: &str,
    prices: PriceSnapshot,
    pe_ratio: Option<f64>,
    pegy_index: Option<f64>,
) -> InstrumentSnapshot {
    InstrumentSnapshot {
        symbol: symbol.to_string(),
        prices,
        pe_ratio,
        pegy_index,
    }
}

pub fn prices(last_close: f64, low: f64, high: f64, ma20: f64, ma200: f64) -> PriceSnapshot {
    PriceSnapshot {
        last_close: Some(last_close),
        low_52w: Some(low),
        high_52w: Some(high),
        ma20: Some(ma20),
        ma200: Some(ma200),
    }
}

pub fn definition(call_type: CallType, entries: &[(&str, f64)]) -> StrategyDefinition {
    StrategyDefinition {
        call_type,
        formula: entries
            .iter()
            .map(|(name, weight)| FormulaEntry::new(*name, *weight))
            .collect(),
    }
}

pub fn write_data_dir(holdings: &str, snapshots: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("holdings.csv"), holdings).unwrap();
    fs::write(dir.path().join("snapshots.csv"), snapshots).unwrap();
    dir
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
