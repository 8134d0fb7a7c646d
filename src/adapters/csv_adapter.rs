//! CSV record adapter.
//!
//! Reads `holdings.csv` and `snapshots.csv` from a directory. Numeric columns
//! other than quantity and average price may be blank.

use crate::domain::currency::CurrencyCode;
use crate::domain::error::EngineError;
use crate::domain::freshness::parse_date_like;
use crate::domain::portfolio::{AssetClass, Holding, HoldingValuation};
use crate::domain::snapshot::{InstrumentSnapshot, PriceSnapshot};
use crate::ports::record_port::RecordPort;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HOLDINGS_FILE: &str = "holdings.csv";
pub const SNAPSHOTS_FILE: &str = "snapshots.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct HoldingRow {
    symbol: String,
    asset_class: AssetClass,
    quantity: f64,
    average_price: f64,
    current_price: Option<f64>,
    currency: CurrencyCode,
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    symbol: String,
    last_close: Option<f64>,
    low_52w: Option<f64>,
    high_52w: Option<f64>,
    ma20: Option<f64>,
    ma200: Option<f64>,
    pe_ratio: Option<f64>,
    pegy_index: Option<f64>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn read_rows<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Result<Vec<T>, EngineError> {
        let path = self.base_path.join(file);
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| records_error(&path, e))?;

        let rows = rdr
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| records_error(&path, e))?;
        debug!(path = %path.display(), rows = rows.len(), "read records");
        Ok(rows)
    }
}

fn records_error(path: &Path, err: csv::Error) -> EngineError {
    EngineError::Records {
        reason: format!("{}: {}", path.display(), err),
    }
}

impl TryFrom<HoldingRow> for Holding {
    type Error = EngineError;

    fn try_from(row: HoldingRow) -> Result<Self, Self::Error> {
        let last_updated = match row.last_updated.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date_like(raw).ok_or_else(|| EngineError::Records {
                reason: format!("{}: invalid last_updated '{}'", row.symbol, raw),
            })?),
        };
        let valuation = HoldingValuation::new(
            row.quantity,
            row.average_price,
            row.current_price,
            row.currency,
        )?;
        Ok(Holding {
            symbol: row.symbol,
            asset_class: row.asset_class,
            valuation,
            last_updated,
        })
    }
}

impl From<SnapshotRow> for InstrumentSnapshot {
    fn from(row: SnapshotRow) -> Self {
        InstrumentSnapshot {
            symbol: row.symbol,
            prices: PriceSnapshot {
                last_close: row.last_close,
                low_52w: row.low_52w,
                high_52w: row.high_52w,
                ma20: row.ma20,
                ma200: row.ma200,
            },
            pe_ratio: row.pe_ratio,
            pegy_index: row.pegy_index,
        }
    }
}

impl RecordPort for CsvAdapter {
    fn fetch_holdings(&self) -> Result<Vec<Holding>, EngineError> {
        self.read_rows::<HoldingRow>(HOLDINGS_FILE)?
            .into_iter()
            .map(Holding::try_from)
            .collect()
    }

    fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, EngineError> {
        Ok(self
            .read_rows::<SnapshotRow>(SNAPSHOTS_FILE)?
            .into_iter()
            .map(InstrumentSnapshot::from)
            .collect())
    }
}
