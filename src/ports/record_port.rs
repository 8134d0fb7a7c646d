//! Upstream record contract: already-fetched holdings and price snapshots.

use crate::domain::error::EngineError;
use crate::domain::portfolio::Holding;
use crate::domain::snapshot::InstrumentSnapshot;

pub trait RecordPort {
    fn fetch_holdings(&self) -> Result<Vec<Holding>, EngineError>;

    fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, EngineError>;

    fn fetch_snapshot(&self, symbol: &str) -> Result<Option<InstrumentSnapshot>, EngineError> {
        Ok(self
            .fetch_snapshots()?
            .into_iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol)))
    }
}
