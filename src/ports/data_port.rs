//! Data access port trait.

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::OhlcvBar;
use std::path::Path;

pub trait DataPort {
    /// Load the full bar series from `source`, oldest first.
    fn load_bars(&self, source: &Path) -> Result<Vec<OhlcvBar>, TradesimError>;
}
