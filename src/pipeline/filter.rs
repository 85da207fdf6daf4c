//! Risk filter
//!
//! Narrows the catalog to strategies acceptable under a risk tolerance.

use crate::models::{RiskBand, StrategyRecord};
use std::sync::Arc;

pub struct RiskFilter;

impl RiskFilter {
    /// Keep low only up to 33, exclude high up to 66, keep everything above.
    /// Catalog order is preserved. An empty result is not an error here.
    pub fn filter(catalog: &[Arc<StrategyRecord>], risk_tolerance: u8) -> Vec<Arc<StrategyRecord>> {
        let band = RiskBand::from_tolerance(risk_tolerance);

        catalog
            .iter()
            .filter(|record| band.admits(record.risk_level))
            .cloned()
            .collect()
    }
}
