//! Strategy catalog
//!
//! Immutable set of candidate strategy records, loaded once and shared
//! read-only across every recommendation call.

use crate::error::EngineError;
use crate::models::StrategyRecord;
use crate::Result;
use std::collections::HashSet;
use std::sync::Arc;

pub mod defaults;

pub use defaults::default_catalog;

/// Read-only strategy catalog. Cloning shares the same records.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    records: Arc<[Arc<StrategyRecord>]>,
}

impl CatalogStore {
    /// Build a catalog, rejecting duplicate ids and out-of-range success rates.
    /// Tags are case-folded on the way in.
    pub fn new(records: Vec<StrategyRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());

        let records = records
            .into_iter()
            .map(|mut record| {
                if record.id.trim().is_empty() {
                    return Err(EngineError::Config(
                        "Strategy record with empty id".to_string(),
                    ));
                }
                if !seen.insert(record.id.clone()) {
                    return Err(EngineError::Config(format!(
                        "Duplicate strategy id: {}",
                        record.id
                    )));
                }
                if record.success_rate > 100 {
                    return Err(EngineError::Config(format!(
                        "Strategy {} has success rate {} outside 0-100",
                        record.id, record.success_rate
                    )));
                }
                record.tags = record.tags.iter().map(|t| t.to_lowercase()).collect();
                Ok(Arc::new(record))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            records: records.into(),
        })
    }

    pub fn records(&self) -> &[Arc<StrategyRecord>] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Arc<StrategyRecord>> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self {
            records: default_catalog().into_iter().map(Arc::new).collect::<Vec<_>>().into(),
        }
    }
}
