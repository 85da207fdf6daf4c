//! Recommendation pipeline
//!
//! RiskFilter → KeywordScorer → Ranker, plus the async source seam the
//! orchestrator drives.

use crate::catalog::CatalogStore;
use crate::models::{MissionRequest, ScoredStrategy};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub mod filter;
pub mod ranker;
pub mod scorer;

pub use filter::RiskFilter;
pub use ranker::{Ranker, DEFAULT_MAX_RESULTS};
pub use scorer::{tokenize, KeywordScorer};

/// Pure, synchronous filter → score → rank sequence.
pub struct RecommendationPipeline {
    ranker: Ranker,
}

impl RecommendationPipeline {
    pub fn new(max_results: usize) -> Self {
        Self {
            ranker: Ranker::new(max_results),
        }
    }

    pub fn run(&self, catalog: &CatalogStore, request: &MissionRequest) -> Vec<ScoredStrategy> {
        let candidates = RiskFilter::filter(catalog.records(), request.risk_tolerance);

        debug!(
            risk_tolerance = request.risk_tolerance,
            band = %request.risk_band(),
            candidates = candidates.len(),
            "Risk filter applied"
        );

        let tokens = tokenize(&request.objective);

        let scored: Vec<ScoredStrategy> = candidates
            .into_iter()
            .map(|record| {
                let score = KeywordScorer::score(&record, &tokens);
                ScoredStrategy::new(record, score)
            })
            .collect();

        let ranked = self.ranker.rank(scored);

        debug!(
            tokens = tokens.len(),
            shortlisted = ranked.len(),
            "Scoring and ranking complete"
        );

        ranked
    }
}

impl Default for RecommendationPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

/// Produces a shortlist for a request. The orchestrator owns lifecycle;
/// implementations only compute.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, request: &MissionRequest) -> Result<Vec<ScoredStrategy>>;
}

/// Catalog-backed source with a configurable analysis latency.
pub struct CatalogRecommender {
    catalog: CatalogStore,
    pipeline: RecommendationPipeline,
    latency: Duration,
}

impl CatalogRecommender {
    pub fn new(catalog: CatalogStore, pipeline: RecommendationPipeline, latency: Duration) -> Self {
        Self {
            catalog,
            pipeline,
            latency,
        }
    }
}

#[async_trait]
impl RecommendationSource for CatalogRecommender {
    async fn recommend(&self, request: &MissionRequest) -> Result<Vec<ScoredStrategy>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.pipeline.run(&self.catalog, request))
    }
}
