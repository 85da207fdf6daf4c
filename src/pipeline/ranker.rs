//! Ranker
//!
//! Orders scored candidates and truncates to the shortlist.

use crate::models::ScoredStrategy;

/// Default shortlist length
pub const DEFAULT_MAX_RESULTS: usize = 3;

pub struct Ranker {
    max_results: usize,
}

impl Ranker {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Drop zero scores, sort by (match score desc, success rate desc), cap.
    /// `sort_by` is stable, so remaining ties keep catalog order.
    pub fn rank(&self, scored: Vec<ScoredStrategy>) -> Vec<ScoredStrategy> {
        let mut ranked: Vec<ScoredStrategy> =
            scored.into_iter().filter(|s| s.match_score > 0).collect();

        ranked.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| b.strategy.success_rate.cmp(&a.strategy.success_rate))
        });

        ranked.truncate(self.max_results);
        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, StrategyRecord};
    use std::sync::Arc;

    fn scored(id: &str, score: u32, success_rate: u8) -> ScoredStrategy {
        ScoredStrategy::new(
            Arc::new(StrategyRecord {
                id: id.to_string(),
                name: id.to_string(),
                description: String::new(),
                risk_level: RiskLevel::Low,
                success_rate,
                recommended_team: vec![],
                tactics: vec![],
                timeline: String::new(),
                tags: vec![],
            }),
            score,
        )
    }

    fn ids(ranked: &[ScoredStrategy]) -> Vec<&str> {
        ranked.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_orders_by_score_then_success_rate() {
        let ranked = Ranker::default().rank(vec![
            scored("a", 2, 99),
            scored("b", 5, 70),
            scored("c", 5, 90),
        ]);
        assert_eq!(ids(&ranked), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let ranked = Ranker::default().rank(vec![
            scored("first", 4, 80),
            scored("second", 4, 80),
            scored("third", 4, 80),
        ]);
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_drops_zero_scores_and_caps() {
        let ranked = Ranker::default().rank(vec![
            scored("zero", 0, 100),
            scored("a", 1, 10),
            scored("b", 2, 10),
            scored("c", 3, 10),
            scored("d", 4, 10),
        ]);
        assert_eq!(ids(&ranked), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_all_zero_is_empty() {
        let ranked = Ranker::default().rank(vec![scored("a", 0, 50), scored("b", 0, 60)]);
        assert!(ranked.is_empty());
    }
}
