//! Keyword scorer
//!
//! Weighted substring-containment relevance between a mission objective
//! and a strategy record. A token counts when it occurs anywhere inside the
//! target text, so short tokens also hit inside longer words.

use crate::models::StrategyRecord;

/// Points for a token found in the description
pub const DESCRIPTION_WEIGHT: u32 = 3;
/// Points for a token found in any tag (once per token)
pub const TAG_WEIGHT: u32 = 2;
/// Points per tactic containing the token
pub const TACTIC_WEIGHT: u32 = 1;

/// Split an objective on whitespace and case-fold each token.
pub fn tokenize(objective: &str) -> Vec<String> {
    objective
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect()
}

pub struct KeywordScorer;

impl KeywordScorer {
    pub fn score(candidate: &StrategyRecord, tokens: &[String]) -> u32 {
        let description = candidate.description.to_lowercase();
        let tactics: Vec<String> = candidate
            .tactics
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        tokens.iter().fold(0u32, |score, token| {
            let token = token.as_str();
            let mut gained = 0;

            if description.contains(token) {
                gained += DESCRIPTION_WEIGHT;
            }
            if candidate.tags.iter().any(|tag| tag.contains(token)) {
                gained += TAG_WEIGHT;
            }
            gained += tactics.iter().filter(|t| t.contains(token)).count() as u32 * TACTIC_WEIGHT;

            score.saturating_add(gained)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;

    #[test]
    fn test_tokenize_case_folds_and_drops_blank_runs() {
        assert_eq!(
            tokenize("  Stealth\tIntelligence   GATHERING "),
            vec!["stealth", "intelligence", "gathering"]
        );
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_weights_per_field() {
        let catalog = CatalogStore::default();
        let observer = catalog.get("strat-001").unwrap();

        // tag "stealth" + tactic "Stealth infrastructure deployment"
        assert_eq!(KeywordScorer::score(observer, &tokenize("stealth")), 2 + 1);
        // description + tag "intelligence", no tactic
        assert_eq!(KeywordScorer::score(observer, &tokenize("intelligence")), 3 + 2);
        // description only
        assert_eq!(KeywordScorer::score(observer, &tokenize("gathering")), 3);
    }

    #[test]
    fn test_substring_matching_inside_longer_words() {
        let catalog = CatalogStore::default();
        let fortress = catalog.get("strat-002").unwrap();

        // "hunt" hits "hunting" in description and "Threat hunting campaigns"
        assert_eq!(KeywordScorer::score(fortress, &tokenize("hunt")), 3 + 1);
    }

    #[test]
    fn test_tag_bonus_counted_once_per_token() {
        let catalog = CatalogStore::default();
        let infiltration = catalog.get("strat-005").unwrap();

        // "risk" is inside "high-risk" tag and "High-risk" description; no tactic.
        assert_eq!(KeywordScorer::score(infiltration, &tokenize("risk")), 3 + 2);
    }

    #[test]
    fn test_unrelated_objective_scores_zero() {
        let catalog = CatalogStore::default();
        for record in catalog.records() {
            assert_eq!(KeywordScorer::score(record, &tokenize("xyzzy quux")), 0);
        }
    }
}
