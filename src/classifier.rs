//! Intent Classifier
//!
//! Maps free text onto configured topical domains:
//! - `top_match`: first domain (in priority order) whose vocabulary appears
//! - `requires_multi_domain`: co-occurrence vocabulary of two or more domains
//! - `keywords`: first five tokens longer than three characters
//!
//! Pure and deterministic; classification never fails.

use crate::models::{ClassificationResult, DomainTag};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum keywords reported per classification
pub const MAX_KEYWORDS: usize = 5;
/// Tokens must be longer than this many characters to count as keywords
pub const MIN_KEYWORD_CHARS: usize = 3;

/// One domain row of the vocabulary table. Rows are listed in priority order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainVocabulary {
    pub name: String,
    /// Agent that answers for this domain
    pub agent: String,
    pub classify_terms: Vec<String>,
    /// Terms counted for multi-domain detection. Defaults to `classify_terms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_occurrence_terms: Option<Vec<String>>,
    /// Terms that trigger the canned response. Defaults to `classify_terms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_terms: Option<Vec<String>>,
    /// Canned response. A domain without one never answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl DomainVocabulary {
    pub fn tag(&self) -> DomainTag {
        DomainTag::new(self.name.clone())
    }

    pub fn co_occurrence_terms(&self) -> &[String] {
        self.co_occurrence_terms
            .as_deref()
            .unwrap_or(&self.classify_terms)
    }

    pub fn response_terms(&self) -> &[String] {
        self.response_terms.as_deref().unwrap_or(&self.classify_terms)
    }

    /// Copy with every term case-folded and blank terms removed.
    pub(crate) fn normalized(&self) -> Self {
        fn fold(terms: &[String]) -> Vec<String> {
            terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        }

        Self {
            name: self.name.clone(),
            agent: self.agent.clone(),
            classify_terms: fold(&self.classify_terms),
            co_occurrence_terms: self.co_occurrence_terms.as_deref().map(fold),
            response_terms: self.response_terms.as_deref().map(fold),
            response: self.response.clone(),
        }
    }
}

/// True when any term occurs in the (already case-folded) text.
pub(crate) fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| text.contains(term.as_str()))
}

pub fn default_vocabulary() -> Vec<DomainVocabulary> {
    vec![
        DomainVocabulary {
            name: "medical".to_string(),
            agent: "doctor".to_string(),
            classify_terms: vec!["ปวดหัว".into(), "เวียนหัว".into(), "ระบบประสาท".into()],
            co_occurrence_terms: Some(vec!["ปวดหัว".into(), "เวียนหัว".into()]),
            response_terms: Some(vec!["ปวดหัว".into(), "เวียนหัว".into()]),
            response: Some(
                "จากอาการที่คุณแจ้งมา อาการปวดหัวและเวียนหัวอาจเกี่ยวข้องกับความเครียด การใช้สายตามากเกินไป หรือปัญหาทางระบบประสาท ขอแนะนำให้พักสายตาเป็นระยะและหากอาการไม่ดีขึ้นควรปรึกษาแพทย์"
                    .to_string(),
            ),
        },
        DomainVocabulary {
            name: "cybersecurity".to_string(),
            agent: "analyst".to_string(),
            classify_terms: vec!["hack".into(), "cyber".into(), "security".into()],
            co_occurrence_terms: None,
            response_terms: Some(vec!["security".into(), "hack".into()]),
            response: Some(
                "การรักษาความปลอดภัยไซเบอร์เป็นเรื่องสำคัญ ควรตรวจสอบระบบและปรับปรุงมาตรการป้องกันเป็นประจำ รวมถึงการอัปเดตซอฟต์แวร์ให้เป็นเวอร์ชันล่าสุดเสมอ"
                    .to_string(),
            ),
        },
    ]
}

/// Vocabulary-driven intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    domains: Arc<[DomainVocabulary]>,
}

impl IntentClassifier {
    pub fn new(domains: &[DomainVocabulary]) -> Self {
        Self {
            domains: domains.iter().map(DomainVocabulary::normalized).collect(),
        }
    }

    pub fn domains(&self) -> &[DomainVocabulary] {
        &self.domains
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        let lower = text.to_lowercase();

        let matched_domains: Vec<DomainTag> = self
            .domains
            .iter()
            .filter(|d| contains_any(&lower, &d.classify_terms))
            .map(DomainVocabulary::tag)
            .collect();

        let top_match = matched_domains
            .first()
            .cloned()
            .unwrap_or_else(DomainTag::general);

        // Any pair of domains co-occurring counts, not just one fixed pair.
        let co_occurring = self
            .domains
            .iter()
            .filter(|d| contains_any(&lower, d.co_occurrence_terms()))
            .count();

        ClassificationResult {
            top_match,
            requires_multi_domain: co_occurring >= 2,
            keywords: extract_keywords(&lower),
            matched_domains,
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(&default_vocabulary())
    }
}

fn extract_keywords(lower: &str) -> Vec<String> {
    lower
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finance_domain() -> DomainVocabulary {
        DomainVocabulary {
            name: "finance".to_string(),
            agent: "banker".to_string(),
            classify_terms: vec!["fraud".into(), "payment".into()],
            co_occurrence_terms: None,
            response_terms: None,
            response: Some("Review recent transactions.".to_string()),
        }
    }

    #[test]
    fn test_general_when_nothing_matches() {
        let result = IntentClassifier::default().classify("hello there");
        assert!(result.top_match.is_general());
        assert!(!result.requires_multi_domain);
        assert!(result.matched_domains.is_empty());
        assert_eq!(result.keywords, vec!["hello", "there"]);
    }

    #[test]
    fn test_single_domain() {
        let result = IntentClassifier::default().classify("Someone tried to HACK my router");
        assert_eq!(result.top_match, DomainTag::new("cybersecurity"));
        assert!(!result.requires_multi_domain);
    }

    #[test]
    fn test_medical_and_security_is_multi_domain_with_priority() {
        let result = IntentClassifier::default().classify("ปวดหัว เพราะ security breach");
        assert_eq!(result.top_match, DomainTag::new("medical"));
        assert!(result.requires_multi_domain);
        assert_eq!(
            result.matched_domains,
            vec![DomainTag::new("medical"), DomainTag::new("cybersecurity")]
        );
    }

    #[test]
    fn test_classify_term_outside_co_occurrence_set() {
        // "ระบบประสาท" classifies as medical but is not a co-occurrence trigger.
        let result = IntentClassifier::default().classify("ระบบประสาท and cyber attacks");
        assert_eq!(result.top_match, DomainTag::new("medical"));
        assert!(!result.requires_multi_domain);
    }

    #[test]
    fn test_any_pair_of_three_domains_is_multi_domain() {
        let mut domains = default_vocabulary();
        domains.push(finance_domain());
        let classifier = IntentClassifier::new(&domains);

        let result = classifier.classify("payment fraud after a cyber incident");
        assert_eq!(result.top_match, DomainTag::new("cybersecurity"));
        assert!(result.requires_multi_domain);

        let single = classifier.classify("payment fraud only");
        assert_eq!(single.top_match, DomainTag::new("finance"));
        assert!(!single.requires_multi_domain);
    }

    #[test]
    fn test_keywords_first_five_long_tokens_lowercase() {
        let result = IntentClassifier::default()
            .classify("The Quick brown fox jumps over lazy dogs while sleeping soundly");
        assert_eq!(result.keywords, vec!["quick", "brown", "jumps", "over", "lazy"]);
    }

    #[test]
    fn test_deterministic() {
        let classifier = IntentClassifier::default();
        let text = "เวียนหัว after the hack";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }

    #[test]
    fn test_empty_text() {
        let result = IntentClassifier::default().classify("");
        assert!(result.top_match.is_general());
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_terms_are_case_folded() {
        let mut domain = finance_domain();
        domain.classify_terms = vec!["  FRAUD ".into(), "".into()];
        let classifier = IntentClassifier::new(&[domain]);

        assert_eq!(classifier.domains()[0].classify_terms, vec!["fraud".to_string()]);
        assert_eq!(classifier.classify("Fraud alert").top_match, DomainTag::new("finance"));
        assert!(classifier.classify("nothing here").top_match.is_general());
    }
}
