//! Response synthesizer
//!
//! Selects canned domain responses for a message. Responses follow domain
//! priority order; when no domain answers, exactly one fallback is produced.
//! Delivery status is not set here, the chat assistant owns it.

use crate::classifier::{contains_any, DomainVocabulary};
use crate::models::{ClassificationResult, DomainTag};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackResponse {
    pub agent: String,
    pub content: String,
}

impl Default for FallbackResponse {
    fn default() -> Self {
        Self {
            agent: "doctor".to_string(),
            content: "ขอบคุณที่ติดต่อมา คุณมีคำถามเกี่ยวกับสุขภาพหรือไม่?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainResponse {
    pub domain: DomainTag,
    pub agent: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ResponseSynthesizer {
    domains: Arc<[DomainVocabulary]>,
    fallback: FallbackResponse,
}

impl ResponseSynthesizer {
    pub fn new(domains: &[DomainVocabulary], fallback: FallbackResponse) -> Self {
        Self {
            domains: domains.iter().map(DomainVocabulary::normalized).collect(),
            fallback,
        }
    }

    /// One response per domain whose response vocabulary appears in `text`
    /// and whose agent is listed in `available_agents`.
    pub fn synthesize(
        &self,
        text: &str,
        classification: &ClassificationResult,
        available_agents: &[String],
    ) -> Vec<DomainResponse> {
        let lower = text.to_lowercase();

        let mut responses: Vec<DomainResponse> = self
            .domains
            .iter()
            .filter(|d| available_agents.iter().any(|a| *a == d.agent))
            .filter(|d| contains_any(&lower, d.response_terms()))
            .filter_map(|d| {
                d.response.as_ref().map(|content| DomainResponse {
                    domain: d.tag(),
                    agent: d.agent.clone(),
                    content: content.clone(),
                })
            })
            .collect();

        if responses.is_empty() {
            responses.push(DomainResponse {
                domain: DomainTag::general(),
                agent: self.fallback.agent.clone(),
                content: self.fallback.content.clone(),
            });
        }

        debug!(
            top_match = %classification.top_match,
            multi_domain = classification.requires_multi_domain,
            responses = responses.len(),
            "Responses synthesized"
        );

        responses
    }
}

impl Default for ResponseSynthesizer {
    fn default() -> Self {
        Self::new(&crate::classifier::default_vocabulary(), FallbackResponse::default())
    }
}
