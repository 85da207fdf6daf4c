//! Core data models for the mission strategy engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Informational target category. Carried on the request, not scored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Cyber,
    Financial,
    Organization,
    Individual,
    Network,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Urgent,
    Short,
    Medium,
    Long,
}

/// Label for a risk tolerance value, using the same cut-offs as the risk filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const LOW_MAX: u8 = 33;
    pub const MEDIUM_MAX: u8 = 66;

    pub fn from_tolerance(risk_tolerance: u8) -> Self {
        if risk_tolerance <= Self::LOW_MAX {
            RiskBand::Low
        } else if risk_tolerance <= Self::MEDIUM_MAX {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    /// Whether a strategy of the given risk level is acceptable in this band.
    pub fn admits(self, level: RiskLevel) -> bool {
        match self {
            RiskBand::Low => level == RiskLevel::Low,
            RiskBand::Medium => level != RiskLevel::High,
            RiskBand::High => true,
        }
    }
}

//
// ================= Catalog =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRole {
    pub role: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub success_rate: u8,
    pub recommended_team: Vec<TeamRole>,
    pub tactics: Vec<String>,
    pub timeline: String,
    pub tags: Vec<String>,
}

impl StrategyRecord {
    /// Total headcount across the recommended team.
    pub fn team_size(&self) -> u32 {
        self.recommended_team.iter().map(|m| m.count).sum()
    }
}

/// A catalog record with its per-request relevance score attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoredStrategy {
    #[serde(flatten)]
    pub strategy: Arc<StrategyRecord>,
    pub match_score: u32,
}

impl ScoredStrategy {
    pub fn new(strategy: Arc<StrategyRecord>, match_score: u32) -> Self {
        Self {
            strategy,
            match_score,
        }
    }

    pub fn id(&self) -> &str {
        &self.strategy.id
    }

    /// Match confidence in percent: ten points per score unit, capped at 100.
    pub fn match_confidence(&self) -> u8 {
        self.match_score.saturating_mul(10).min(100) as u8
    }
}

//
// ================= Mission Request =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRequest {
    pub objective: String,
    pub target_type: Option<TargetType>,
    pub risk_tolerance: u8,
    /// Accepted and validated, reserved for future scoring.
    pub resources_available: u8,
    pub timeframe: Option<Timeframe>,
}

impl MissionRequest {
    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_tolerance(self.risk_tolerance)
    }
}

//
// ================= Classification =================
//

/// Topical domain tag. `general` is the tag used when no domain matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DomainTag(String);

impl DomainTag {
    pub const GENERAL: &'static str = "general";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn general() -> Self {
        Self(Self::GENERAL.to_string())
    }

    pub fn is_general(&self) -> bool {
        self.0 == Self::GENERAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationResult {
    pub top_match: DomainTag,
    pub requires_multi_domain: bool,
    pub keywords: Vec<String>,
    /// Every domain whose classification vocabulary matched, in priority order.
    pub matched_domains: Vec<DomainTag>,
}

//
// ================= Chat =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Processing,
    Verified,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
    pub status: MessageStatus,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn verified(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            status: MessageStatus::Verified,
            timestamp: Utc::now(),
        }
    }

    pub fn pending(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: String::new(),
            status: MessageStatus::Processing,
            timestamp: Utc::now(),
        }
    }
}

//
// ================= Orchestrator =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Idle,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    /// Allowed lifecycle edges. Re-submission from any state enters `Processing`.
    pub fn can_transition_to(self, next: ProcessingStatus) -> bool {
        use ProcessingStatus::*;
        match (self, next) {
            (_, Processing) => true,
            (Processing, Completed) | (Processing, Error) => true,
            (Completed, Idle) | (Error, Idle) | (Processing, Idle) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
        };
        write!(f, "{}", s)
    }
}
