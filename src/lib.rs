//! Mission Strategy Engine
//!
//! A rule-based recommendation and chat engine that:
//! - Filters a strategy catalog by risk tolerance
//! - Scores the survivors against the mission objective by keyword overlap
//! - Ranks and shortlists the best matches
//! - Tracks request lifecycle and progress, discarding stale results
//! - Classifies chat messages into domains and answers with canned responses
//!
//! RECOMMENDATION LOOP:
//! REQUEST → VALIDATE → FILTER → SCORE → RANK → COMPLETE | ERROR

pub mod api;
pub mod assistant;
pub mod audit;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod synthesizer;

pub use error::{EngineError, Result};

// Re-export common types
pub use models::*;
pub use assistant::{ChatAssistant, ChatSession};
pub use catalog::CatalogStore;
pub use classifier::IntentClassifier;
pub use config::EngineConfig;
pub use orchestrator::RecommendationOrchestrator;
pub use synthesizer::ResponseSynthesizer;
