//! Engine configuration
//!
//! The catalog, the domain vocabulary, canned responses, agent profiles and
//! timings are all data. Defaults reproduce the built-in tables; a TOML or
//! JSON file can replace any section.

use crate::assistant::{default_agents, AgentProfile};
use crate::audit::DEFAULT_RUN_LOG_CAPACITY;
use crate::catalog::{default_catalog, CatalogStore};
use crate::classifier::{default_vocabulary, DomainVocabulary};
use crate::error::EngineError;
use crate::models::{DomainTag, StrategyRecord};
use crate::pipeline::DEFAULT_MAX_RESULTS;
use crate::synthesizer::FallbackResponse;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ENGINE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Simulated analysis time before the pipeline result is delivered
    pub analysis_latency_ms: u64,
    /// Interval between progress ticks
    pub tick_interval_ms: u64,
    /// Ceiling after which processing fails with a timeout
    pub timeout_ms: u64,
    pub max_results: usize,
    /// Upper bound of one random progress increment
    pub max_progress_step: u8,
    /// Run records kept before the oldest is evicted
    pub run_log_capacity: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            analysis_latency_ms: 1500,
            tick_interval_ms: 300,
            timeout_ms: 10_000,
            max_results: DEFAULT_MAX_RESULTS,
            max_progress_step: 15,
            run_log_capacity: DEFAULT_RUN_LOG_CAPACITY,
        }
    }
}

impl OrchestratorSettings {
    pub fn analysis_latency(&self) -> Duration {
        Duration::from_millis(self.analysis_latency_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub response_latency_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            response_latency_ms: 1500,
        }
    }
}

impl ChatSettings {
    pub fn response_latency(&self) -> Duration {
        Duration::from_millis(self.response_latency_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub catalog: Vec<StrategyRecord>,
    /// Domain rows in priority order
    pub domains: Vec<DomainVocabulary>,
    pub fallback: FallbackResponse,
    pub agents: Vec<AgentProfile>,
    pub orchestrator: OrchestratorSettings,
    pub chat: ChatSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            domains: default_vocabulary(),
            fallback: FallbackResponse::default(),
            agents: default_agents(),
            orchestrator: OrchestratorSettings::default(),
            chat: ChatSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a file: TOML for `.toml`, JSON otherwise. Validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;

        let config: EngineConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&raw)?,
            _ => serde_json::from_str(&raw)?,
        };

        config.validate()?;

        info!(
            path = %path.display(),
            strategies = config.catalog.len(),
            domains = config.domains.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Load `.env`, then the file named by `ENGINE_CONFIG`, or the defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => {
                info!("No {} set, using built-in configuration", CONFIG_PATH_ENV);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn catalog_store(&self) -> Result<CatalogStore> {
        CatalogStore::new(self.catalog.clone())
    }

    pub fn agent_ids(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.catalog_store()?;

        let agent_ids: HashSet<&str> = self.agents.iter().map(|a| a.id.as_str()).collect();
        if agent_ids.len() != self.agents.len() {
            return Err(EngineError::Config("Duplicate agent id".to_string()));
        }

        let mut names = HashSet::with_capacity(self.domains.len());
        for domain in &self.domains {
            let name = domain.name.trim();
            if name.is_empty() {
                return Err(EngineError::Config("Domain with empty name".to_string()));
            }
            if name == DomainTag::GENERAL {
                return Err(EngineError::Config(format!(
                    "Domain name '{}' is reserved",
                    DomainTag::GENERAL
                )));
            }
            if !names.insert(name) {
                return Err(EngineError::Config(format!("Duplicate domain: {}", name)));
            }
            if domain.classify_terms.iter().all(|t| t.trim().is_empty()) {
                return Err(EngineError::Config(format!(
                    "Domain {} has no classification terms",
                    name
                )));
            }
            if !agent_ids.contains(domain.agent.as_str()) {
                return Err(EngineError::Config(format!(
                    "Domain {} references unknown agent {}",
                    name, domain.agent
                )));
            }
        }

        if !agent_ids.contains(self.fallback.agent.as_str()) {
            return Err(EngineError::Config(format!(
                "Fallback references unknown agent {}",
                self.fallback.agent
            )));
        }

        if self.orchestrator.max_results == 0 {
            return Err(EngineError::Config("max_results must be positive".to_string()));
        }
        if self.orchestrator.tick_interval_ms == 0 {
            return Err(EngineError::Config(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.orchestrator.timeout_ms == 0 {
            return Err(EngineError::Config("timeout_ms must be positive".to_string()));
        }
        if self.orchestrator.run_log_capacity == 0 {
            return Err(EngineError::Config(
                "run_log_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
