use mission_strategy_engine::{
    api::{start_server, ApiState},
    assistant::ChatAssistant,
    config::EngineConfig,
    orchestrator::RecommendationOrchestrator,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Loads .env as well
    let config = EngineConfig::from_env()?;

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Mission Strategy Engine - API Server");
    info!("Port: {}", api_port);

    let state = ApiState {
        orchestrator: RecommendationOrchestrator::from_config(&config)?,
        assistant: Arc::new(ChatAssistant::from_config(&config)),
    };

    info!(
        strategies = config.catalog.len(),
        domains = config.domains.len(),
        agents = config.agents.len(),
        "Engine initialized"
    );

    start_server(state, api_port).await?;

    Ok(())
}
