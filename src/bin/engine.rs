use mission_strategy_engine::{
    assistant::{ChatAssistant, ChatSession},
    config::EngineConfig,
    models::{MissionRequest, RiskBand, TargetType, Timeframe},
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

    let config = EngineConfig::from_env()?;
    info!("Mission Strategy Engine starting");

    let orchestrator = RecommendationOrchestrator::from_config(&config)?;
    let mut progress = orchestrator.subscribe_progress();

    let request = MissionRequest {
        objective: "stealth intelligence gathering on a communication network".to_string(),
        target_type: Some(TargetType::Network),
        risk_tolerance: 30,
        resources_available: 60,
        timeframe: Some(Timeframe::Short),
    };

    info!(
        objective = %request.objective,
        band = %RiskBand::from_tolerance(request.risk_tolerance),
        "Running recommendation"
    );

    let handle = orchestrator.submit(request).await?;
    let request_id = handle.request_id();

    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let update = *progress.borrow_and_update();
            if update.request_id == request_id {
                println!("  progress: {}%", update.progress);
            }
        }
    });

    let outcome = handle.outcome().await;
    watcher.abort();

    match outcome {
        Ok(shortlist) => {
            println!("\n=== RECOMMENDATIONS ===");
            for (i, scored) in shortlist.iter().enumerate() {
                println!(
                    "  {}. {} [{}] score={} confidence={}% success={}% team={}",
                    i + 1,
                    scored.strategy.name,
                    scored.strategy.risk_level,
                    scored.match_score,
                    scored.match_confidence(),
                    scored.strategy.success_rate,
                    scored.strategy.team_size(),
                );
            }
            if let Some(selected) = orchestrator.snapshot().await.current_strategy() {
                println!("\nSelected: {} ({})", selected.strategy.name, selected.strategy.timeline);
                for tactic in &selected.strategy.tactics {
                    println!("  - {}", tactic);
                }
            }
        }
        Err(e) => {
            eprintln!("Recommendation failed: {}", e);
        }
    }

    let mut session = ChatSession::new(Arc::new(ChatAssistant::from_config(&config)));
    let message = "My server got hacked and now I have ปวดหัว";

    println!("\n=== CHAT ===");
    println!("  user: {}", message);
    for reply in session.send(message).await? {
        println!("  {}: {}", reply.role, reply.content);
    }

    Ok(())
}
