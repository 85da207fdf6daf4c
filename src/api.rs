//! REST API Server for the mission strategy engine
//!
//! Exposes recommendation and chat over HTTP for the presentation layer.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::assistant::{ChatAssistant, USER_ROLE};
use crate::error::EngineError;
use crate::models::{MissionRequest, ScoredStrategy, TargetType, Timeframe};
use crate::orchestrator::RecommendationOrchestrator;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecommendationRequest {
    pub objective: String,
    pub target_type: Option<String>,
    pub risk_tolerance: u8,
    pub resources_available: u8,
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub strategy_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub agent_ids: Option<Vec<String>>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: RecommendationOrchestrator,
    pub assistant: Arc<ChatAssistant>,
}

/// =============================
/// Helpers: String to Enum Parsing
/// =============================

fn parse_target_type(t: &str) -> Option<TargetType> {
    match t.trim().to_lowercase().as_str() {
        "cyber" | "cyber infrastructure" => Some(TargetType::Cyber),
        "financial" | "financial system" => Some(TargetType::Financial),
        "organization" | "organisation" | "group" => Some(TargetType::Organization),
        "individual" | "individual targets" => Some(TargetType::Individual),
        "network" | "communication" => Some(TargetType::Network),
        _ => None,
    }
}

fn parse_timeframe(t: &str) -> Option<Timeframe> {
    match t.trim().to_lowercase().as_str() {
        "urgent" => Some(Timeframe::Urgent),
        "short" | "short-term" | "short_term" => Some(Timeframe::Short),
        "medium" | "medium-term" | "medium_term" => Some(Timeframe::Medium),
        "long" | "long-term" | "long_term" => Some(Timeframe::Long),
        _ => None,
    }
}

/// Absent or blank means not provided; anything else must parse.
fn parse_optional<T>(
    raw: Option<&str>,
    what: &str,
    parse: fn(&str) -> Option<T>,
) -> crate::Result<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| EngineError::Validation(format!("unknown {}: {}", what, value))),
    }
}

fn error_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Superseded { .. } => StatusCode::CONFLICT,
        EngineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        EngineError::EmptyResult | EngineError::PipelineFault(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn strategy_view(s: &ScoredStrategy) -> serde_json::Value {
    let mut value = serde_json::to_value(s).unwrap_or_default();
    value["match_confidence"] = serde_json::json!(s.match_confidence());
    value["team_size"] = serde_json::json!(s.strategy.team_size());
    value
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Recommendation Endpoints
/// =============================

async fn generate_recommendations(
    State(state): State<ApiState>,
    Json(req): Json<RecommendationRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received recommendation request: {}", req.objective);

    let parsed = parse_optional(req.target_type.as_deref(), "target type", parse_target_type)
        .and_then(|target_type| {
            parse_optional(req.timeframe.as_deref(), "timeframe", parse_timeframe)
                .map(|timeframe| (target_type, timeframe))
        });
    let (target_type, timeframe) = match parsed {
        Ok(values) => values,
        Err(e) => return (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    };

    let request = MissionRequest {
        objective: req.objective,
        target_type,
        risk_tolerance: req.risk_tolerance,
        resources_available: req.resources_available,
        timeframe,
    };
    let band = request.risk_band();

    let handle = match state.orchestrator.submit(request).await {
        Ok(handle) => handle,
        Err(e) => return (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    };
    let request_id = handle.request_id();

    match handle.outcome().await {
        Ok(shortlist) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "request_id": request_id,
                "risk_band": band,
                "selected": shortlist.first().map(|s| s.id().to_string()),
                "recommendations": shortlist.iter().map(strategy_view).collect::<Vec<_>>(),
            }))),
        ),
        Err(e) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

async fn recommendation_status(State(state): State<ApiState>) -> Json<ApiResponse> {
    let snapshot = state.orchestrator.snapshot().await;
    let stages = snapshot.completed_stages();

    Json(ApiResponse::success(serde_json::json!({
        "status": snapshot.status,
        "request_id": snapshot.request_id,
        "progress": snapshot.progress,
        "stages": stages,
        "selected": snapshot.selected,
        "failure": snapshot.failure,
        "recommendations": snapshot.recommendations.iter().map(strategy_view).collect::<Vec<_>>(),
    })))
}

async fn select_strategy(
    State(state): State<ApiState>,
    Json(req): Json<SelectRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.orchestrator.select_strategy(&req.strategy_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "selected": req.strategy_id
            }))),
        ),
        Err(e) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

async fn reset(State(state): State<ApiState>) -> Json<ApiResponse> {
    state.orchestrator.reset().await;
    Json(ApiResponse::success(serde_json::json!({
        "status": state.orchestrator.status().await
    })))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(user_msg) = req.messages.iter().rev().find(|m| m.role == USER_ROLE) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No user message found".into())),
        );
    };

    let text = user_msg.content.trim();
    if text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Message is empty".into())),
        );
    }

    let agent_ids = req
        .agent_ids
        .unwrap_or_else(|| state.assistant.agent_ids());

    let reply = state.assistant.respond(text, &agent_ids).await;

    (StatusCode::OK, Json(ApiResponse::success(reply)))
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/recommendations", post(generate_recommendations))
        .route("/api/recommendations/status", get(recommendation_status))
        .route("/api/recommendations/select", post(select_strategy))
        .route("/api/recommendations/reset", post(reset))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::ProcessingStatus;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> ApiState {
        let mut config = EngineConfig::default();
        config.orchestrator.analysis_latency_ms = 0;
        config.chat.response_latency_ms = 0;

        ApiState {
            orchestrator: RecommendationOrchestrator::from_config(&config).unwrap(),
            assistant: Arc::new(ChatAssistant::from_config(&config)),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_target_type("Financial System"), Some(TargetType::Financial));
        assert_eq!(parse_target_type(""), None);
        assert_eq!(parse_timeframe("long-term"), Some(Timeframe::Long));
        assert_eq!(parse_timeframe("someday"), None);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recommendations_endpoint() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(post_json(
                "/api/recommendations",
                serde_json::json!({
                    "objective": "stealth intelligence gathering",
                    "target_type": "network",
                    "risk_tolerance": 20,
                    "resources_available": 50,
                    "timeframe": "short"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["selected"], "strat-001");
        assert_eq!(body["data"]["risk_band"], "low");
        assert_eq!(body["data"]["recommendations"][0]["match_confidence"], 100);
    }

    #[tokio::test]
    async fn test_missing_timeframe_is_bad_request() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(post_json(
                "/api/recommendations",
                serde_json::json!({
                    "objective": "protect payments",
                    "target_type": "financial",
                    "risk_tolerance": 50,
                    "resources_available": 50,
                    "timeframe": null
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_optional_distinguishes_missing_from_unknown() {
        assert_eq!(
            parse_optional(None, "target type", parse_target_type).unwrap(),
            None
        );
        assert_eq!(
            parse_optional(Some("  "), "target type", parse_target_type).unwrap(),
            None
        );
        assert_eq!(
            parse_optional(Some("cyber"), "target type", parse_target_type).unwrap(),
            Some(TargetType::Cyber)
        );
        let err = parse_optional(Some("satellite"), "target type", parse_target_type).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: unknown target type: satellite");
    }

    #[tokio::test]
    async fn test_unknown_target_type_is_reported() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(post_json(
                "/api/recommendations",
                serde_json::json!({
                    "objective": "watch the uplink",
                    "target_type": "satellite",
                    "risk_tolerance": 50,
                    "resources_available": 50,
                    "timeframe": "someday"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Validation error: unknown target type: satellite"
        );
        assert_eq!(state.orchestrator.status().await, ProcessingStatus::Idle);
    }

    #[tokio::test]
    async fn test_empty_result_then_status_reports_error() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(post_json(
                "/api/recommendations",
                serde_json::json!({
                    "objective": "xyzzy",
                    "target_type": "cyber",
                    "risk_tolerance": 90,
                    "resources_available": 10,
                    "timeframe": "urgent"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/recommendations/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "error");
        assert_eq!(body["data"]["failure"]["kind"], "empty_result");
        assert_eq!(body["data"]["progress"], 100);
    }

    #[tokio::test]
    async fn test_chat_endpoint() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({
                    "messages": [
                        {"role": "doctor", "content": "earlier reply"},
                        {"role": "user", "content": "is my security ok?"}
                    ]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["classification"]["top_match"], "cybersecurity");
        assert_eq!(body["data"]["messages"][0]["role"], "analyst");
        assert_eq!(body["data"]["messages"][0]["status"], "verified");
    }

    #[tokio::test]
    async fn test_chat_without_user_message() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({ "messages": [{"role": "doctor", "content": "hi"}] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
