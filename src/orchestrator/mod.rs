//! Recommendation orchestrator
//!
//! Owns the request lifecycle:
//!
//! IDLE → PROCESSING → COMPLETED | ERROR → (reset) → IDLE
//!
//! Every submission gets a monotonically increasing request id. Only the
//! outcome and progress ticks carrying the current id are applied; a newer
//! submission or a reset aborts the in-flight task and invalidates its id.

use crate::audit::{fingerprint_request, RunLog, RunOutcome};
use crate::catalog::CatalogStore;
use crate::config::{EngineConfig, OrchestratorSettings};
use crate::error::EngineError;
use crate::models::{MissionRequest, ProcessingStatus, ScoredStrategy};
use crate::pipeline::{CatalogRecommender, RecommendationPipeline, RecommendationSource};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub mod progress;

pub use progress::{
    completed_stages, FixedSteps, ProgressSource, ProgressTracker, ProgressUpdate, RandomSteps,
    MAX_PROGRESS,
};

/// Why a request ended in the error state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    EmptyResult,
    PipelineFault { reason: String },
    Timeout,
}

/// Point-in-time view of the orchestrator state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSnapshot {
    pub status: ProcessingStatus,
    pub request_id: Option<u64>,
    pub progress: u8,
    pub recommendations: Vec<ScoredStrategy>,
    pub selected: Option<String>,
    pub failure: Option<FailureCause>,
}

impl OrchestratorSnapshot {
    fn idle() -> Self {
        Self {
            status: ProcessingStatus::Idle,
            request_id: None,
            progress: 0,
            recommendations: Vec::new(),
            selected: None,
            failure: None,
        }
    }

    /// The selected strategy, if any
    pub fn current_strategy(&self) -> Option<&ScoredStrategy> {
        let selected = self.selected.as_deref()?;
        self.recommendations.iter().find(|s| s.id() == selected)
    }

    pub fn completed_stages(&self) -> Vec<&'static str> {
        completed_stages(self.progress)
    }

    fn transition(&mut self, next: ProcessingStatus) {
        if !self.status.can_transition_to(next) {
            warn!(from = ?self.status, to = ?next, "Unexpected status transition");
        }
        self.status = next;
    }

    fn is_current(&self, request_id: u64) -> bool {
        self.status == ProcessingStatus::Processing && self.request_id == Some(request_id)
    }
}

/// Reject a request before any state change.
pub fn validate_request(request: &MissionRequest) -> Result<()> {
    if request.objective.trim().is_empty() {
        return Err(EngineError::Validation("objective is required".to_string()));
    }
    if request.target_type.is_none() {
        return Err(EngineError::Validation("target type is required".to_string()));
    }
    if request.timeframe.is_none() {
        return Err(EngineError::Validation("timeframe is required".to_string()));
    }
    if request.risk_tolerance > 100 {
        return Err(EngineError::Validation(format!(
            "risk tolerance {} outside 0-100",
            request.risk_tolerance
        )));
    }
    if request.resources_available > 100 {
        return Err(EngineError::Validation(format!(
            "resources available {} outside 0-100",
            request.resources_available
        )));
    }
    Ok(())
}

/// Handle to one submitted request
#[derive(Debug)]
pub struct RecommendationHandle {
    request_id: u64,
    receiver: oneshot::Receiver<Result<Vec<ScoredStrategy>>>,
}

impl RecommendationHandle {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Wait for the outcome. A request invalidated before it finished
    /// resolves to `Superseded`.
    pub async fn outcome(self) -> Result<Vec<ScoredStrategy>> {
        let request_id = self.request_id;
        self.receiver
            .await
            .unwrap_or(Err(EngineError::Superseded { request_id }))
    }
}

struct Shared {
    source: Arc<dyn RecommendationSource>,
    progress_source: Arc<dyn ProgressSource>,
    tick_interval: Duration,
    timeout: Duration,
    state: RwLock<OrchestratorSnapshot>,
    generation: AtomicU64,
    /// Serializes submit/reset and holds the in-flight task
    in_flight: Mutex<Option<InFlight>>,
    progress_tx: watch::Sender<ProgressUpdate>,
    run_log: RunLog,
}

struct InFlight {
    request_id: u64,
    fingerprint: String,
    started: Instant,
    task: JoinHandle<()>,
}

/// Drives filter → score → rank with lifecycle and progress semantics.
/// Cloning shares the same state.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    shared: Arc<Shared>,
}

impl RecommendationOrchestrator {
    pub fn new(
        source: Arc<dyn RecommendationSource>,
        progress_source: Arc<dyn ProgressSource>,
        settings: &OrchestratorSettings,
    ) -> Self {
        let (progress_tx, _) = watch::channel(ProgressUpdate {
            request_id: 0,
            progress: 0,
        });

        Self {
            shared: Arc::new(Shared {
                source,
                progress_source,
                tick_interval: settings.tick_interval(),
                timeout: settings.timeout(),
                state: RwLock::new(OrchestratorSnapshot::idle()),
                generation: AtomicU64::new(0),
                in_flight: Mutex::new(None),
                progress_tx,
                run_log: RunLog::with_capacity(settings.run_log_capacity),
            }),
        }
    }

    /// Catalog-backed orchestrator with random progress increments.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let catalog: CatalogStore = config.catalog_store()?;
        let settings = &config.orchestrator;

        let source = CatalogRecommender::new(
            catalog,
            RecommendationPipeline::new(settings.max_results),
            settings.analysis_latency(),
        );

        Ok(Self::new(
            Arc::new(source),
            Arc::new(RandomSteps::new(settings.max_progress_step)),
            settings,
        ))
    }

    /// Validate and start processing. Any in-flight request is invalidated.
    pub async fn submit(&self, request: MissionRequest) -> Result<RecommendationHandle> {
        validate_request(&request)?;

        let mut in_flight = self.shared.in_flight.lock().await;
        self.cancel_in_flight(&mut in_flight).await;

        let request_id = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.shared.state.write().await;
            state.transition(ProcessingStatus::Processing);
            state.request_id = Some(request_id);
            state.progress = 0;
            state.recommendations.clear();
            state.selected = None;
            state.failure = None;
        }
        self.shared.progress_tx.send_replace(ProgressUpdate {
            request_id,
            progress: 0,
        });

        info!(
            request_id,
            risk_tolerance = request.risk_tolerance,
            target_type = ?request.target_type,
            timeframe = ?request.timeframe,
            "Recommendation request submitted"
        );

        let fingerprint = fingerprint_request(&request);
        let (reply, receiver) = oneshot::channel();
        let started = Instant::now();
        let shared = Arc::clone(&self.shared);
        let task_fingerprint = fingerprint.clone();

        let task = tokio::spawn(async move {
            shared
                .drive(request_id, request, task_fingerprint, started, reply)
                .await;
        });

        *in_flight = Some(InFlight {
            request_id,
            fingerprint,
            started,
            task,
        });

        Ok(RecommendationHandle {
            request_id,
            receiver,
        })
    }

    /// Submit and wait for the shortlist.
    pub async fn generate_recommendations(
        &self,
        request: MissionRequest,
    ) -> Result<Vec<ScoredStrategy>> {
        self.submit(request).await?.outcome().await
    }

    /// Back to parameters: return to idle, cancelling anything in flight.
    pub async fn reset(&self) {
        let mut in_flight = self.shared.in_flight.lock().await;
        self.cancel_in_flight(&mut in_flight).await;

        let mut state = self.shared.state.write().await;
        let previous = state.status;
        *state = OrchestratorSnapshot::idle();

        debug!(from = ?previous, "Orchestrator reset to idle");
    }

    /// Pick another strategy from the current shortlist.
    pub async fn select_strategy(&self, strategy_id: &str) -> Result<()> {
        let mut state = self.shared.state.write().await;

        if state.status != ProcessingStatus::Completed {
            return Err(EngineError::Validation(
                "no completed recommendation to select from".to_string(),
            ));
        }
        if !state.recommendations.iter().any(|s| s.id() == strategy_id) {
            return Err(EngineError::Validation(format!(
                "strategy {} is not in the shortlist",
                strategy_id
            )));
        }

        state.selected = Some(strategy_id.to_string());
        Ok(())
    }

    async fn cancel_in_flight(&self, slot: &mut Option<InFlight>) {
        let Some(previous) = slot.take() else {
            return;
        };

        // Decided under the state lock: either `finish` already applied the
        // outcome and recorded it, or the id is invalidated here and this
        // side owns the record.
        let superseded = {
            let mut state = self.shared.state.write().await;
            let current = state.is_current(previous.request_id);
            if current {
                state.request_id = None;
            }
            current
        };
        if !superseded {
            return;
        }

        previous.task.abort();
        warn!(request_id = previous.request_id, "In-flight request cancelled");
        self.shared
            .run_log
            .record(
                previous.request_id,
                previous.fingerprint,
                RunOutcome::Superseded,
                previous.started.elapsed().as_millis() as u64,
            )
            .await;
    }

    pub async fn snapshot(&self) -> OrchestratorSnapshot {
        self.shared.state.read().await.clone()
    }

    pub async fn status(&self) -> ProcessingStatus {
        self.shared.state.read().await.status
    }

    /// Progress side channel. Values are monotonic per request id.
    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressUpdate> {
        self.shared.progress_tx.subscribe()
    }

    pub fn run_log(&self) -> &RunLog {
        &self.shared.run_log
    }
}

impl Shared {
    async fn drive(
        &self,
        request_id: u64,
        request: MissionRequest,
        fingerprint: String,
        started: Instant,
        reply: oneshot::Sender<Result<Vec<ScoredStrategy>>>,
    ) {
        let work = tokio::time::timeout(self.timeout, self.source.recommend(&request));
        let ticker = self.tick_progress(request_id);

        // Ticking stops as soon as the work future settles.
        let outcome = tokio::select! {
            biased;
            result = work => result,
            never = ticker => match never {},
        };

        let result = match outcome {
            Ok(Ok(shortlist)) if shortlist.is_empty() => Err(EngineError::EmptyResult),
            Ok(Ok(shortlist)) => Ok(shortlist),
            Ok(Err(EngineError::EmptyResult)) => Err(EngineError::EmptyResult),
            Ok(Err(EngineError::PipelineFault(reason))) => Err(EngineError::PipelineFault(reason)),
            Ok(Err(other)) => Err(EngineError::PipelineFault(other.to_string())),
            Err(_) => Err(EngineError::Timeout(self.timeout)),
        };

        self.finish(request_id, result, fingerprint, started, reply)
            .await;
    }

    async fn tick_progress(&self, request_id: u64) -> Infallible {
        let mut tracker = ProgressTracker::default();
        let mut interval = tokio::time::interval(self.tick_interval);
        // First tick completes immediately.
        interval.tick().await;

        for step in self.progress_source.increments() {
            interval.tick().await;
            let progress = tracker.advance(step);

            if !self.publish_progress(request_id, progress).await || tracker.is_complete() {
                break;
            }
        }

        std::future::pending().await
    }

    async fn publish_progress(&self, request_id: u64, progress: u8) -> bool {
        let mut state = self.state.write().await;
        if !state.is_current(request_id) {
            return false;
        }

        state.progress = state.progress.max(progress);
        self.progress_tx.send_replace(ProgressUpdate {
            request_id,
            progress: state.progress,
        });
        true
    }

    async fn finish(
        &self,
        request_id: u64,
        result: Result<Vec<ScoredStrategy>>,
        fingerprint: String,
        started: Instant,
        reply: oneshot::Sender<Result<Vec<ScoredStrategy>>>,
    ) {
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let applied = {
            let mut state = self.state.write().await;

            if state.is_current(request_id) {
                state.progress = MAX_PROGRESS;

                match &result {
                    Ok(shortlist) => {
                        state.transition(ProcessingStatus::Completed);
                        state.recommendations = shortlist.clone();
                        state.selected = shortlist.first().map(|s| s.id().to_string());
                    }
                    Err(e) => {
                        state.transition(ProcessingStatus::Error);
                        state.failure = Some(match e {
                            EngineError::Timeout(_) => FailureCause::Timeout,
                            EngineError::PipelineFault(reason) => FailureCause::PipelineFault {
                                reason: reason.clone(),
                            },
                            _ => FailureCause::EmptyResult,
                        });
                    }
                }

                self.progress_tx.send_replace(ProgressUpdate {
                    request_id,
                    progress: MAX_PROGRESS,
                });
                true
            } else {
                false
            }
        };

        if !applied {
            // The invalidating side already recorded `Superseded`.
            debug!(request_id, "Discarding stale recommendation result");
            let _ = reply.send(Err(EngineError::Superseded { request_id }));
            return;
        }

        let outcome = match &result {
            Ok(shortlist) => {
                info!(
                    request_id,
                    shortlisted = shortlist.len(),
                    top = shortlist.first().map(|s| s.id()).unwrap_or_default(),
                    elapsed_ms,
                    "Recommendations completed"
                );
                RunOutcome::Completed {
                    shortlisted: shortlist.len(),
                }
            }
            Err(EngineError::Timeout(limit)) => {
                warn!(request_id, ?limit, "Recommendation timed out");
                RunOutcome::Timeout
            }
            Err(EngineError::PipelineFault(reason)) => {
                warn!(request_id, reason = %reason, "Recommendation pipeline fault");
                RunOutcome::PipelineFault {
                    reason: reason.clone(),
                }
            }
            Err(_) => {
                warn!(request_id, "No strategies matched the request");
                RunOutcome::EmptyResult
            }
        };

        self.run_log
            .record(request_id, fingerprint, outcome, elapsed_ms)
            .await;

        // Receiver may have been dropped by a caller that stopped waiting.
        let _ = reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, TargetType, Timeframe};
    use async_trait::async_trait;

    fn request(objective: &str, risk_tolerance: u8) -> MissionRequest {
        MissionRequest {
            objective: objective.to_string(),
            target_type: Some(TargetType::Cyber),
            risk_tolerance,
            resources_available: 50,
            timeframe: Some(Timeframe::Short),
        }
    }

    fn settings(latency_ms: u64, timeout_ms: u64) -> OrchestratorSettings {
        OrchestratorSettings {
            analysis_latency_ms: latency_ms,
            tick_interval_ms: 300,
            timeout_ms,
            ..OrchestratorSettings::default()
        }
    }

    fn catalog_orchestrator(latency_ms: u64, steps: Vec<u8>) -> RecommendationOrchestrator {
        let settings = settings(latency_ms, 10_000);
        let source = CatalogRecommender::new(
            CatalogStore::default(),
            RecommendationPipeline::default(),
            settings.analysis_latency(),
        );
        RecommendationOrchestrator::new(
            Arc::new(source),
            Arc::new(FixedSteps::new(steps)),
            &settings,
        )
    }

    /// Sleeps for the number of milliseconds given as the objective's first token.
    struct DelayedSource;

    #[async_trait]
    impl RecommendationSource for DelayedSource {
        async fn recommend(&self, request: &MissionRequest) -> Result<Vec<ScoredStrategy>> {
            let delay: u64 = request
                .objective
                .split_whitespace()
                .next()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(RecommendationPipeline::default().run(&CatalogStore::default(), request))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RecommendationSource for FailingSource {
        async fn recommend(&self, _request: &MissionRequest) -> Result<Vec<ScoredStrategy>> {
            Err(EngineError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "catalog unavailable",
            )))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_with_first_selected() {
        let orchestrator = catalog_orchestrator(1500, vec![10]);

        let shortlist = orchestrator
            .generate_recommendations(request("stealth intelligence gathering", 20))
            .await
            .unwrap();

        assert_eq!(shortlist[0].id(), "strat-001");

        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Completed);
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.selected.as_deref(), Some("strat-001"));
        assert_eq!(snapshot.current_strategy().unwrap().strategy.risk_level, RiskLevel::Low);
        assert_eq!(*orchestrator.subscribe_progress().borrow(), ProgressUpdate {
            request_id: 1,
            progress: 100,
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_enters_error_and_resets() {
        let orchestrator = catalog_orchestrator(1500, vec![10]);

        let err = orchestrator
            .generate_recommendations(request("xyzzy", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyResult));

        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Error);
        assert_eq!(snapshot.failure, Some(FailureCause::EmptyResult));

        orchestrator.reset().await;
        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Idle);
        assert!(snapshot.failure.is_none());
        assert_eq!(snapshot.progress, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_rejects_without_state_change() {
        let orchestrator = catalog_orchestrator(0, vec![10]);

        let mut missing_target = request("protect payments", 50);
        missing_target.target_type = None;
        let mut missing_timeframe = request("protect payments", 50);
        missing_timeframe.timeframe = None;
        let mut out_of_range = request("protect payments", 50);
        out_of_range.risk_tolerance = 101;

        for bad in [request("   ", 50), missing_target, missing_timeframe, out_of_range] {
            let err = orchestrator.submit(bad).await.err().unwrap();
            assert!(matches!(err, EngineError::Validation(_)));
        }

        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Idle);
        assert!(snapshot.request_id.is_none());
        assert!(orchestrator.run_log().records().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_trajectory_is_deterministic() {
        let orchestrator = catalog_orchestrator(1000, vec![10]);

        let handle = orchestrator.submit(request("fraud detection", 50)).await.unwrap();
        assert_eq!(orchestrator.snapshot().await.status, ProcessingStatus::Processing);

        // Ticks land at 300, 600 and 900 ms.
        tokio::time::sleep(Duration::from_millis(950)).await;
        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Processing);
        assert_eq!(snapshot.progress, 30);
        assert_eq!(snapshot.completed_stages(), vec!["Analyzing mission objectives"]);

        handle.outcome().await.unwrap();
        assert_eq!(orchestrator.snapshot().await.progress, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_clamps_before_completion() {
        let orchestrator = catalog_orchestrator(3000, vec![40]);

        let handle = orchestrator.submit(request("fraud detection", 50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.status, ProcessingStatus::Processing);

        handle.outcome().await.unwrap();
        assert_eq!(orchestrator.status().await, ProcessingStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_supersedes_in_flight_request() {
        let orchestrator = RecommendationOrchestrator::new(
            Arc::new(DelayedSource),
            Arc::new(FixedSteps::new(vec![5])),
            &settings(0, 10_000),
        );

        let slow = orchestrator
            .submit(request("2000 stealth intelligence", 20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let fast = orchestrator
            .submit(request("500 fraud detection", 50))
            .await
            .unwrap();

        assert!(fast.request_id() > slow.request_id());

        let shortlist = fast.outcome().await.unwrap();
        assert_eq!(shortlist[0].id(), "strat-004");

        let err = slow.outcome().await.unwrap_err();
        assert!(matches!(err, EngineError::Superseded { .. }));

        // Well past the slow request's deadline: still the later outcome.
        tokio::time::sleep(Duration::from_millis(5000)).await;
        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.request_id, Some(2));
        assert_eq!(snapshot.selected.as_deref(), Some("strat-004"));

        let record = orchestrator.run_log().for_request(1).await.unwrap();
        assert_eq!(record.outcome, RunOutcome::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_enters_error() {
        let orchestrator = RecommendationOrchestrator::new(
            Arc::new(DelayedSource),
            Arc::new(FixedSteps::new(vec![5])),
            &settings(0, 1000),
        );

        let err = orchestrator
            .generate_recommendations(request("60000 stealth", 20))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Timeout(_)));

        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Error);
        assert_eq!(snapshot.failure, Some(FailureCause::Timeout));
        assert_eq!(snapshot.progress, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fault_is_distinguished_from_empty_result() {
        let orchestrator = RecommendationOrchestrator::new(
            Arc::new(FailingSource),
            Arc::new(FixedSteps::new(vec![5])),
            &settings(0, 1000),
        );

        let err = orchestrator
            .generate_recommendations(request("anything", 50))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::PipelineFault(_)));

        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Error);
        assert!(matches!(snapshot.failure, Some(FailureCause::PipelineFault { .. })));

        let record = orchestrator.run_log().for_request(1).await.unwrap();
        assert!(matches!(record.outcome, RunOutcome::PipelineFault { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_strategy() {
        let orchestrator = catalog_orchestrator(0, vec![50]);

        assert!(orchestrator.select_strategy("strat-001").await.is_err());

        let shortlist = orchestrator
            .generate_recommendations(request("monitoring", 100))
            .await
            .unwrap();
        assert!(shortlist.len() >= 2);

        let second = shortlist[1].id().to_string();
        orchestrator.select_strategy(&second).await.unwrap();
        assert_eq!(orchestrator.snapshot().await.selected, Some(second));

        let err = orchestrator.select_strategy("strat-999").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_in_flight_request() {
        let orchestrator = catalog_orchestrator(5000, vec![10]);

        let handle = orchestrator.submit(request("fraud detection", 50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        orchestrator.reset().await;

        let err = handle.outcome().await.unwrap_err();
        assert!(matches!(err, EngineError::Superseded { request_id: 1 }));

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        let snapshot = orchestrator.snapshot().await;
        assert_eq!(snapshot.status, ProcessingStatus::Idle);
        assert_eq!(snapshot.progress, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_resubmit_after_completion_records_each_request_once() {
        let orchestrator = catalog_orchestrator(0, vec![10]);

        for _ in 0..300 {
            let finished = orchestrator
                .submit(request("fraud detection", 50))
                .await
                .unwrap();
            let finished_id = finished.request_id();
            finished.outcome().await.unwrap();

            // Resubmitting right after completion must not supersede it again.
            orchestrator
                .submit(request("stealth intelligence", 20))
                .await
                .unwrap();

            let outcomes: Vec<RunOutcome> = orchestrator
                .run_log()
                .records()
                .await
                .into_iter()
                .filter(|r| r.request_id == finished_id)
                .map(|r| r.outcome)
                .collect();
            assert_eq!(
                outcomes,
                vec![RunOutcome::Completed { shortlisted: 1 }],
                "request {}",
                finished_id
            );
        }
    }
}
