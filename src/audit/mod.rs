//! Recommendation run log
//!
//! Every submitted request ends in exactly one record, so telemetry can tell
//! an empty shortlist apart from a fault, a timeout or a superseded request.

use crate::models::MissionRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { shortlisted: usize },
    EmptyResult,
    PipelineFault { reason: String },
    Timeout,
    Superseded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub request_id: u64,
    pub request_fingerprint: String,
    pub outcome: RunOutcome,
    pub elapsed_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Records kept when no capacity is configured
pub const DEFAULT_RUN_LOG_CAPACITY: usize = 1000;

/// Bounded in-memory run history; the oldest record is evicted first.
/// Cloning shares the same log.
#[derive(Clone)]
pub struct RunLog {
    records: Arc<RwLock<VecDeque<RunRecord>>>,
    capacity: usize,
}

impl Default for RunLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RUN_LOG_CAPACITY)
    }
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn record(
        &self,
        request_id: u64,
        request_fingerprint: String,
        outcome: RunOutcome,
        elapsed_ms: u64,
    ) -> Uuid {
        let record = RunRecord {
            run_id: Uuid::new_v4(),
            request_id,
            request_fingerprint,
            outcome,
            elapsed_ms,
            created_at: Utc::now(),
        };
        let run_id = record.run_id;

        let mut records = self.records.write().await;
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);

        run_id
    }

    pub async fn records(&self) -> Vec<RunRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    pub async fn for_request(&self, request_id: u64) -> Option<RunRecord> {
        let records = self.records.read().await;
        records.iter().find(|r| r.request_id == request_id).cloned()
    }
}

/// SHA-256 of a request's JSON form, hex encoded.
pub fn fingerprint_request(request: &MissionRequest) -> String {
    let mut hasher = Sha256::new();

    // Stream JSON directly into hasher (no intermediate String)
    if serde_json::to_writer(&mut HashWriter(&mut hasher), request).is_err() {
        return String::new();
    }

    hex::encode(hasher.finalize())
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
