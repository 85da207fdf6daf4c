//! Progress reporting
//!
//! Progress is cosmetic: it advances toward 100 in increments drawn from a
//! `ProgressSource` and is clamped there. Completion of the pipeline, not the
//! progress value, decides when a request is done.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MAX_PROGRESS: u8 = 100;

/// Milestones shown while a request is processing: (exclusive threshold, label)
pub const PROGRESS_STAGES: &[(u8, &str)] = &[
    (10, "Analyzing mission objectives"),
    (30, "Evaluating risk parameters"),
    (50, "Matching with available strategies"),
    (70, "Checking resource requirements"),
    (90, "Ranking recommendations"),
];

/// Labels of every milestone the given progress has passed.
pub fn completed_stages(progress: u8) -> Vec<&'static str> {
    PROGRESS_STAGES
        .iter()
        .filter(|(threshold, _)| progress > *threshold)
        .map(|(_, label)| *label)
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub request_id: u64,
    pub progress: u8,
}

/// Source of progress increments. Each request draws a fresh sequence.
pub trait ProgressSource: Send + Sync {
    fn increments(&self) -> Box<dyn Iterator<Item = u8> + Send>;
}

/// Random increments in `1..=max_step`.
pub struct RandomSteps {
    max_step: u8,
}

impl RandomSteps {
    pub fn new(max_step: u8) -> Self {
        Self {
            max_step: max_step.max(1),
        }
    }
}

impl ProgressSource for RandomSteps {
    fn increments(&self) -> Box<dyn Iterator<Item = u8> + Send> {
        let max_step = self.max_step;
        let mut rng = StdRng::from_entropy();
        Box::new(std::iter::repeat_with(move || rng.gen_range(1..=max_step)))
    }
}

/// Deterministic increments, repeated cyclically.
pub struct FixedSteps {
    steps: Vec<u8>,
}

impl FixedSteps {
    pub fn new(steps: Vec<u8>) -> Self {
        Self { steps }
    }
}

impl ProgressSource for FixedSteps {
    fn increments(&self) -> Box<dyn Iterator<Item = u8> + Send> {
        Box::new(self.steps.clone().into_iter().cycle())
    }
}

/// Monotonic progress value clamped at 100.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressTracker {
    value: u8,
}

impl ProgressTracker {
    pub fn advance(&mut self, step: u8) -> u8 {
        self.value = self.value.saturating_add(step).min(MAX_PROGRESS);
        self.value
    }

    pub fn is_complete(&self) -> bool {
        self.value >= MAX_PROGRESS
    }
}
