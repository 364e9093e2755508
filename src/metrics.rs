use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for engine activity. Clones share the same counters.
#[derive(Clone, Default, Debug)]
pub struct Metrics {
    /// Exercises handed out by the selector
    pub selections: Arc<AtomicU64>,
    /// Answers graded
    pub attempts: Arc<AtomicU64>,
    pub correct_attempts: Arc<AtomicU64>,
    /// Wrong answers tagged with a cause
    pub error_tags: Arc<AtomicU64>,
    pub predictions: Arc<AtomicU64>,
}

/// Point-in-time copy of [`Metrics`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub selections: u64,
    pub attempts: u64,
    pub correct_attempts: u64,
    pub error_tags: u64,
    pub predictions: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_selection(&self) {
        self.selections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_attempt(&self, is_correct: bool) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if is_correct {
            self.correct_attempts.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_error_tag(&self) {
        self.error_tags.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prediction(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            selections: self.selections.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            correct_attempts: self.correct_attempts.load(Ordering::Relaxed),
            error_tags: self.error_tags.load(Ordering::Relaxed),
            predictions: self.predictions.load(Ordering::Relaxed),
        }
    }
}
