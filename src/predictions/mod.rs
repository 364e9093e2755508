//! Forecasts derived from a learner's long-horizon history.
//!
//! Every predictor is deterministic and never fails: sparse history yields
//! a valid value with low confidence. Callers should treat confidence near
//! zero as "do not trust this number".

pub mod difficulty;
pub mod exam_score;
pub mod learning_time;
pub mod mastery;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{HistoryRecord, TopicProgress};
use crate::metrics::Metrics;

pub use difficulty::{predict_optimal_difficulty, predict_optimal_difficulty_at};
pub use exam_score::predict_exam_score;
pub use learning_time::{predict_learning_time, predict_learning_time_at};
pub use mastery::{predict_mastery_probability, predict_mastery_probability_at};

/// Highest confidence any predictor reports
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Progress per study hour assumed when history has no usable rate
pub const FALLBACK_HOURLY_RATE: f64 = 0.1;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

const RECENCY_WINDOW_DAYS: f64 = 30.0;
const EVIDENCE_SATURATION_HOURS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionKind {
    ExamScore,
    LearningTime,
    OptimalDifficulty,
    MasteryProbability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub kind: PredictionKind,
    pub value: f64,
    /// In [0, 1]
    pub confidence: f64,
    pub rationale: String,
}

impl Prediction {
    pub(crate) fn new<S: Into<String>>(kind: PredictionKind, value: f64, confidence: f64, rationale: S) -> Self {
        Prediction {
            kind,
            value,
            confidence: confidence.clamp(0.0, 1.0),
            rationale: rationale.into(),
        }
    }
}

/// 1 for a topic updated just now, falling linearly to 0 after 30 days.
pub(crate) fn recency_factor(progress: &TopicProgress, now: DateTime<Utc>) -> f64 {
    (1.0 - progress.days_since_update(now) / RECENCY_WINDOW_DAYS).clamp(0.0, 1.0)
}

/// Share of the study-time evidence needed for full trust, saturating at 10h.
pub(crate) fn evidence_factor(progress: &TopicProgress) -> f64 {
    (progress.study_hours() / EVIDENCE_SATURATION_HOURS).clamp(0.0, 1.0)
}

/// Observed proficiency gained per study hour, if the history supports one.
pub(crate) fn empirical_hourly_rate(progress: &TopicProgress) -> Option<f64> {
    let hours = progress.study_hours();
    let gain = progress.current_level - progress.start_level;
    if hours > 0.0 && gain > 0.0 {
        Some(gain / hours)
    } else {
        None
    }
}

/// Confidence shared by the time-based predictors.
pub(crate) fn progress_confidence(progress: &TopicProgress, now: DateTime<Utc>) -> f64 {
    (recency_factor(progress, now) * 0.5 + evidence_factor(progress) * 0.5).min(MAX_CONFIDENCE)
}

/// Inputs for a full forecast of one topic and one upcoming exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub topic: String,
    pub target_level: f64,
    pub timeframe_days: u32,
    pub exam_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub exam_score: Prediction,
    pub learning_time: Prediction,
    pub optimal_difficulty: Prediction,
    pub mastery_probability: Prediction,
}

/// Run all four predictors against the same history snapshot.
pub fn forecast(
    history: &HistoryRecord,
    request: &ForecastRequest,
    now: DateTime<Utc>,
    metrics: &Metrics,
) -> Forecast {
    let result = Forecast {
        exam_score: predict_exam_score(history, &request.exam_topics),
        learning_time: predict_learning_time_at(history, &request.topic, request.target_level, now),
        optimal_difficulty: predict_optimal_difficulty_at(history, &request.topic, now),
        mastery_probability: predict_mastery_probability_at(
            history,
            &request.topic,
            request.target_level,
            request.timeframe_days,
            now,
        ),
    };
    for _ in 0..4 {
        metrics.record_prediction();
    }
    result
}
