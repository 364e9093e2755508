use chrono::{DateTime, Utc};

use crate::diagnosis::ErrorTag;
use crate::history::HistoryRecord;
use crate::predictions::{recency_factor, Prediction, PredictionKind, MAX_CONFIDENCE};

const MIN_DIFFICULTY: f64 = 0.2;
const MAX_DIFFICULTY: f64 = 0.9;
const APPLIED_PRACTICE_LEVEL: f64 = 0.6;

/// Difficulty (on the 0-1 exercise scale) to practice `topic` at next.
pub fn predict_optimal_difficulty(history: &HistoryRecord, topic: &str) -> Prediction {
    predict_optimal_difficulty_at(history, topic, Utc::now())
}

pub fn predict_optimal_difficulty_at(
    history: &HistoryRecord,
    topic: &str,
    now: DateTime<Utc>,
) -> Prediction {
    let Some(progress) = history.progress(topic) else {
        return Prediction::new(
            PredictionKind::OptimalDifficulty,
            0.5,
            0.3,
            format!("No history for topic '{}'; starting at medium difficulty", topic),
        );
    };

    let tags = history.error_tags(topic);
    let has_tag = |tag: ErrorTag| tags.map_or(false, |t| t.contains(&tag));

    let mut value = progress.current_level + 0.1;
    let mut reasons = vec![format!("current level {:.2}", progress.current_level)];

    if has_tag(ErrorTag::Conceptual) {
        value -= 0.1;
        reasons.push("conceptual errors: easing off".to_string());
    }
    if has_tag(ErrorTag::Application) && progress.current_level > APPLIED_PRACTICE_LEVEL {
        value += 0.1;
        reasons.push("ready for applied practice".to_string());
    }

    let tag_bonus = if tags.map_or(false, |t| !t.is_empty()) { 0.15 } else { 0.0 };
    let confidence = (0.4 + recency_factor(progress, now) * 0.4 + tag_bonus).min(MAX_CONFIDENCE);

    Prediction::new(
        PredictionKind::OptimalDifficulty,
        value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
        confidence,
        reasons.join("; "),
    )
}
