use chrono::{DateTime, Utc};

use crate::history::HistoryRecord;
use crate::predictions::{
    empirical_hourly_rate, progress_confidence, Prediction, PredictionKind, FALLBACK_CONFIDENCE,
    FALLBACK_HOURLY_RATE,
};

/// Minutes of study needed to bring `topic` up to `target_level`.
pub fn predict_learning_time(history: &HistoryRecord, topic: &str, target_level: f64) -> Prediction {
    predict_learning_time_at(history, topic, target_level, Utc::now())
}

/// [`predict_learning_time`] evaluated at a fixed instant.
pub fn predict_learning_time_at(
    history: &HistoryRecord,
    topic: &str,
    target_level: f64,
    now: DateTime<Utc>,
) -> Prediction {
    let Some(progress) = history.progress(topic) else {
        return Prediction::new(
            PredictionKind::LearningTime,
            0.0,
            0.0,
            format!("Insufficient data for topic '{}'", topic),
        );
    };

    if progress.current_level >= target_level {
        return Prediction::new(PredictionKind::LearningTime, 0.0, 0.9, "Target level already achieved");
    }

    let (rate, confidence, basis) = match empirical_hourly_rate(progress) {
        Some(rate) => (rate, progress_confidence(progress, now), "observed learning rate"),
        None => (FALLBACK_HOURLY_RATE, FALLBACK_CONFIDENCE, "assumed learning rate of 10% per hour"),
    };

    // progress slows down near mastery
    let difficulty_factor = 1.0 + progress.current_level * 0.5;
    let hours = (target_level - progress.current_level) / rate * difficulty_factor;
    let minutes = hours * 60.0;

    Prediction::new(
        PredictionKind::LearningTime,
        minutes,
        confidence,
        format!(
            "About {:.0} minutes to go from {:.2} to {:.2} at the {}",
            minutes, progress.current_level, target_level, basis
        ),
    )
}
