use chrono::{DateTime, Utc};

use crate::history::HistoryRecord;
use crate::predictions::{
    empirical_hourly_rate, progress_confidence, Prediction, PredictionKind, FALLBACK_CONFIDENCE,
    FALLBACK_HOURLY_RATE, MAX_CONFIDENCE,
};

const ON_TRACK_PROBABILITY: f64 = 0.7;
const MIN_PROBABILITY: f64 = 0.05;

/// Probability of reaching `target_level` in `topic` within `timeframe_days`
/// at the learner's usual study pace.
pub fn predict_mastery_probability(
    history: &HistoryRecord,
    topic: &str,
    target_level: f64,
    timeframe_days: u32,
) -> Prediction {
    predict_mastery_probability_at(history, topic, target_level, timeframe_days, Utc::now())
}

pub fn predict_mastery_probability_at(
    history: &HistoryRecord,
    topic: &str,
    target_level: f64,
    timeframe_days: u32,
    now: DateTime<Utc>,
) -> Prediction {
    let Some(progress) = history.progress(topic) else {
        return Prediction::new(
            PredictionKind::MasteryProbability,
            0.2,
            0.3,
            format!("No history for topic '{}'", topic),
        );
    };

    if progress.current_level >= target_level {
        return Prediction::new(PredictionKind::MasteryProbability, 1.0, 0.9, "Target level already achieved");
    }

    let patterns = &history.learning_patterns;
    let daily_hours = (patterns.sessions_per_week / 7.0) * (patterns.average_session_minutes / 60.0);
    let (hourly_rate, confidence) = match empirical_hourly_rate(progress) {
        Some(rate) => (rate, progress_confidence(progress, now)),
        None => (FALLBACK_HOURLY_RATE, FALLBACK_CONFIDENCE),
    };
    let potential_gain = daily_hours * hourly_rate * timeframe_days as f64;
    let projected_level = progress.current_level + potential_gain;
    let required_gain = target_level - progress.current_level;

    let on_pace = if projected_level >= target_level {
        let surplus = (projected_level - target_level) / required_gain;
        (ON_TRACK_PROBABILITY + surplus * 0.25).min(MAX_CONFIDENCE)
    } else {
        (potential_gain / required_gain * ON_TRACK_PROBABILITY).max(MIN_PROBABILITY)
    };

    // irregular learners finish less of what they start
    let probability = on_pace * patterns.completion_rate.clamp(0.0, 1.0);

    Prediction::new(
        PredictionKind::MasteryProbability,
        probability,
        confidence,
        format!(
            "Projected level {:.2} against target {:.2} in {} days",
            projected_level, target_level, timeframe_days
        ),
    )
}
