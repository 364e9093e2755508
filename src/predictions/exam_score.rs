use crate::history::HistoryRecord;
use crate::predictions::{Prediction, PredictionKind, MAX_CONFIDENCE};

const MASTERY_WEIGHT: f64 = 0.7;
const PAST_SCORE_WEIGHT: f64 = 0.3;
const UNSEEN_TOPIC_MASTERY: f64 = 0.5;

/// Expected exam score (0-100) over `exam_topics`.
///
/// Current topic mastery carries 70% of the estimate and the mean score of
/// past tests touching any exam topic carries 30%. Without such tests the
/// mastery signal stands alone and no agreement bonus is given.
pub fn predict_exam_score(history: &HistoryRecord, exam_topics: &[String]) -> Prediction {
    let known: Vec<f64> = exam_topics
        .iter()
        .filter_map(|t| history.progress(t).map(|p| p.current_level))
        .collect();

    let avg_mastery = if exam_topics.is_empty() {
        UNSEEN_TOPIC_MASTERY
    } else {
        let unseen = exam_topics.len() - known.len();
        (known.iter().sum::<f64>() + unseen as f64 * UNSEEN_TOPIC_MASTERY) / exam_topics.len() as f64
    };

    let past_scores: Vec<f64> = history
        .test_results
        .iter()
        .filter(|r| r.topics.iter().any(|t| exam_topics.contains(t)))
        .map(|r| r.score)
        .collect();

    let data_points = (known.len() + past_scores.len()) as f64;
    let mut confidence = 0.3 + (data_points / 20.0) * 0.5;

    let value = if past_scores.is_empty() {
        avg_mastery * 100.0
    } else {
        let avg_past = past_scores.iter().sum::<f64>() / past_scores.len() as f64;
        let agreement = 1.0 - (avg_mastery - avg_past / 100.0).abs();
        confidence += agreement.max(0.0) * 0.2;
        (avg_mastery * MASTERY_WEIGHT + (avg_past / 100.0) * PAST_SCORE_WEIGHT) * 100.0
    };

    let rationale = if data_points == 0.0 {
        "No history for these topics; assuming average mastery".to_string()
    } else {
        format!(
            "Based on mastery of {} of {} topics and {} past tests",
            known.len(),
            exam_topics.len(),
            past_scores.len()
        )
    };

    Prediction::new(
        PredictionKind::ExamScore,
        value.clamp(0.0, 100.0),
        confidence.min(MAX_CONFIDENCE),
        rationale,
    )
}
