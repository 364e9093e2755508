use std::collections::{BTreeMap, HashMap};
use serde::{Serialize, Deserialize};

use crate::config::OutcomeConfig;
use crate::exercises::Exercise;
use crate::skills::model::Attempt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TopicStats {
    /// Attempted exercises in this topic
    pub total: usize,
    pub correct: usize,
    pub percentage: f64,
    pub average_seconds: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutcomeReport {
    /// Overall percentage correct across attempted exercises
    pub overall: f64,
    pub total_attempted: usize,
    pub total_correct: usize,
    pub per_topic: BTreeMap<String, TopicStats>,
    pub strong_topics: Vec<String>,
    pub weak_topics: Vec<String>,
    pub needs_improvement: bool,
}

fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}

/// Summarize a finished session.
///
/// Every topic in `exercises` gets an entry; only exercises with a recorded
/// attempt count toward its totals. A topic without any attempt reports 0%
/// and is therefore weak.
pub fn analyze_outcome(
    exercises: &[Exercise],
    attempts: &HashMap<String, Attempt>,
    config: &OutcomeConfig,
) -> OutcomeReport {
    let mut per_topic: BTreeMap<String, TopicStats> = BTreeMap::new();
    let mut time_sums: HashMap<String, f64> = HashMap::new();

    for exercise in exercises {
        let stats = per_topic.entry(exercise.topic.clone()).or_default();
        if let Some(attempt) = attempts.get(&exercise.id) {
            stats.total += 1;
            if attempt.is_correct {
                stats.correct += 1;
            }
            *time_sums.entry(exercise.topic.clone()).or_insert(0.0) += attempt.elapsed_seconds;
        }
    }

    let mut strong_topics = Vec::new();
    let mut weak_topics = Vec::new();
    let mut total_attempted = 0;
    let mut total_correct = 0;

    for (topic, stats) in per_topic.iter_mut() {
        stats.percentage = percentage(stats.correct, stats.total);
        if stats.total > 0 {
            let time = time_sums.get(topic).copied().unwrap_or(0.0);
            stats.average_seconds = time / stats.total as f64;
        }

        if stats.percentage >= config.strong_threshold {
            strong_topics.push(topic.clone());
        } else if stats.percentage < config.weak_threshold {
            weak_topics.push(topic.clone());
        }
        total_attempted += stats.total;
        total_correct += stats.correct;
    }

    let overall = percentage(total_correct, total_attempted);

    OutcomeReport {
        overall,
        total_attempted,
        total_correct,
        per_topic,
        strong_topics,
        weak_topics,
        needs_improvement: overall < config.strong_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{AnswerOption, Difficulty};

    fn exercise(id: &str, topic: &str) -> Exercise {
        Exercise {
            id: id.into(),
            prompt: id.into(),
            difficulty: Difficulty::Medium,
            topic: topic.into(),
            answers: vec![AnswerOption { id: "a".into(), text: "a".into(), is_correct: true }],
            explanation: String::new(),
        }
    }

    fn attempt(id: &str, is_correct: bool, secs: f64) -> (String, Attempt) {
        (
            id.to_string(),
            Attempt {
                exercise_id: id.into(),
                answer_id: "a".into(),
                is_correct,
                elapsed_seconds: secs,
            },
        )
    }

    #[test]
    fn test_empty_attempts() {
        let bank = vec![exercise("a", "x"), exercise("b", "y")];
        let report = analyze_outcome(&bank, &HashMap::new(), &OutcomeConfig::default());

        assert_eq!(report.overall, 0.0);
        assert!(report.needs_improvement);
        assert_eq!(report.per_topic.len(), 2);
        assert!(report.per_topic.values().all(|s| s.percentage == 0.0 && s.total == 0));
        assert!(report.strong_topics.is_empty());
        assert_eq!(report.weak_topics, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_unanswered_topic_is_weak() {
        let bank = vec![exercise("a1", "algebra"), exercise("g1", "geometry")];
        let attempts: HashMap<String, Attempt> = vec![attempt("g1", true, 8.0)].into_iter().collect();
        let report = analyze_outcome(&bank, &attempts, &OutcomeConfig::default());

        assert_eq!(report.per_topic["algebra"].percentage, 0.0);
        assert_eq!(report.per_topic["algebra"].average_seconds, 0.0);
        assert_eq!(report.weak_topics, vec!["algebra".to_string()]);
        assert_eq!(report.strong_topics, vec!["geometry".to_string()]);
    }

    #[test]
    fn test_strong_weak_and_middle_topics() {
        let bank = vec![
            exercise("s1", "strong"),
            exercise("s2", "strong"),
            exercise("w1", "weak"),
            exercise("w2", "weak"),
            exercise("m1", "middle"),
            exercise("m2", "middle"),
            exercise("m3", "middle"),
            exercise("m4", "middle"),
            exercise("m5", "middle"),
        ];
        let attempts: HashMap<String, Attempt> = vec![
            attempt("s1", true, 10.0),
            attempt("s2", true, 20.0),
            attempt("w1", false, 5.0),
            attempt("w2", false, 5.0),
            attempt("m1", true, 1.0),
            attempt("m2", true, 1.0),
            attempt("m3", true, 1.0),
            attempt("m4", false, 1.0),
            attempt("m5", false, 1.0),
        ]
        .into_iter()
        .collect();

        let report = analyze_outcome(&bank, &attempts, &OutcomeConfig::default());

        assert_eq!(report.strong_topics, vec!["strong".to_string()]);
        assert_eq!(report.weak_topics, vec!["weak".to_string()]);
        assert!((report.per_topic["middle"].percentage - 60.0).abs() < 1e-9);
        assert_eq!(report.per_topic["strong"].average_seconds, 15.0);
        assert_eq!(report.total_attempted, 9);
        assert_eq!(report.total_correct, 5);
        assert!(report.needs_improvement);
    }

    #[test]
    fn test_unattempted_exercises_are_ignored() {
        let bank = vec![exercise("a", "x"), exercise("b", "x")];
        let attempts: HashMap<String, Attempt> = vec![attempt("a", true, 4.0)].into_iter().collect();
        let report = analyze_outcome(&bank, &attempts, &OutcomeConfig::default());

        assert_eq!(report.per_topic["x"].total, 1);
        assert_eq!(report.overall, 100.0);
        assert!(!report.needs_improvement);
    }
}
