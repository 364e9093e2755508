pub mod store;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::diagnosis::ErrorTag;
use crate::sessions::SessionSummary;

/// One graded question inside a past test.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuestionAttempt {
    pub exercise_id: String,
    pub topic: String,
    pub is_correct: bool,
    pub elapsed_seconds: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestResult {
    pub session_id: String,
    /// Percentage correct, 0-100
    pub score: f64,
    pub date: DateTime<Utc>,
    pub topics: Vec<String>,
    #[serde(default)]
    pub attempts: Vec<QuestionAttempt>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopicProgress {
    pub start_level: f64,
    pub current_level: f64,
    pub study_minutes: f64,
    pub last_updated: DateTime<Utc>,
}

impl TopicProgress {
    pub fn study_hours(&self) -> f64 {
        self.study_minutes / 60.0
    }

    pub fn days_since_update(&self, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.last_updated).num_seconds().max(0);
        secs as f64 / 86_400.0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LearningPatterns {
    pub average_session_minutes: f64,
    pub sessions_per_week: f64,
    /// Hours of day (0-23) the learner usually starts sessions, most frequent first
    pub preferred_hours: Vec<u32>,
    /// Completed sessions / started sessions, in [0, 1]
    pub completion_rate: f64,
    pub sessions_started: u32,
    pub sessions_completed: u32,
}

impl Default for LearningPatterns {
    fn default() -> Self {
        LearningPatterns {
            average_session_minutes: 0.0,
            sessions_per_week: 0.0,
            preferred_hours: Vec::new(),
            completion_rate: 1.0,
            sessions_started: 0,
            sessions_completed: 0,
        }
    }
}

/// Multi-session learner history consumed by the predictors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct HistoryRecord {
    pub test_results: Vec<TestResult>,
    pub topic_progress: BTreeMap<String, TopicProgress>,
    pub learning_patterns: LearningPatterns,
    pub common_errors: BTreeMap<String, BTreeSet<ErrorTag>>,
}

const PATTERN_WINDOW_DAYS: i64 = 28;
const PREFERRED_HOUR_COUNT: usize = 3;

impl HistoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self, topic: &str) -> Option<&TopicProgress> {
        self.topic_progress.get(topic)
    }

    pub fn error_tags(&self, topic: &str) -> Option<&BTreeSet<ErrorTag>> {
        self.common_errors.get(topic)
    }

    /// Fold a finished session into a new history value.
    ///
    /// Topic levels carry across sessions: the live profile starts every
    /// session at the baseline, so the session's movement away from the
    /// baseline is applied on top of the stored level.
    pub fn record_session(&self, summary: &SessionSummary) -> HistoryRecord {
        let mut next = self.clone();
        let finished_at = summary.finished_at;

        let touched: Vec<String> = summary
            .report
            .per_topic
            .iter()
            .filter(|(_, stats)| stats.total > 0)
            .map(|(topic, _)| topic.clone())
            .collect();

        next.test_results.push(TestResult {
            session_id: summary.session_id.clone(),
            score: summary.report.overall,
            date: summary.started_at,
            topics: touched.clone(),
            attempts: summary.attempts.clone(),
        });

        let minutes = summary.duration_minutes();
        let minutes_per_topic = if touched.is_empty() {
            0.0
        } else {
            minutes / touched.len() as f64
        };

        for topic in &touched {
            let session_level = summary
                .profile
                .proficiency_or(topic, summary.baseline_proficiency);
            let delta = session_level - summary.baseline_proficiency;

            let progress = next
                .topic_progress
                .entry(topic.clone())
                .or_insert_with(|| TopicProgress {
                    start_level: summary.baseline_proficiency,
                    current_level: summary.baseline_proficiency,
                    study_minutes: 0.0,
                    last_updated: finished_at,
                });
            progress.current_level = (progress.current_level + delta).clamp(0.0, 1.0);
            progress.study_minutes += minutes_per_topic;
            progress.last_updated = finished_at;
        }

        for (topic, tags) in &summary.error_log.topics {
            next.common_errors
                .entry(topic.clone())
                .or_default()
                .extend(tags.iter().copied());
        }

        let patterns = &mut next.learning_patterns;
        patterns.sessions_started += 1;
        patterns.sessions_completed += 1;
        let n = patterns.sessions_completed as f64;
        patterns.average_session_minutes =
            (patterns.average_session_minutes * (n - 1.0) + minutes) / n;
        next.refresh_patterns(finished_at);

        tracing::info!(
            session = %summary.session_id,
            score = summary.report.overall,
            topics = touched.len(),
            minutes = minutes,
            "Recorded session in history"
        );

        next
    }

    /// Count a session that was started but never finished.
    pub fn record_abandoned(&self, now: DateTime<Utc>) -> HistoryRecord {
        let mut next = self.clone();
        next.learning_patterns.sessions_started += 1;
        next.refresh_patterns(now);
        next
    }

    fn refresh_patterns(&mut self, now: DateTime<Utc>) {
        let window_start = now - Duration::days(PATTERN_WINDOW_DAYS);
        let recent = self
            .test_results
            .iter()
            .filter(|r| r.date > window_start && r.date <= now)
            .count();

        let mut hour_counts: HashMap<u32, usize> = HashMap::new();
        for result in &self.test_results {
            *hour_counts.entry(result.date.hour()).or_insert(0) += 1;
        }
        let mut hours: Vec<(u32, usize)> = hour_counts.into_iter().collect();
        hours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let patterns = &mut self.learning_patterns;
        patterns.sessions_per_week = recent as f64 / (PATTERN_WINDOW_DAYS as f64 / 7.0);
        patterns.preferred_hours = hours
            .into_iter()
            .take(PREFERRED_HOUR_COUNT)
            .map(|(hour, _)| hour)
            .collect();
        patterns.completion_rate = if patterns.sessions_started == 0 {
            1.0
        } else {
            patterns.sessions_completed as f64 / patterns.sessions_started as f64
        };
    }
}
