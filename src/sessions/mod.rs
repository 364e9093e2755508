use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analytics::{analyze_outcome, OutcomeReport};
use crate::config::EngineConfig;
use crate::diagnosis::{classify_error, ErrorTag, TopicErrorLog};
use crate::error::{EngineError, ErrorStage};
use crate::exercises::{selector, validate_bank, Exercise};
use crate::history::QuestionAttempt;
use crate::metrics::Metrics;
use crate::skills::model::{Attempt, LearnerProfile};
use crate::skills::updater::update_profile;

/// Where a test session currently stands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No exercise on screen; the next call to `next_exercise` selects one
    Ready,
    /// An exercise is on screen and waiting for the learner's answer
    AwaitingAnswer { exercise_id: String },
    /// Every exercise has been answered
    Complete,
}

/// Result of grading one submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub attempt: Attempt,
    pub error_tag: Option<ErrorTag>,
    pub skill_level: f64,
}

/// Everything a finished session produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub report: OutcomeReport,
    pub profile: LearnerProfile,
    pub error_log: TopicErrorLog,
    pub attempts: Vec<QuestionAttempt>,
    /// Topic proficiency every topic started from in this session
    pub baseline_proficiency: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn duration_minutes(&self) -> f64 {
        let secs = (self.finished_at - self.started_at).num_seconds().max(0);
        secs as f64 / 60.0
    }
}

/// One adaptive test run over a fixed exercise bank.
pub struct TestSession<R: Rng = ChaCha8Rng> {
    session_id: String,
    exercises: Vec<Exercise>,
    profile: LearnerProfile,
    attempts: HashMap<String, Attempt>,
    order: Vec<String>,
    error_log: TopicErrorLog,
    state: SessionState,
    config: EngineConfig,
    started_at: DateTime<Utc>,
    metrics: Metrics,
    rng: R,
}

impl TestSession<ChaCha8Rng> {
    /// Session with a reproducible random stream
    pub fn with_seed(
        exercises: &[Exercise],
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::new(exercises, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> TestSession<R> {
    /// Validate the bank and start a session with a fresh profile.
    pub fn new(exercises: &[Exercise], config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        let bank = validate_bank(exercises)
            .map_err(|e| EngineError::from(e).with_context("validating exercise bank"))?;
        let started_at = Utc::now();
        let session_id = format!("session_{}", started_at.timestamp_millis());

        tracing::info!(session = %session_id, exercises = bank.len(), "Test session started");

        Ok(TestSession {
            session_id,
            exercises: bank,
            profile: LearnerProfile::new(),
            attempts: HashMap::new(),
            order: Vec::new(),
            error_log: TopicErrorLog::new(),
            state: SessionState::Ready,
            config,
            started_at,
            metrics: Metrics::new(),
            rng,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn profile(&self) -> &LearnerProfile {
        &self.profile
    }

    pub fn error_log(&self) -> &TopicErrorLog {
        &self.error_log
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    /// Present the next exercise. Asking again before answering returns the
    /// same exercise; `None` means the session is complete.
    pub fn next_exercise(&mut self) -> Option<&Exercise> {
        let pending = match &self.state {
            SessionState::AwaitingAnswer { exercise_id } => Some(exercise_id.clone()),
            SessionState::Complete => return None,
            SessionState::Ready => None,
        };
        if let Some(id) = pending {
            return self.exercises.iter().find(|e| e.id == id);
        }

        let next_id = selector::select_next(&self.exercises, &self.profile, &self.config, &mut self.rng)
            .map(|e| e.id.clone());

        match next_id {
            Some(exercise_id) => {
                self.metrics.record_selection();
                self.state = SessionState::AwaitingAnswer { exercise_id: exercise_id.clone() };
                self.exercises.iter().find(|e| e.id == exercise_id)
            }
            None => {
                tracing::info!(session = %self.session_id, "All exercises answered");
                self.state = SessionState::Complete;
                None
            }
        }
    }

    /// Grade the learner's answer to the exercise currently on screen.
    pub fn submit_answer(
        &mut self,
        answer_id: &str,
        elapsed_seconds: f64,
    ) -> Result<SubmissionOutcome, EngineError> {
        let exercise_id = match &self.state {
            SessionState::AwaitingAnswer { exercise_id } => exercise_id.clone(),
            other => {
                return Err(EngineError::new("No exercise is awaiting an answer", ErrorStage::Session)
                    .with_context(format!("state: {:?}", other)));
            }
        };
        let exercise = self
            .exercises
            .iter()
            .find(|e| e.id == exercise_id)
            .ok_or_else(|| EngineError::new("Presented exercise vanished from bank", ErrorStage::Session)
                .with_context(format!("exercise: {}", exercise_id)))?;

        let attempt = Attempt::grade(exercise, answer_id, elapsed_seconds)?;
        let profile = update_profile(&self.profile, exercise, &attempt, &self.config.update);

        let error_tag = classify_error(exercise, &attempt, &mut self.rng);
        if let Some(tag) = error_tag {
            self.error_log = self.error_log.record(&exercise.topic, tag);
            self.metrics.record_error_tag();
        }
        self.metrics.record_attempt(attempt.is_correct);

        self.profile = profile;
        self.attempts.insert(exercise_id.clone(), attempt.clone());
        self.order.push(exercise_id);
        self.state = SessionState::Ready;
        if self.attempts.len() == self.exercises.len() {
            self.state = SessionState::Complete;
        }

        Ok(SubmissionOutcome {
            attempt,
            error_tag,
            skill_level: self.profile.skill_level,
        })
    }

    /// Close the session and summarize it. Unanswered exercises are left out
    /// of the topic totals.
    pub fn finish(self, now: DateTime<Utc>) -> SessionSummary {
        let report = analyze_outcome(&self.exercises, &self.attempts, &self.config.outcome);

        let attempts = self
            .order
            .iter()
            .filter_map(|id| {
                let attempt = self.attempts.get(id)?;
                let exercise = self.exercises.iter().find(|e| &e.id == id)?;
                Some(QuestionAttempt {
                    exercise_id: id.clone(),
                    topic: exercise.topic.clone(),
                    is_correct: attempt.is_correct,
                    elapsed_seconds: attempt.elapsed_seconds,
                })
            })
            .collect();

        tracing::info!(
            session = %self.session_id,
            overall = report.overall,
            answered = self.attempts.len(),
            total = self.exercises.len(),
            "Test session finished"
        );

        SessionSummary {
            session_id: self.session_id,
            report,
            profile: self.profile,
            error_log: self.error_log,
            attempts,
            baseline_proficiency: self.config.update.default_proficiency,
            started_at: self.started_at,
            finished_at: now.max(self.started_at),
        }
    }
}
