pub mod analytics;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod exercises;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod predictions;
pub mod sessions;
pub mod skills;

use std::collections::HashMap;

pub use analytics::{OutcomeReport, TopicStats};
pub use config::{get_engine_config, EngineConfig};
pub use diagnosis::{ErrorTag, TopicErrorLog};
pub use error::{EngineError, ErrorStage};
pub use exercises::{AnswerOption, Difficulty, Exercise, ExerciseError};
pub use history::HistoryRecord;
pub use predictions::{
    predict_exam_score, predict_learning_time, predict_mastery_probability,
    predict_optimal_difficulty, Prediction, PredictionKind,
};
pub use sessions::{SessionState, SessionSummary, TestSession};
pub use skills::{Attempt, LearnerProfile};

// Convenience entry points using the cached engine config and the thread
// RNG. Use the module-level functions to pass config or a seeded RNG.

/// Apply one attempt to a profile, returning the updated copy.
pub fn update_profile(profile: &LearnerProfile, exercise: &Exercise, attempt: &Attempt) -> LearnerProfile {
    skills::updater::update_profile(profile, exercise, attempt, &get_engine_config().update)
}

pub fn score_suitability(exercise: &Exercise, profile: &LearnerProfile) -> f64 {
    let config = get_engine_config();
    exercises::scorer::score_suitability(exercise, profile, &config.scoring, &config.update)
}

pub fn select_next<'a>(exercises: &'a [Exercise], profile: &LearnerProfile) -> Option<&'a Exercise> {
    exercises::selector::select_next(exercises, profile, get_engine_config(), &mut rand::thread_rng())
}

/// Tag a wrong answer with a likely cause; `None` for correct attempts.
pub fn classify_error(exercise: &Exercise, attempt: &Attempt) -> Option<ErrorTag> {
    diagnosis::classify_error(exercise, attempt, &mut rand::thread_rng())
}

pub fn analyze_outcome(exercises: &[Exercise], attempts: &HashMap<String, Attempt>) -> OutcomeReport {
    analytics::analyze_outcome(exercises, attempts, &get_engine_config().outcome)
}
