pub mod exercise;
pub mod scorer;
pub mod selector;

pub use exercise::{
    normalize_topic, prompt_fingerprint, validate_bank, AnswerOption, Difficulty, Exercise,
    ExerciseError,
};
