use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

/// Boundary validation failures for exercises and topics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExerciseError {
    #[error("exercise '{0}' has no answers")]
    NoAnswers(String),
    #[error("exercise '{0}' has no answer marked correct")]
    NoCorrectAnswer(String),
    #[error("exercise '{id}' has {count} answers marked correct, expected exactly one")]
    MultipleCorrectAnswers { id: String, count: usize },
    #[error("invalid topic '{0}': use letters, digits, '_' or '-'")]
    InvalidTopic(String),
    #[error("exercise '{exercise}' has no answer '{answer}'")]
    UnknownAnswer { exercise: String, answer: String },
    #[error("duplicate exercise id '{0}'")]
    DuplicateId(String),
    #[error("exercises '{first}' and '{second}' share the same prompt")]
    DuplicatePrompt { first: String, second: String },
}

/// Ordered difficulty tiers. Unknown tiers in serialized banks load as
/// `Unrated` and score as the midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[serde(other)]
    Unrated,
}

impl Difficulty {
    /// Numeric value on the same [0, 1] scale as skill levels
    pub fn value(self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.9,
            Difficulty::Unrated => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub prompt: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub answers: Vec<AnswerOption>,
    #[serde(default)]
    pub explanation: String,
}

impl Exercise {
    pub fn answer(&self, answer_id: &str) -> Option<&AnswerOption> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    /// Reject exercises the engine cannot grade unambiguously.
    /// Multi-correct items have no defined semantics and are refused.
    pub fn validate(&self) -> Result<(), ExerciseError> {
        if self.answers.is_empty() {
            return Err(ExerciseError::NoAnswers(self.id.clone()));
        }
        match self.answers.iter().filter(|a| a.is_correct).count() {
            0 => return Err(ExerciseError::NoCorrectAnswer(self.id.clone())),
            1 => {}
            count => {
                return Err(ExerciseError::MultipleCorrectAnswers {
                    id: self.id.clone(),
                    count,
                })
            }
        }
        normalize_topic(&self.topic)?;
        Ok(())
    }

    /// Copy of this exercise with its topic in canonical form
    pub fn normalized(&self) -> Result<Exercise, ExerciseError> {
        self.validate()?;
        Ok(Exercise {
            topic: normalize_topic(&self.topic)?,
            ..self.clone()
        })
    }
}

/// Canonical topic key: trimmed, lowercased, inner whitespace folded to '_'.
pub fn normalize_topic(topic: &str) -> Result<String, ExerciseError> {
    let key = topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ExerciseError::InvalidTopic(topic.to_string()));
    }
    Ok(key)
}

/// SHA-256 of the whitespace- and case-normalized prompt.
pub fn prompt_fingerprint(prompt: &str) -> String {
    let normalized = prompt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validate a whole exercise bank and return it with normalized topics.
pub fn validate_bank(exercises: &[Exercise]) -> Result<Vec<Exercise>, ExerciseError> {
    let mut ids = HashSet::new();
    let mut prompts: Vec<(String, &str)> = Vec::with_capacity(exercises.len());
    let mut bank = Vec::with_capacity(exercises.len());

    for exercise in exercises {
        if !ids.insert(exercise.id.as_str()) {
            return Err(ExerciseError::DuplicateId(exercise.id.clone()));
        }

        let fingerprint = prompt_fingerprint(&exercise.prompt);
        if let Some((_, first)) = prompts.iter().find(|(fp, _)| *fp == fingerprint) {
            return Err(ExerciseError::DuplicatePrompt {
                first: first.to_string(),
                second: exercise.id.clone(),
            });
        }
        prompts.push((fingerprint, exercise.id.as_str()));

        bank.push(exercise.normalized()?);
    }

    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: &str, correct: &[bool]) -> Exercise {
        Exercise {
            id: id.to_string(),
            prompt: format!("Prompt for {}", id),
            difficulty: Difficulty::Medium,
            topic: "Linear Algebra".to_string(),
            answers: correct
                .iter()
                .enumerate()
                .map(|(i, &is_correct)| AnswerOption {
                    id: format!("{}-{}", id, i),
                    text: format!("option {}", i),
                    is_correct,
                })
                .collect(),
            explanation: String::new(),
        }
    }

    #[test]
    fn test_difficulty_values() {
        assert_eq!(Difficulty::Easy.value(), 0.3);
        assert_eq!(Difficulty::Medium.value(), 0.6);
        assert_eq!(Difficulty::Hard.value(), 0.9);
        assert_eq!(Difficulty::Unrated.value(), 0.5);
    }

    #[test]
    fn test_unknown_tier_deserializes_as_unrated() {
        let d: Difficulty = serde_json::from_str("\"expert\"").unwrap();
        assert_eq!(d, Difficulty::Unrated);
        let d: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
    }

    #[test]
    fn test_validate_requires_exactly_one_correct() {
        assert!(exercise("a", &[true, false]).validate().is_ok());
        assert_eq!(
            exercise("b", &[false, false]).validate(),
            Err(ExerciseError::NoCorrectAnswer("b".into()))
        );
        assert_eq!(
            exercise("c", &[true, true, false]).validate(),
            Err(ExerciseError::MultipleCorrectAnswers { id: "c".into(), count: 2 })
        );
        assert_eq!(
            exercise("d", &[]).validate(),
            Err(ExerciseError::NoAnswers("d".into()))
        );
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic("  Linear   Algebra ").unwrap(), "linear_algebra");
        assert_eq!(normalize_topic("calc-2").unwrap(), "calc-2");
        assert!(normalize_topic("   ").is_err());
        assert!(normalize_topic("físika").is_err());
        assert!(normalize_topic("a/b").is_err());
    }

    #[test]
    fn test_validate_bank_rejects_duplicates() {
        let a = exercise("a", &[true, false]);
        let mut b = exercise("b", &[true, false]);
        b.prompt = "  PROMPT for   a".to_string();

        assert_eq!(
            validate_bank(&[a.clone(), b]),
            Err(ExerciseError::DuplicatePrompt { first: "a".into(), second: "b".into() })
        );
        assert_eq!(
            validate_bank(&[a.clone(), a.clone()]),
            Err(ExerciseError::DuplicateId("a".into()))
        );

        let bank = validate_bank(&[a]).unwrap();
        assert_eq!(bank[0].topic, "linear_algebra");
    }
}
