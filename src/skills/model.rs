use serde::{Serialize, Deserialize};
use std::collections::{BTreeSet, HashMap};

use crate::exercises::{Exercise, ExerciseError};

/// Skill level assigned to a learner at the start of a session
pub const INITIAL_SKILL_LEVEL: f64 = 0.5;

/// Live mastery state for one learner in one session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LearnerProfile {
    pub skill_level: f64,
    pub topic_proficiency: HashMap<String, f64>,
    pub answered_questions: BTreeSet<String>,
}

impl LearnerProfile {
    pub fn new() -> Self {
        Self {
            skill_level: INITIAL_SKILL_LEVEL,
            topic_proficiency: HashMap::new(),
            answered_questions: BTreeSet::new(),
        }
    }

    /// Proficiency for `topic`, or `default` if the topic has not been seen.
    pub fn proficiency_or(&self, topic: &str, default: f64) -> f64 {
        self.topic_proficiency.get(topic).copied().unwrap_or(default)
    }

    pub fn has_answered(&self, exercise_id: &str) -> bool {
        self.answered_questions.contains(exercise_id)
    }
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// One completed response to an exercise. Immutable once graded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attempt {
    pub exercise_id: String,
    pub answer_id: String,
    pub is_correct: bool,
    pub elapsed_seconds: f64,
}

impl Attempt {
    /// Grade the chosen answer against the exercise's answer key.
    pub fn grade(
        exercise: &Exercise,
        answer_id: &str,
        elapsed_seconds: f64,
    ) -> Result<Attempt, ExerciseError> {
        let answer = exercise
            .answer(answer_id)
            .ok_or_else(|| ExerciseError::UnknownAnswer {
                exercise: exercise.id.clone(),
                answer: answer_id.to_string(),
            })?;

        Ok(Attempt {
            exercise_id: exercise.id.clone(),
            answer_id: answer.id.clone(),
            is_correct: answer.is_correct,
            elapsed_seconds: elapsed_seconds.max(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{AnswerOption, Difficulty};

    fn exercise() -> Exercise {
        Exercise {
            id: "q1".into(),
            prompt: "2 + 2".into(),
            difficulty: Difficulty::Easy,
            topic: "arithmetic".into(),
            answers: vec![
                AnswerOption { id: "a".into(), text: "4".into(), is_correct: true },
                AnswerOption { id: "b".into(), text: "5".into(), is_correct: false },
            ],
            explanation: String::new(),
        }
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = LearnerProfile::new();
        assert_eq!(profile.skill_level, 0.5);
        assert!(profile.topic_proficiency.is_empty());
        assert!(profile.answered_questions.is_empty());
        assert_eq!(profile.proficiency_or("algebra", 0.5), 0.5);
    }

    #[test]
    fn test_grade_attempt() {
        let ex = exercise();
        let right = Attempt::grade(&ex, "a", 12.0).unwrap();
        assert!(right.is_correct);
        let wrong = Attempt::grade(&ex, "b", -1.0).unwrap();
        assert!(!wrong.is_correct);
        assert_eq!(wrong.elapsed_seconds, 0.0);
        assert!(matches!(
            Attempt::grade(&ex, "z", 1.0),
            Err(ExerciseError::UnknownAnswer { .. })
        ));
    }
}
