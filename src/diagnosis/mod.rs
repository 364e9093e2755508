use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::exercises::{Difficulty, Exercise};
use crate::skills::model::Attempt;

/// Probable cause of a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorTag {
    Conceptual,
    Calculation,
    Logical,
    Memory,
    Application,
}

impl ErrorTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorTag::Conceptual => "conceptual",
            ErrorTag::Calculation => "calculation",
            ErrorTag::Logical => "logical",
            ErrorTag::Memory => "memory",
            ErrorTag::Application => "application",
        }
    }

    /// The two causes considered plausible at a given difficulty.
    pub fn candidates(difficulty: Difficulty) -> [ErrorTag; 2] {
        match difficulty {
            Difficulty::Easy => [ErrorTag::Memory, ErrorTag::Conceptual],
            Difficulty::Medium | Difficulty::Unrated => [ErrorTag::Calculation, ErrorTag::Application],
            Difficulty::Hard => [ErrorTag::Logical, ErrorTag::Application],
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag a wrong answer with a likely cause.
///
/// This is a placeholder heuristic, not an inference model: the difficulty
/// tier narrows the cause to a pair and `rng` picks one of the two.
/// Correct attempts have nothing to classify and yield `None`.
pub fn classify_error<R: Rng + ?Sized>(
    exercise: &Exercise,
    attempt: &Attempt,
    rng: &mut R,
) -> Option<ErrorTag> {
    if attempt.is_correct {
        return None;
    }

    let tag = ErrorTag::candidates(exercise.difficulty).choose(rng).copied()?;
    tracing::debug!(
        exercise = %exercise.id,
        topic = %exercise.topic,
        tag = %tag,
        "Classified error"
    );
    Some(tag)
}

/// Error causes accumulated per topic over a session. Each topic holds a
/// set, so repeated tags are recorded once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicErrorLog {
    pub topics: BTreeMap<String, BTreeSet<ErrorTag>>,
}

impl TopicErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this log with `tag` added under `topic`
    pub fn record(&self, topic: &str, tag: ErrorTag) -> TopicErrorLog {
        let mut next = self.clone();
        next.topics.entry(topic.to_string()).or_default().insert(tag);
        next
    }

    pub fn tags_for(&self, topic: &str) -> Vec<ErrorTag> {
        self.topics
            .get(topic)
            .map(|tags| tags.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.values().all(|tags| tags.is_empty())
    }
}
