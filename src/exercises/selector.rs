use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::EngineConfig;
use crate::exercises::scorer::score_suitability;
use crate::exercises::Exercise;
use crate::skills::model::LearnerProfile;

/// Pick the next exercise for the learner.
///
/// Unanswered exercises are ranked by suitability and one of the top
/// `top_k` is drawn uniformly from `rng`, so the sequence stays near
/// optimal without being predictable. Returns `None` once every exercise
/// has been answered.
pub fn select_next<'a, R: Rng + ?Sized>(
    exercises: &'a [Exercise],
    profile: &LearnerProfile,
    config: &EngineConfig,
    rng: &mut R,
) -> Option<&'a Exercise> {
    let mut scored: Vec<(&Exercise, f64)> = exercises
        .iter()
        .filter(|e| !profile.has_answered(&e.id))
        .map(|e| (e, score_suitability(e, profile, &config.scoring, &config.update)))
        .collect();

    if scored.is_empty() {
        tracing::debug!(total = exercises.len(), "No unanswered exercises left");
        return None;
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let k = config.selection.top_k.max(1).min(scored.len());
    let (chosen, score) = scored[..k].choose(rng).copied()?;

    tracing::debug!(
        exercise = %chosen.id,
        score = score,
        candidates = k,
        remaining = scored.len(),
        "Selected next exercise"
    );

    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{AnswerOption, Difficulty};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn exercise(id: &str, difficulty: Difficulty, topic: &str) -> Exercise {
        Exercise {
            id: id.into(),
            prompt: id.into(),
            difficulty,
            topic: topic.into(),
            answers: vec![AnswerOption { id: "a".into(), text: "a".into(), is_correct: true }],
            explanation: String::new(),
        }
    }

    #[test]
    fn test_top_one_is_deterministic() {
        let bank = vec![
            exercise("e", Difficulty::Easy, "t"),
            exercise("m", Difficulty::Medium, "t"),
            exercise("h", Difficulty::Hard, "t"),
        ];
        let mut config = EngineConfig::default();
        config.selection.top_k = 1;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let picked = select_next(&bank, &LearnerProfile::new(), &config, &mut rng).unwrap();
        assert_eq!(picked.id, "m");
    }

    #[test]
    fn test_zero_top_k_still_selects() {
        let bank = vec![exercise("e", Difficulty::Easy, "t")];
        let mut config = EngineConfig::default();
        config.selection.top_k = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(select_next(&bank, &LearnerProfile::new(), &config, &mut rng).is_some());
    }

    #[test]
    fn test_exhausted_bank_returns_none() {
        let bank = vec![exercise("e", Difficulty::Easy, "t")];
        let mut profile = LearnerProfile::new();
        profile.answered_questions.insert("e".into());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(select_next(&bank, &profile, &EngineConfig::default(), &mut rng).is_none());
        assert!(select_next(&[], &profile, &EngineConfig::default(), &mut rng).is_none());
    }
}
