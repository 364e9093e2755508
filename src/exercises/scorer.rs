use crate::config::{ScoringConfig, UpdateConfig};
use crate::exercises::Exercise;
use crate::skills::model::LearnerProfile;

/// How well `exercise` fits the learner right now, in [0, 1].
///
/// The ideal exercise sits `challenge_offset` above both the global skill
/// level and the topic proficiency; distance from that point lowers the
/// score. Already-answered exercises always score 0.
pub fn score_suitability(
    exercise: &Exercise,
    profile: &LearnerProfile,
    scoring: &ScoringConfig,
    update: &UpdateConfig,
) -> f64 {
    if profile.has_answered(&exercise.id) {
        return 0.0;
    }

    let d = exercise.difficulty.value();
    let topic_prof = profile.proficiency_or(&exercise.topic, update.default_proficiency);

    let skill_gap = (d - (profile.skill_level + scoring.challenge_offset)).abs();
    let topic_gap = (d - (topic_prof + scoring.challenge_offset)).abs();

    let suitability = 1.0 - (scoring.skill_weight * skill_gap + scoring.topic_weight * topic_gap);
    suitability.clamp(0.0, 1.0)
}
