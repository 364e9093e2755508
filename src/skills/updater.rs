use crate::config::UpdateConfig;
use crate::exercises::Exercise;
use crate::skills::model::{Attempt, LearnerProfile};

/// Apply one attempt to a profile and return the updated copy.
///
/// The global step shrinks as the learner approaches mastery
/// (`rate = base * (1 - skill)`). Hard exercises move skill further when
/// answered correctly; easy ones cost more when missed. Topic proficiency
/// moves a fixed fraction of the remaining distance toward 1 or 0.
pub fn update_profile(
    profile: &LearnerProfile,
    exercise: &Exercise,
    attempt: &Attempt,
    config: &UpdateConfig,
) -> LearnerProfile {
    let mut next = profile.clone();
    let d = exercise.difficulty.value();
    let learning_rate = config.base_learning_rate * (1.0 - profile.skill_level);

    let skill = if attempt.is_correct {
        profile.skill_level + learning_rate * d
    } else {
        profile.skill_level - learning_rate * (1.0 - d)
    };
    next.skill_level = skill.clamp(0.0, 1.0);

    let p = profile.proficiency_or(&exercise.topic, config.default_proficiency);
    let topic = if attempt.is_correct {
        p + config.topic_step * (1.0 - p)
    } else {
        p - config.topic_step * p
    };
    next.topic_proficiency
        .insert(exercise.topic.clone(), topic.clamp(0.0, 1.0));

    next.answered_questions.insert(exercise.id.clone());

    tracing::debug!(
        exercise = %exercise.id,
        topic = %exercise.topic,
        correct = attempt.is_correct,
        skill_before = profile.skill_level,
        skill_after = next.skill_level,
        "Profile updated"
    );

    next
}
