//! Property tests for the profile updater and suitability scorer.

use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

use zos_engine::config::{ScoringConfig, UpdateConfig};
use zos_engine::exercises::scorer::score_suitability;
use zos_engine::skills::updater::update_profile;
use zos_engine::{AnswerOption, Attempt, Difficulty, Exercise, LearnerProfile};

fn exercise(id: &str, difficulty: Difficulty, topic: &str) -> Exercise {
    Exercise {
        id: id.to_string(),
        prompt: format!("prompt {}", id),
        difficulty,
        topic: topic.to_string(),
        answers: vec![
            AnswerOption { id: "right".into(), text: "right".into(), is_correct: true },
            AnswerOption { id: "wrong".into(), text: "wrong".into(), is_correct: false },
        ],
        explanation: String::new(),
    }
}

fn attempt(exercise: &Exercise, is_correct: bool) -> Attempt {
    let answer = if is_correct { "right" } else { "wrong" };
    Attempt::grade(exercise, answer, 5.0).unwrap()
}

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
        Just(Difficulty::Unrated),
    ]
}

fn arb_profile() -> impl Strategy<Value = LearnerProfile> {
    (
        0.0f64..=1.0,
        proptest::collection::hash_map("[a-c]", 0.0f64..=1.0, 0..3),
        proptest::collection::btree_set("q[0-9]", 0..5),
    )
        .prop_map(|(skill_level, topic_proficiency, answered_questions)| LearnerProfile {
            skill_level,
            topic_proficiency: topic_proficiency.into_iter().collect::<HashMap<_, _>>(),
            answered_questions: answered_questions.into_iter().collect::<BTreeSet<_>>(),
        })
}

proptest! {
    #[test]
    fn update_keeps_levels_in_unit_range(
        profile in arb_profile(),
        difficulty in arb_difficulty(),
        topic in "[a-d]",
        is_correct in any::<bool>(),
    ) {
        let ex = exercise("q-new", difficulty, &topic);
        let next = update_profile(&profile, &ex, &attempt(&ex, is_correct), &UpdateConfig::default());

        prop_assert!((0.0..=1.0).contains(&next.skill_level));
        for p in next.topic_proficiency.values() {
            prop_assert!((0.0..=1.0).contains(p));
        }
        prop_assert!(next.has_answered("q-new"));
    }

    #[test]
    fn harder_correct_answers_move_skill_at_least_as_much(profile in arb_profile(), topic in "[a-d]") {
        let config = UpdateConfig::default();
        let easy = exercise("e", Difficulty::Easy, &topic);
        let medium = exercise("m", Difficulty::Medium, &topic);
        let hard = exercise("h", Difficulty::Hard, &topic);

        let after_easy = update_profile(&profile, &easy, &attempt(&easy, true), &config).skill_level;
        let after_medium = update_profile(&profile, &medium, &attempt(&medium, true), &config).skill_level;
        let after_hard = update_profile(&profile, &hard, &attempt(&hard, true), &config).skill_level;

        prop_assert!(after_medium >= after_easy);
        prop_assert!(after_hard >= after_medium);
    }

    #[test]
    fn answered_exercises_score_zero(profile in arb_profile(), difficulty in arb_difficulty()) {
        for id in profile.answered_questions.iter() {
            let ex = exercise(id, difficulty, "a");
            let score = score_suitability(&ex, &profile, &ScoringConfig::default(), &UpdateConfig::default());
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn suitability_is_in_unit_range(profile in arb_profile(), difficulty in arb_difficulty()) {
        let ex = exercise("fresh", difficulty, "b");
        let score = score_suitability(&ex, &profile, &ScoringConfig::default(), &UpdateConfig::default());
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn all_correct_topic_run_is_monotonic(difficulties in proptest::collection::vec(arb_difficulty(), 1..12)) {
        let config = UpdateConfig::default();
        let mut profile = LearnerProfile::new();
        let mut last = profile.proficiency_or("calculus", config.default_proficiency);

        for (i, difficulty) in difficulties.into_iter().enumerate() {
            let ex = exercise(&format!("c{}", i), difficulty, "calculus");
            profile = update_profile(&profile, &ex, &attempt(&ex, true), &config);
            let now = profile.topic_proficiency["calculus"];
            prop_assert!(now > last);
            last = now;
        }
    }
}

#[test]
fn hard_correct_answer_from_fresh_profile() {
    let profile = LearnerProfile::new();
    let ex = exercise("q1", Difficulty::Hard, "calculus");
    let next = zos_engine::update_profile(&profile, &ex, &attempt(&ex, true));

    assert!((next.skill_level - 0.545).abs() < 1e-9);
    assert!((next.topic_proficiency["calculus"] - 0.55).abs() < 1e-9);
    assert_eq!(profile.skill_level, 0.5);
    assert!(profile.topic_proficiency.is_empty());
}

#[test]
fn profile_serializes_round_trip() {
    let ex = exercise("q1", Difficulty::Medium, "calculus");
    let profile = zos_engine::update_profile(&LearnerProfile::new(), &ex, &attempt(&ex, false));
    let json = serde_json::to_string(&profile).unwrap();
    let back: LearnerProfile = serde_json::from_str(&json).unwrap();
    assert!((back.skill_level - profile.skill_level).abs() < 1e-12);
    assert!((back.topic_proficiency["calculus"] - 0.45).abs() < 1e-12);
    assert_eq!(back.answered_questions, profile.answered_questions);
}
