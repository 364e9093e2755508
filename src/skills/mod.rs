pub mod model;
pub mod updater;

pub use model::{Attempt, LearnerProfile, INITIAL_SKILL_LEVEL};
