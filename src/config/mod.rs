pub mod engine;

pub use engine::{
    get_engine_config, load_engine_config, EngineConfig, OutcomeConfig, ScoringConfig,
    SelectionConfig, UpdateConfig,
};
