use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;

use crate::error::EngineError;

/// Environment variable pointing at an engine TOML file.
pub const CONFIG_ENV_VAR: &str = "ZOS_ENGINE_CONFIG";

/// Tunables for the adaptive engine. Every section falls back to its
/// defaults when omitted from the TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub selection: SelectionConfig,
    pub scoring: ScoringConfig,
    pub update: UpdateConfig,
    pub outcome: OutcomeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Size of the candidate pool the selector draws from
    pub top_k: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig { top_k: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skill_weight: f64,
    pub topic_weight: f64,
    /// How far above the learner's level the ideal exercise sits
    pub challenge_offset: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            skill_weight: 0.7,
            topic_weight: 0.3,
            challenge_offset: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub base_learning_rate: f64,
    pub topic_step: f64,
    /// Proficiency assumed for a topic the learner has not seen yet
    pub default_proficiency: f64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        UpdateConfig {
            base_learning_rate: 0.1,
            topic_step: 0.1,
            default_proficiency: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    /// Percentage at or above which a topic counts as strong
    pub strong_threshold: f64,
    /// Percentage below which a topic counts as weak
    pub weak_threshold: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        OutcomeConfig {
            strong_threshold: 70.0,
            weak_threshold: 50.0,
        }
    }
}

fn get_config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from("engine.toml"),
    }
}

/// Parse an engine config from a TOML file.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig, EngineError> {
    let content = fs::read_to_string(path).map_err(|e| {
        EngineError::from(e).with_context(format!("path: {:?}", path))
    })?;
    let config = toml::from_str::<EngineConfig>(&content)
        .map_err(|e| EngineError::from(e).with_context(format!("path: {:?}", path)))?;
    Ok(config)
}

fn load_engine_config_internal() -> EngineConfig {
    let config_path = get_config_path();

    if !config_path.exists() {
        tracing::debug!(path = ?config_path, "No engine config file, using defaults");
        return EngineConfig::default();
    }

    match load_engine_config(&config_path) {
        Ok(config) => {
            tracing::info!(path = ?config_path, "Loaded engine config");
            config
        }
        Err(e) => {
            tracing::warn!(path = ?config_path, error = %e, "Failed to load engine config, using defaults");
            EngineConfig::default()
        }
    }
}

lazy_static! {
    static ref ENGINE_CONFIG: EngineConfig = load_engine_config_internal();
}

/// Get the cached engine configuration (loaded once on first use)
pub fn get_engine_config() -> &'static EngineConfig {
    &ENGINE_CONFIG
}
