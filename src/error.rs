use serde::{Serialize, Deserialize};
use std::fmt;

use crate::exercises::ExerciseError;

/// Engine boundary an error was raised at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStage {
    ConfigParse,
    Io,
    JsonParse,
    Logging,
    Session,
    Validation,
    Unknown,
}

impl ErrorStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStage::ConfigParse => "config_parse",
            ErrorStage::Io => "io",
            ErrorStage::JsonParse => "json_parse",
            ErrorStage::Logging => "logging",
            ErrorStage::Session => "session",
            ErrorStage::Validation => "validation",
            ErrorStage::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the fallible edges of the engine
/// (config loading, history persistence, session flow).
/// The scoring, selection and prediction functions never return it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineError {
    pub message: String,
    pub stage: ErrorStage,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl EngineError {
    pub fn new<S: Into<String>>(message: S, stage: ErrorStage) -> Self {
        EngineError {
            message: message.into(),
            stage,
            context: None,
            source: None,
        }
    }

    /// Attach what the caller was doing when the error surfaced
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Name the library or subsystem the error came from
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(source) = &self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for EngineError {}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain on one line
        EngineError::new(format!("{:#}", err), ErrorStage::Unknown).with_source("anyhow")
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::new(format!("I/O error: {}", err), ErrorStage::Io).with_source("std::io")
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::new(format!("JSON error: {}", err), ErrorStage::JsonParse).with_source("serde_json")
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::new(format!("TOML error: {}", err), ErrorStage::ConfigParse).with_source("toml")
    }
}

impl From<ExerciseError> for EngineError {
    fn from(err: ExerciseError) -> Self {
        EngineError::new(err.to_string(), ErrorStage::Validation).with_source("exercise")
    }
}
