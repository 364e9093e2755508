use crate::error::{EngineError, ErrorStage};

/// Initialize structured logging with tracing.
/// Call once from the host application; a second call returns an error
/// instead of replacing the installed subscriber.
pub fn init_logging() -> Result<(), EngineError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
        )
        .try_init()
        .map_err(|e| EngineError::new(
            format!("Failed to set global tracing subscriber: {}", e),
            ErrorStage::Logging
        ))?;

    tracing::info!("Structured logging initialized");
    Ok(())
}
