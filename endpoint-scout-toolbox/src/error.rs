//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Toolbox error type.
///
/// Per-probe failures are never represented here: they are folded into the
/// discovery report. Only errors that must abort the caller escape.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ToolboxError {
    /// Invalid operator input (missing or malformed domain)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid or empty provider registry
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The ambient resolver could not answer
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ToolboxError {
    /// Whether the error was caused by operator input rather than the environment.
    ///
    /// Callers log expected errors at `warn` and the rest at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

/// Toolbox Result type alias
pub type ToolboxResult<T> = std::result::Result<T, ToolboxError>;
