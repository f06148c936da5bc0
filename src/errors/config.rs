use std::env::VarError;

use thiserror::Error;

/// Failures while reading settings from the environment at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The variable exists but is not readable, e.g. not valid unicode
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// A variable (or its default) does not parse into the expected type
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A value parsed but lies outside what the limiter or shortener accept
    #[error("Out of range: {0}")]
    OutOfRange(String),
}
