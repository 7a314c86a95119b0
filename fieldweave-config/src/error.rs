//! Error types for configuration loading

use std::path::PathBuf;

use fieldweave_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// Configuration file format not supported
    #[error("Unsupported configuration file format: {format}")]
    UnsupportedFormat { format: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigError::FileNotFound { .. } => ErrorSeverity::Error,
            ConfigError::ParseError { .. } => ErrorSeverity::Error,
            ConfigError::UnsupportedFormat { .. } => ErrorSeverity::Error,
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
