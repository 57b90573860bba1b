use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for txtsift
///
/// Filter stages never return these: stage-local failures are recovered
/// inside the stage. Only the plumbing around the pipeline (configuration,
/// pattern libraries, file I/O, output) reports errors through this type.
#[derive(Error, Debug)]
pub enum TxtsiftError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Unknown configuration preset
    #[error("Unknown preset '{name}'. Available: strict, lenient, fast, accurate")]
    InvalidPreset { name: String },

    /// Unknown filter stage name
    #[error("Unknown stage '{name}'. Available: noise, relevance, completeness, thought")]
    UnknownStage { name: String },

    /// Pattern library errors (bad regex, unreadable lexicon)
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// CSV writing errors
    #[error("CSV error: {context}: {source}")]
    Csv { source: csv::Error, context: String },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result type for txtsift operations
pub type Result<T> = std::result::Result<T, TxtsiftError>;
