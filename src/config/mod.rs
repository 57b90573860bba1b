//! Configuration management for txtsift
//!
//! This module handles loading, validation, presets and environment
//! overrides for the filtering pipeline configuration.

use crate::coordinator::OutputFormat;
use crate::error::{Result, TxtsiftError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod validator;

pub use validator::{ConfigValidator, ValidationReport};

const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta", default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub domain: DomainConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: current_timestamp(),
            last_modified: current_timestamp(),
        }
    }
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Stage thresholds and toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum domain relevance score (stage 2)
    pub health_threshold: f32,
    /// Minimum completeness score (stage 3)
    pub completeness_threshold: f32,
    /// Minimum composite quality (stage 4)
    pub quality_threshold: f32,
    /// Use the dependency parser for structure checks when one is attached
    pub use_enhanced_structural_analysis: bool,
    /// Sentences per language model request
    pub batch_size: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            health_threshold: 0.3,
            completeness_threshold: 0.6,
            quality_threshold: 0.7,
            use_enhanced_structural_analysis: false,
            batch_size: 5,
        }
    }
}

/// Language model command configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "ollama".to_string(),
            args: vec!["run".to_string(), "llama3.1:8b".to_string()],
            timeout_secs: 60,
        }
    }
}

/// Domain lexicon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// TOML lexicon replacing the built-in health vocabulary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon_file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub include_statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            include_statistics: true,
        }
    }
}

/// User-defined profile overrides (`[profiles.<name>]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_enhanced_structural_analysis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_enabled: Option<bool>,
}

/// Built-in threshold presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Strict,
    Lenient,
    Fast,
    Accurate,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Strict, Preset::Lenient, Preset::Fast, Preset::Accurate];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Strict => "strict",
            Preset::Lenient => "lenient",
            Preset::Fast => "fast",
            Preset::Accurate => "accurate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Strict => "High thresholds (0.5 / 0.8 / 0.9)",
            Preset::Lenient => "Low thresholds (0.2 / 0.4 / 0.5)",
            Preset::Fast => "Heuristic structure checks, batches of 10",
            Preset::Accurate => "Parser-backed structure checks, one sentence per request",
        }
    }

    pub fn apply(&self, filters: &mut FilterConfig) {
        match self {
            Preset::Strict => {
                filters.health_threshold = 0.5;
                filters.completeness_threshold = 0.8;
                filters.quality_threshold = 0.9;
            }
            Preset::Lenient => {
                filters.health_threshold = 0.2;
                filters.completeness_threshold = 0.4;
                filters.quality_threshold = 0.5;
            }
            Preset::Fast => {
                filters.use_enhanced_structural_analysis = false;
                filters.batch_size = 10;
            }
            Preset::Accurate => {
                filters.use_enhanced_structural_analysis = true;
                filters.batch_size = 1;
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = TxtsiftError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TxtsiftError::InvalidPreset {
                name: s.to_string(),
            })
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TxtsiftError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TxtsiftError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Load from `path`, or from the default location when it exists, or fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Self::default_path()?;
        if default_path.exists() {
            return Self::load(&default_path);
        }

        tracing::debug!("No config file at {:?}, using defaults", default_path);
        let mut config = Config::default();
        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TxtsiftError::Io {
                source: e,
                context: format!("Failed to create config directory: {:?}", parent),
            })?;
        }

        let mut config = self.clone();
        config.meta.last_modified = current_timestamp();
        let content = toml::to_string_pretty(&config)?;
        std::fs::write(path, content).map_err(|e| TxtsiftError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply a built-in preset, or a `[profiles.<name>]` entry from the file
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        if let Ok(preset) = profile.parse::<Preset>() {
            preset.apply(&mut self.filters);
            tracing::debug!("Applied preset '{}'", preset);
            return Ok(());
        }

        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| TxtsiftError::InvalidPreset {
                name: profile.to_string(),
            })?;

        if let Some(v) = overrides.health_threshold {
            self.filters.health_threshold = v;
        }
        if let Some(v) = overrides.completeness_threshold {
            self.filters.completeness_threshold = v;
        }
        if let Some(v) = overrides.quality_threshold {
            self.filters.quality_threshold = v;
        }
        if let Some(v) = overrides.use_enhanced_structural_analysis {
            self.filters.use_enhanced_structural_analysis = v;
        }
        if let Some(v) = overrides.batch_size {
            self.filters.batch_size = v;
        }
        if let Some(v) = overrides.llm_enabled {
            self.llm.enabled = v;
        }
        tracing::debug!("Applied profile '{}'", profile);
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: TXTSIFT_KEY or TXTSIFT_SECTION__KEY
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("TXTSIFT_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "HEALTH_THRESHOLD" | "FILTERS__HEALTH_THRESHOLD" => {
                self.filters.health_threshold = parse_value(path, value)?;
            }
            "COMPLETENESS_THRESHOLD" | "FILTERS__COMPLETENESS_THRESHOLD" => {
                self.filters.completeness_threshold = parse_value(path, value)?;
            }
            "QUALITY_THRESHOLD" | "FILTERS__QUALITY_THRESHOLD" => {
                self.filters.quality_threshold = parse_value(path, value)?;
            }
            "BATCH_SIZE" | "FILTERS__BATCH_SIZE" => {
                self.filters.batch_size = parse_value(path, value)?;
            }
            "ENHANCED_STRUCTURE" | "FILTERS__USE_ENHANCED_STRUCTURAL_ANALYSIS" => {
                self.filters.use_enhanced_structural_analysis = parse_value(path, value)?;
            }
            "LLM__ENABLED" => {
                self.llm.enabled = parse_value(path, value)?;
            }
            "LLM__COMMAND" => {
                self.llm.command = value.to_string();
            }
            "LLM__TIMEOUT_SECS" => {
                self.llm.timeout_secs = parse_value(path, value)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TxtsiftError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("txtsift").join("config.toml"))
    }
}

fn parse_value<T: FromStr>(path: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TxtsiftError::InvalidConfigValue {
            path: path.to_string(),
            message: format!(
                "Cannot parse '{}' as {}",
                value,
                std::any::type_name::<T>()
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.filters.health_threshold, 0.3);
        assert_eq!(config.filters.completeness_threshold, 0.6);
        assert_eq!(config.filters.quality_threshold, 0.7);
        assert!(!config.filters.use_enhanced_structural_analysis);
        assert_eq!(config.filters.batch_size, 5);
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.filters.health_threshold = 0.45;
        config.output.format = OutputFormat::Json;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.filters.health_threshold, 0.45);
        assert_eq!(loaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[filters]\nquality_threshold = 0.65\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.filters.quality_threshold, 0.65);
        assert_eq!(config.filters.health_threshold, 0.3);
        assert_eq!(config.meta.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("/nonexistent/txtsift.toml"));
        assert!(matches!(result, Err(TxtsiftError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_values_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[filters]\nhealth_threshold = 1.5\nbatch_size = 0\n").unwrap();

        match Config::load(&path) {
            Err(TxtsiftError::ConfigValidation { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_presets() {
        let mut config = Config::default();
        config.apply_profile("strict").unwrap();
        assert_eq!(config.filters.health_threshold, 0.5);
        assert_eq!(config.filters.completeness_threshold, 0.8);
        assert_eq!(config.filters.quality_threshold, 0.9);

        let mut config = Config::default();
        config.apply_profile("Accurate").unwrap();
        assert!(config.filters.use_enhanced_structural_analysis);
        assert_eq!(config.filters.batch_size, 1);

        let mut config = Config::default();
        config.apply_profile("fast").unwrap();
        assert_eq!(config.filters.batch_size, 10);
    }

    #[test]
    fn test_user_profile() {
        let mut config = Config::default();
        config.profiles.insert(
            "screening".to_string(),
            ProfileOverrides {
                health_threshold: Some(0.15),
                llm_enabled: Some(true),
                ..Default::default()
            },
        );

        config.apply_profile("screening").unwrap();
        assert_eq!(config.filters.health_threshold, 0.15);
        assert!(config.llm.enabled);

        assert!(matches!(
            config.apply_profile("unknown"),
            Err(TxtsiftError::InvalidPreset { .. })
        ));
    }

    #[test]
    fn test_env_value_parsing() {
        let mut config = Config::default();
        config.set_value_from_env("HEALTH_THRESHOLD", "0.25").unwrap();
        config.set_value_from_env("BATCH_SIZE", "8").unwrap();
        config.set_value_from_env("ENHANCED_STRUCTURE", "true").unwrap();
        config.set_value_from_env("LLM__COMMAND", "llamafile").unwrap();

        assert_eq!(config.filters.health_threshold, 0.25);
        assert_eq!(config.filters.batch_size, 8);
        assert!(config.filters.use_enhanced_structural_analysis);
        assert_eq!(config.llm.command, "llamafile");

        assert!(matches!(
            config.set_value_from_env("BATCH_SIZE", "many"),
            Err(TxtsiftError::InvalidConfigValue { .. })
        ));
    }
}
