use crate::config::{Config, FilterConfig, SCHEMA_VERSION};
use crate::error::{Result, TxtsiftError, ValidationError};
use serde::Serialize;

/// Errors and warnings found in a configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path, message));
    }

    pub fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationError::new(path, message));
    }

    /// No errors (warnings allowed)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, failing on hard errors only
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        errors.extend(Self::check_thresholds(&config.filters).errors);
        Self::validate_llm(config, &mut errors);
        Self::validate_domain(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TxtsiftError::ConfigValidation { errors })
        }
    }

    /// Range errors and tuning warnings for the stage thresholds
    pub fn check_thresholds(filters: &FilterConfig) -> ValidationReport {
        let mut report = ValidationReport::default();

        let thresholds = [
            ("filters.health_threshold", filters.health_threshold),
            ("filters.completeness_threshold", filters.completeness_threshold),
            ("filters.quality_threshold", filters.quality_threshold),
        ];

        for (path, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                report.error(
                    path,
                    format!("Threshold must be between 0.0 and 1.0, got {}", value),
                );
            } else if value < 0.1 {
                report.warn(
                    path,
                    format!("Threshold {} is very low; almost nothing will be removed", value),
                );
            }
        }

        if filters.batch_size == 0 {
            report.error("filters.batch_size", "Batch size must be greater than 0");
        }

        if filters.health_threshold > 0.8 && filters.health_threshold <= 1.0 {
            report.warn(
                "filters.health_threshold",
                "Relevance threshold above 0.8 may remove most domain content",
            );
        }
        if filters.completeness_threshold > 0.9 && filters.completeness_threshold <= 1.0 {
            report.warn(
                "filters.completeness_threshold",
                "Completeness threshold above 0.9 may remove most sentences",
            );
        }
        if filters.quality_threshold > 0.8 && filters.quality_threshold <= 1.0 {
            report.warn(
                "filters.quality_threshold",
                "Quality threshold above 0.8 may remove most sentences",
            );
        }

        report
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_llm(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.llm.enabled && config.llm.command.trim().is_empty() {
            errors.push(ValidationError::new(
                "llm.command",
                "Command cannot be empty when the language model is enabled",
            ));
        }

        if config.llm.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "llm.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }
    }

    fn validate_domain(config: &Config, errors: &mut Vec<ValidationError>) {
        // File existence is checked when the lexicon is loaded
        if let Some(path) = &config.domain.lexicon_file {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::new(
                    "domain.lexicon_file",
                    "Lexicon file path cannot be empty",
                ));
            }
        }
    }
}
