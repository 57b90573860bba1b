// Four-stage sentence filtering pipeline
//
// Stage 1: Noise removal (structural and formatting artifacts)
// Stage 2: Domain relevance scoring
// Stage 3: Completeness and meaning analysis (language model or deterministic)
// Stage 4: Complete-thought validation

mod completeness;
mod noise;
mod relevance;
mod response;
mod syntax;
mod thought;
mod types;
mod utils;

pub use completeness::{
    deterministic_analysis, AnalysisMode, AnalysisResult, CompletenessFilter, CompletenessStats,
};
pub use noise::{NoiseFilter, NoiseReason, NoiseStats, NoiseVerdict};
pub use relevance::{
    DomainRelevanceFilter, RelevanceAnalysis, RelevanceComponents, RelevanceLevel, RelevanceStats,
};
pub use syntax::{ClauseParts, DependencyRelation, ParsedToken, SyntaxError, SyntaxParser};
pub use thought::{
    ActionabilityAssessment, CoherenceAssessment, StructureAssessment, ThoughtStats,
    ThoughtValidator, TranslationAssessment, ValidationResult,
};
pub use types::{
    retention_rate, PipelineResult, PipelineRunStatistics, Stage, StagePerformance, StageResult,
};

use crate::config::{ConfigValidator, FilterConfig, ValidationReport};
use crate::llm::LanguageModelClient;
use crate::patterns::PatternRegistry;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of every stage's counters
#[derive(Debug, Clone, Serialize)]
pub struct FilterStatistics {
    pub noise: NoiseStats,
    pub relevance: RelevanceStats,
    pub completeness: CompletenessStats,
    pub thought: ThoughtStats,
}

/// Main filtering pipeline orchestrator
/// Owns one instance of each stage and the cumulative run statistics
pub struct FilterPipeline {
    config: FilterConfig,
    noise: NoiseFilter,
    relevance: DomainRelevanceFilter,
    completeness: CompletenessFilter,
    thought: ThoughtValidator,
    statistics: PipelineRunStatistics,
}

impl FilterPipeline {
    /// Create new filter pipeline
    ///
    /// # Arguments
    /// * `config` - Stage thresholds and toggles
    /// * `patterns` - Compiled noise, domain and thought patterns
    ///
    /// Out-of-range values are not rejected here; see [`validate_configuration`].
    ///
    /// [`validate_configuration`]: FilterPipeline::validate_configuration
    pub fn new(config: FilterConfig, patterns: Arc<PatternRegistry>) -> Self {
        tracing::debug!(
            "Initializing filter pipeline for domain '{}'",
            patterns.domain_name
        );

        Self {
            noise: NoiseFilter::new(patterns.clone()),
            relevance: DomainRelevanceFilter::new(patterns.clone(), config.health_threshold),
            completeness: CompletenessFilter::new(
                config.completeness_threshold,
                config.batch_size,
            ),
            thought: ThoughtValidator::new(
                patterns,
                config.quality_threshold,
                config.use_enhanced_structural_analysis,
            ),
            config,
            statistics: PipelineRunStatistics::default(),
        }
    }

    /// Delegate stage 3 to a language model
    pub fn with_language_model(mut self, client: Arc<dyn LanguageModelClient>) -> Self {
        self.completeness = self.completeness.with_client(client);
        self
    }

    /// Give stage 4 a dependency parser for structure checks
    pub fn with_syntax_parser(mut self, parser: Arc<dyn SyntaxParser>) -> Self {
        self.thought = self.thought.with_parser(parser);
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Run sentences through the requested stages (all four when `None`)
    ///
    /// Given stages execute in the order given, repeats skipped. The run
    /// stops after the first stage that keeps nothing.
    pub fn run(&mut self, sentences: &[String], stages: Option<&[Stage]>) -> PipelineResult {
        let start = Instant::now();
        let requested = Stage::execution_order(stages);

        let mut current: Vec<String> = sentences.to_vec();
        let mut stage_results = Vec::with_capacity(requested.len());
        let mut exhausted_at = None;

        for &stage in &requested {
            let stage_start = Instant::now();
            let input_count = current.len();

            current = match stage {
                Stage::Noise => self.noise.filter(&current),
                Stage::Relevance => self.relevance.filter(&current, None),
                Stage::Completeness => self.completeness.filter(&current, None),
                Stage::Thought => self.thought.filter(&current, None),
            };

            let result =
                StageResult::new(stage, input_count, current.len(), stage_start.elapsed());
            tracing::debug!(
                "Stage {} ({}): {} -> {} sentences ({:.1}% retained)",
                stage.number(),
                stage,
                result.input_count,
                result.output_count,
                result.retention_rate * 100.0
            );
            stage_results.push(result);

            if current.is_empty() {
                tracing::warn!(
                    "No sentences remain after stage {} ({}), stopping",
                    stage.number(),
                    stage
                );
                exhausted_at = Some(stage);
                break;
            }
        }

        let result = PipelineResult {
            input_count: sentences.len(),
            output_count: current.len(),
            overall_retention_rate: retention_rate(sentences.len(), current.len()),
            filtered_sentences: current,
            stage_results,
            elapsed: start.elapsed(),
            stages_requested: requested,
            exhausted_at,
        };

        self.statistics.record_run(&result);
        tracing::info!(
            "Filtered {} -> {} sentences in {:?}",
            result.input_count,
            result.output_count,
            result.elapsed
        );

        result
    }

    /// Cumulative statistics across runs
    pub fn statistics(&self) -> &PipelineRunStatistics {
        &self.statistics
    }

    /// Clear run statistics and every stage's counters
    pub fn reset_statistics(&mut self) {
        self.statistics.reset();
        self.noise.reset_stats();
        self.relevance.reset_stats();
        self.completeness.reset_stats();
        self.thought.reset_stats();
    }

    /// Current per-stage counters
    pub fn filter_statistics(&self) -> FilterStatistics {
        FilterStatistics {
            noise: self.noise.stats().clone(),
            relevance: self.relevance.stats().clone(),
            completeness: self.completeness.stats().clone(),
            thought: self.thought.stats().clone(),
        }
    }

    /// Threshold errors and warnings plus missing-capability warnings
    pub fn validate_configuration(&self) -> ValidationReport {
        let mut report = ConfigValidator::check_thresholds(&self.config);

        if self.config.use_enhanced_structural_analysis && !self.thought.has_parser() {
            report.warn(
                "filters.use_enhanced_structural_analysis",
                "Enhanced structural analysis requested but no syntax parser is attached; \
                 using pattern heuristics",
            );
        }
        if !self.completeness.is_delegated() {
            report.warn(
                "llm",
                "No language model configured; completeness uses deterministic analysis",
            );
        }

        report
    }

    /// Replace the configuration and re-threshold every stage
    pub fn update_config(&mut self, config: FilterConfig) {
        self.relevance.set_threshold(config.health_threshold);
        self.completeness
            .update_config(config.completeness_threshold, config.batch_size);
        self.thought.update_config(
            config.quality_threshold,
            config.use_enhanced_structural_analysis,
        );
        self.config = config;
        tracing::debug!("Filter pipeline configuration updated");
    }

    /// Name and description of every stage, in canonical order
    pub fn stage_descriptions() -> Vec<(Stage, &'static str)> {
        Stage::ALL.iter().map(|s| (*s, s.description())).collect()
    }

    /// Rough processing time for `count` sentences through `stages`
    ///
    /// Each stage's input is the previous stage's expected survivors.
    pub fn estimate_processing_time(count: usize, stages: &[Stage]) -> Duration {
        let mut remaining = count as f64;
        let mut seconds = 0.0;
        for stage in Stage::execution_order(Some(stages)) {
            let (per_sentence, retention) = match stage {
                Stage::Noise => (0.0001, 0.3),
                Stage::Relevance => (0.0005, 0.4),
                Stage::Completeness => (0.01, 0.7),
                Stage::Thought => (0.001, 0.6),
            };
            seconds += remaining * per_sentence;
            remaining *= retention;
        }

        Duration::from_secs_f64(seconds)
    }
}
