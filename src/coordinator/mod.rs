//! Processing coordinator
//!
//! Turns raw text, files and directories into sentence lists, runs them
//! through a [`FilterPipeline`] and packages the results as reports for the
//! output formatters.

mod output;

pub use output::{render, render_directory, write_output, OutputFormat};

use crate::config::Config;
use crate::error::{Result, TxtsiftError};
use crate::filtering::{FilterPipeline, PipelineResult, Stage, StageResult};
use crate::llm::CommandClient;
use crate::patterns::PatternRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Split raw text into sentences
///
/// Every non-empty line is a separate block. Within a line, a sentence ends
/// after a run of `.`, `!` or `?` followed by whitespace or end of line.
/// Inner whitespace is collapsed and terminal punctuation is kept.
pub fn segment_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_whitespace() {
                if !current.is_empty() && !current.ends_with(' ') {
                    current.push(' ');
                }
                continue;
            }

            current.push(c);
            if is_terminal(c) {
                while let Some(&next) = chars.peek() {
                    if !is_terminal(next) {
                        break;
                    }
                    current.push(next);
                    chars.next();
                }
                if chars.peek().map_or(true, |n| n.is_whitespace()) {
                    flush(&mut sentences, &mut current);
                }
            }
        }
        flush(&mut sentences, &mut current);
    }

    sentences
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn flush(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}

/// Run-level figures of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub output_count: usize,
    pub overall_retention_rate: f64,
    pub elapsed: Duration,
    pub stages_requested: Vec<Stage>,
    pub exhausted_at: Option<Stage>,
}

/// Result of processing one text source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub run_id: Uuid,
    /// File path, or a label for in-memory text
    pub source: String,
    pub processed_at: DateTime<Utc>,
    pub input_sentences: usize,
    pub filtered_sentences: Vec<String>,
    pub statistics: ReportStatistics,
    /// One entry per executed stage
    pub layer_results: Vec<StageResult>,
}

impl ProcessingReport {
    fn from_result(source: String, result: PipelineResult) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source,
            processed_at: Utc::now(),
            input_sentences: result.input_count,
            statistics: ReportStatistics {
                output_count: result.output_count,
                overall_retention_rate: result.overall_retention_rate,
                elapsed: result.elapsed,
                stages_requested: result.stages_requested,
                exhausted_at: result.exhausted_at,
            },
            filtered_sentences: result.filtered_sentences,
            layer_results: result.stage_results,
        }
    }
}

/// A file that could not be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Results of processing every `*.txt` file in a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    pub reports: Vec<ProcessingReport>,
    pub failures: Vec<FileFailure>,
}

impl DirectoryReport {
    pub fn total_input(&self) -> usize {
        self.reports.iter().map(|r| r.input_sentences).sum()
    }

    pub fn total_output(&self) -> usize {
        self.reports.iter().map(|r| r.filtered_sentences.len()).sum()
    }
}

/// Running coordinator counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorStats {
    pub sources_processed: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub directories_processed: u64,
    pub total_input_sentences: u64,
    pub total_output_sentences: u64,
    pub total_processing_time: Duration,
}

/// Drives a pipeline over text sources
pub struct ProcessingCoordinator {
    pipeline: FilterPipeline,
    stages: Option<Vec<Stage>>,
    stats: CoordinatorStats,
}

impl ProcessingCoordinator {
    pub fn new(pipeline: FilterPipeline) -> Self {
        Self {
            pipeline,
            stages: None,
            stats: CoordinatorStats::default(),
        }
    }

    /// Build the pattern registry, pipeline and optional language model from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let patterns = match &config.domain.lexicon_file {
            Some(path) => PatternRegistry::from_lexicon_file(path)?,
            None => PatternRegistry::builtin()?,
        };

        let mut pipeline = FilterPipeline::new(config.filters.clone(), Arc::new(patterns));
        if config.llm.enabled {
            tracing::info!("Completeness analysis delegated to '{}'", config.llm.command);
            let client = CommandClient::from_config(&config.llm);
            pipeline = pipeline.with_language_model(Arc::new(client));
        }

        Ok(Self::new(pipeline))
    }

    /// Restrict runs to these stages (all stages when never called)
    pub fn with_stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = Some(stages);
        self
    }

    /// Filter pre-segmented sentences
    pub fn process_sentences(&mut self, sentences: &[String], source: &str) -> ProcessingReport {
        let result = self.pipeline.run(sentences, self.stages.as_deref());

        self.stats.sources_processed += 1;
        self.stats.total_input_sentences += result.input_count as u64;
        self.stats.total_output_sentences += result.output_count as u64;
        self.stats.total_processing_time += result.elapsed;

        ProcessingReport::from_result(source.to_string(), result)
    }

    /// Segment and filter raw text
    pub fn process_text(&mut self, text: &str, source: &str) -> ProcessingReport {
        let sentences = segment_sentences(text);
        tracing::debug!("Segmented {} into {} sentences", source, sentences.len());
        self.process_sentences(&sentences, source)
    }

    /// Read, segment and filter a text file
    pub fn process_file(&mut self, path: &Path) -> Result<ProcessingReport> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.stats.files_failed += 1;
                return Err(TxtsiftError::Io {
                    source: e,
                    context: format!("Failed to read input file: {:?}", path),
                });
            }
        };

        tracing::info!("Processing {:?}", path);
        let report = self.process_text(&text, &path.display().to_string());
        self.stats.files_processed += 1;
        Ok(report)
    }

    /// Process every `*.txt` file in a directory, in name order
    ///
    /// A file that fails is recorded in the report and the rest still run.
    /// Only an unreadable directory is an error.
    pub fn process_directory(&mut self, dir: &Path) -> Result<DirectoryReport> {
        let entries = std::fs::read_dir(dir).map_err(|e| TxtsiftError::Io {
            source: e,
            context: format!("Failed to read input directory: {:?}", dir),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt")
            })
            .collect();
        files.sort();

        if files.is_empty() {
            tracing::warn!("No .txt files found in {:?}", dir);
        }

        let mut report = DirectoryReport {
            directory: dir.to_path_buf(),
            reports: Vec::with_capacity(files.len()),
            failures: Vec::new(),
        };

        for path in files {
            match self.process_file(&path) {
                Ok(file_report) => report.reports.push(file_report),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    report.failures.push(FileFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.stats.directories_processed += 1;
        tracing::info!(
            "Processed {} files from {:?} ({} failed): {} -> {} sentences",
            report.reports.len(),
            dir,
            report.failures.len(),
            report.total_input(),
            report.total_output()
        );

        Ok(report)
    }

    pub fn stats(&self) -> &CoordinatorStats {
        &self.stats
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }
}
