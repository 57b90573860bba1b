// Shared types for the filtering pipeline
use crate::error::TxtsiftError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Filtering stage, ordered by execution position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage 1: formatting artifacts and non-content fragments
    Noise,
    /// Stage 2: domain relevance scoring
    Relevance,
    /// Stage 3: completeness and meaning analysis
    Completeness,
    /// Stage 4: structure, coherence and translation readiness
    Thought,
}

impl Stage {
    /// All stages in canonical execution order
    pub const ALL: [Stage; 4] = [
        Stage::Noise,
        Stage::Relevance,
        Stage::Completeness,
        Stage::Thought,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Noise => "noise",
            Stage::Relevance => "relevance",
            Stage::Completeness => "completeness",
            Stage::Thought => "thought",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> usize {
        match self {
            Stage::Noise => 1,
            Stage::Relevance => 2,
            Stage::Completeness => 3,
            Stage::Thought => 4,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::Noise => {
                "Removes page headers, TOC lines, separators, PDF artifacts and formatting markers"
            }
            Stage::Relevance => {
                "Scores domain relevance from terminology density, entities, patterns and context"
            }
            Stage::Completeness => {
                "Checks completeness and meaning with a language model or deterministic rules"
            }
            Stage::Thought => {
                "Validates structure, coherence, informativeness and translation readiness"
            }
        }
    }

    /// Parse a comma-separated stage list
    /// Stages to execute: all four in canonical order when `None`, otherwise
    /// the given stages in the given order with repeats dropped
    pub fn execution_order(stages: Option<&[Stage]>) -> Vec<Stage> {
        match stages {
            None => Stage::ALL.to_vec(),
            Some(stages) => {
                let mut order = Vec::with_capacity(stages.len());
                for &stage in stages {
                    if !order.contains(&stage) {
                        order.push(stage);
                    }
                }
                order
            }
        }
    }

    pub fn parse_list(list: &str) -> Result<Vec<Stage>, TxtsiftError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Stage::from_str)
            .collect()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = TxtsiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "noise" | "quick" => Ok(Stage::Noise),
            "2" | "relevance" | "domain" | "health" => Ok(Stage::Relevance),
            "3" | "completeness" | "ai" => Ok(Stage::Completeness),
            "4" | "thought" | "validation" => Ok(Stage::Thought),
            other => Err(TxtsiftError::UnknownStage {
                name: other.to_string(),
            }),
        }
    }
}

/// Retention rate helper: output / input, 0.0 for empty input
pub fn retention_rate(input: usize, output: usize) -> f64 {
    if input == 0 {
        0.0
    } else {
        output as f64 / input as f64
    }
}

/// Result of one stage invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: Stage,
    pub input_count: usize,
    pub output_count: usize,
    pub retention_rate: f64,
    pub elapsed: Duration,
}

impl StageResult {
    pub fn new(stage: Stage, input_count: usize, output_count: usize, elapsed: Duration) -> Self {
        Self {
            stage,
            input_count,
            output_count,
            retention_rate: retention_rate(input_count, output_count),
            elapsed,
        }
    }

    /// Number of sentences the stage dropped
    pub fn removed(&self) -> usize {
        self.input_count.saturating_sub(self.output_count)
    }
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Survivors of the last executed stage, in input order
    pub filtered_sentences: Vec<String>,
    /// One record per executed stage
    pub stage_results: Vec<StageResult>,
    pub input_count: usize,
    pub output_count: usize,
    pub overall_retention_rate: f64,
    pub elapsed: Duration,
    /// Stages executed in this run, in execution order, duplicates removed
    pub stages_requested: Vec<Stage>,
    /// Stage after which the run stopped because nothing survived
    pub exhausted_at: Option<Stage>,
}

/// Cumulative per-stage counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagePerformance {
    pub invocations: u64,
    pub total_input: u64,
    pub total_output: u64,
    pub total_time: Duration,
    /// Running average of per-invocation retention rate
    pub average_retention: f64,
}

impl StagePerformance {
    pub(crate) fn record(&mut self, result: &StageResult) {
        self.invocations += 1;
        self.total_input += result.input_count as u64;
        self.total_output += result.output_count as u64;
        self.total_time += result.elapsed;
        let n = self.invocations as f64;
        self.average_retention += (result.retention_rate - self.average_retention) / n;
    }
}

/// Statistics owned by a pipeline, accumulated across runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineRunStatistics {
    pub total_runs: u64,
    pub total_input_sentences: u64,
    pub total_output_sentences: u64,
    /// Output / input over all runs
    pub overall_retention_rate: f64,
    pub total_processing_time: Duration,
    pub average_processing_time: Duration,
    /// Stage results of the most recent run
    pub last_run: Vec<StageResult>,
    pub stage_performance: BTreeMap<Stage, StagePerformance>,
}

impl PipelineRunStatistics {
    pub(crate) fn record_run(&mut self, result: &PipelineResult) {
        self.total_runs += 1;
        self.total_input_sentences += result.input_count as u64;
        self.total_output_sentences += result.output_count as u64;
        self.overall_retention_rate = if self.total_input_sentences == 0 {
            0.0
        } else {
            self.total_output_sentences as f64 / self.total_input_sentences as f64
        };
        self.total_processing_time += result.elapsed;
        self.average_processing_time = self.total_processing_time.div_f64(self.total_runs as f64);

        for stage_result in &result.stage_results {
            self.stage_performance
                .entry(stage_result.stage)
                .or_default()
                .record(stage_result);
        }
        self.last_run = result.stage_results.clone();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
