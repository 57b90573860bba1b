// Stage 1: Noise removal
// Drops formatting artifacts, headers, TOC lines and other non-content fragments
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::filtering::utils;
use crate::patterns::PatternRegistry;

const MIN_LENGTH: usize = 3;
const HEADER_FOOTER_MAX_LENGTH: usize = 50;
const MIN_ALPHANUMERIC_RATIO: f32 = 0.3;
const MAX_SINGLE_LETTER_RATIO: f32 = 0.3;
const ARTIFACT_CHARS: [char; 3] = ['\u{000C}', '\u{FEFF}', '\u{00A0}'];

/// Why a sentence was classified as noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseReason {
    TooShort,
    Structural,
    PdfArtifact,
    Formatting,
    HeaderFooter,
}

/// Classification of a single sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseVerdict {
    Keep,
    Remove(NoiseReason),
}

impl NoiseVerdict {
    pub fn is_noise(&self) -> bool {
        matches!(self, NoiseVerdict::Remove(_))
    }
}

/// Noise filter counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoiseStats {
    pub total_processed: u64,
    pub kept: u64,
    pub removed_too_short: u64,
    pub removed_structural: u64,
    pub removed_pdf_artifact: u64,
    pub removed_formatting: u64,
    pub removed_header_footer: u64,
}

impl NoiseStats {
    pub fn total_removed(&self) -> u64 {
        self.removed_too_short
            + self.removed_structural
            + self.removed_pdf_artifact
            + self.removed_formatting
            + self.removed_header_footer
    }

    fn record(&mut self, verdict: NoiseVerdict) {
        self.total_processed += 1;
        match verdict {
            NoiseVerdict::Keep => self.kept += 1,
            NoiseVerdict::Remove(NoiseReason::TooShort) => self.removed_too_short += 1,
            NoiseVerdict::Remove(NoiseReason::Structural) => self.removed_structural += 1,
            NoiseVerdict::Remove(NoiseReason::PdfArtifact) => self.removed_pdf_artifact += 1,
            NoiseVerdict::Remove(NoiseReason::Formatting) => self.removed_formatting += 1,
            NoiseVerdict::Remove(NoiseReason::HeaderFooter) => self.removed_header_footer += 1,
        }
    }
}

/// Pattern-based noise filter
pub struct NoiseFilter {
    patterns: Arc<PatternRegistry>,
    stats: NoiseStats,
}

impl NoiseFilter {
    pub fn new(patterns: Arc<PatternRegistry>) -> Self {
        tracing::debug!(
            "Noise filter initialized with {} structural and {} formatting patterns",
            patterns.noise.structural.len(),
            patterns.noise.formatting.len()
        );
        Self {
            patterns,
            stats: NoiseStats::default(),
        }
    }

    /// Classify a sentence without touching the counters
    ///
    /// Checks run in order and the first match wins: length, structural
    /// patterns, PDF artifacts, formatting markers, header/footer lines.
    pub fn classify(&self, sentence: &str) -> NoiseVerdict {
        let trimmed = sentence.trim();

        if trimmed.chars().count() < MIN_LENGTH {
            return NoiseVerdict::Remove(NoiseReason::TooShort);
        }
        if self.is_structural(trimmed) {
            return NoiseVerdict::Remove(NoiseReason::Structural);
        }
        if self.is_pdf_artifact(sentence, trimmed) {
            return NoiseVerdict::Remove(NoiseReason::PdfArtifact);
        }
        if self.is_formatting_marker(trimmed) {
            return NoiseVerdict::Remove(NoiseReason::Formatting);
        }
        if self.is_header_footer(trimmed) {
            return NoiseVerdict::Remove(NoiseReason::HeaderFooter);
        }
        NoiseVerdict::Keep
    }

    /// Check a sentence and record the verdict
    pub fn is_noise(&mut self, sentence: &str) -> bool {
        let verdict = self.classify(sentence);
        self.stats.record(verdict);
        verdict.is_noise()
    }

    /// Keep the sentences that are not noise, in input order
    pub fn filter(&mut self, sentences: &[String]) -> Vec<String> {
        let kept: Vec<String> = sentences
            .iter()
            .filter(|s| !self.is_noise(s))
            .cloned()
            .collect();

        tracing::debug!(
            "Noise filter: {} -> {} sentences",
            sentences.len(),
            kept.len()
        );
        kept
    }

    fn is_structural(&self, trimmed: &str) -> bool {
        if utils::alphanumeric_ratio(trimmed) < MIN_ALPHANUMERIC_RATIO {
            return true;
        }
        self.patterns
            .noise
            .structural
            .iter()
            .any(|p| p.regex.is_match(trimmed))
    }

    fn is_pdf_artifact(&self, raw: &str, trimmed: &str) -> bool {
        if raw.contains(&ARTIFACT_CHARS[..]) {
            return true;
        }

        let tokens = utils::tokens(trimmed);
        if tokens.len() == 1 && tokens[0].chars().count() < MIN_LENGTH {
            return true;
        }

        // Letter-spaced extraction ("T h e  p a t i e n t"); "a" and "I" are real words
        let single_letters = tokens
            .iter()
            .filter(|t| {
                let mut chars = t.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
                    && !matches!(**t, "a" | "A" | "I")
            })
            .count();
        !tokens.is_empty()
            && single_letters as f32 / tokens.len() as f32 > MAX_SINGLE_LETTER_RATIO
    }

    fn is_formatting_marker(&self, trimmed: &str) -> bool {
        self.patterns
            .noise
            .formatting
            .iter()
            .any(|p| p.regex.is_match(trimmed))
    }

    fn is_header_footer(&self, trimmed: &str) -> bool {
        if trimmed.chars().count() >= HEADER_FOOTER_MAX_LENGTH {
            return false;
        }
        self.patterns.noise.header_keywords.is_match(trimmed)
            || self.patterns.noise.dates.iter().any(|d| d.is_match(trimmed))
    }

    pub fn stats(&self) -> &NoiseStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = NoiseStats::default();
    }
}
