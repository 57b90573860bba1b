// Stage 4: Complete-thought validation
// Structure, coherence, actionability and translation readiness, combined into one quality score
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::filtering::syntax::{ClauseParts, SyntaxParser};
use crate::filtering::utils;
use crate::patterns::{CompiledPattern, PatternRegistry};

const STRUCTURE_WEIGHT: f32 = 0.3;
const COHERENCE_WEIGHT: f32 = 0.3;
const ACTIONABILITY_WEIGHT: f32 = 0.2;
const TRANSLATION_WEIGHT: f32 = 0.2;

const COHERENT_SCORE: f32 = 0.6;
const CLEAR_MEANING_SCORE: f32 = 0.5;
const MAX_CLEAR_MEANING_ISSUES: usize = 2;
const ACTIONABLE_SCORE: f32 = 0.4;
const TRANSLATION_READY_SCORE: f32 = 0.7;

/// Subject/verb/object assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureAssessment {
    pub has_subject: bool,
    pub has_verb: bool,
    pub has_object: bool,
    /// Fraction of the three parts present
    pub score: f32,
    /// Subject and verb both present
    pub is_structurally_complete: bool,
    /// Parts came from the injected dependency parser
    pub used_parser: bool,
}

impl StructureAssessment {
    fn from_parts(parts: ClauseParts, used_parser: bool) -> Self {
        let present = [parts.has_subject, parts.has_verb, parts.has_object]
            .iter()
            .filter(|p| **p)
            .count();
        Self {
            has_subject: parts.has_subject,
            has_verb: parts.has_verb,
            has_object: parts.has_object,
            score: present as f32 / 3.0,
            is_structurally_complete: parts.has_subject && parts.has_verb,
            used_parser,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceAssessment {
    pub score: f32,
    pub is_coherent: bool,
    pub has_clear_meaning: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionabilityAssessment {
    pub score: f32,
    pub is_actionable: bool,
    pub is_informative: bool,
    pub action_categories: Vec<String>,
    pub information_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationAssessment {
    pub score: f32,
    pub is_translation_ready: bool,
    pub issues: Vec<String>,
}

/// Full validation of one sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub sentence: String,
    pub structure: StructureAssessment,
    pub coherence: CoherenceAssessment,
    pub actionability: ActionabilityAssessment,
    pub translation: TranslationAssessment,
    /// 0.3 structure + 0.3 coherence + 0.2 actionability + 0.2 translation
    pub overall_quality: f32,
    pub passes_validation: bool,
}

impl ValidationResult {
    /// Every component gate holds (independent of the quality threshold)
    pub fn components_pass(&self) -> bool {
        self.structure.is_structurally_complete
            && self.coherence.is_coherent
            && self.actionability.is_informative
            && self.translation.is_translation_ready
    }
}

/// Thought validator counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThoughtStats {
    pub total_processed: u64,
    pub structurally_complete: u64,
    pub coherent: u64,
    pub informative: u64,
    pub translation_ready: u64,
    pub passed: u64,
    pub quality_sum: f64,
    pub total_time: Duration,
}

impl ThoughtStats {
    pub fn average_quality(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.quality_sum / self.total_processed as f64
        }
    }

    fn record(&mut self, result: &ValidationResult) {
        self.total_processed += 1;
        self.quality_sum += result.overall_quality as f64;
        if result.structure.is_structurally_complete {
            self.structurally_complete += 1;
        }
        if result.coherence.is_coherent {
            self.coherent += 1;
        }
        if result.actionability.is_informative {
            self.informative += 1;
        }
        if result.translation.is_translation_ready {
            self.translation_ready += 1;
        }
        if result.passes_validation {
            self.passed += 1;
        }
    }
}

/// Complete-thought validator
pub struct ThoughtValidator {
    patterns: Arc<PatternRegistry>,
    quality_threshold: f32,
    use_enhanced_structure: bool,
    parser: Option<Arc<dyn SyntaxParser>>,
    stats: ThoughtStats,
}

impl ThoughtValidator {
    pub fn new(
        patterns: Arc<PatternRegistry>,
        quality_threshold: f32,
        use_enhanced_structure: bool,
    ) -> Self {
        Self {
            patterns,
            quality_threshold,
            use_enhanced_structure,
            parser: None,
            stats: ThoughtStats::default(),
        }
    }

    /// Attach a dependency parser, used when enhanced structural analysis is on
    pub fn with_parser(mut self, parser: Arc<dyn SyntaxParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn has_parser(&self) -> bool {
        self.parser.is_some()
    }

    pub fn quality_threshold(&self) -> f32 {
        self.quality_threshold
    }

    pub fn update_config(&mut self, quality_threshold: f32, use_enhanced_structure: bool) {
        self.quality_threshold = quality_threshold;
        self.use_enhanced_structure = use_enhanced_structure;
    }

    pub fn validate_structure(&self, sentence: &str) -> StructureAssessment {
        if self.use_enhanced_structure {
            if let Some(parser) = &self.parser {
                match parser.parse(sentence) {
                    Ok(tokens) => {
                        let parts = ClauseParts::from_tokens(&tokens);
                        return StructureAssessment::from_parts(parts, true);
                    }
                    Err(e) => tracing::debug!("Parser failed, using heuristics: {}", e),
                }
            }
        }

        let thought = &self.patterns.thought;
        let parts = ClauseParts {
            has_subject: any_match(&thought.subject, sentence),
            has_verb: any_match(&thought.verb, sentence),
            has_object: any_match(&thought.object, sentence),
        };
        StructureAssessment::from_parts(parts, false)
    }

    pub fn validate_coherence(&self, sentence: &str) -> CoherenceAssessment {
        let trimmed = sentence.trim();
        let words = utils::tokens(trimmed);
        let mut score = 0.0;
        let mut issues = Vec::new();

        match words.len() {
            0..=4 => issues.push("too short".to_string()),
            5..=30 => score += 0.2,
            _ => issues.push("too long".to_string()),
        }

        if !words.is_empty() {
            let unique: ahash::AHashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
            if unique.len() as f32 / words.len() as f32 > 0.7 {
                score += 0.2;
            } else {
                issues.push("repetitive wording".to_string());
            }
        }

        if utils::starts_capitalized(trimmed) {
            score += 0.1;
        } else {
            issues.push("not capitalized".to_string());
        }

        if utils::has_terminal_punctuation(trimmed) {
            score += 0.2;
        } else {
            issues.push("missing terminal punctuation".to_string());
        }

        if self.has_logical_order(trimmed) {
            score += 0.3;
        } else {
            issues.push("illogical word order".to_string());
        }

        let score: f32 = f32::min(score, 1.0);
        CoherenceAssessment {
            score,
            is_coherent: score >= COHERENT_SCORE,
            has_clear_meaning: score >= CLEAR_MEANING_SCORE
                && issues.len() <= MAX_CLEAR_MEANING_ISSUES,
            issues,
        }
    }

    pub fn validate_actionability(&self, sentence: &str) -> ActionabilityAssessment {
        let thought = &self.patterns.thought;
        let lower = sentence.to_lowercase();
        let mut score = 0.0;

        let action_categories: Vec<String> = thought
            .actionable
            .iter()
            .filter(|p| p.regex.is_match(sentence))
            .map(|p| {
                score += p.weight;
                p.name.clone()
            })
            .collect();

        let mut information_categories = Vec::new();
        if utils::count_present(&lower, &thought.information_terms) > 0 {
            score += 0.3;
            information_categories.push("domain".to_string());
        }
        if utils::count_present(&lower, &thought.procedural_terms) > 0 {
            score += 0.2;
            information_categories.push("procedural".to_string());
        }
        if thought.factual.iter().any(|re| re.is_match(sentence)) {
            score += 0.2;
            information_categories.push("factual".to_string());
        }
        if utils::count_present(&lower, &thought.instructional_terms) > 0 {
            score += 0.3;
            information_categories.push("instructional".to_string());
        }

        let score: f32 = f32::min(score, 1.0);
        ActionabilityAssessment {
            score,
            is_actionable: score >= ACTIONABLE_SCORE,
            is_informative: !information_categories.is_empty(),
            action_categories,
            information_categories,
        }
    }

    pub fn validate_translation_readiness(&self, sentence: &str) -> TranslationAssessment {
        let structure = self.validate_structure(sentence);
        let coherence = self.validate_coherence(sentence);
        self.translation_readiness(sentence, &structure, &coherence)
    }

    /// Validate against the configured quality threshold
    pub fn validate(&self, sentence: &str) -> ValidationResult {
        self.validate_with_threshold(sentence, self.quality_threshold)
    }

    pub fn validate_with_threshold(&self, sentence: &str, threshold: f32) -> ValidationResult {
        let structure = self.validate_structure(sentence);
        let coherence = self.validate_coherence(sentence);
        let actionability = self.validate_actionability(sentence);
        let translation = self.translation_readiness(sentence, &structure, &coherence);

        let overall_quality = (structure.score * STRUCTURE_WEIGHT
            + coherence.score * COHERENCE_WEIGHT
            + actionability.score * ACTIONABILITY_WEIGHT
            + translation.score * TRANSLATION_WEIGHT)
            .clamp(0.0, 1.0);

        let mut result = ValidationResult {
            sentence: sentence.to_string(),
            structure,
            coherence,
            actionability,
            translation,
            overall_quality,
            passes_validation: false,
        };
        result.passes_validation = result.components_pass() && overall_quality >= threshold;
        result
    }

    /// Validate every sentence and record counters
    pub fn batch_validate(
        &mut self,
        sentences: &[String],
        threshold: Option<f32>,
    ) -> Vec<ValidationResult> {
        let threshold = threshold.unwrap_or(self.quality_threshold);
        let start = Instant::now();

        let results: Vec<ValidationResult> = sentences
            .iter()
            .map(|s| self.validate_with_threshold(s, threshold))
            .collect();

        for result in &results {
            self.stats.record(result);
        }
        self.stats.total_time += start.elapsed();
        results
    }

    /// Keep sentences that pass validation, in input order
    pub fn filter(&mut self, sentences: &[String], threshold: Option<f32>) -> Vec<String> {
        let kept: Vec<String> = self
            .batch_validate(sentences, threshold)
            .into_iter()
            .filter(|r| r.passes_validation)
            .map(|r| r.sentence)
            .collect();

        tracing::debug!(
            "Thought validator: {} -> {} sentences",
            sentences.len(),
            kept.len()
        );
        kept
    }

    fn translation_readiness(
        &self,
        sentence: &str,
        structure: &StructureAssessment,
        coherence: &CoherenceAssessment,
    ) -> TranslationAssessment {
        let trimmed = sentence.trim();
        let mut score = 0.0;
        let mut issues = Vec::new();

        if structure.is_structurally_complete {
            score += 0.3;
        } else {
            issues.push("incomplete structure".to_string());
        }
        if coherence.is_coherent {
            score += 0.3;
        } else {
            issues.push("low coherence".to_string());
        }
        if coherence.has_clear_meaning {
            score += 0.2;
        } else {
            issues.push("unclear meaning".to_string());
        }

        let token_count = utils::tokens(trimmed).len();
        if (3..=25).contains(&token_count) {
            score += 0.1;
        } else {
            issues.push(format!("{} tokens outside 3-25", token_count));
        }

        let errors: Vec<&str> = self
            .patterns
            .thought
            .obvious_errors
            .iter()
            .filter(|p| p.regex.is_match(trimmed))
            .map(|p| p.name.as_str())
            .chain(utils::has_repeated_word(trimmed).then_some("repeated_word"))
            .collect();
        if errors.is_empty() {
            score += 0.1;
        } else {
            issues.push(format!("obvious errors: {}", errors.join(", ")));
        }

        let score: f32 = f32::min(score, 1.0);
        TranslationAssessment {
            score,
            is_translation_ready: score >= TRANSLATION_READY_SCORE,
            issues,
        }
    }

    fn has_logical_order(&self, trimmed: &str) -> bool {
        !utils::has_repeated_word(trimmed)
            && !any_match(&self.patterns.thought.illogical_order, trimmed)
    }

    pub fn stats(&self) -> &ThoughtStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ThoughtStats::default();
    }
}

fn any_match(patterns: &[CompiledPattern], text: &str) -> bool {
    patterns.iter().any(|p| p.regex.is_match(text))
}
