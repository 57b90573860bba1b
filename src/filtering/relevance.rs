// Stage 2: Domain relevance scoring
// Terminology-density weighted policy: terms 0.4, entities 0.3, patterns 0.2, context 0.1
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::filtering::utils;
use crate::patterns::PatternRegistry;

const TERM_WEIGHT: f32 = 0.4;
const ENTITY_WEIGHT: f32 = 0.3;
const PATTERN_WEIGHT: f32 = 0.2;
const CONTEXT_WEIGHT: f32 = 0.1;

const DENSITY_BOOST_MIN_TERMS: usize = 3;
const DENSITY_BOOST: f32 = 1.5;
const ENTITY_WORD_INCREMENT: f32 = 0.1;
const CONTEXT_INCREMENT: f32 = 0.2;

/// Relevance bucket of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceLevel {
    None,
    Low,
    Medium,
    High,
}

impl RelevanceLevel {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            RelevanceLevel::High
        } else if score >= 0.5 {
            RelevanceLevel::Medium
        } else if score >= 0.3 {
            RelevanceLevel::Low
        } else {
            RelevanceLevel::None
        }
    }
}

/// Weighted components of a relevance score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelevanceComponents {
    pub term_density: f32,
    pub entity: f32,
    pub pattern: f32,
    pub context: f32,
}

impl RelevanceComponents {
    pub fn total(&self) -> f32 {
        (self.term_density * TERM_WEIGHT
            + self.entity * ENTITY_WEIGHT
            + self.pattern * PATTERN_WEIGHT
            + self.context * CONTEXT_WEIGHT)
            .clamp(0.0, 1.0)
    }
}

/// Detailed relevance analysis of one sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceAnalysis {
    pub score: f32,
    pub level: RelevanceLevel,
    pub components: RelevanceComponents,
    pub matched_terms: Vec<String>,
    pub matched_entities: Vec<String>,
    pub matched_patterns: Vec<String>,
    pub context_indicators: Vec<String>,
}

/// Relevance filter counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelevanceStats {
    pub total_processed: u64,
    pub relevant: u64,
    pub irrelevant: u64,
    pub high_relevance: u64,
    pub medium_relevance: u64,
    pub low_relevance: u64,
    pub no_relevance: u64,
    pub score_sum: f64,
}

impl RelevanceStats {
    fn record_level(&mut self, level: RelevanceLevel) {
        match level {
            RelevanceLevel::High => self.high_relevance += 1,
            RelevanceLevel::Medium => self.medium_relevance += 1,
            RelevanceLevel::Low => self.low_relevance += 1,
            RelevanceLevel::None => self.no_relevance += 1,
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.score_sum / self.total_processed as f64
        }
    }
}

/// Domain relevance scorer and filter
pub struct DomainRelevanceFilter {
    patterns: Arc<PatternRegistry>,
    threshold: f32,
    stats: RelevanceStats,
}

impl DomainRelevanceFilter {
    pub fn new(patterns: Arc<PatternRegistry>, threshold: f32) -> Self {
        tracing::debug!(
            "Relevance filter initialized for '{}' domain (threshold {:.2}, {} terms)",
            patterns.domain_name,
            threshold,
            patterns.domain.terms.len()
        );
        Self {
            patterns,
            threshold,
            stats: RelevanceStats::default(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Relevance score in [0, 1]
    pub fn score(&self, sentence: &str) -> f32 {
        self.components(sentence).total()
    }

    /// Score breakdown
    pub fn components(&self, sentence: &str) -> RelevanceComponents {
        let lower = sentence.to_lowercase();
        RelevanceComponents {
            term_density: self.term_density(sentence),
            entity: self.entity_score(sentence, &lower),
            pattern: self.pattern_score(sentence),
            context: self.context_score(&lower),
        }
    }

    /// Full analysis including the matched vocabulary
    pub fn analyze(&self, sentence: &str) -> RelevanceAnalysis {
        let lower = sentence.to_lowercase();
        let domain = &self.patterns.domain;

        let mut matched_terms: Vec<String> = Vec::new();
        for word in sentence.split_whitespace().map(utils::clean_word) {
            if domain.terms.contains(&word) && !matched_terms.contains(&word) {
                matched_terms.push(word);
            }
        }

        let matched_entities = domain
            .entity_words
            .iter()
            .filter(|w| utils::contains_word(&lower, w))
            .cloned()
            .chain(
                domain
                    .entity_patterns
                    .iter()
                    .flat_map(|p| p.regex.find_iter(sentence))
                    .map(|m| m.as_str().to_lowercase()),
            )
            .collect();

        let matched_patterns = domain
            .domain_patterns
            .iter()
            .filter(|p| p.regex.is_match(sentence))
            .map(|p| p.name.clone())
            .collect();

        let context_indicators = domain
            .context_indicators
            .iter()
            .filter(|w| utils::contains_word(&lower, w))
            .cloned()
            .collect();

        let components = self.components(sentence);
        let score = components.total();

        RelevanceAnalysis {
            score,
            level: RelevanceLevel::from_score(score),
            components,
            matched_terms,
            matched_entities,
            matched_patterns,
            context_indicators,
        }
    }

    /// Keep sentences scoring at or above the threshold (configured one when `None`)
    pub fn filter(&mut self, sentences: &[String], threshold: Option<f32>) -> Vec<String> {
        let threshold = threshold.unwrap_or(self.threshold);
        let mut kept = Vec::new();

        for sentence in sentences {
            let score = self.score(sentence);
            self.stats.total_processed += 1;
            self.stats.score_sum += score as f64;
            self.stats.record_level(RelevanceLevel::from_score(score));

            if score >= threshold {
                self.stats.relevant += 1;
                kept.push(sentence.clone());
            } else {
                self.stats.irrelevant += 1;
            }
        }

        tracing::debug!(
            "Relevance filter: {} -> {} sentences (threshold {:.2})",
            sentences.len(),
            kept.len(),
            threshold
        );
        kept
    }

    fn term_density(&self, sentence: &str) -> f32 {
        let words: Vec<String> = sentence
            .split_whitespace()
            .map(utils::clean_word)
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return 0.0;
        }

        let matches = words
            .iter()
            .filter(|w| self.patterns.domain.terms.contains(w.as_str()))
            .count();

        let mut density = matches as f32 / words.len() as f32;
        if matches >= DENSITY_BOOST_MIN_TERMS {
            density *= DENSITY_BOOST;
        }
        density.min(1.0)
    }

    fn entity_score(&self, sentence: &str, lower: &str) -> f32 {
        let domain = &self.patterns.domain;
        let pattern_hits: f32 = domain
            .entity_patterns
            .iter()
            .filter(|p| p.regex.is_match(sentence))
            .map(|p| p.weight)
            .sum();
        let word_hits =
            utils::count_words_present(lower, &domain.entity_words) as f32 * ENTITY_WORD_INCREMENT;

        (pattern_hits + word_hits).min(1.0)
    }

    fn pattern_score(&self, sentence: &str) -> f32 {
        let score: f32 = self
            .patterns
            .domain
            .domain_patterns
            .iter()
            .map(|p| p.regex.find_iter(sentence).count() as f32 * p.weight)
            .sum();
        score.min(1.0)
    }

    fn context_score(&self, lower: &str) -> f32 {
        let hits = utils::count_words_present(lower, &self.patterns.domain.context_indicators);
        (hits as f32 * CONTEXT_INCREMENT).min(1.0)
    }

    pub fn stats(&self) -> &RelevanceStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RelevanceStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_filter(threshold: f32) -> DomainRelevanceFilter {
        let patterns =
            Arc::new(PatternRegistry::builtin().expect("Failed to create test patterns"));
        DomainRelevanceFilter::new(patterns, threshold)
    }

    #[test]
    fn test_clinical_sentence_scores_above_default() {
        let filter = create_test_filter(0.3);
        let score = filter.score("The patient received antibiotic treatment for pneumonia.");
        assert!(score >= 0.3, "score was {score}");
        assert!(score < 0.5);
    }

    #[test]
    fn test_unrelated_sentence_scores_zero() {
        let filter = create_test_filter(0.3);
        assert_eq!(filter.score("It was a lovely afternoon."), 0.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let filter = create_test_filter(0.3);
        let dense = "Clinical patient diagnosis: acute pneumonia, fever, cough; \
                     administered amoxicillin 500 mg IV twice daily, BP 120/80 mmHg, \
                     HR 90 bpm, medical therapeutic surgical health care.";
        let score = filter.score(dense);
        assert!(score > 0.6);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_analyze_reports_matches() {
        let filter = create_test_filter(0.3);
        let analysis = filter.analyze("Take 500 mg of amoxicillin twice daily for the infection.");

        assert!(analysis.matched_terms.contains(&"infection".to_string()));
        assert!(analysis.matched_entities.contains(&"amoxicillin".to_string()));
        assert!(analysis.matched_patterns.contains(&"dosage".to_string()));
        assert!(analysis.matched_patterns.contains(&"frequency".to_string()));
        assert_eq!(analysis.level, RelevanceLevel::from_score(analysis.score));
    }

    #[test]
    fn test_abbreviations_are_case_sensitive() {
        let filter = create_test_filter(0.3);
        assert_eq!(filter.components("Tea or coffee").pattern, 0.0);
        assert!(filter.components("Transfer to the ICU or ER").pattern > 0.0);
    }

    #[test]
    fn test_relevance_levels() {
        assert_eq!(RelevanceLevel::from_score(0.1), RelevanceLevel::None);
        assert_eq!(RelevanceLevel::from_score(0.3), RelevanceLevel::Low);
        assert_eq!(RelevanceLevel::from_score(0.5), RelevanceLevel::Medium);
        assert_eq!(RelevanceLevel::from_score(0.8), RelevanceLevel::High);
    }

    #[test]
    fn test_filter_threshold_override_and_stats() {
        let mut filter = create_test_filter(0.9);
        let sentences = vec![
            "The patient received antibiotic treatment for pneumonia.".to_string(),
            "It was a lovely afternoon.".to_string(),
        ];

        assert!(filter.filter(&sentences, None).is_empty());
        let kept = filter.filter(&sentences, Some(0.3));
        assert_eq!(kept, vec![sentences[0].clone()]);

        let stats = filter.stats();
        assert_eq!(stats.total_processed, 4);
        assert_eq!(stats.relevant, 1);
        assert_eq!(stats.irrelevant, 3);
        // Clinical sentence is low relevance on both passes, the other has none
        assert_eq!(stats.low_relevance, 2);
        assert_eq!(stats.no_relevance, 2);
        assert_eq!(stats.medium_relevance + stats.high_relevance, 0);

        filter.reset_stats();
        assert_eq!(filter.stats().total_processed, 0);
    }

    #[test]
    fn test_everyday_words_are_not_domain_entities() {
        let filter = create_test_filter(0.3);
        let sentence = "In April we examine the secure accurate spam conditioning.";

        let analysis = filter.analyze(sentence);
        assert!(analysis.matched_entities.is_empty(), "{:?}", analysis.matched_entities);
        assert!(analysis.context_indicators.is_empty());
        assert!(filter.score(sentence) < 0.3);

        let components = filter.components("Lisinopril and diazepam were stopped.");
        assert!(components.entity > 0.5);
    }

    #[test]
    fn test_entity_words_match_plurals() {
        let filter = create_test_filter(0.3);
        let analysis = filter.analyze("Symptoms and diseases were recorded.");
        assert!(analysis.matched_entities.contains(&"symptom".to_string()));
        assert!(analysis.matched_entities.contains(&"disease".to_string()));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut filter = create_test_filter(0.3);
        let sentence = "The patient received antibiotic treatment for pneumonia.".to_string();
        let score = filter.score(&sentence);
        let kept = filter.filter(std::slice::from_ref(&sentence), Some(score));
        assert_eq!(kept.len(), 1);
    }
}
