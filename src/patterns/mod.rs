//! Pattern registry for the filtering stages
//!
//! This module provides:
//! - A serializable domain lexicon (term sets, weighted domain patterns,
//!   medication patterns, validator vocabulary) that can be loaded from TOML
//! - Pre-compiled regex libraries for every stage, built once at registry
//!   construction and shared by the stages through `Arc<PatternRegistry>`

mod builtin;
mod health;

use crate::error::{Result, TxtsiftError};
use ahash::AHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named regex pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPattern {
    pub name: String,
    pub pattern: String,
}

/// Regex pattern contributing a fixed increment per match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedPattern {
    pub name: String,
    pub pattern: String,
    pub weight: f32,
}

/// Domain vocabulary consumed by the relevance scorer and the thought validator
///
/// Every word list is matched case-insensitively. Patterns carry their own
/// regex flags so that case-sensitive abbreviation sets stay case-sensitive.
/// Sections left out of a lexicon file are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainLexicon {
    /// Human-readable domain name (e.g. "health")
    pub name: String,

    /// Core terminology
    pub core_terms: Vec<String>,
    /// Anatomy and structure terms
    pub anatomy_terms: Vec<String>,
    /// Condition descriptors
    pub condition_terms: Vec<String>,
    /// Procedure and treatment terms
    pub treatment_terms: Vec<String>,

    /// Key entity words; each one present adds a fixed increment
    pub entity_words: Vec<String>,
    /// Entity patterns (e.g. drug-name suffixes); each matching pattern adds `weight`
    pub entity_patterns: Vec<WeightedPattern>,
    /// Dosage, unit, code, abbreviation and procedural patterns; each match adds `weight`
    pub domain_patterns: Vec<WeightedPattern>,
    /// Adjectives and nouns signalling a domain context
    pub context_indicators: Vec<String>,

    /// Nouns accepted as sentence subjects by the structure check
    pub subject_nouns: Vec<String>,
    /// Domain action verbs (lemmas; inflections are matched automatically)
    pub action_verbs: Vec<String>,
    /// Words marking domain information in the actionability check
    pub information_terms: Vec<String>,
}

impl DomainLexicon {
    /// Load a lexicon from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TxtsiftError::Io {
            source: e,
            context: format!("Failed to read lexicon file: {:?}", path),
        })?;
        let lexicon: DomainLexicon = toml::from_str(&content)?;
        Ok(lexicon)
    }

    /// Total number of distinct domain terms across the four term sets
    pub fn term_count(&self) -> usize {
        self.core_terms
            .iter()
            .chain(&self.anatomy_terms)
            .chain(&self.condition_terms)
            .chain(&self.treatment_terms)
            .map(|t| t.to_lowercase())
            .collect::<AHashSet<_>>()
            .len()
    }
}

/// Compiled pattern with its name and weight
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub regex: Regex,
    pub weight: f32,
}

/// Stage 1 pattern library
#[derive(Debug, Clone)]
pub struct NoisePatterns {
    /// Structural lines: numbers, numerals, headers, TOC markers, separators,
    /// copyright/ISBN/URL lines, table borders
    pub structural: Vec<CompiledPattern>,
    /// Bullet glyphs, checkboxes, arrows and bare list markers
    pub formatting: Vec<CompiledPattern>,
    /// Header/footer keywords
    pub header_keywords: Regex,
    /// Date expressions
    pub dates: Vec<Regex>,
}

/// Stage 2 pattern library
#[derive(Debug, Clone)]
pub struct DomainPatterns {
    pub terms: AHashSet<String>,
    pub entity_words: Vec<String>,
    pub entity_patterns: Vec<CompiledPattern>,
    pub domain_patterns: Vec<CompiledPattern>,
    pub context_indicators: Vec<String>,
}

/// Stage 4 pattern library
#[derive(Debug, Clone)]
pub struct ThoughtPatterns {
    pub subject: Vec<CompiledPattern>,
    pub verb: Vec<CompiledPattern>,
    pub object: Vec<CompiledPattern>,
    pub actionable: Vec<CompiledPattern>,
    pub illogical_order: Vec<CompiledPattern>,
    pub obvious_errors: Vec<CompiledPattern>,
    pub factual: Vec<Regex>,
    pub information_terms: Vec<String>,
    pub procedural_terms: Vec<String>,
    pub instructional_terms: Vec<String>,
    pub conjunctions: Vec<String>,
}

/// Pattern registry with all pre-compiled patterns
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    /// Name of the domain the lexicon describes
    pub domain_name: String,
    pub noise: NoisePatterns,
    pub domain: DomainPatterns,
    pub thought: ThoughtPatterns,
}

impl PatternRegistry {
    /// Build the registry for the built-in health lexicon
    pub fn builtin() -> Result<Self> {
        Self::from_lexicon(DomainLexicon::health())
    }

    /// Load the lexicon from a TOML file and build the registry
    pub fn from_lexicon_file(path: &Path) -> Result<Self> {
        let lexicon = DomainLexicon::from_file(path)?;
        Self::from_lexicon(lexicon)
    }

    /// Build the registry from a parsed lexicon
    pub fn from_lexicon(lexicon: DomainLexicon) -> Result<Self> {
        let noise = NoisePatterns {
            structural: compile_named(builtin::NOISE_STRUCTURAL)?,
            formatting: compile_named(builtin::NOISE_FORMATTING)?,
            header_keywords: compile("header_keywords", builtin::HEADER_FOOTER_KEYWORDS)?,
            dates: builtin::DATE_PATTERNS
                .iter()
                .map(|p| compile("date", p))
                .collect::<Result<Vec<_>>>()?,
        };

        let terms: AHashSet<String> = lexicon
            .core_terms
            .iter()
            .chain(&lexicon.anatomy_terms)
            .chain(&lexicon.condition_terms)
            .chain(&lexicon.treatment_terms)
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let domain = DomainPatterns {
            terms,
            entity_words: lowercase_all(&lexicon.entity_words),
            entity_patterns: compile_weighted(&lexicon.entity_patterns)?,
            domain_patterns: compile_weighted(&lexicon.domain_patterns)?,
            context_indicators: lowercase_all(&lexicon.context_indicators),
        };

        let mut subject = vec![
            pattern("pronoun", &word_alternation(builtin::PRONOUNS), 1.0)?,
            pattern("determiner_phrase", builtin::DETERMINER_PHRASE, 1.0)?,
        ];
        if !lexicon.subject_nouns.is_empty() {
            subject.push(pattern(
                "domain_noun",
                &word_alternation(&lexicon.subject_nouns),
                1.0,
            )?);
        }

        let mut verb = vec![
            pattern("being_verb", &word_alternation(builtin::BEING_VERBS), 1.0)?,
            pattern("auxiliary_verb", &word_alternation(builtin::AUXILIARY_VERBS), 1.0)?,
            pattern("action_verb", &inflected_alternation(builtin::COMMON_VERBS), 1.0)?,
            pattern("past_tense", builtin::REGULAR_PAST_TENSE, 1.0)?,
        ];
        if !lexicon.action_verbs.is_empty() {
            verb.push(pattern(
                "domain_action",
                &inflected_alternation(&lexicon.action_verbs),
                1.0,
            )?);
        }

        let mut actionable = builtin::ACTIONABLE
            .iter()
            .map(|(name, source)| pattern(name, source, builtin::ACTIONABLE_WEIGHT))
            .collect::<Result<Vec<_>>>()?;
        if !lexicon.action_verbs.is_empty() {
            actionable.push(pattern(
                "domain_actions",
                &inflected_alternation(&lexicon.action_verbs),
                builtin::ACTIONABLE_WEIGHT,
            )?);
        }

        let thought = ThoughtPatterns {
            subject,
            verb,
            object: compile_named(builtin::OBJECT)?,
            actionable,
            illogical_order: compile_named(builtin::ILLOGICAL_ORDER)?,
            obvious_errors: compile_named(builtin::OBVIOUS_ERRORS)?,
            factual: builtin::FACTUAL
                .iter()
                .map(|p| compile("factual", p))
                .collect::<Result<Vec<_>>>()?,
            information_terms: lowercase_all(&lexicon.information_terms),
            procedural_terms: lowercase_all(builtin::PROCEDURAL_TERMS),
            instructional_terms: lowercase_all(builtin::INSTRUCTIONAL_TERMS),
            conjunctions: lowercase_all(builtin::CONJUNCTIONS),
        };

        tracing::debug!(
            "Pattern registry built for '{}' domain: {} terms, {} domain patterns",
            lexicon.name,
            domain.terms.len(),
            domain.domain_patterns.len()
        );

        Ok(Self {
            domain_name: lexicon.name,
            noise,
            domain,
            thought,
        })
    }
}

fn compile(name: &str, source: &str) -> Result<Regex> {
    Regex::new(source)
        .map_err(|e| TxtsiftError::Pattern(format!("Invalid pattern '{}': {}", name, e)))
}

fn pattern(name: &str, source: &str, weight: f32) -> Result<CompiledPattern> {
    Ok(CompiledPattern {
        name: name.to_string(),
        regex: compile(name, source)?,
        weight,
    })
}

fn compile_named(specs: &[(&str, &str)]) -> Result<Vec<CompiledPattern>> {
    specs
        .iter()
        .map(|(name, source)| pattern(name, source, 1.0))
        .collect()
}

fn compile_weighted(specs: &[WeightedPattern]) -> Result<Vec<CompiledPattern>> {
    specs
        .iter()
        .map(|wp| pattern(&wp.name, &wp.pattern, wp.weight))
        .collect()
}

fn lowercase_all<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Case-insensitive whole-word alternation: `(?i)\b(?:w1|w2|...)\b`
fn word_alternation<S: AsRef<str>>(words: &[S]) -> String {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| regex::escape(w.as_ref().trim()))
        .filter(|w| !w.is_empty())
        .collect();
    format!(r"(?i)\b(?:{})\b", alternatives.join("|"))
}

/// Like [`word_alternation`] but also accepts regular inflections of each lemma
fn inflected_alternation<S: AsRef<str>>(lemmas: &[S]) -> String {
    let alternatives: Vec<String> = lemmas
        .iter()
        .map(|w| regex::escape(w.as_ref().trim()))
        .filter(|w| !w.is_empty())
        .collect();
    format!(r"(?i)\b(?:{})(?:s|es|d|ed|ing)?\b", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_compiles() {
        let registry = PatternRegistry::builtin().unwrap();
        assert_eq!(registry.domain_name, "health");
        assert!(!registry.noise.structural.is_empty());
        assert!(registry.domain.terms.contains("pneumonia"));
        assert!(registry.domain.terms.contains("antibiotic"));
    }

    #[test]
    fn test_health_lexicon_size() {
        let lexicon = DomainLexicon::health();
        assert!(lexicon.term_count() >= 300);
    }

    #[test]
    fn test_word_alternation_is_whole_word() {
        let re = Regex::new(&word_alternation(&["treat"])).unwrap();
        assert!(re.is_match("We TREAT it"));
        assert!(!re.is_match("treatment"));
    }

    #[test]
    fn test_inflected_alternation() {
        let re = Regex::new(&inflected_alternation(&["treat", "diagnose"])).unwrap();
        assert!(re.is_match("she was treated"));
        assert!(re.is_match("it was diagnosed"));
        assert!(re.is_match("treating"));
        assert!(!re.is_match("treatment"));
    }

    #[test]
    fn test_invalid_lexicon_pattern_reports_error() {
        let mut lexicon = DomainLexicon::health();
        lexicon.domain_patterns.push(WeightedPattern {
            name: "broken".to_string(),
            pattern: r"(unclosed".to_string(),
            weight: 0.2,
        });

        let err = PatternRegistry::from_lexicon(lexicon).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_lexicon_roundtrip_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");

        let mut lexicon = DomainLexicon::health();
        lexicon.name = "custom".to_string();
        std::fs::write(&path, toml::to_string_pretty(&lexicon).unwrap()).unwrap();

        let registry = PatternRegistry::from_lexicon_file(&path).unwrap();
        assert_eq!(registry.domain_name, "custom");
    }

    #[test]
    fn test_partial_lexicon_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");
        std::fs::write(&path, "name = \"dental\"\ncore_terms = [\"Molar\", \"enamel\"]\n").unwrap();

        let registry = PatternRegistry::from_lexicon_file(&path).unwrap();
        assert_eq!(registry.domain_name, "dental");
        assert!(registry.domain.terms.contains("molar"));
        assert!(registry.domain.domain_patterns.is_empty());
        assert_eq!(registry.thought.subject.len(), 2);
    }

    #[test]
    fn test_missing_lexicon_file() {
        let result = PatternRegistry::from_lexicon_file(Path::new("/nonexistent/lexicon.toml"));
        assert!(matches!(result, Err(TxtsiftError::Io { .. })));
    }
}
