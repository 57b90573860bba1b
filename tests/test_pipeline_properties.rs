// Behavioral properties of the filtering stages and pipeline
use std::sync::Arc;
use txtsift::config::FilterConfig;
use txtsift::filtering::{
    deterministic_analysis, CompletenessFilter, DomainRelevanceFilter, FilterPipeline,
    NoiseFilter, ThoughtValidator,
};
use txtsift::llm::{LanguageModelClient, LlmError};
use txtsift::patterns::PatternRegistry;

const CLINICAL: &str = "The patient received antibiotic treatment for pneumonia.";

fn create_patterns() -> Arc<PatternRegistry> {
    Arc::new(PatternRegistry::builtin().expect("Failed to create test patterns"))
}

fn sentences(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn mixed_corpus() -> Vec<String> {
    sentences(&[
        "Page 5",
        CLINICAL,
        "..........",
        "It was a lovely afternoon.",
        "Table of Contents",
        "Hypertension is treated with lifestyle changes and medication.",
        "The doctor prescribed amoxicillin for the bacterial infection.",
        "Chapter 3: Respiratory Infections",
        "Symptoms of diabetes include thirst and frequent urination.",
        "We went to the beach.",
        "Patient.",
        "Take 500 mg twice daily with food.",
    ])
}

/// Every element of `output` appears in `input`, in the same relative order
fn is_subsequence(output: &[String], input: &[String]) -> bool {
    let mut remaining = input.iter();
    output.iter().all(|o| remaining.any(|i| i == o))
}

struct FailingModel;

impl LanguageModelClient for FailingModel {
    fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Timeout { secs: 1 })
    }
}

#[test]
fn test_scenario_clinical_sentence_survives() {
    let mut pipeline = FilterPipeline::new(FilterConfig::default(), create_patterns());
    let input = sentences(&["Page 5", CLINICAL, "..........", "It was a lovely afternoon."]);

    let result = pipeline.run(&input, None);

    assert_eq!(result.filtered_sentences, vec![CLINICAL]);
}

#[test]
fn test_scenario_unpunctuated_sentence_is_incomplete() {
    let analysis = deterministic_analysis("Treatment was effective");
    assert!((analysis.completeness_score - 0.75).abs() < 1e-6);
    assert!(!analysis.is_complete);
}

#[test]
fn test_scenario_blank_sentence_removed_by_every_stage() {
    let patterns = create_patterns();
    let input = sentences(&[""]);

    assert!(NoiseFilter::new(patterns.clone()).filter(&input).is_empty());
    assert!(DomainRelevanceFilter::new(patterns.clone(), 0.3)
        .filter(&input, None)
        .is_empty());
    assert!(CompletenessFilter::new(0.6, 5).filter(&input, None).is_empty());
    assert!(ThoughtValidator::new(patterns, 0.7, false)
        .filter(&input, None)
        .is_empty());
}

#[test]
fn test_scenario_fragment_fails_validation() {
    let validator = ThoughtValidator::new(create_patterns(), 0.7, false);
    let result = validator.validate("Patient.");

    assert!(result.structure.score < 0.5);
    assert!(!result.structure.is_structurally_complete);
    assert!(!result.passes_validation);
}

#[test]
fn test_scenario_lower_health_threshold_never_reduces_retention() {
    let corpus = mixed_corpus();

    let strict = FilterConfig {
        health_threshold: 0.5,
        ..FilterConfig::default()
    };
    let lenient = FilterConfig {
        health_threshold: 0.1,
        ..FilterConfig::default()
    };

    let strict_result = FilterPipeline::new(strict, create_patterns()).run(&corpus, None);
    let lenient_result = FilterPipeline::new(lenient, create_patterns()).run(&corpus, None);

    assert!(lenient_result.overall_retention_rate >= strict_result.overall_retention_rate);
    for sentence in &strict_result.filtered_sentences {
        assert!(lenient_result.filtered_sentences.contains(sentence));
    }
}

#[test]
fn test_quality_threshold_monotonicity() {
    let corpus = mixed_corpus();
    let mut previous = usize::MAX;

    for threshold in [0.0, 0.3, 0.5, 0.7, 0.9, 1.0] {
        let mut validator = ThoughtValidator::new(create_patterns(), threshold, false);
        let kept = validator.filter(&corpus, None).len();
        assert!(kept <= previous, "threshold {} kept {} > {}", threshold, kept, previous);
        previous = kept;
    }
}

#[test]
fn test_relevance_threshold_monotonicity() {
    let corpus = mixed_corpus();
    let mut filter = DomainRelevanceFilter::new(create_patterns(), 0.3);
    let mut previous = corpus.clone();

    for threshold in [0.0, 0.1, 0.2, 0.3, 0.5, 0.8, 1.0] {
        let kept = filter.filter(&corpus, Some(threshold));
        for sentence in &kept {
            assert!(
                previous.contains(sentence),
                "threshold {} kept {:?} that a lower threshold dropped",
                threshold,
                sentence
            );
        }
        previous = kept;
    }
    assert!(filter.filter(&corpus, Some(0.3)).contains(&CLINICAL.to_string()));
}

#[test]
fn test_completeness_threshold_monotonicity() {
    let corpus = mixed_corpus();
    let mut filter = CompletenessFilter::new(0.6, 5);
    let mut previous = corpus.clone();

    for threshold in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let kept = filter.filter(&corpus, Some(threshold));
        for sentence in &kept {
            assert!(
                previous.contains(sentence),
                "threshold {} kept {:?} that a lower threshold dropped",
                threshold,
                sentence
            );
        }
        previous = kept;
    }
    // No auxiliary verb, so the clinical sentence tops out at 0.75
    assert!(filter.filter(&corpus, Some(0.75)).contains(&CLINICAL.to_string()));
    assert!(!filter.filter(&corpus, Some(1.0)).contains(&CLINICAL.to_string()));
    assert!(filter
        .filter(&corpus, Some(1.0))
        .contains(&"Hypertension is treated with lifestyle changes and medication.".to_string()));
}

#[test]
fn test_order_preservation() {
    let corpus = mixed_corpus();
    let patterns = create_patterns();

    let noise_out = NoiseFilter::new(patterns.clone()).filter(&corpus);
    assert!(is_subsequence(&noise_out, &corpus));

    let relevance_out = DomainRelevanceFilter::new(patterns.clone(), 0.1).filter(&corpus, None);
    assert!(is_subsequence(&relevance_out, &corpus));

    let completeness_out = CompletenessFilter::new(0.5, 3).filter(&corpus, None);
    assert!(is_subsequence(&completeness_out, &corpus));

    let thought_out = ThoughtValidator::new(patterns.clone(), 0.5, false).filter(&corpus, None);
    assert!(is_subsequence(&thought_out, &corpus));

    let result = FilterPipeline::new(FilterConfig::default(), patterns).run(&corpus, None);
    assert!(is_subsequence(&result.filtered_sentences, &corpus));
}

#[test]
fn test_noise_filter_idempotence() {
    let mut filter = NoiseFilter::new(create_patterns());
    let once = filter.filter(&mixed_corpus());
    let twice = filter.filter(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_failed_model_matches_rule_based_output() {
    let corpus = mixed_corpus();

    let mut rule_based = FilterPipeline::new(FilterConfig::default(), create_patterns());
    let mut degraded = FilterPipeline::new(FilterConfig::default(), create_patterns())
        .with_language_model(Arc::new(FailingModel));

    let expected = rule_based.run(&corpus, None);
    let actual = degraded.run(&corpus, None);

    assert_eq!(actual.filtered_sentences, expected.filtered_sentences);
    assert!(degraded.filter_statistics().completeness.fallbacks > 0);
    assert_eq!(rule_based.filter_statistics().completeness.fallbacks, 0);
}

#[test]
fn test_conjunctive_gating() {
    // Score clears the threshold but the sentence lacks terminal punctuation
    let mut completeness = CompletenessFilter::new(0.5, 5);
    assert!(completeness
        .filter(&sentences(&["Treatment was effective"]), None)
        .is_empty());

    // Zero quality threshold still requires every component to pass
    let validator = ThoughtValidator::new(create_patterns(), 0.0, false);
    let result = validator.validate("Patient.");
    assert!(result.overall_quality >= 0.0);
    assert!(!result.components_pass());
    assert!(!result.passes_validation);
}

#[test]
fn test_empty_input_safety() {
    let patterns = create_patterns();
    let empty: Vec<String> = Vec::new();

    assert!(NoiseFilter::new(patterns.clone()).filter(&empty).is_empty());
    assert!(DomainRelevanceFilter::new(patterns.clone(), 0.3)
        .filter(&empty, None)
        .is_empty());
    assert!(CompletenessFilter::new(0.6, 5).filter(&empty, None).is_empty());
    assert!(ThoughtValidator::new(patterns.clone(), 0.7, false)
        .filter(&empty, None)
        .is_empty());

    let result = FilterPipeline::new(FilterConfig::default(), patterns).run(&empty, None);
    assert!(result.filtered_sentences.is_empty());
    assert_eq!(result.overall_retention_rate, 0.0);
}
