// Integration test for the filtering pipeline with realistic document text
use std::sync::{Arc, Mutex};
use txtsift::config::FilterConfig;
use txtsift::coordinator::segment_sentences;
use txtsift::filtering::{AnalysisMode, FilterPipeline, Stage};
use txtsift::llm::{LanguageModelClient, LlmError};
use txtsift::patterns::PatternRegistry;

const CLINICAL: &str = "The patient received antibiotic treatment for pneumonia.";

fn create_patterns() -> Arc<PatternRegistry> {
    Arc::new(PatternRegistry::builtin().expect("Failed to create test patterns"))
}

/// Text as it typically comes out of a PDF-to-text conversion
const EXTRACTED_DOCUMENT: &str = r#"
CLINICAL PRACTICE GUIDELINES
Table of Contents
Chapter 3: Respiratory Infections
..........
1.2 Treatment Options
Page 5
The patient received antibiotic treatment for pneumonia. It was a lovely afternoon.
•
Figure 2: Dosage chart
www.example.org
Copyright 2023 Health Press. All rights reserved.
a)
"#;

/// Answers every prompt with a fixed JSON verdict and records the prompts
struct ApprovingModel {
    prompts: Mutex<Vec<String>>,
}

impl ApprovingModel {
    fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl LanguageModelClient for ApprovingModel {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let verdict = r#"{"completeness_score": 0.9, "is_complete": true,
            "is_meaningful": true, "translation_ready": true, "reasoning": "full clause"}"#;
        if prompt.contains("JSON array") {
            let count = prompt.lines().filter(|l| l.contains(". \"")).count();
            Ok(format!("[{}]", vec![verdict; count].join(",")))
        } else {
            Ok(verdict.to_string())
        }
    }

    fn name(&self) -> &str {
        "approving"
    }
}

#[test]
fn test_extracted_document_filtering() {
    let mut pipeline = FilterPipeline::new(FilterConfig::default(), create_patterns());
    let sentences = segment_sentences(EXTRACTED_DOCUMENT);

    let result = pipeline.run(&sentences, None);

    println!("Document filtering stats:");
    println!("  Input sentences: {}", result.input_count);
    for stage in &result.stage_results {
        println!(
            "  After stage {} ({}): {} ({:.0}% retained)",
            stage.stage.number(),
            stage.stage,
            stage.output_count,
            stage.retention_rate * 100.0
        );
    }
    println!("  Processing time: {:?}", result.elapsed);

    assert_eq!(result.input_count, sentences.len());
    assert!(result.input_count >= 13);

    // Only the two prose sentences get past noise removal
    let noise = &result.stage_results[0];
    assert_eq!(noise.stage, Stage::Noise);
    assert_eq!(noise.output_count, 2);

    assert_eq!(result.filtered_sentences, vec![CLINICAL]);
}

#[test]
fn test_delegated_completeness() {
    let model = Arc::new(ApprovingModel::new());
    let mut pipeline = FilterPipeline::new(FilterConfig::default(), create_patterns())
        .with_language_model(model.clone());

    let sentences = segment_sentences(EXTRACTED_DOCUMENT);
    let result = pipeline.run(&sentences, None);

    assert_eq!(result.filtered_sentences, vec![CLINICAL]);

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(CLINICAL));

    let stats = pipeline.filter_statistics();
    assert_eq!(stats.completeness.delegated_calls, 1);
    assert_eq!(stats.completeness.fallbacks, 0);
}

#[test]
fn test_delegated_batches() {
    let model = Arc::new(ApprovingModel::new());
    let config = FilterConfig {
        batch_size: 2,
        ..FilterConfig::default()
    };
    let mut pipeline =
        FilterPipeline::new(config, create_patterns()).with_language_model(model.clone());

    let sentences: Vec<String> = (1..=5)
        .map(|i| format!("Patient {} received insulin therapy for diabetes.", i))
        .collect();
    let result = pipeline.run(&sentences, Some(&[Stage::Completeness]));

    assert_eq!(result.filtered_sentences, sentences);
    // Chunks of 2, 2 and 1
    assert_eq!(model.prompts.lock().unwrap().len(), 3);
    assert_eq!(pipeline.filter_statistics().completeness.delegated_calls, 3);
}

#[test]
fn test_rule_based_mode_is_reported() {
    let mut pipeline = FilterPipeline::new(FilterConfig::default(), create_patterns());
    pipeline.run(&[CLINICAL.to_string()], Some(&[Stage::Completeness]));

    let stats = pipeline.filter_statistics();
    assert_eq!(stats.completeness.total_processed, 1);
    assert_eq!(stats.completeness.delegated_calls, 0);
    assert_eq!(
        txtsift::filtering::deterministic_analysis(CLINICAL).mode,
        AnalysisMode::Deterministic
    );
}

#[test]
fn test_large_input() {
    let mut pipeline = FilterPipeline::new(FilterConfig::default(), create_patterns());

    let mut sentences = Vec::new();
    for i in 0..2000 {
        match i % 4 {
            0 => sentences.push(format!("Page {}", i)),
            1 => sentences.push(CLINICAL.to_string()),
            2 => sentences.push("It was a lovely afternoon.".to_string()),
            _ => sentences.push("..........".to_string()),
        }
    }

    let result = pipeline.run(&sentences, None);

    println!("Large input test (2000 sentences):");
    println!("  Output sentences: {}", result.output_count);
    println!("  Processing time: {:?}", result.elapsed);

    assert_eq!(result.output_count, 500);
    assert!((result.overall_retention_rate - 0.25).abs() < 1e-9);

    let stats = pipeline.statistics();
    assert_eq!(stats.total_runs, 1);
    assert_eq!(stats.stage_performance[&Stage::Noise].total_output, 1000);
}
