// Stage 3: Completeness and meaning analysis
// Delegates to a language model when one is injected; deterministic rules otherwise
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::filtering::response::{self, ParsedResponse};
use crate::filtering::utils;
use crate::llm::LanguageModelClient;

pub use crate::filtering::response::{AnalysisMode, AnalysisResult};

const MIN_CHARS: usize = 10;
const MIN_TOKENS: usize = 3;
const COMPLETE_SCORE: f32 = 0.6;
const VERB_INDICATORS: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "had", "will", "would", "can", "could", "should",
];

/// Completeness filter counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletenessStats {
    pub total_processed: u64,
    pub complete: u64,
    pub incomplete: u64,
    pub meaningful: u64,
    pub translation_ready: u64,
    pub delegated_calls: u64,
    /// Delegated attempts that degraded to rule-based analysis
    pub fallbacks: u64,
    pub score_sum: f64,
    pub delegated_time: Duration,
}

impl CompletenessStats {
    pub fn average_score(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.score_sum / self.total_processed as f64
        }
    }

    fn record(&mut self, result: &AnalysisResult) {
        self.total_processed += 1;
        self.score_sum += result.completeness_score as f64;
        if result.is_complete {
            self.complete += 1;
        } else {
            self.incomplete += 1;
        }
        if result.is_meaningful {
            self.meaningful += 1;
        }
        if result.translation_ready {
            self.translation_ready += 1;
        }
        if result.mode == AnalysisMode::Fallback {
            self.fallbacks += 1;
        }
    }
}

/// Rule-based completeness analysis
///
/// Score is the mean of four factors: at least 10 characters, at least three
/// tokens, terminal punctuation, an auxiliary or copula verb. The sentence
/// is complete only when the score reaches 0.6 and it is punctuated.
pub fn deterministic_analysis(sentence: &str) -> AnalysisResult {
    let trimmed = sentence.trim();
    let tokens = utils::tokens(trimmed);

    let long_enough = trimmed.chars().count() >= MIN_CHARS;
    let enough_tokens = tokens.len() >= MIN_TOKENS;
    let punctuated = utils::has_terminal_punctuation(trimmed);
    let has_verb = tokens
        .iter()
        .map(|t| utils::clean_word(t))
        .any(|w| VERB_INDICATORS.contains(&w.as_str()));

    let factors = [long_enough, enough_tokens, punctuated, has_verb];
    let score = factors.iter().filter(|f| **f).count() as f32 / factors.len() as f32;

    let is_complete = score >= COMPLETE_SCORE && punctuated;
    let is_meaningful = long_enough && enough_tokens;

    let mut missing = Vec::new();
    if !long_enough {
        missing.push("too short");
    }
    if !enough_tokens {
        missing.push("fewer than 3 tokens");
    }
    if !punctuated {
        missing.push("no terminal punctuation");
    }
    if !has_verb {
        missing.push("no auxiliary verb");
    }
    let reasoning = if missing.is_empty() {
        "rule-based: all completeness factors present".to_string()
    } else {
        format!("rule-based: {}", missing.join(", "))
    };

    AnalysisResult {
        completeness_score: score,
        is_complete,
        is_meaningful,
        translation_ready: is_complete && punctuated,
        reasoning,
        mode: AnalysisMode::Deterministic,
    }
}

fn fallback_analysis(sentence: &str, reason: &str) -> AnalysisResult {
    let mut result = deterministic_analysis(sentence);
    result.mode = AnalysisMode::Fallback;
    result.reasoning = format!("{} (fallback: {})", result.reasoning, reason);
    result
}

/// Completeness and meaning filter
pub struct CompletenessFilter {
    threshold: f32,
    batch_size: usize,
    client: Option<Arc<dyn LanguageModelClient>>,
    stats: CompletenessStats,
}

impl CompletenessFilter {
    pub fn new(threshold: f32, batch_size: usize) -> Self {
        Self {
            threshold,
            batch_size,
            client: None,
            stats: CompletenessStats::default(),
        }
    }

    /// Attach a language model; analysis becomes delegated
    pub fn with_client(mut self, client: Arc<dyn LanguageModelClient>) -> Self {
        tracing::debug!("Completeness filter delegating to '{}'", client.name());
        self.client = Some(client);
        self
    }

    pub fn is_delegated(&self) -> bool {
        self.client.is_some()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn update_config(&mut self, threshold: f32, batch_size: usize) {
        self.threshold = threshold;
        self.batch_size = batch_size;
    }

    /// Analyze one sentence
    pub fn analyze(&mut self, sentence: &str) -> AnalysisResult {
        let result = match self.client.clone() {
            None => deterministic_analysis(sentence),
            Some(client) => self.delegate_single(client.as_ref(), sentence),
        };
        self.stats.record(&result);
        result
    }

    /// Analyze sentences in fixed-size chunks; one result per input, in order
    pub fn batch_analyze(
        &mut self,
        sentences: &[String],
        batch_size: usize,
    ) -> Vec<AnalysisResult> {
        let batch_size = batch_size.max(1);
        let mut results = Vec::with_capacity(sentences.len());

        for chunk in sentences.chunks(batch_size) {
            let chunk_results: Vec<AnalysisResult> = match self.client.clone() {
                None => chunk.iter().map(|s| deterministic_analysis(s)).collect(),
                Some(client) if chunk.len() == 1 => {
                    vec![self.delegate_single(client.as_ref(), &chunk[0])]
                }
                Some(client) => self.delegate_batch(client.as_ref(), chunk),
            };
            for result in &chunk_results {
                self.stats.record(result);
            }
            results.extend(chunk_results);
        }

        results
    }

    /// Keep sentences with `score >= threshold` that are also complete
    pub fn filter(&mut self, sentences: &[String], threshold: Option<f32>) -> Vec<String> {
        let threshold = threshold.unwrap_or(self.threshold);
        let analyses = self.batch_analyze(sentences, self.batch_size);

        let kept: Vec<String> = sentences
            .iter()
            .zip(&analyses)
            .filter(|(_, a)| a.completeness_score >= threshold && a.is_complete)
            .map(|(s, _)| s.clone())
            .collect();

        tracing::debug!(
            "Completeness filter: {} -> {} sentences (threshold {:.2}, {})",
            sentences.len(),
            kept.len(),
            threshold,
            if self.is_delegated() { "delegated" } else { "rule-based" }
        );
        kept
    }

    fn delegate_single(
        &mut self,
        client: &dyn LanguageModelClient,
        sentence: &str,
    ) -> AnalysisResult {
        let start = Instant::now();
        let reply = client.generate(&response::single_prompt(sentence));
        self.stats.delegated_calls += 1;
        self.stats.delegated_time += start.elapsed();

        match reply {
            Ok(text) => match response::parse_single(&text) {
                ParsedResponse::Analysis(result) => result,
                ParsedResponse::Unusable(reason) => {
                    tracing::warn!("Unusable language model response: {}", reason);
                    fallback_analysis(sentence, &reason)
                }
            },
            Err(e) => {
                tracing::warn!("Language model call failed: {}", e);
                fallback_analysis(sentence, &e.to_string())
            }
        }
    }

    fn delegate_batch(
        &mut self,
        client: &dyn LanguageModelClient,
        chunk: &[String],
    ) -> Vec<AnalysisResult> {
        let start = Instant::now();
        let reply = client.generate(&response::batch_prompt(chunk));
        self.stats.delegated_calls += 1;
        self.stats.delegated_time += start.elapsed();

        let parsed = reply
            .map_err(|e| e.to_string())
            .and_then(|text| response::parse_batch(&text, chunk.len()));

        match parsed {
            Ok(entries) => chunk
                .iter()
                .zip(entries)
                .map(|(sentence, entry)| {
                    entry.unwrap_or_else(|| {
                        fallback_analysis(sentence, "missing from batch response")
                    })
                })
                .collect(),
            Err(reason) => {
                tracing::warn!(
                    "Batch of {} sentences degraded to rule-based analysis: {}",
                    chunk.len(),
                    reason
                );
                chunk
                    .iter()
                    .map(|s| fallback_analysis(s, &reason))
                    .collect()
            }
        }
    }

    pub fn stats(&self) -> &CompletenessStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CompletenessStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use std::sync::Mutex;

    /// Returns queued responses in order, then errors
    struct ScriptedClient {
        responses: Mutex<Vec<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .rev()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl LanguageModelClient for ScriptedClient {
        fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.responses.lock().unwrap().pop() {
                Some(Ok(text)) => Ok(text),
                Some(Err(msg)) => Err(LlmError::Unavailable(msg)),
                None => Err(LlmError::Unavailable("script exhausted".to_string())),
            }
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deterministic_unpunctuated_sentence() {
        let result = deterministic_analysis("Treatment was effective");
        assert_eq!(result.completeness_score, 0.75);
        assert!(!result.is_complete);
        assert!(result.is_meaningful);
        assert!(!result.translation_ready);
        assert_eq!(result.mode, AnalysisMode::Deterministic);
    }

    #[test]
    fn test_deterministic_complete_sentence() {
        let result = deterministic_analysis("The treatment was effective.");
        assert_eq!(result.completeness_score, 1.0);
        assert!(result.is_complete);
        assert!(result.translation_ready);
    }

    #[test]
    fn test_deterministic_empty() {
        let result = deterministic_analysis("");
        assert_eq!(result.completeness_score, 0.0);
        assert!(!result.is_complete);
        assert!(!result.is_meaningful);
    }

    #[test]
    fn test_filter_without_client() {
        let mut filter = CompletenessFilter::new(0.6, 5);
        let input = strings(&[
            "The patient received antibiotic treatment for pneumonia.",
            "Treatment was effective",
            "Fever.",
        ]);
        let kept = filter.filter(&input, None);
        assert_eq!(kept, strings(&["The patient received antibiotic treatment for pneumonia."]));

        let stats = filter.stats();
        assert_eq!(stats.total_processed, 3);
        assert_eq!(stats.complete, 1);
        assert_eq!(stats.delegated_calls, 0);
    }

    #[test]
    fn test_delegated_single_analysis() {
        let client = ScriptedClient::new(vec![Ok(
            r#"{"completeness_score": 0.9, "is_complete": true, "is_meaningful": true,
                "translation_ready": true, "reasoning": "ok"}"#,
        )]);
        let mut filter = CompletenessFilter::new(0.6, 5).with_client(client.clone());

        let result = filter.analyze("Fever");
        assert_eq!(result.mode, AnalysisMode::Delegated);
        assert!(result.is_complete);
        assert_eq!(filter.stats().delegated_calls, 1);
        assert!(client.prompts.lock().unwrap()[0].contains("\"Fever\""));
    }

    #[test]
    fn test_client_error_falls_back_deterministically() {
        let client = ScriptedClient::new(vec![Err("connection refused")]);
        let mut filter = CompletenessFilter::new(0.6, 5).with_client(client);

        let result = filter.analyze("Treatment was effective");
        let expected = deterministic_analysis("Treatment was effective");
        assert_eq!(result.mode, AnalysisMode::Fallback);
        assert_eq!(result.completeness_score, expected.completeness_score);
        assert_eq!(result.is_complete, expected.is_complete);
        assert!(result.reasoning.contains("connection refused"));
        assert_eq!(filter.stats().fallbacks, 1);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let client = ScriptedClient::new(vec![Ok("{\"completeness_score\": }")]);
        let mut filter = CompletenessFilter::new(0.6, 5).with_client(client);

        let result = filter.analyze("The dose was doubled.");
        assert_eq!(result.mode, AnalysisMode::Fallback);
        assert!(result.is_complete);
    }

    #[test]
    fn test_keyword_response() {
        let client = ScriptedClient::new(vec![Ok("This sentence is complete and clear.")]);
        let mut filter = CompletenessFilter::new(0.6, 5).with_client(client);

        let result = filter.analyze("The dose was doubled.");
        assert_eq!(result.mode, AnalysisMode::KeywordHeuristic);
        assert_eq!(result.completeness_score, 1.0);
    }

    #[test]
    fn test_batch_fills_missing_entries() {
        let client = ScriptedClient::new(vec![Ok(
            r#"[{"sentence_index": 1, "completeness_score": 0.95, "is_complete": true}]"#,
        )]);
        let mut filter = CompletenessFilter::new(0.6, 5).with_client(client.clone());

        let input = strings(&["Fever", "The dose was doubled."]);
        let results = filter.batch_analyze(&input, 5);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].mode, AnalysisMode::Delegated);
        assert_eq!(results[1].mode, AnalysisMode::Fallback);
        assert!(results[1].is_complete);
        assert_eq!(client.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_batch_degrades_only_that_batch() {
        let client = ScriptedClient::new(vec![
            Err("timeout"),
            Ok(r#"[{"completeness_score": 0.1, "is_complete": false},
                   {"completeness_score": 0.8, "is_complete": true}]"#),
        ]);
        let mut filter = CompletenessFilter::new(0.6, 2).with_client(client);

        let input = strings(&[
            "The dose was doubled.",
            "Fever",
            "Rash",
            "The rash faded.",
        ]);
        let results = filter.batch_analyze(&input, 2);

        assert_eq!(results[0].mode, AnalysisMode::Fallback);
        assert_eq!(results[1].mode, AnalysisMode::Fallback);
        assert_eq!(results[2].mode, AnalysisMode::Delegated);
        assert_eq!(results[3].mode, AnalysisMode::Delegated);
        assert!(results[3].is_complete);
        assert_eq!(filter.stats().delegated_calls, 2);
        assert_eq!(filter.stats().fallbacks, 2);
    }

    #[test]
    fn test_delegated_filter_requires_complete_flag() {
        let client = ScriptedClient::new(vec![Ok(
            r#"[{"completeness_score": 0.9, "is_complete": false},
               {"completeness_score": 0.9, "is_complete": true}]"#,
        )]);
        let mut filter = CompletenessFilter::new(0.6, 5).with_client(client);

        let input = strings(&["First one.", "Second one."]);
        assert_eq!(filter.filter(&input, None), strings(&["Second one."]));
    }

    #[test]
    fn test_reset_stats() {
        let mut filter = CompletenessFilter::new(0.6, 5);
        filter.analyze("Something happened here.");
        filter.reset_stats();
        assert_eq!(filter.stats().total_processed, 0);
    }
}
