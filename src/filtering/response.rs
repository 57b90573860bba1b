// Prompt construction and response parsing for delegated completeness analysis
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an analysis result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Rule-based scoring, no model configured
    Deterministic,
    /// Structured JSON returned by the model
    Delegated,
    /// Indicator words scanned from an unstructured model response
    KeywordHeuristic,
    /// Rule-based scoring after a delegated attempt failed
    Fallback,
}

/// Completeness and meaning assessment of one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub completeness_score: f32,
    pub is_complete: bool,
    pub is_meaningful: bool,
    pub translation_ready: bool,
    pub reasoning: String,
    pub mode: AnalysisMode,
}

const POSITIVE_INDICATORS: &[&str] = &["complete", "clear", "good", "meaningful", "suitable"];
const NEGATIVE_INDICATORS: &[&str] = &[
    "incomplete",
    "unclear",
    "poor",
    "meaningless",
    "unsuitable",
];

pub fn single_prompt(sentence: &str) -> String {
    format!(
        "Analyze the following sentence for completeness and meaning.\n\n\
         Sentence: \"{}\"\n\n\
         Respond with a single JSON object with these fields:\n\
         - \"completeness_score\": number from 0.0 to 1.0\n\
         - \"is_complete\": true if the sentence expresses a complete thought\n\
         - \"is_meaningful\": true if it conveys meaningful information\n\
         - \"translation_ready\": true if it can be translated without extra context\n\
         - \"reasoning\": one short explanation\n",
        sentence
    )
}

pub fn batch_prompt(sentences: &[String]) -> String {
    let numbered: Vec<String> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. \"{}\"", i + 1, s))
        .collect();

    format!(
        "Analyze each of the following sentences for completeness and meaning.\n\n\
         {}\n\n\
         Respond with a JSON array containing one object per sentence, in order, with fields:\n\
         - \"sentence_index\": the sentence number from the list above\n\
         - \"completeness_score\": number from 0.0 to 1.0\n\
         - \"is_complete\", \"is_meaningful\", \"translation_ready\": booleans\n\
         - \"reasoning\": one short explanation\n",
        numbered.join("\n")
    )
}

/// Outcome of parsing a single-sentence response
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Analysis(AnalysisResult),
    /// Nothing usable; carries the reason for the fallback annotation
    Unusable(String),
}

/// Parse a single-sentence response: JSON object first, indicator words second
pub fn parse_single(response: &str) -> ParsedResponse {
    if response.trim().is_empty() {
        return ParsedResponse::Unusable("empty response".to_string());
    }

    if let Some(json) = extract_delimited(response, '{', '}') {
        return match serde_json::from_str::<Value>(json) {
            Ok(value) => match analysis_from_value(&value) {
                Some(result) => ParsedResponse::Analysis(result),
                None => ParsedResponse::Unusable(
                    "structured response without completeness_score".to_string(),
                ),
            },
            Err(e) => ParsedResponse::Unusable(format!("malformed JSON response: {}", e)),
        };
    }

    match keyword_analysis(response) {
        Some(result) => ParsedResponse::Analysis(result),
        None => ParsedResponse::Unusable("no structured data or indicator words".to_string()),
    }
}

/// Parse a batch response into one optional result per input sentence
///
/// Elements are matched by `sentence_index` when every element carries one,
/// positionally otherwise. Entries that are missing or malformed are `None`.
pub fn parse_batch(response: &str, expected: usize) -> Result<Vec<Option<AnalysisResult>>, String> {
    let json = extract_delimited(response, '[', ']')
        .ok_or_else(|| "no JSON array in batch response".to_string())?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| format!("malformed JSON array: {}", e))?;
    let items = value
        .as_array()
        .ok_or_else(|| "batch response is not an array".to_string())?;

    let mut results: Vec<Option<AnalysisResult>> = vec![None; expected];

    let indices: Option<Vec<u64>> = items
        .iter()
        .map(|item| item.get("sentence_index").and_then(Value::as_u64))
        .collect();

    match indices {
        Some(indices) if !indices.is_empty() => {
            let zero_based = indices.contains(&0);
            for (item, index) in items.iter().zip(indices) {
                let position = (if zero_based { index } else { index - 1 }) as usize;
                if position < expected && results[position].is_none() {
                    results[position] = analysis_from_value(item);
                }
            }
        }
        _ => {
            for (slot, item) in results.iter_mut().zip(items) {
                *slot = analysis_from_value(item);
            }
        }
    }

    Ok(results)
}

/// Slice from the first `open` to the last `close`, inclusive
fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn analysis_from_value(value: &Value) -> Option<AnalysisResult> {
    let score = match value.get("completeness_score")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    Some(AnalysisResult {
        completeness_score: (score as f32).clamp(0.0, 1.0),
        is_complete: flag(value, "is_complete"),
        is_meaningful: flag(value, "is_meaningful"),
        translation_ready: flag(value, "translation_ready"),
        reasoning: value
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        mode: AnalysisMode::Delegated,
    })
}

fn flag(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes"),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Score an unstructured response by indicator words: `(pos - neg + 2) / 4`
fn keyword_analysis(response: &str) -> Option<AnalysisResult> {
    let lower = response.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();
    let count = |indicators: &[&str]| indicators.iter().filter(|w| words.contains(*w)).count();

    let positive = count(POSITIVE_INDICATORS) as f32;
    let negative = count(NEGATIVE_INDICATORS) as f32;
    if positive == 0.0 && negative == 0.0 {
        return None;
    }

    let is_complete = words.contains(&"complete") && !words.contains(&"incomplete");
    let is_meaningful = positive > negative;

    Some(AnalysisResult {
        completeness_score: ((positive - negative + 2.0) / 4.0).clamp(0.0, 1.0),
        is_complete,
        is_meaningful,
        translation_ready: is_complete && is_meaningful,
        reasoning: format!(
            "keyword heuristic: {} positive, {} negative indicators",
            positive, negative
        ),
        mode: AnalysisMode::KeywordHeuristic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_sentences() {
        assert!(single_prompt("The dose was doubled.").contains("\"The dose was doubled.\""));

        let batch = batch_prompt(&["One.".to_string(), "Two.".to_string()]);
        assert!(batch.contains("1. \"One.\""));
        assert!(batch.contains("2. \"Two.\""));
        assert!(batch.contains("JSON array"));
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let response = "Sure! Here is the analysis:\n{\"completeness_score\": 0.85, \
                        \"is_complete\": true, \"is_meaningful\": true, \
                        \"translation_ready\": \"yes\", \"reasoning\": \"Full clause\"}\nThanks.";
        match parse_single(response) {
            ParsedResponse::Analysis(result) => {
                assert_eq!(result.mode, AnalysisMode::Delegated);
                assert!((result.completeness_score - 0.85).abs() < 1e-6);
                assert!(result.is_complete);
                assert!(result.translation_ready);
                assert_eq!(result.reasoning, "Full clause");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_score_is_clamped() {
        match parse_single("{\"completeness_score\": 7}") {
            ParsedResponse::Analysis(result) => assert_eq!(result.completeness_score, 1.0),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_unusable() {
        assert!(matches!(
            parse_single("{completeness_score: high"),
            ParsedResponse::Unusable(_)
        ));
        assert!(matches!(
            parse_single("{\"is_complete\": true}"),
            ParsedResponse::Unusable(_)
        ));
        assert!(matches!(parse_single("   "), ParsedResponse::Unusable(_)));
    }

    #[test]
    fn test_keyword_heuristic() {
        match parse_single("The sentence is complete, clear and meaningful.") {
            ParsedResponse::Analysis(result) => {
                assert_eq!(result.mode, AnalysisMode::KeywordHeuristic);
                assert_eq!(result.completeness_score, 1.0);
                assert!(result.is_complete);
                assert!(result.translation_ready);
            }
            other => panic!("unexpected: {:?}", other),
        }

        match parse_single("This fragment is incomplete and unclear.") {
            ParsedResponse::Analysis(result) => {
                assert_eq!(result.completeness_score, 0.0);
                assert!(!result.is_complete);
                assert!(!result.is_meaningful);
            }
            other => panic!("unexpected: {:?}", other),
        }

        assert!(matches!(
            parse_single("I cannot say."),
            ParsedResponse::Unusable(_)
        ));
    }

    #[test]
    fn test_parse_batch_by_index() {
        let response = r#"[
            {"sentence_index": 2, "completeness_score": 0.2, "is_complete": false},
            {"sentence_index": 1, "completeness_score": 0.9, "is_complete": true}
        ]"#;
        let results = parse_batch(response, 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().completeness_score, 0.9);
        assert_eq!(results[1].as_ref().unwrap().completeness_score, 0.2);
        assert!(results[2].is_none());
    }

    #[test]
    fn test_parse_batch_positional_with_malformed_entry() {
        let response = r#"Result: [{"completeness_score": 0.7}, {"score": 1}]"#;
        let results = parse_batch(response, 2).unwrap();
        assert!(results[0].is_some());
        assert!(results[1].is_none());
    }

    #[test]
    fn test_parse_batch_without_array() {
        assert!(parse_batch("all complete", 2).is_err());
    }
}
