// Report rendering: plain sentences, JSON/markdown/HTML reports, CSV stage statistics
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use super::{DirectoryReport, ProcessingReport};
use crate::error::{Result, TxtsiftError};
use crate::filtering::Stage;

/// Output format for processed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One surviving sentence per line
    #[default]
    #[serde(alias = "txt")]
    Text,
    Json,
    #[serde(alias = "md")]
    Markdown,
    /// One row per executed stage
    Csv,
    #[serde(alias = "htm")]
    Html,
}

impl OutputFormat {
    /// File extension for written output
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
        }
    }

    /// Whether `path` carries an extension usual for this format
    pub fn accepts_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        ext == self.extension()
            || matches!(
                (self, ext.as_str()),
                (OutputFormat::Markdown, "markdown") | (OutputFormat::Html, "htm")
            )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = TxtsiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            "html" | "htm" => Ok(OutputFormat::Html),
            other => Err(TxtsiftError::InvalidConfigValue {
                path: "output.format".to_string(),
                message: format!(
                    "Unknown format '{}'. Available: text, json, markdown, csv, html",
                    other
                ),
            }),
        }
    }
}

/// Render a single report
pub fn render(
    report: &ProcessingReport,
    format: OutputFormat,
    include_statistics: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(&report.filtered_sentences)),
        OutputFormat::Json => to_json(report, "Failed to serialize processing report"),
        OutputFormat::Markdown => Ok(render_markdown(report, include_statistics)),
        OutputFormat::Csv => to_csv(std::slice::from_ref(report)),
        OutputFormat::Html => {
            let title = format!("Processing Report: {}", report.source);
            Ok(html_document(
                &title,
                &html_section(report, include_statistics),
            ))
        }
    }
}

/// Render every report of a directory run
pub fn render_directory(
    report: &DirectoryReport,
    format: OutputFormat,
    include_statistics: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let sentences: Vec<String> = report
                .reports
                .iter()
                .flat_map(|r| r.filtered_sentences.iter().cloned())
                .collect();
            Ok(render_text(&sentences))
        }
        OutputFormat::Json => to_json(report, "Failed to serialize directory report"),
        OutputFormat::Markdown => {
            let mut out = String::new();
            let _ = writeln!(out, "# Directory: `{}`\n", report.directory.display());
            let _ = writeln!(
                out,
                "- **Files processed:** {}\n- **Files failed:** {}\n",
                report.reports.len(),
                report.failures.len()
            );
            for failure in &report.failures {
                let _ = writeln!(out, "- `{}`: {}", failure.path.display(), failure.error);
            }
            for file_report in &report.reports {
                out.push('\n');
                out.push_str(&render_markdown(file_report, include_statistics));
            }
            Ok(out)
        }
        OutputFormat::Csv => to_csv(&report.reports),
        OutputFormat::Html => {
            let mut body = String::new();
            let _ = writeln!(
                body,
                "<ul class=\"summary\">\n<li>Files processed: {}</li>\n<li>Files failed: {}</li>",
                report.reports.len(),
                report.failures.len()
            );
            for failure in &report.failures {
                let _ = writeln!(
                    body,
                    "<li class=\"failure\"><code>{}</code>: {}</li>",
                    html_escape::encode_text(&failure.path.display().to_string()),
                    html_escape::encode_text(&failure.error)
                );
            }
            body.push_str("</ul>\n");
            for file_report in &report.reports {
                body.push_str(&html_section(file_report, include_statistics));
            }
            let title = format!("Directory: {}", report.directory.display());
            Ok(html_document(&title, &body))
        }
    }
}

/// Write rendered output to `path`, or stdout when `None`
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| TxtsiftError::Io {
                    source: e,
                    context: format!("Failed to create output directory: {:?}", parent),
                })?;
            }
            std::fs::write(path, content).map_err(|e| TxtsiftError::Io {
                source: e,
                context: format!("Failed to write output file: {:?}", path),
            })?;
            tracing::info!("Output written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn render_text(sentences: &[String]) -> String {
    let mut out = String::new();
    for sentence in sentences {
        out.push_str(sentence.trim());
        out.push('\n');
    }
    out
}

fn to_json<T: Serialize>(value: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| TxtsiftError::Json {
        source: e,
        context: context.to_string(),
    })
}

/// One CSV row per executed stage
#[derive(Serialize)]
struct StageRow<'a> {
    source: &'a str,
    run_id: String,
    stage_number: usize,
    stage: Stage,
    input_count: usize,
    output_count: usize,
    removed: usize,
    retention_rate: f64,
    time_ms: f64,
}

const CSV_HEADER: [&str; 9] = [
    "source",
    "run_id",
    "stage_number",
    "stage",
    "input_count",
    "output_count",
    "removed",
    "retention_rate",
    "time_ms",
];

fn to_csv(reports: &[ProcessingReport]) -> Result<String> {
    let csv_error = |source: csv::Error| TxtsiftError::Csv {
        source,
        context: "Failed to write stage statistics".to_string(),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for report in reports {
        for layer in &report.layer_results {
            writer
                .serialize(StageRow {
                    source: &report.source,
                    run_id: report.run_id.to_string(),
                    stage_number: layer.stage.number(),
                    stage: layer.stage,
                    input_count: layer.input_count,
                    output_count: layer.output_count,
                    removed: layer.removed(),
                    retention_rate: layer.retention_rate,
                    time_ms: layer.elapsed.as_secs_f64() * 1000.0,
                })
                .map_err(csv_error)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| TxtsiftError::Io {
        source: e.into_error(),
        context: "Failed to flush stage statistics".to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| TxtsiftError::Other(e.into()))
}

fn html_document(title: &str, body: &str) -> String {
    let title = html_escape::encode_text(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>\n\
         body {{ font-family: sans-serif; max-width: 60em; margin: 2em auto; }}\n\
         table {{ border-collapse: collapse; }}\n\
         th, td {{ border: 1px solid #ccc; padding: 0.3em 0.8em; text-align: right; }}\n\
         </style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
    )
}

fn html_section(report: &ProcessingReport, include_statistics: bool) -> String {
    let stats = &report.statistics;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<section>\n<h2>{}</h2>",
        html_escape::encode_text(&report.source)
    );
    let _ = writeln!(
        out,
        "<ul>\n<li>Run: {}</li>\n<li>Processed: {}</li>\n<li>Input sentences: {}</li>\n\
         <li>Output sentences: {}</li>\n<li>Retention: {:.1}%</li>",
        report.run_id,
        report.processed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.input_sentences,
        stats.output_count,
        stats.overall_retention_rate * 100.0
    );
    if let Some(stage) = stats.exhausted_at {
        let _ = writeln!(out, "<li>Stopped after: {}</li>", stage);
    }
    out.push_str("</ul>\n");

    if include_statistics && !report.layer_results.is_empty() {
        out.push_str(
            "<table>\n<tr><th>Stage</th><th>Input</th><th>Output</th><th>Removed</th>\
             <th>Retention</th><th>Time (ms)</th></tr>\n",
        );
        for layer in &report.layer_results {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.2}</td></tr>",
                layer.stage,
                layer.input_count,
                layer.output_count,
                layer.removed(),
                layer.retention_rate * 100.0,
                layer.elapsed.as_secs_f64() * 1000.0
            );
        }
        out.push_str("</table>\n");
    }

    out.push_str("<h3>Filtered Sentences</h3>\n");
    if report.filtered_sentences.is_empty() {
        out.push_str("<p><em>No sentences survived filtering.</em></p>\n");
    } else {
        out.push_str("<ol>\n");
        for sentence in &report.filtered_sentences {
            let _ = writeln!(out, "<li>{}</li>", html_escape::encode_text(sentence));
        }
        out.push_str("</ol>\n");
    }
    out.push_str("</section>\n");
    out
}

fn render_markdown(report: &ProcessingReport, include_statistics: bool) -> String {
    let stats = &report.statistics;
    let mut out = String::new();

    let _ = writeln!(out, "## Processing Report: `{}`\n", report.source);
    let _ = writeln!(out, "- **Run:** {}", report.run_id);
    let _ = writeln!(
        out,
        "- **Processed:** {}",
        report.processed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "- **Input sentences:** {}", report.input_sentences);
    let _ = writeln!(out, "- **Output sentences:** {}", stats.output_count);
    let _ = writeln!(
        out,
        "- **Retention:** {:.1}%",
        stats.overall_retention_rate * 100.0
    );
    if let Some(stage) = stats.exhausted_at {
        let _ = writeln!(out, "- **Stopped after:** {}", stage);
    }
    out.push('\n');

    if include_statistics && !report.layer_results.is_empty() {
        out.push_str("| Stage | Input | Output | Removed | Retention | Time (ms) |\n");
        out.push_str("|-------|-------|--------|---------|-----------|-----------|\n");
        for layer in &report.layer_results {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {:.1}% | {:.2} |",
                layer.stage,
                layer.input_count,
                layer.output_count,
                layer.removed(),
                layer.retention_rate * 100.0,
                layer.elapsed.as_secs_f64() * 1000.0
            );
        }
        out.push('\n');
    }

    out.push_str("### Filtered Sentences\n\n");
    if report.filtered_sentences.is_empty() {
        out.push_str("_No sentences survived filtering._\n");
    }
    for (i, sentence) in report.filtered_sentences.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, sentence);
    }
    out
}
