// Language model clients for delegated completeness analysis
mod command;

pub use command::CommandClient;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to start language model command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Language model I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Language model did not answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("Language model exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Language model returned invalid UTF-8")]
    InvalidOutput,

    #[error("Language model unavailable: {0}")]
    Unavailable(String),
}

/// Trait for text generation backends
///
/// Implementations own their transport and timeout handling. The completeness
/// stage treats every error as a signal to fall back to rule-based analysis.
pub trait LanguageModelClient: Send + Sync {
    /// Generate a completion for the prompt
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Human-readable backend name for logs and reports
    fn name(&self) -> &str {
        "language-model"
    }
}
