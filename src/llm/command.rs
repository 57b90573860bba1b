// External command backend: prompt on stdin, completion on stdout
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{LanguageModelClient, LlmError};
use crate::config::LlmConfig;

/// Runs a local model command (e.g. `ollama run llama3.1:8b`) per prompt
#[derive(Debug, Clone)]
pub struct CommandClient {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    label: String,
}

impl CommandClient {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        let program = program.into();
        let label = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            program,
            args,
            timeout,
            label,
        }
    }

    /// Build from the `[llm]` config section
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn run(&self, prompt: &str) -> Result<String, LlmError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LlmError::Spawn {
                command: self.label.clone(),
                source,
            })?;

        // Feed stdin while draining stdout so neither pipe can fill up and stall the child
        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        // The command may exit without reading its input; its exit status decides
        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }

        if !output.status.success() {
            return Err(LlmError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| LlmError::InvalidOutput)
    }
}

impl LanguageModelClient for CommandClient {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to start runtime: {}", e)))?;

        runtime.block_on(async {
            match tokio::time::timeout(self.timeout, self.run(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout {
                    secs: self.timeout.as_secs(),
                }),
            }
        })
    }

    fn name(&self) -> &str {
        &self.label
    }
}
