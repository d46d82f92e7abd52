use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::ChartEngine;
use crate::domain::{BirthDetails, ChartRecord, DomainError};

pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(30);
const STDOUT_PREVIEW_CHARS: usize = 2_000;
const STDERR_PREVIEW_CHARS: usize = 1_000;

/// Runs an out-of-process astrology engine.
///
/// The birth details go to the child's stdin as one JSON line. The child
/// answers on stdout with either a chart object carrying `"success": true` or
/// `{"success": false, "message": "..."}`. Non-zero exit, unparsable output,
/// timeouts and reported failures all surface as [`DomainError::Upstream`].
#[derive(Debug, Clone)]
pub struct ExternalChartEngine {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalChartEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_ENGINE_TIMEOUT,
        }
    }

    /// Splits a command line on whitespace; the first word is the program.
    pub fn from_command_line(command_line: &str) -> Result<Self, DomainError> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| DomainError::initialization("engine command is empty"))?;
        Ok(Self::new(program, words.collect()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, request: &str) -> Result<String, DomainError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .kill_on_drop(true)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            DomainError::upstream(format!("failed to start chart engine '{}': {e}", self.program))
        })?;

        let exchange = async move {
            if let Some(mut stdin) = child.stdin.take() {
                match send_request(&mut stdin, request).await {
                    Ok(()) => {}
                    // The exit status and stderr below say why it stopped reading.
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        debug!("Chart engine closed stdin before reading the request");
                    }
                    Err(e) => {
                        return Err(DomainError::upstream(format!(
                            "failed to send birth details to chart engine: {e}"
                        )))
                    }
                }
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| DomainError::upstream(format!("failed to wait for chart engine: {e}")))
        };

        let output = timeout(self.timeout, exchange).await.map_err(|_| {
            DomainError::upstream(format!(
                "chart engine timed out after {}ms",
                self.timeout.as_millis()
            ))
        })??;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Chart engine exited with {}: {}", output.status, stderr.trim());
            return Err(DomainError::upstream(format!(
                "chart engine exited with {}: {}",
                output.status,
                preview(stderr.trim(), STDERR_PREVIEW_CHARS)
            )));
        }
        Ok(stdout)
    }
}

#[async_trait]
impl ChartEngine for ExternalChartEngine {
    async fn compute_chart(&self, details: &BirthDetails) -> Result<ChartRecord, DomainError> {
        let request = serde_json::to_string(details)
            .map_err(|e| DomainError::internal(format!("failed to encode birth details: {e}")))?;
        debug!("Invoking chart engine {} {:?}", self.program, self.args);

        let stdout = self.run(&request).await?;
        parse_engine_reply(&stdout)
    }

    fn engine_name(&self) -> &str {
        &self.program
    }
}

async fn send_request(stdin: &mut ChildStdin, request: &str) -> std::io::Result<()> {
    stdin.write_all(request.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.shutdown().await
}

/// Decodes the engine's JSON answer.
fn parse_engine_reply(stdout: &str) -> Result<ChartRecord, DomainError> {
    let invalid = |e: serde_json::Error| {
        DomainError::upstream(format!(
            "invalid chart engine response: {e}. stdout={}",
            preview(stdout.trim(), STDOUT_PREVIEW_CHARS)
        ))
    };

    let value: Value = serde_json::from_str(stdout.trim()).map_err(invalid)?;
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("chart engine reported a failure");
        return Err(DomainError::upstream(message));
    }
    serde_json::from_value(value).map_err(invalid)
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
