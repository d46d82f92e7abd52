use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{ChatClient, TextStream};
use crate::connector::adapter::{SseDecoder, SseEvent};
use crate::domain::{ChatRequest, ChatTurn, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider settings. The API key is mandatory; everything else has a default.
#[derive(Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    /// Upper bound on a whole request, streamed body included.
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the provider configuration from the environment:
    ///
    /// | Variable                                | Default                      |
    /// |-----------------------------------------|------------------------------|
    /// | `ANTHROPIC_API_KEY`                     | required                     |
    /// | `ANTHROPIC_MODEL` / `CLAUDE_MODEL`      | `claude-3-5-sonnet-20241022` |
    /// | `ANTHROPIC_MAX_TOKENS` / `MAX_TOKENS`   | `4096`                       |
    /// | `ANTHROPIC_BASE_URL`                    | `https://api.anthropic.com`  |
    /// | `ANTHROPIC_TIMEOUT_SECS`                | `120`                        |
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let lookup_any = |keys: &[&str]| {
            keys.iter()
                .filter_map(|&k| lookup(k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let api_key = lookup_any(&["ANTHROPIC_API_KEY"]).ok_or_else(|| {
            DomainError::initialization(
                "ANTHROPIC_API_KEY not found. Please set it in your environment or pass it directly.",
            )
        })?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup_any(&["ANTHROPIC_MODEL", "CLAUDE_MODEL"]) {
            config.model = model;
        }
        if let Some(raw) = lookup_any(&["ANTHROPIC_MAX_TOKENS", "MAX_TOKENS"]) {
            config.max_tokens = raw.parse().map_err(|_| {
                DomainError::initialization(format!("max tokens must be a positive integer, got '{raw}'"))
            })?;
        }
        if let Some(base) = lookup_any(&["ANTHROPIC_BASE_URL"]) {
            config.base_url = base;
        }
        if let Some(raw) = lookup_any(&["ANTHROPIC_TIMEOUT_SECS"]) {
            let secs: u64 = raw.parse().map_err(|_| {
                DomainError::initialization(format!("timeout must be a number of seconds, got '{raw}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Anthropic Messages API request payload.
#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatTurn],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Subset of the streaming events we act on.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta {
        delta: Delta,
    },
    MessageStop,
    Error {
        error: ApiErrorBody,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// HTTP client for the Anthropic Messages API, single-shot and streaming.
///
/// Implements [`ChatClient`] so the chat engine stays decoupled from transport
/// and serialization details. Every request is bounded by
/// [`AnthropicConfig::timeout`]; an expired request surfaces as a transport
/// error.
pub struct AnthropicClient {
    client: reqwest::Client,
    config: AnthropicConfig,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, DomainError> {
        let url = format!("{}{}", config.base_url.trim_end_matches('/'), MESSAGES_PATH);
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::initialization(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config, url })
    }

    /// Fails with [`DomainError::Initialization`] when no API key is configured.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::new(AnthropicConfig::from_env()?)
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    async fn post(&self, request: &ChatRequest, stream: bool) -> Result<reqwest::Response, DomainError> {
        let body = ApiRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: &request.system,
            messages: &request.messages,
            stream,
        };
        debug!(
            "POST {} (model={}, turns={}, stream={})",
            self.url,
            self.config.model,
            request.messages.len(),
            stream
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) => DomainError::provider(format!(
                    "{status} {}: {}",
                    envelope.error.kind, envelope.error.message
                )),
                Err(_) => DomainError::provider(format!("API returned {status}")),
            });
        }

        Ok(response)
    }

    fn transport_error(&self, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::transport(format!(
                "request timed out after {}s",
                self.config.timeout.as_secs()
            ))
        } else if e.is_connect() {
            DomainError::transport(format!("could not connect to {}: {e}", self.url))
        } else {
            DomainError::transport(format!("request failed: {e}"))
        }
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError> {
        let response = self.post(request, false).await?;

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::parse(format!("failed to parse response: {e}")))?;

        let text: Vec<String> = api_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(DomainError::parse("response contained no text content"));
        }
        Ok(text.concat())
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TextStream, DomainError> {
        let response = self.post(request, true).await?;
        Ok(text_deltas(response.bytes_stream()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Applies one decoded event. Returns `true` once the reply is over.
fn apply_event(event: &SseEvent, out: &mut VecDeque<Result<String, DomainError>>) -> bool {
    match serde_json::from_str::<StreamEvent>(&event.data) {
        Ok(StreamEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        }) => {
            out.push_back(Ok(text));
            false
        }
        Ok(StreamEvent::MessageStop) => true,
        Ok(StreamEvent::Error { error }) => {
            out.push_back(Err(DomainError::provider(format!(
                "{}: {}",
                error.kind, error.message
            ))));
            true
        }
        Ok(_) => false,
        Err(e) => {
            out.push_back(Err(DomainError::parse(format!(
                "malformed stream event {:?}: {e}",
                event.event.as_deref().unwrap_or("message")
            ))));
            true
        }
    }
}

/// Turns a raw `text/event-stream` body into text deltas.
fn text_deltas<S, B, E>(body: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let state = (Box::pin(body), SseDecoder::new(), VecDeque::new(), false);

    stream::unfold(state, |(mut body, mut decoder, mut pending, mut done)| async move {
        loop {
            if let Some(item) = pending.pop_front() {
                return Some((item, (body, decoder, pending, done)));
            }
            if done {
                return None;
            }
            match body.next().await {
                Some(Ok(bytes)) => {
                    for event in decoder.push(bytes.as_ref()) {
                        if apply_event(&event, &mut pending) {
                            done = true;
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    pending.push_back(Err(DomainError::transport(format!(
                        "stream interrupted: {e}"
                    ))));
                    done = true;
                }
                None => {
                    if let Some(event) = decoder.finish() {
                        apply_event(&event, &mut pending);
                    }
                    done = true;
                }
            }
        }
    })
    .boxed()
}
