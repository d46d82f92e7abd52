use async_trait::async_trait;
use futures_util::future;
use futures_util::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{ChatClient, TextStream, CONTEXT_HEADER};
use crate::domain::{ChatRequest, DomainError, Role};

enum Script {
    /// Streams the chunks; `complete` returns them joined.
    Chunks(Vec<String>),
    /// Answers by quoting the last user message, word by word.
    Echo,
    Provider(String),
    Transport(String),
    /// Streams the chunks, then a transport error.
    BreaksAfter(Vec<String>, String),
    /// Streams the chunks, then never yields again.
    StallsAfter(Vec<String>),
}

/// Scripted [`ChatClient`] for offline runs and tests. Records every request.
pub struct MockChatClient {
    script: Script,
    requests: Mutex<Vec<ChatRequest>>,
}

fn owned<I>(chunks: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    chunks.into_iter().map(Into::into).collect()
}

impl MockChatClient {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::scripted(Script::Chunks(owned(chunks)))
    }

    pub fn echo() -> Self {
        Self::scripted(Script::Echo)
    }

    pub fn failing_with_provider(message: impl Into<String>) -> Self {
        Self::scripted(Script::Provider(message.into()))
    }

    pub fn failing_with_transport(message: impl Into<String>) -> Self {
        Self::scripted(Script::Transport(message.into()))
    }

    pub fn breaking_after<I>(chunks: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::scripted(Script::BreaksAfter(owned(chunks), message.into()))
    }

    pub fn stalling_after<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::scripted(Script::StallsAfter(owned(chunks)))
    }

    /// Requests seen so far, oldest first.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    async fn record(&self, request: &ChatRequest) {
        debug!("MockChatClient: request with {} turns", request.messages.len());
        self.requests.lock().await.push(request.clone());
    }

    fn echo_chunks(request: &ChatRequest) -> Vec<String> {
        let asked = request
            .messages
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or_default();
        let grounding = if request.system.contains(CONTEXT_HEADER) {
            "with your chart in view"
        } else {
            "without a chart yet"
        };
        let reply = format!("(offline astrologer, {grounding}) You asked: {asked}");
        reply.split_inclusive(' ').map(str::to_string).collect()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError> {
        self.record(request).await;
        match &self.script {
            Script::Chunks(chunks) | Script::StallsAfter(chunks) => Ok(chunks.concat()),
            Script::Echo => Ok(Self::echo_chunks(request).concat()),
            Script::Provider(message) => Err(DomainError::provider(message.clone())),
            Script::Transport(message) | Script::BreaksAfter(_, message) => {
                Err(DomainError::transport(message.clone()))
            }
        }
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TextStream, DomainError> {
        self.record(request).await;
        let ok = |chunks: Vec<String>| stream::iter(chunks.into_iter().map(Ok::<_, DomainError>));
        match &self.script {
            Script::Chunks(chunks) => Ok(ok(chunks.clone()).boxed()),
            Script::Echo => Ok(ok(Self::echo_chunks(request)).boxed()),
            Script::Provider(message) => Err(DomainError::provider(message.clone())),
            Script::Transport(message) => Err(DomainError::transport(message.clone())),
            Script::BreaksAfter(chunks, message) => {
                let failure = Err(DomainError::transport(message.clone()));
                Ok(ok(chunks.clone())
                    .chain(stream::once(future::ready(failure)))
                    .boxed())
            }
            Script::StallsAfter(chunks) => Ok(ok(chunks.clone()).chain(stream::pending()).boxed()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-llm"
    }
}
