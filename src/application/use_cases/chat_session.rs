use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ChartSession, ChatClient, ReplyStream};
use crate::domain::{suggested_prompts, ChartRecord, ChatRequest, ChatTurn, DomainError};

/// Placed between the base prompt and the chart context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";
pub const CONTEXT_HEADER: &str = "CURRENT CHART CONTEXT:\n";

/// Turns any failure into the text shown in place of a reply.
///
/// Provider-side errors read `"API Error: ..."`; everything else (network,
/// timeouts, malformed responses) reads `"Error: ..."`.
pub fn render_failure(err: &DomainError) -> String {
    match err {
        DomainError::Provider(cause) => {
            format!("API Error: {cause}. Please check your API key and try again.")
        }
        other => format!("Error: {other}"),
    }
}

fn compose_prompt(base: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!("{base}{CONTEXT_SEPARATOR}{CONTEXT_HEADER}{context}"),
        None => base.to_string(),
    }
}

/// The chart-aware chat engine.
///
/// Holds the base system prompt and reads the current chart context from the
/// shared [`ChartSession`] on every turn, so a chart generated between two
/// messages is picked up by the second one. Chat calls never fail: errors come
/// back as reply text.
pub struct ChatSession {
    client: Arc<dyn ChatClient>,
    charts: Arc<ChartSession>,
    system_prompt_base: String,
}

impl ChatSession {
    pub fn new(
        client: Arc<dyn ChatClient>,
        charts: Arc<ChartSession>,
        system_prompt_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            charts,
            system_prompt_base: system_prompt_base.into(),
        }
    }

    pub fn system_prompt_base(&self) -> &str {
        &self.system_prompt_base
    }

    pub fn charts(&self) -> &Arc<ChartSession> {
        &self.charts
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Loads `chart` as the grounding context, or clears it for `None`.
    pub async fn set_chart_context(&self, chart: Option<&ChartRecord>) {
        match chart {
            Some(chart) => {
                self.charts.load(chart.clone()).await;
            }
            None => self.charts.clear().await,
        }
    }

    pub async fn chart_context(&self) -> Option<String> {
        self.charts.context().await
    }

    /// Base prompt plus the current chart context, rebuilt on every call.
    pub async fn compose_system_prompt(&self) -> String {
        let context = self.charts.context().await;
        compose_prompt(&self.system_prompt_base, context.as_deref())
    }

    async fn build_request(&self, message: &str, history: &[ChatTurn]) -> ChatRequest {
        let request = ChatRequest::new(self.compose_system_prompt().await, history, message);
        debug!(
            "Chat request: {} turns, {} system prompt bytes",
            request.messages.len(),
            request.system.len()
        );
        request
    }

    /// Sends one message and waits for the whole reply.
    pub async fn send_message(&self, message: &str, history: &[ChatTurn]) -> String {
        let request = self.build_request(message, history).await;

        match self.client.complete(&request).await {
            Ok(reply) => {
                info!("Received reply ({} chars)", reply.len());
                reply
            }
            Err(e) => {
                warn!("Chat completion failed: {}", e);
                render_failure(&e)
            }
        }
    }

    /// Streams the reply to one message.
    ///
    /// The request is built now; the connection is opened when the returned
    /// stream is first polled.
    pub async fn stream_message(&self, message: &str, history: &[ChatTurn]) -> ReplyStream {
        let request = self.build_request(message, history).await;
        let client = self.client.clone();

        ReplyStream::new(async move { client.stream(&request).await })
    }

    pub fn suggested_prompts(&self, chart: Option<&ChartRecord>) -> Vec<String> {
        suggested_prompts(chart)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;
    use crate::connector::MockChatClient;
    use crate::domain::fixtures::sample_chart;
    use crate::domain::{format_context, Role};

    const BASE: &str = "You are an astrology companion.";

    fn session(client: Arc<MockChatClient>) -> ChatSession {
        ChatSession::new(client, Arc::new(ChartSession::new()), BASE)
    }

    #[tokio::test]
    async fn system_prompt_is_base_without_context() {
        let chat = session(Arc::new(MockChatClient::replying(["ok"])));
        assert_eq!(chat.compose_system_prompt().await, BASE);
    }

    #[tokio::test]
    async fn system_prompt_appends_context_block() {
        let chat = session(Arc::new(MockChatClient::replying(["ok"])));
        chat.set_chart_context(Some(&sample_chart())).await;

        let prompt = chat.compose_system_prompt().await;
        let expected = format!(
            "{BASE}\n\n---\n\nCURRENT CHART CONTEXT:\n{}",
            format_context(&sample_chart())
        );
        assert_eq!(prompt, expected);
        let base_at = prompt.find(BASE).unwrap();
        let context_at = prompt.find("User's Natal Chart - Ada").unwrap();
        assert!(base_at < context_at);
    }

    #[tokio::test]
    async fn clearing_context_restores_base_prompt() {
        let chat = session(Arc::new(MockChatClient::replying(["ok"])));
        chat.set_chart_context(Some(&sample_chart())).await;
        chat.set_chart_context(None).await;

        assert!(chat.chart_context().await.is_none());
        assert_eq!(chat.compose_system_prompt().await, BASE);
    }

    #[tokio::test]
    async fn send_appends_user_turn_to_history() {
        let client = Arc::new(MockChatClient::replying(["Hello", " there", "!"]));
        let chat = session(client.clone());
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hey")];

        let reply = chat.send_message("What is my sun sign?", &history).await;

        assert_eq!(reply, "Hello there!");
        let requests = client.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 3);
        assert_eq!(requests[0].messages[2].role, Role::User);
        assert_eq!(requests[0].messages[2].content, "What is my sun sign?");
        assert_eq!(requests[0].system, BASE);
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn stream_concatenation_matches_single_shot() {
        let client = Arc::new(MockChatClient::replying(["Hello", " there", "!"]));
        let chat = session(client.clone());

        let chunks: Vec<String> = chat.stream_message("hi", &[]).await.collect().await;
        let whole = chat.send_message("hi", &[]).await;

        assert_eq!(chunks, vec!["Hello", " there", "!"]);
        assert_eq!(chunks.concat(), whole);

        let requests = client.requests().await;
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn context_change_between_turns_is_picked_up() {
        let client = Arc::new(MockChatClient::replying(["ok"]));
        let chat = session(client.clone());

        chat.send_message("first", &[]).await;
        chat.set_chart_context(Some(&sample_chart())).await;
        chat.send_message("second", &[]).await;

        let requests = client.requests().await;
        assert!(!requests[0].system.contains(CONTEXT_HEADER));
        assert!(requests[1].system.contains(CONTEXT_HEADER));
    }

    #[tokio::test]
    async fn provider_failure_is_rendered_in_band() {
        let chat = session(Arc::new(MockChatClient::failing_with_provider(
            "401 Unauthorized: invalid x-api-key",
        )));

        let reply = chat.send_message("hi", &[]).await;
        assert!(reply.starts_with("API Error: 401 Unauthorized"));

        let chunks: Vec<String> = chat.stream_message("hi", &[]).await.collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("API Error: "));
    }

    #[tokio::test]
    async fn network_failure_is_rendered_in_band() {
        let chat = session(Arc::new(MockChatClient::failing_with_transport(
            "connection refused",
        )));

        assert_eq!(chat.send_message("hi", &[]).await, "Error: connection refused");
    }

    #[test]
    fn render_failure_prefixes() {
        assert_eq!(
            render_failure(&DomainError::provider("overloaded")),
            "API Error: overloaded. Please check your API key and try again."
        );
        assert_eq!(
            render_failure(&DomainError::transport("request timed out")),
            "Error: request timed out"
        );
        assert!(render_failure(&DomainError::parse("bad json")).starts_with("Error: "));
    }

    #[test]
    fn suggested_prompts_follow_chart() {
        let chat = session(Arc::new(MockChatClient::replying(["ok"])));
        assert_eq!(chat.suggested_prompts(None).len(), 5);
        assert_eq!(
            chat.suggested_prompts(Some(&sample_chart()))[0],
            "What does my Sun in Leo mean for my identity?"
        );
    }
}
