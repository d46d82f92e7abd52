use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};

use crate::application::ReplyStream;
use crate::domain::{history_from_exchanges, ChatTurn, Exchange};

use super::super::Container;

/// Chat entry points for the front ends.
///
/// Blank messages are ignored: no request is sent and nothing is yielded.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Opens a reply of raw deltas, or `None` for a blank message.
    pub async fn reply(&self, message: &str, history: &[ChatTurn]) -> Option<ReplyStream> {
        if message.trim().is_empty() {
            return None;
        }
        Some(self.container.chat_session().stream_message(message, history).await)
    }

    /// Streams the growing reply: each item is everything received so far.
    pub async fn stream(&self, message: &str, exchanges: &[Exchange]) -> BoxStream<'static, String> {
        let history = history_from_exchanges(exchanges);
        match self.reply(message, &history).await {
            Some(reply) => reply
                .scan(String::new(), |full, delta| {
                    full.push_str(&delta);
                    future::ready(Some(full.clone()))
                })
                .boxed(),
            None => stream::empty().boxed(),
        }
    }

    pub async fn send(&self, message: &str, exchanges: &[Exchange]) -> String {
        if message.trim().is_empty() {
            return String::new();
        }
        let history = history_from_exchanges(exchanges);
        self.container.chat_session().send_message(message, &history).await
    }

    pub async fn suggested_prompts(&self) -> Vec<String> {
        let chart = self.container.charts().chart().await;
        self.container.chat_session().suggested_prompts(chart.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::ChatClient;
    use crate::connector::{MockChartEngine, MockChatClient};
    use crate::domain::fixtures::sample_chart;
    use crate::domain::GENERIC_PROMPTS;

    fn container(client: Arc<dyn ChatClient>) -> Container {
        Container::with_adapters(client, Arc::new(MockChartEngine::new()), "base")
    }

    #[tokio::test]
    async fn stream_yields_accumulated_text() {
        let container = container(Arc::new(MockChatClient::replying(["Hello", " there", "!"])));
        let chunks: Vec<String> = ChatController::new(&container)
            .stream("hi", &[])
            .await
            .collect()
            .await;

        assert_eq!(chunks, vec!["Hello", "Hello there", "Hello there!"]);
    }

    #[tokio::test]
    async fn blank_message_sends_nothing() {
        let client = Arc::new(MockChatClient::replying(["x"]));
        let container = container(client.clone());
        let controller = ChatController::new(&container);

        let chunks: Vec<String> = controller.stream("   \n", &[]).await.collect().await;
        assert!(chunks.is_empty());
        assert_eq!(controller.send("", &[]).await, "");
        assert!(controller.reply("\t", &[]).await.is_none());
        assert!(client.requests().await.is_empty());
    }

    #[tokio::test]
    async fn exchanges_become_history_skipping_empty_halves() {
        let client = Arc::new(MockChatClient::replying(["ok"]));
        let container = container(client.clone());
        let exchanges = vec![
            (Some("hi".to_string()), Some("hello".to_string())),
            (Some("sun?".to_string()), None),
            (None, Some(String::new())),
        ];

        ChatController::new(&container).send("moon?", &exchanges).await;

        let messages = &client.requests().await[0].messages;
        let contents: Vec<&str> = messages.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello", "sun?", "moon?"]);
    }

    #[tokio::test]
    async fn failure_arrives_as_final_accumulated_chunk() {
        let container = container(Arc::new(MockChatClient::breaking_after(["Par", "tial"], "reset")));
        let chunks: Vec<String> = ChatController::new(&container)
            .stream("hi", &[])
            .await
            .collect()
            .await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], "PartialError: reset");
    }

    #[tokio::test]
    async fn prompts_follow_loaded_chart() {
        let container = container(Arc::new(MockChatClient::echo()));
        let controller = ChatController::new(&container);

        assert_eq!(controller.suggested_prompts().await, GENERIC_PROMPTS.to_vec());

        container.charts().load(sample_chart()).await;
        let prompts = controller.suggested_prompts().await;
        assert_eq!(prompts[0], "What does my Sun in Leo mean for my identity?");
    }
}
