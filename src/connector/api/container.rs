use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::application::{ChartEngine, ChartSession, ChatClient, ChatSession, GenerateChartUseCase};
use crate::connector::adapter::{
    load_system_prompt, AnthropicClient, ExternalChartEngine, MockChartEngine, MockChatClient,
    DEFAULT_ENGINE_TIMEOUT,
};

pub struct ContainerConfig {
    /// Use the scripted offline chat client; no API key is needed.
    pub mock_llm: bool,
    /// Overrides the shipped system prompt.
    pub system_prompt_path: Option<PathBuf>,
    /// Command line of an out-of-process chart engine. `None` selects the
    /// built-in deterministic engine.
    pub engine_command: Option<String>,
    pub engine_timeout: Duration,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock_llm: false,
            system_prompt_path: None,
            engine_command: None,
            engine_timeout: DEFAULT_ENGINE_TIMEOUT,
        }
    }
}

/// Owns the single chart session and the adapters behind it.
pub struct Container {
    charts: Arc<ChartSession>,
    chat: Arc<ChatSession>,
    engine: Arc<dyn ChartEngine>,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let client: Arc<dyn ChatClient> = if config.mock_llm {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::echo())
        } else {
            let client = AnthropicClient::from_env()?;
            debug!("Using Anthropic client with model {}", client.config().model);
            Arc::new(client)
        };

        let engine: Arc<dyn ChartEngine> = match config.engine_command.as_deref() {
            Some(command) => {
                debug!("Using external chart engine: {}", command);
                Arc::new(
                    ExternalChartEngine::from_command_line(command)?
                        .with_timeout(config.engine_timeout),
                )
            }
            None => Arc::new(MockChartEngine::new()),
        };
        if engine.is_synthetic() {
            warn!(
                "No --engine-command given: charts come from the built-in synthetic engine and \
                 do not reflect real planetary positions"
            );
        }

        let system_prompt = load_system_prompt(config.system_prompt_path.as_deref()).await;
        let container = Self::with_adapters(client, engine, system_prompt);
        info!(
            "Companion ready (model={}, engine={})",
            container.chat.model_name(),
            container.engine.engine_name()
        );
        Ok(container)
    }

    /// Wires a container around ready-made adapters.
    pub fn with_adapters(
        client: Arc<dyn ChatClient>,
        engine: Arc<dyn ChartEngine>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let charts = Arc::new(ChartSession::new());
        let chat = Arc::new(ChatSession::new(client, charts.clone(), system_prompt));
        Self {
            charts,
            chat,
            engine,
        }
    }

    pub fn charts(&self) -> Arc<ChartSession> {
        self.charts.clone()
    }

    pub fn chat_session(&self) -> Arc<ChatSession> {
        self.chat.clone()
    }

    pub fn uses_synthetic_engine(&self) -> bool {
        self.engine.is_synthetic()
    }

    pub fn generate_chart_use_case(&self) -> GenerateChartUseCase {
        GenerateChartUseCase::new(self.engine.clone(), self.charts.clone())
    }
}
