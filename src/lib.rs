pub mod application;
mod cli;
pub mod connector;
pub mod domain;

pub use cli::{BirthArgs, Commands};

pub use application::{
    ChartEngine, ChartSession, ChatClient, ChatSession, GenerateChartUseCase, ReplyPhase,
    ReplyStream,
};

pub use connector::{
    AnthropicClient, AnthropicConfig, Container, ContainerConfig, ExternalChartEngine,
    MockChartEngine, MockChatClient, Router,
};

pub use domain::{
    BirthDetails, ChartRecord, ChatRequest, ChatTurn, DomainError, Exchange, Role,
};
