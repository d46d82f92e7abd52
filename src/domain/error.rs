use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or unusable startup configuration (e.g. no API key).
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// The LLM provider answered, but with an error (status code or error event).
    #[error("{0}")]
    Provider(String),

    /// The request never completed: connect failure, timeout, broken body.
    #[error("{0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The astrology engine reported a failure.
    #[error("{0}")]
    Upstream(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization(_))
    }

    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}
