use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::{ChatRequest, DomainError};

/// Text deltas of one streamed reply, in arrival order.
///
/// Dropping the stream releases the underlying connection.
pub type TextStream = BoxStream<'static, Result<String, DomainError>>;

/// An interface for sending a system prompt plus conversation to an LLM.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. [`crate::application::ChatSession`] stays decoupled from any
/// particular provider or HTTP client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the assistant's full reply.
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError>;

    /// Opens a streaming reply. Errors before the first delta are returned
    /// here; errors after it arrive as the stream's final item.
    async fn stream(&self, request: &ChatRequest) -> Result<TextStream, DomainError>;

    fn model_name(&self) -> &str;
}
