mod anthropic_client;
mod external_chart_engine;
mod mock_chart_engine;
mod mock_chat_client;
mod sse_decoder;
mod system_prompt;

pub use anthropic_client::*;
pub use external_chart_engine::*;
pub use mock_chart_engine::*;
pub use mock_chat_client::*;
pub use sse_decoder::*;
pub use system_prompt::*;
