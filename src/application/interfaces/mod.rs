mod chart_engine;
mod chat_client;

pub use chart_engine::*;
pub use chat_client::*;
