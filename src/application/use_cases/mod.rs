mod chart_session;
mod chat_session;
mod generate_chart;
mod reply_stream;

pub use chart_session::*;
pub use chat_session::*;
pub use generate_chart::*;
pub use reply_stream::*;
