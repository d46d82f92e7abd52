mod birth_details;
mod chart;
mod chat;

pub use birth_details::*;
pub use chart::*;
pub use chat::*;
