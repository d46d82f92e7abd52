//! Domain services: pure chart formatting and prompt logic.

mod context_formatter;
mod display_formatter;
mod interpretation;
mod prompt_suggestions;

pub use context_formatter::*;
pub use display_formatter::*;
pub use interpretation::*;
pub use prompt_suggestions::*;
