//! # Connector Layer
//!
//! External integrations implementing the application interfaces:
//! - Chat clients (Anthropic Messages API over SSE, scripted mock)
//! - Chart engines (built-in deterministic, external process)
//! - Front-end boundary (controllers, CLI router, HTTP API)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
