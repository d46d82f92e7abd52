//! # Application Layer
//!
//! The chat session engine, the chart slot, and chart generation, coordinating
//! domain services with the connector-layer adapters behind the interfaces.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
