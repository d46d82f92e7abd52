//! # Domain Layer
//!
//! Chart and conversation models, errors, and the pure formatting services.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::*;
pub use models::*;
pub use services::*;
