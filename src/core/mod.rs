//! Reelgen Core Engine
//!
//! Core orchestration module.
//! Handles request normalization, provider dispatch, operation polling,
//! and artifact extraction.

pub mod auth;
pub mod videogen;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
