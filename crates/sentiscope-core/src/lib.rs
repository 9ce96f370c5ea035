//! Sentiscope Core
//!
//! Types and error handling shared across Sentiscope components.
//!
//! This crate provides:
//! - The `Verdict` returned by every successful classification
//! - `ClassProbabilities`, an ordered class-to-probability mapping
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassProbabilities, Verdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassProbabilities, Verdict};
}
