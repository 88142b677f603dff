//! Error handling utilities
//!
//! This module provides the crate-wide error type and the retry machinery used
//! to recover from transient failures.

pub mod error;
pub mod recovery;

// Re-export commonly used types and functions
pub use error::*;
pub use recovery::*;
