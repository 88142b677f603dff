//! Error handling for the metrics pipeline
//!
//! This module defines all error types used throughout the agent and the server.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use helpers::ErrorCategory;
pub use response::{ErrorDetail, ErrorResponse};
pub use types::{MetricsError, Result};
