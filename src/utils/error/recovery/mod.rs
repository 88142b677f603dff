//! Error recovery utilities
//!
//! Linear backoff retry shared by the agent's send cycle and the relational
//! storage backend.

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::{Cancelled, RetryConfig};

#[cfg(test)]
mod tests;
