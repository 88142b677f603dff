//! Configuration data models
//!
//! This module defines the configuration structures of both binaries.

#![allow(missing_docs)]

pub mod agent;
pub mod logging;
pub mod server;

// Re-export all configuration types
pub use agent::*;
pub use logging::*;
pub use server::*;

/// Default address of the collector server
pub fn default_address() -> String {
    "localhost:8080".to_string()
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

/// Default report interval in seconds
pub fn default_report_interval() -> u64 {
    10
}

/// Default poll interval in seconds
pub fn default_poll_interval() -> u64 {
    2
}

/// Default number of sender workers
pub fn default_rate_limit() -> usize {
    5
}

/// Default capacity of the agent's shared metric channel
pub fn default_channel_capacity() -> usize {
    1024
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

pub fn default_log_level() -> String {
    "info".to_string()
}
