//! Utility modules shared by the agent and the server
//!
//! ## Module Organization
//!
//! - **error**: Error taxonomy and retry recovery
//! - **logging**: Injected logging capability and subscriber setup
//! - **net**: HTTP client construction, outbound address discovery and CIDR matching

pub mod error; // Error handling
pub mod logging; // Logging & monitoring
pub mod net; // Network & client utilities

// Re-export commonly used types from each module for convenience
pub use error::{ErrorCategory, MetricsError, Result, RetryConfig, RetryPolicy};
pub use logging::{LogEntry, LogLevel, Logger, MemoryLogger, SharedLogger, TracingLogger};
pub use net::{ClientUtils, HttpClientConfig, IpNet};
