//! HTTP client utilities
//!
//! Client configuration and construction shared by the agent transports.

pub mod types;
pub mod utils;

pub use types::HttpClientConfig;
pub use utils::ClientUtils;
