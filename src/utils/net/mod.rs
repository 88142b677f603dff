//! Network utilities
//!
//! HTTP client construction for the agent, best-effort discovery of the local
//! outbound address, and CIDR matching for trusted-subnet filtering.

pub mod addr;
pub mod client;

// Re-export commonly used types and functions
pub use addr::{IpNet, outbound_ip};
pub use client::{ClientUtils, HttpClientConfig};
