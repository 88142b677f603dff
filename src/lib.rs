//! # metrix-rs
//!
//! Metrics telemetry pipeline: an agent that samples host and process metrics
//! and delivers them in batches, and a collector server that persists them.
//!
//! ## Features
//!
//! - **Aggregation**: gauges are replaced, counters accumulate their deltas
//! - **Storage**: in-memory, JSON snapshot file or relational database behind one contract
//! - **Delivery**: gzip batches with an optional SHA-256 integrity tag and RSA-OAEP encryption
//! - **Retry**: linear, cancellable backoff for sends and transient database errors
//! - **Transports**: plain HTTP or the RPC envelope
//!
//! ## Server
//!
//! ```rust,no_run
//! use metrix_rs::config::ServerConfig;
//! use metrix_rs::server::run_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig {
//!         file_storage_path: Some("/tmp/metrics.json".to_string()),
//!         ..Default::default()
//!     };
//!     run_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Codec
//!
//! ```rust
//! use metrix_rs::{Metric, PayloadCodec};
//!
//! let codec = PayloadCodec::new().with_sign_key(Some("secret".to_string()));
//! let batch = vec![Metric::gauge("Alloc", 1234.0), Metric::counter("PollCount", 1)];
//!
//! let encoded = codec.encode(&batch).unwrap();
//! let decoded = codec
//!     .decode(&encoded.body, true, encoded.signature.as_deref())
//!     .unwrap();
//! assert_eq!(decoded, batch);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod agent;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{AgentConfig, ServerConfig};
pub use core::codec::{EncodedPayload, PayloadCodec};
pub use core::metric::{Batch, Metric, MetricKind, MetricValue, Snapshot};
pub use storage::{MetricStorage, MetricStore, StorageBackend};
pub use utils::error::{MetricsError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information printed by both binaries
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix time of the build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Build version: {}\nBuild date: {}\nBuild commit: {}",
            self.version, self.build_time, self.git_hash
        )
    }
}

/// Build information of this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let info = build_info();
        assert_eq!(info.version, VERSION);
        assert!(!info.git_hash.is_empty());
        assert!(info.to_string().starts_with("Build version: "));
    }

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "metrix-rs");
        assert_eq!(DESCRIPTION, env!("CARGO_PKG_DESCRIPTION"));
    }
}
