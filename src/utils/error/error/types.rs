//! Error types for the metrics pipeline

use thiserror::Error;

/// Result type alias for the metrics pipeline
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Main error type for the metrics pipeline
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend used before `new_storage` succeeded
    #[error("storage is not initialized")]
    UninitializedStorage,

    /// Empty metric id, unrecognized kind or empty batch
    #[error("invalid metric name: {0}")]
    InvalidMetricName(String),

    /// Metric id not present in the snapshot
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Peer answered, but not with success
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key loading or encryption errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Integrity tag does not match the payload
    #[error("signature is invalid")]
    SignatureInvalid,

    /// Payload could not be decrypted with the configured key
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Payload is not a valid gzip stream
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// Request body exceeds the configured cap
    #[error("payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller outside the trusted subnet
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Operation aborted by the shared cancellation signal
    #[error("operation cancelled")]
    Cancelled,

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
