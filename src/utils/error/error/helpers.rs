//! Helper functions for creating and classifying errors

use super::types::MetricsError;

/// Coarse error classes used for logging and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Storage contract violations and backend failures
    Storage,
    /// Malformed metrics or requests
    Validation,
    /// Network and peer failures, usually worth retrying
    Transport,
    /// Signature, encryption and compression failures
    Integrity,
    /// Start-up and configuration problems
    Config,
    /// Everything else
    Internal,
}

impl MetricsError {
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    pub fn invalid_metric<S: Into<String>>(message: S) -> Self {
        Self::InvalidMetricName(message.into())
    }

    pub fn unknown_metric<S: Into<String>>(id: S) -> Self {
        Self::UnknownMetric(id.into())
    }

    /// Whether the failure is a connection-class error that may clear up on its own
    pub fn is_transient(&self) -> bool {
        match self {
            MetricsError::Database(err) => crate::storage::database::is_transient(err),
            MetricsError::HttpClient(err) => err.is_timeout() || err.is_connect(),
            MetricsError::Transport(_) => true,
            MetricsError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MetricsError::UninitializedStorage
            | MetricsError::UnknownMetric(_)
            | MetricsError::Database(_)
            | MetricsError::Io(_) => ErrorCategory::Storage,
            MetricsError::InvalidMetricName(_)
            | MetricsError::Serialization(_)
            | MetricsError::BadRequest(_)
            | MetricsError::NotFound(_)
            | MetricsError::PayloadTooLarge { .. }
            | MetricsError::Forbidden(_) => ErrorCategory::Validation,
            MetricsError::HttpClient(_) | MetricsError::Transport(_) => ErrorCategory::Transport,
            MetricsError::SignatureInvalid
            | MetricsError::DecryptionFailed(_)
            | MetricsError::DecompressionFailed(_)
            | MetricsError::Crypto(_) => ErrorCategory::Integrity,
            MetricsError::Config(_) | MetricsError::Yaml(_) => ErrorCategory::Config,
            MetricsError::Cancelled | MetricsError::Internal(_) => ErrorCategory::Internal,
        }
    }
}
