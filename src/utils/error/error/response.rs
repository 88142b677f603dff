//! HTTP response handling for errors

use super::types::MetricsError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for MetricsError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();

        let message = match self {
            // Backend details stay in the server log.
            MetricsError::Database(_) => "Database operation failed".to_string(),
            MetricsError::Io(_) => "Storage I/O failed".to_string(),
            MetricsError::Internal(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl MetricsError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            MetricsError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            MetricsError::UninitializedStorage => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_UNINITIALIZED")
            }
            MetricsError::InvalidMetricName(_) => (StatusCode::BAD_REQUEST, "INVALID_METRIC"),
            MetricsError::UnknownMetric(_) => (StatusCode::NOT_FOUND, "UNKNOWN_METRIC"),
            MetricsError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            MetricsError::HttpClient(_) | MetricsError::Transport(_) => {
                (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR")
            }
            MetricsError::Serialization(_) | MetricsError::Yaml(_) => {
                (StatusCode::BAD_REQUEST, "PARSE_ERROR")
            }
            MetricsError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            MetricsError::Crypto(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CRYPTO_ERROR"),
            MetricsError::SignatureInvalid => (StatusCode::BAD_REQUEST, "SIGNATURE_INVALID"),
            MetricsError::DecryptionFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DECRYPTION_FAILED")
            }
            MetricsError::DecompressionFailed(_) => {
                (StatusCode::BAD_REQUEST, "DECOMPRESSION_FAILED")
            }
            MetricsError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            MetricsError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            MetricsError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            MetricsError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            MetricsError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED"),
            MetricsError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Standard error response format
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
