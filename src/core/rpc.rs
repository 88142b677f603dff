//! RPC envelope for batch delivery
//!
//! The call carries the encoded body as base64 plus the hex tag; failures come
//! back in-band with `success = false`.

use crate::core::codec::EncodedPayload;
use crate::utils::error::{MetricsError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Path of the batch method
pub const RPC_BATCH_PATH: &str = "/rpc/metrics.MetricsService/BatchUpdate";

/// Request of the batch method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Compressed, optionally encrypted body, base64 encoded
    pub data: String,
    /// Hex integrity tag, empty when unsigned
    #[serde(default)]
    pub hash: String,
}

impl BatchRequest {
    pub fn from_payload(payload: &EncodedPayload) -> Self {
        Self {
            data: STANDARD.encode(&payload.body),
            hash: payload.signature.clone().unwrap_or_default(),
        }
    }

    /// Raw body bytes
    pub fn body(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| MetricsError::bad_request(format!("Invalid base64 data: {}", e)))
    }

    /// Tag, or `None` when the caller did not sign
    pub fn signature(&self) -> Option<&str> {
        Some(self.hash.as_str()).filter(|h| !h.is_empty())
    }
}

/// Response of the batch method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl MetricResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_body_and_tag() {
        let payload = EncodedPayload {
            body: vec![0x1f, 0x8b, 0x00, 0xff],
            signature: Some("abc123".to_string()),
        };
        let request = BatchRequest::from_payload(&payload);

        assert_eq!(request.body().unwrap(), payload.body);
        assert_eq!(request.signature(), Some("abc123"));
    }

    #[test]
    fn test_unsigned_request_has_empty_hash() {
        let payload = EncodedPayload {
            body: b"x".to_vec(),
            signature: None,
        };
        let json = serde_json::to_value(BatchRequest::from_payload(&payload)).unwrap();
        assert_eq!(json["hash"], "");

        let parsed: BatchRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.signature(), None);
    }

    #[test]
    fn test_invalid_base64_is_bad_request() {
        let request = BatchRequest {
            data: "%%%".to_string(),
            hash: String::new(),
        };
        assert!(matches!(request.body(), Err(MetricsError::BadRequest(_))));
    }
}
