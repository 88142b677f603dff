//! Batch delivery over plain HTTP

use super::Transport;
use crate::core::codec::{
    DEFAULT_DECODED_LIMIT, EncodedPayload, PayloadCodec, REAL_IP_HEADER, SIGNATURE_HEADER,
    compression,
};
use crate::utils::error::{MetricsError, Result};
use crate::utils::logging::SharedLogger;
use crate::utils::net::ClientUtils;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
use std::net::IpAddr;
use std::sync::Arc;

/// Path of the batch endpoint
pub const BATCH_PATH: &str = "/updates/";

/// POSTs gzip bodies to the batch endpoint
pub struct HttpTransport {
    client: Client,
    url: String,
    real_ip: Option<IpAddr>,
    codec: Arc<PayloadCodec>,
    logger: SharedLogger,
}

impl HttpTransport {
    /// `codec` is only used to check the tag on the server's response
    pub fn new(
        client: Client,
        server_address: &str,
        codec: Arc<PayloadCodec>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            client,
            url: ClientUtils::endpoint_url(server_address, BATCH_PATH),
            real_ip: None,
            codec,
            logger,
        }
    }

    /// Address reported in `X-Real-IP`
    pub fn with_real_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.real_ip = ip;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response tag mismatches are reported, the batch was still accepted
    fn check_response(&self, body: &[u8], compressed: bool, signature: Option<&str>) {
        if !self.codec.signs() || signature.is_none() {
            return;
        }

        let json = if compressed {
            match compression::decompress(body, DEFAULT_DECODED_LIMIT) {
                Ok(json) => json,
                Err(e) => {
                    self.logger
                        .warn(&format!("Could not inflate server response: {}", e));
                    return;
                }
            }
        } else {
            body.to_vec()
        };

        if let Err(e) = self.codec.verify(&json, signature) {
            self.logger
                .warn(&format!("Server response failed verification: {}", e));
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &EncodedPayload) -> Result<()> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_ENCODING, "gzip")
            .header(ACCEPT_ENCODING, "gzip")
            .body(payload.body.clone());

        if let Some(signature) = &payload.signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }
        if let Some(ip) = self.real_ip {
            request = request.header(REAL_IP_HEADER, ip.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let compressed = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("gzip"));
        let signature = response
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        if !ClientUtils::is_success(status.as_u16()) {
            return Err(MetricsError::transport(format!(
                "server responded with {}: {}",
                status,
                String::from_utf8_lossy(&body).trim()
            )));
        }

        self.check_response(&body, compressed, signature.as_deref());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::signing;
    use crate::utils::logging::{LogLevel, MemoryLogger};
    use crate::utils::net::HttpClientConfig;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer, codec: PayloadCodec, logger: Arc<MemoryLogger>) -> HttpTransport {
        let client = ClientUtils::create_http_client(&HttpClientConfig::default()).unwrap();
        HttpTransport::new(client, &server.uri(), Arc::new(codec), logger)
    }

    fn payload(signature: Option<&str>) -> EncodedPayload {
        EncodedPayload {
            body: compression::compress(br#"[{"id":"PollCount","type":"counter","delta":1}]"#).unwrap(),
            signature: signature.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_send_sets_wire_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .and(header("content-encoding", "gzip"))
            .and(header("accept-encoding", "gzip"))
            .and(header("content-type", "application/json"))
            .and(header("HashSHA256", "feedface"))
            .and(header("X-Real-IP", "10.1.2.3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, PayloadCodec::new(), Arc::new(MemoryLogger::new()))
            .with_real_ip(Some("10.1.2.3".parse().unwrap()));
        transport.send(&payload(Some("feedface"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsigned_send_omits_signature() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .and(header_exists("HashSHA256"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = transport(&server, PayloadCodec::new(), Arc::new(MemoryLogger::new()));
        transport.send(&payload(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("storage down"))
            .mount(&server)
            .await;

        let transport = transport(&server, PayloadCodec::new(), Arc::new(MemoryLogger::new()));
        match transport.send(&payload(None)).await {
            Err(MetricsError::Transport(message)) => assert!(message.contains("storage down")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_response_signature_checked() {
        let body = r#"[{"id":"PollCount","type":"counter","delta":3}]"#;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("HashSHA256", signing::sign(body.as_bytes(), "other-key"))
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        let logger = Arc::new(MemoryLogger::new());
        let codec = PayloadCodec::new().with_sign_key(Some("secret".to_string()));
        let transport = transport(&server, codec, logger.clone());

        transport.send(&payload(Some("tag"))).await.unwrap();
        assert!(
            logger
                .messages_at(LogLevel::Warn)
                .iter()
                .any(|m| m.contains("failed verification"))
        );
    }

    #[tokio::test]
    async fn test_gzip_response_with_valid_signature() {
        let body = r#"[{"id":"Alloc","type":"gauge","value":1234}]"#;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("HashSHA256", signing::sign(body.as_bytes(), "secret"))
                    .insert_header("Content-Encoding", "gzip")
                    .set_body_bytes(compression::compress(body.as_bytes()).unwrap()),
            )
            .mount(&server)
            .await;

        let logger = Arc::new(MemoryLogger::new());
        let codec = PayloadCodec::new().with_sign_key(Some("secret".to_string()));
        let transport = transport(&server, codec, logger.clone());

        transport.send(&payload(Some("tag"))).await.unwrap();
        assert!(logger.messages_at(LogLevel::Warn).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_client_error() {
        let client = ClientUtils::create_http_client(&HttpClientConfig::default()).unwrap();
        let transport = HttpTransport::new(
            client,
            "127.0.0.1:9",
            Arc::new(PayloadCodec::new()),
            Arc::new(MemoryLogger::new()),
        );
        assert!(matches!(
            transport.send(&payload(None)).await,
            Err(MetricsError::HttpClient(_))
        ));
    }
}
