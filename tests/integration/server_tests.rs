//! Server integration tests over a real socket

#[cfg(test)]
mod tests {
    use crate::common::{BatchFactory, TestServer};
    use metrix_rs::PayloadCodec;
    use metrix_rs::config::ServerConfig;
    use metrix_rs::core::codec::{REAL_IP_HEADER, SIGNATURE_HEADER, signing};
    use metrix_rs::core::{BatchRequest, MetricResponse, RPC_BATCH_PATH};
    use tempfile::TempDir;

    async fn post_batch(
        server: &TestServer,
        codec: &PayloadCodec,
        real_ip: Option<&str>,
    ) -> reqwest::Response {
        let encoded = codec.encode(&BatchFactory::basic()).unwrap();
        let mut request = reqwest::Client::new()
            .post(server.url("/updates/"))
            .header("Content-Type", "application/json")
            .header("Content-Encoding", "gzip")
            .body(encoded.body);
        if let Some(signature) = encoded.signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }
        if let Some(ip) = real_ip {
            request = request.header(REAL_IP_HEADER, ip);
        }
        request.send().await.unwrap()
    }

    #[tokio::test]
    async fn test_path_update_then_value() {
        let server = TestServer::start(ServerConfig::default()).await;
        let client = reqwest::Client::new();

        for _ in 0..3 {
            let response = client
                .post(server.url("/update/counter/PollCount/2"))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);
        }
        let response = client
            .post(server.url("/update/gauge/Alloc/12.5"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        assert_eq!(server.value("counter", "PollCount").await.as_deref(), Some("6"));
        assert_eq!(server.value("gauge", "Alloc").await.as_deref(), Some("12.5"));
        assert_eq!(server.value("gauge", "PollCount").await, None);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_signed_batch_and_signed_response() {
        let config = ServerConfig {
            key: Some("secret".to_string()),
            ..Default::default()
        };
        let server = TestServer::start(config).await;
        let codec = PayloadCodec::new().with_sign_key(Some("secret".to_string()));

        let response = post_batch(&server, &codec, None).await;
        assert_eq!(response.status(), 200);
        let tag = response
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap();
        let body = response.bytes().await.unwrap();
        assert!(signing::verify(&body, "secret", &tag).is_ok());

        let values: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(server.value("gauge", "Alloc").await.as_deref(), Some("1234"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_wrong_key_rejected_and_nothing_stored() {
        let config = ServerConfig {
            key: Some("secret".to_string()),
            ..Default::default()
        };
        let server = TestServer::start(config).await;
        let codec = PayloadCodec::new().with_sign_key(Some("guess".to_string()));

        let response = post_batch(&server, &codec, None).await;
        assert_eq!(response.status(), 400);
        assert_eq!(server.value("gauge", "Alloc").await, None);
        assert!(server.logger.contains("Rejected batch"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_file_backend_persists_across_restart() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            file_storage_path: Some(dir.path().join("metrics.json").display().to_string()),
            ..Default::default()
        };

        let server = TestServer::start(config.clone()).await;
        let response = post_batch(&server, &PayloadCodec::new(), None).await;
        assert_eq!(response.status(), 200);
        server.stop().await;

        let restarted = TestServer::start(config).await;
        assert_eq!(
            restarted.value("counter", "PollCount").await.as_deref(),
            Some("1")
        );
        let response = post_batch(&restarted, &PayloadCodec::new(), None).await;
        assert_eq!(response.status(), 200);
        assert_eq!(
            restarted.value("counter", "PollCount").await.as_deref(),
            Some("2")
        );
        restarted.stop().await;
    }

    #[tokio::test]
    async fn test_trusted_subnet_over_socket() {
        let config = ServerConfig {
            trusted_subnet: Some("10.0.0.0/8".to_string()),
            ..Default::default()
        };
        let server = TestServer::start(config).await;
        let codec = PayloadCodec::new();

        assert_eq!(post_batch(&server, &codec, None).await.status(), 400);
        assert_eq!(
            post_batch(&server, &codec, Some("192.168.1.10")).await.status(),
            403
        );
        assert_eq!(
            post_batch(&server, &codec, Some("10.20.30.40")).await.status(),
            200
        );

        // point updates are not restricted
        let response = reqwest::Client::new()
            .post(server.url("/update/gauge/Free/1"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_rpc_envelope_on_main_listener() {
        let server = TestServer::start(ServerConfig::default()).await;
        let encoded = PayloadCodec::new().encode(&BatchFactory::basic()).unwrap();

        let response = reqwest::Client::new()
            .post(server.url(RPC_BATCH_PATH))
            .json(&BatchRequest::from_payload(&encoded))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let reply: MetricResponse = response.json().await.unwrap();
        assert!(reply.success, "{}", reply.message);
        assert_eq!(server.value("counter", "PollCount").await.as_deref(), Some("1"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_ping_and_index() {
        let server = TestServer::start(ServerConfig::default()).await;

        let ping = reqwest::get(server.url("/ping")).await.unwrap();
        assert_eq!(ping.status(), 200);

        reqwest::Client::new()
            .post(server.url("/update/gauge/Alloc/5"))
            .send()
            .await
            .unwrap();
        let index = reqwest::get(server.url("/")).await.unwrap();
        assert_eq!(index.status(), 200);
        assert!(index.text().await.unwrap().contains("Alloc"));

        server.stop().await;
    }
}
