//! Agent to server delivery tests

#[cfg(test)]
mod tests {
    use crate::common::{KeyPair, TestServer};
    use metrix_rs::agent::{
        AgentPool, HttpTransport, MetricChannel, RpcTransport, SendWorker, Transport,
    };
    use metrix_rs::config::{AgentConfig, ServerConfig};
    use metrix_rs::core::codec::PublicKey;
    use metrix_rs::utils::error::{RetryConfig, RetryPolicy};
    use metrix_rs::utils::logging::{MemoryLogger, SharedLogger};
    use metrix_rs::{Metric, MetricsError, PayloadCodec};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn logger() -> SharedLogger {
        Arc::new(MemoryLogger::new())
    }

    fn http_transport(address: &str, codec: Arc<PayloadCodec>) -> Arc<dyn Transport> {
        Arc::new(HttpTransport::new(
            reqwest::Client::new(),
            address,
            codec,
            logger(),
        ))
    }

    fn worker(
        channel: &MetricChannel,
        codec: Arc<PayloadCodec>,
        transport: Arc<dyn Transport>,
    ) -> SendWorker {
        SendWorker::new(
            1,
            channel.receiver(),
            codec,
            transport,
            RetryPolicy::new(RetryConfig::new(0, Duration::from_millis(1))),
            Duration::from_secs(10),
            logger(),
        )
    }

    #[tokio::test]
    async fn test_worker_delivers_and_counters_accumulate() {
        let server = TestServer::start(ServerConfig::default()).await;
        let codec = Arc::new(PayloadCodec::new());
        let channel = MetricChannel::new(16);
        let worker = worker(&channel, codec.clone(), http_transport(&server.address, codec));
        let sender = channel.sender();
        let cancel = CancellationToken::new();

        sender.try_send(Metric::gauge("Alloc", 1234.0)).unwrap();
        sender.try_send(Metric::counter("PollCount", 1)).unwrap();
        worker.drain_available().await;
        assert_eq!(worker.flush(&cancel).await.unwrap(), 2);
        assert!(worker.pending().await.unwrap().is_empty());

        assert_eq!(server.value("gauge", "Alloc").await.as_deref(), Some("1234"));
        assert_eq!(server.value("counter", "PollCount").await.as_deref(), Some("1"));

        sender.try_send(Metric::counter("PollCount", 1)).unwrap();
        worker.drain_available().await;
        worker.flush(&cancel).await.unwrap();
        assert_eq!(server.value("counter", "PollCount").await.as_deref(), Some("2"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_encrypted_signed_delivery() {
        let keys = KeyPair::generate();
        let server = TestServer::start(ServerConfig {
            key: Some("secret".to_string()),
            crypto_key: Some(keys.private_path()),
            ..Default::default()
        })
        .await;

        let codec = Arc::new(
            PayloadCodec::new()
                .with_sign_key(Some("secret".to_string()))
                .with_public_key(PublicKey::from_file(&keys.public_path).await.unwrap()),
        );
        let channel = MetricChannel::new(64);
        let worker = worker(&channel, codec.clone(), http_transport(&server.address, codec));

        for i in 0..30 {
            channel
                .sender()
                .try_send(Metric::gauge(format!("Gauge{}", i), i as f64))
                .unwrap();
        }
        worker.drain_available().await;
        assert_eq!(worker.flush(&CancellationToken::new()).await.unwrap(), 30);
        assert_eq!(server.value("gauge", "Gauge29").await.as_deref(), Some("29"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_rpc_transport_delivery() {
        let server = TestServer::start(ServerConfig::default()).await;
        let codec = Arc::new(PayloadCodec::new());
        let transport: Arc<dyn Transport> =
            Arc::new(RpcTransport::new(reqwest::Client::new(), &server.address));
        let channel = MetricChannel::new(16);
        let worker = worker(&channel, codec, transport);

        channel.sender().try_send(Metric::counter("PollCount", 7)).unwrap();
        worker.drain_available().await;
        worker.flush(&CancellationToken::new()).await.unwrap();
        assert_eq!(server.value("counter", "PollCount").await.as_deref(), Some("7"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_keeps_metrics() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let codec = Arc::new(PayloadCodec::new());
        let channel = MetricChannel::new(16);
        let worker = worker(&channel, codec.clone(), http_transport(&address, codec));

        channel.sender().try_send(Metric::counter("PollCount", 1)).unwrap();
        worker.drain_available().await;
        assert!(matches!(
            worker.flush(&CancellationToken::new()).await,
            Err(MetricsError::HttpClient(_))
        ));
        assert_eq!(worker.pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_agent_pool_reports_default_collectors() {
        let server = TestServer::start(ServerConfig::default()).await;
        let config = AgentConfig {
            server_address: server.address.clone(),
            rate_limit: 2,
            ..Default::default()
        };
        let codec = Arc::new(PayloadCodec::new());
        let pool = AgentPool::new(
            &config,
            codec.clone(),
            http_transport(&server.address, codec),
            logger(),
        )
        .with_default_collectors()
        .with_intervals(Duration::from_millis(50), Duration::from_millis(200));

        let cancel = CancellationToken::new();
        let running = tokio::spawn(pool.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(1200)).await;
        cancel.cancel();
        running.await.unwrap();

        let polls: i64 = server
            .value("counter", "PollCount")
            .await
            .unwrap()
            .parse()
            .unwrap();
        assert!(polls >= 1);
        assert!(server.value("gauge", "TotalMemory").await.is_some());
        assert!(server.value("gauge", "RandomValue").await.is_some());

        server.stop().await;
    }
}
