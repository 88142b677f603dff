//! Collector server running in-process on an ephemeral port

use metrix_rs::config::ServerConfig;
use metrix_rs::server::HttpServer;
use metrix_rs::utils::logging::{MemoryLogger, SharedLogger};
use actix_web::dev::ServerHandle;
use std::net::TcpListener;
use std::sync::Arc;

pub struct TestServer {
    pub address: String,
    pub logger: Arc<MemoryLogger>,
    handle: ServerHandle,
}

impl TestServer {
    /// Serve `config` on 127.0.0.1 with a single worker
    pub async fn start(config: ServerConfig) -> Self {
        let logger = Arc::new(MemoryLogger::new());
        let shared: SharedLogger = logger.clone();
        let config = ServerConfig {
            workers: Some(1),
            ..config
        };

        let server = HttpServer::with_logger(&config, shared).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let running = server.listen(listener).unwrap();
        let handle = running.handle();
        tokio::spawn(running);

        Self {
            address,
            logger,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    /// Plain-text value of one metric, `None` on any non-200 answer
    pub async fn value(&self, kind: &str, id: &str) -> Option<String> {
        let response = reqwest::get(self.url(&format!("/value/{}/{}", kind, id)))
            .await
            .unwrap();
        if response.status() != 200 {
            return None;
        }
        Some(response.text().await.unwrap())
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
