use super::types::HttpClientConfig;
use crate::utils::error::{MetricsError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};

/// Utility functions for HTTP client operations
pub struct ClientUtils;

impl ClientUtils {
    /// Creates an HTTP client with the specified configuration
    pub fn create_http_client(config: &HttpClientConfig) -> Result<Client> {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                MetricsError::config(format!("Invalid header name '{}': {}", key, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                MetricsError::config(format!("Invalid header value for '{}': {}", key, e))
            })?;
            headers.insert(name, value);
        }

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(client)
    }

    /// Turns `host:port` (or a full URL) plus `path` into an absolute URL
    pub fn endpoint_url(address: &str, path: &str) -> String {
        let base = address.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            format!("{}/{}", base, path)
        } else {
            format!("http://{}/{}", base, path)
        }
    }

    /// Whether a response status means the payload was accepted
    pub fn is_success(status: u16) -> bool {
        (200..300).contains(&status)
    }
}
