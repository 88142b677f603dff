//! Batch delivery through the RPC endpoint

use super::Transport;
use crate::core::codec::{EncodedPayload, REAL_IP_HEADER};
use crate::core::rpc::{BatchRequest, MetricResponse, RPC_BATCH_PATH};
use crate::utils::error::{MetricsError, Result};
use crate::utils::net::ClientUtils;
use async_trait::async_trait;
use reqwest::Client;
use std::net::IpAddr;

pub struct RpcTransport {
    client: Client,
    url: String,
    real_ip: Option<IpAddr>,
}

impl RpcTransport {
    pub fn new(client: Client, rpc_address: &str) -> Self {
        Self {
            client,
            url: ClientUtils::endpoint_url(rpc_address, RPC_BATCH_PATH),
            real_ip: None,
        }
    }

    /// Address reported in `X-Real-IP`
    pub fn with_real_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.real_ip = ip;
        self
    }
}

#[async_trait]
impl Transport for RpcTransport {
    async fn send(&self, payload: &EncodedPayload) -> Result<()> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&BatchRequest::from_payload(payload));
        if let Some(ip) = self.real_ip {
            request = request.header(REAL_IP_HEADER, ip.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        if !ClientUtils::is_success(status.as_u16()) {
            return Err(MetricsError::transport(format!(
                "rpc call failed with {}",
                status
            )));
        }

        let reply: MetricResponse = response.json().await?;
        if !reply.success {
            return Err(MetricsError::transport(reply.message));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rpc"
    }
}
