//! Delivery transports
//!
//! A transport only moves an already encoded payload; encoding and retries
//! belong to the sender worker.

pub mod http;
pub mod rpc;

pub use http::HttpTransport;
pub use rpc::RpcTransport;

use crate::core::codec::EncodedPayload;
use crate::utils::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one payload; any error makes the worker retry the cycle
    async fn send(&self, payload: &EncodedPayload) -> Result<()>;

    fn name(&self) -> &'static str;
}
