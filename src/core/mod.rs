//! Core functionality for the metrics pipeline
//!
//! The metric model, the payload codec and the RPC envelope shared by the
//! agent and the server.

pub mod codec;
pub mod metric;
pub mod rpc;

pub use codec::{EncodedPayload, PayloadCodec, PrivateKey, PublicKey};
pub use metric::{Batch, Metric, MetricKind, MetricQuery, MetricRecord, MetricValue, Snapshot};
pub use rpc::{BatchRequest, MetricResponse, RPC_BATCH_PATH};
