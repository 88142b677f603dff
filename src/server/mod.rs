//! HTTP server implementation
//!
//! Batch and single-metric ingestion into the configured storage, behind one
//! server-wide lock.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;


pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::{AppState, BatchOutcome};
