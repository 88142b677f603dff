//! Common test utilities for metrix-rs
//!
//! - Metric batches and key material (`fixtures`)
//! - A collector server bound to an ephemeral port (`server`)

pub mod fixtures;
pub mod server;

pub use fixtures::{BatchFactory, KeyPair};
pub use server::TestServer;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
