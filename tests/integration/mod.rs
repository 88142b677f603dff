//! Integration tests for metrix-rs
//!
//! These tests run the real backends, codecs and HTTP stack together.

pub mod codec_tests;
pub mod pipeline_tests;
pub mod server_tests;
pub mod storage_tests;
