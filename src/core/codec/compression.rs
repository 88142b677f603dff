//! gzip framing for payload bodies

use crate::utils::error::{MetricsError, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate `data`, refusing to produce more than `limit` bytes
pub fn decompress(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data).take(limit as u64 + 1);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| MetricsError::DecompressionFailed(e.to_string()))?;
    if out.len() > limit {
        return Err(MetricsError::PayloadTooLarge { limit });
    }
    Ok(out)
}
