//! Payload codec
//!
//! Agent side: JSON, then optional RSA-OAEP encryption (hex text), then gzip.
//! The integrity tag is always computed over the raw JSON and travels next to
//! the body, never inside it. The server runs the same steps in reverse and
//! checks the tag against the recovered JSON before anything is parsed.

pub mod compression;
pub mod encryption;
pub mod signing;


pub use encryption::{PrivateKey, PublicKey};

use crate::core::metric::{Batch, Metric};
use crate::utils::error::Result;

/// Header carrying the hex integrity tag on requests and responses
pub const SIGNATURE_HEADER: &str = "HashSHA256";

/// Header carrying the caller's best-effort IP address
pub const REAL_IP_HEADER: &str = "X-Real-IP";

/// Default ceiling for decoded payloads
pub const DEFAULT_DECODED_LIMIT: usize = 1 << 20;

/// Bytes ready for the wire plus the out-of-band tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub body: Vec<u8>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PayloadCodec {
    sign_key: Option<String>,
    public_key: Option<PublicKey>,
    private_key: Option<PrivateKey>,
    decoded_limit: usize,
}

impl Default for PayloadCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadCodec {
    /// Codec without signing or encryption
    pub fn new() -> Self {
        Self {
            sign_key: None,
            public_key: None,
            private_key: None,
            decoded_limit: DEFAULT_DECODED_LIMIT,
        }
    }

    /// Shared signing key; an empty key disables signing
    pub fn with_sign_key(mut self, key: Option<String>) -> Self {
        self.sign_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_public_key(mut self, key: PublicKey) -> Self {
        self.public_key = Some(key);
        self
    }

    pub fn with_private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    pub fn with_decoded_limit(mut self, limit: usize) -> Self {
        self.decoded_limit = limit;
        self
    }

    pub fn signs(&self) -> bool {
        self.sign_key.is_some()
    }

    pub fn encrypts(&self) -> bool {
        self.public_key.is_some()
    }

    /// Tag for `payload`, or `None` when no key is configured
    pub fn sign(&self, payload: &[u8]) -> Option<String> {
        self.sign_key
            .as_deref()
            .map(|key| signing::sign(payload, key))
    }

    /// Check `signature` against `payload`
    ///
    /// Skipped entirely when no key is configured or the peer sent no tag.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<()> {
        match (self.sign_key.as_deref(), signature) {
            (Some(key), Some(tag)) if !tag.is_empty() => signing::verify(payload, key, tag),
            _ => Ok(()),
        }
    }

    /// Marshal, encrypt, compress and sign a batch
    pub fn encode(&self, batch: &[Metric]) -> Result<EncodedPayload> {
        let json = serde_json::to_vec(batch)?;
        let signature = self.sign(&json);

        let body = match &self.public_key {
            Some(key) => compression::compress(key.encrypt(&json)?.as_bytes())?,
            None => compression::compress(&json)?,
        };

        Ok(EncodedPayload { body, signature })
    }

    /// Recover the raw JSON from a wire body and verify its tag
    pub fn open(&self, body: &[u8], compressed: bool, signature: Option<&str>) -> Result<Vec<u8>> {
        let inflated = if compressed {
            compression::decompress(body, self.decoded_limit)?
        } else {
            body.to_vec()
        };

        let json = match &self.private_key {
            Some(key) => key.decrypt(&inflated)?,
            None => inflated,
        };

        self.verify(&json, signature)?;
        Ok(json)
    }

    /// Inverse of [`encode`](Self::encode): whole batch or nothing
    pub fn decode(&self, body: &[u8], compressed: bool, signature: Option<&str>) -> Result<Batch> {
        let json = self.open(body, compressed, signature)?;
        Ok(serde_json::from_slice(&json)?)
    }
}
