//! RSA-OAEP (SHA-256) payload encryption
//!
//! Plaintext is split into blocks of `k - 2*hLen - 2` bytes, each block is
//! encrypted on its own and the `k`-byte ciphertext blocks are concatenated and
//! hex-encoded.

use crate::utils::error::{MetricsError, Result};
use rand::rngs::OsRng;
use rsa::pkcs1::{
    DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding,
};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::path::Path;

const HASH_LEN: usize = 32;

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Keys of at most `2*hLen + 2` bytes leave no room for plaintext
fn check_key_size(inner: &RsaPublicKey) -> Result<()> {
    if inner.size() <= 2 * HASH_LEN + 2 {
        return Err(MetricsError::crypto(format!(
            "key too small for OAEP/SHA-256: {} bits",
            inner.size() * 8
        )));
    }
    Ok(())
}

/// Server public key used by the agent
#[derive(Debug, Clone)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Parse a PKCS#1 `RSA PUBLIC KEY` PEM document
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = RsaPublicKey::from_pkcs1_pem(pem)
            .map_err(|e| MetricsError::crypto(format!("invalid public key: {}", e)))?;
        Self::try_from(inner)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pem = tokio::fs::read_to_string(path).await?;
        Self::from_pem(&pem)
    }

    /// PKCS#1 PEM document
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| MetricsError::crypto(format!("cannot encode public key: {}", e)))
    }

    /// Largest plaintext block one OAEP operation accepts
    ///
    /// Zero for keys too small to hold any plaintext.
    pub fn block_size(&self) -> usize {
        self.inner.size().saturating_sub(2 * HASH_LEN + 2)
    }

    /// Encrypt `plaintext` and return the hex-encoded ciphertext
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        check_key_size(&self.inner)?;
        let block_size = self.block_size();
        let mut rng = OsRng;
        let mut ciphertext =
            Vec::with_capacity(plaintext.len().div_ceil(block_size).max(1) * self.inner.size());

        for block in plaintext.chunks(block_size) {
            let encrypted = self
                .inner
                .encrypt(&mut rng, oaep(), block)
                .map_err(|e| MetricsError::crypto(format!("encryption failed: {}", e)))?;
            ciphertext.extend_from_slice(&encrypted);
        }

        Ok(hex::encode(ciphertext))
    }
}

impl TryFrom<RsaPublicKey> for PublicKey {
    type Error = MetricsError;

    fn try_from(inner: RsaPublicKey) -> Result<Self> {
        check_key_size(&inner)?;
        Ok(Self { inner })
    }
}

/// Server private key
#[derive(Debug, Clone)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Parse a PKCS#1 `RSA PRIVATE KEY` PEM document
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| MetricsError::crypto(format!("invalid private key: {}", e)))?;
        Ok(Self { inner })
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pem = tokio::fs::read_to_string(path).await?;
        Self::from_pem(&pem)
    }

    /// Fresh key of `bits` bits
    pub fn generate(bits: usize) -> Result<Self> {
        let inner = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| MetricsError::crypto(format!("key generation failed: {}", e)))?;
        Ok(Self { inner })
    }

    /// PKCS#1 PEM document
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pkcs1_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| MetricsError::crypto(format!("cannot encode private key: {}", e)))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: RsaPublicKey::from(&self.inner),
        }
    }

    /// Decrypt hex-encoded, block-concatenated ciphertext
    pub fn decrypt(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let ciphertext = hex::decode(encoded.trim_ascii())
            .map_err(|e| MetricsError::DecryptionFailed(format!("ciphertext is not hex: {}", e)))?;

        let block = self.inner.size();
        if ciphertext.len() % block != 0 {
            return Err(MetricsError::DecryptionFailed(format!(
                "ciphertext length {} is not a multiple of the key size {}",
                ciphertext.len(),
                block
            )));
        }

        let mut plaintext = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks(block) {
            let decrypted = self
                .inner
                .decrypt(oaep(), chunk)
                .map_err(|e| MetricsError::DecryptionFailed(e.to_string()))?;
            plaintext.extend_from_slice(&decrypted);
        }
        Ok(plaintext)
    }
}

impl From<RsaPrivateKey> for PrivateKey {
    fn from(inner: RsaPrivateKey) -> Self {
        Self { inner }
    }
}
