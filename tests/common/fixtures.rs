//! Test fixtures and data factories

use metrix_rs::Metric;
use metrix_rs::core::codec::{PrivateKey, PublicKey};
use std::path::PathBuf;
use tempfile::TempDir;

/// Factory for metric batches
pub struct BatchFactory;

impl BatchFactory {
    /// One gauge and one counter, the smallest batch an agent sends
    pub fn basic() -> Vec<Metric> {
        vec![Metric::gauge("Alloc", 1234.0), Metric::counter("PollCount", 1)]
    }

    /// `count` distinct gauges
    pub fn gauges(count: usize) -> Vec<Metric> {
        (0..count)
            .map(|i| Metric::gauge(format!("Gauge{}", i), i as f64 * 1.5))
            .collect()
    }

    /// The same counter repeated with every delta in `deltas`
    pub fn counter_deltas(id: &str, deltas: &[i64]) -> Vec<Metric> {
        deltas.iter().map(|d| Metric::counter(id, *d)).collect()
    }
}

/// RSA key pair written to PEM files in a temporary directory
pub struct KeyPair {
    pub dir: TempDir,
    pub public_path: PathBuf,
    pub private_path: PathBuf,
}

impl KeyPair {
    pub fn generate() -> Self {
        let dir = TempDir::new().unwrap();
        let private = PrivateKey::generate(1024).unwrap();
        let public: PublicKey = private.public_key();

        let private_path = dir.path().join("private.pem");
        let public_path = dir.path().join("public.pem");
        std::fs::write(&private_path, private.to_pem().unwrap()).unwrap();
        std::fs::write(&public_path, public.to_pem().unwrap()).unwrap();

        Self {
            dir,
            public_path,
            private_path,
        }
    }

    pub fn public_path(&self) -> String {
        self.public_path.display().to_string()
    }

    pub fn private_path(&self) -> String {
        self.private_path.display().to_string()
    }
}
