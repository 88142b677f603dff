//! File storage implementation
//!
//! The snapshot is kept as a single JSON object on disk.

mod local;

// Re-export public types
pub use local::FileStorage;
