//! Logging utilities
//!
//! Components never reach for a global logger: they take a [`SharedLogger`]
//! and report through it. Binaries install the `tracing` subscriber once and
//! hand out [`TracingLogger`] instances.

mod init;
mod logger;
mod types;

pub use init::init_tracing;
pub use logger::{Logger, MemoryLogger, SharedLogger, TracingLogger};
pub use types::{LogEntry, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("warning").ok(), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("INFO").ok(), Some(LogLevel::Info));
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_memory_logger_records_levels() {
        let logger = MemoryLogger::new();
        logger.info("collector started");
        logger.warn("metric left in channel: PollCount");

        assert_eq!(logger.entries().len(), 2);
        assert_eq!(
            logger.messages_at(LogLevel::Warn),
            vec!["metric left in channel: PollCount".to_string()]
        );
        assert!(logger.contains("collector"));

        logger.clear();
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_memory_logger_min_level() {
        let logger = MemoryLogger::with_min_level(LogLevel::Warn);
        logger.debug("noise");
        logger.error("boom");

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
    }

    #[test]
    fn test_shared_logger_is_object_safe() {
        let logger: SharedLogger = TracingLogger::shared("test");
        logger.debug("through the trait object");
    }
}
