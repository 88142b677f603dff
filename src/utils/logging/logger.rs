use super::types::{LogEntry, LogLevel};
use parking_lot::Mutex;
use std::sync::Arc;

/// Leveled logging capability handed to every component that reports progress
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Shared handle to an injected logger
pub type SharedLogger = Arc<dyn Logger>;

/// Logger that forwards to the process-wide `tracing` subscriber
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn shared(component: &'static str) -> SharedLogger {
        Arc::new(Self::new(component))
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(component = self.component, "{}", message),
            LogLevel::Info => tracing::info!(component = self.component, "{}", message),
            LogLevel::Warn => tracing::warn!(component = self.component, "{}", message),
            LogLevel::Error => tracing::error!(component = self.component, "{}", message),
        }
    }
}

/// Logger that keeps entries in memory, mostly for assertions in tests
#[derive(Debug, Default)]
pub struct MemoryLogger {
    min_level: Option<LogLevel>,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries below `level`
    pub fn with_min_level(level: LogLevel) -> Self {
        Self {
            min_level: Some(level),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|entry| entry.message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if self.min_level.is_some_and(|min| level < min) {
            return;
        }
        self.entries
            .lock()
            .push(LogEntry::new(level, message.to_string()));
    }
}
