//! Logging
//!
//! Process logging is done with `tracing`. On top of it sits [`LogSink`], the
//! switchable sink the application manager writes its diagnostics to. A
//! release build turns the sink off once, after which every message is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::{Mutex, RwLock};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LoggingConfig;
use crate::error::{Result, TaoError};

/// Environment variable that overrides the configured level filter
pub const LOG_ENV_VAR: &str = "TAO_LOG";

/// Install the global tracing subscriber
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TaoError::Config(format!("Failed to set tracing subscriber: {}", e)))
}

/// Severity of a sink message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// A log destination that can be switched off for the rest of the process
pub trait LogSink: Send + Sync {
    /// Write a message. Dropped silently once the sink is disabled.
    fn log(&self, level: LogLevel, message: &str);

    /// Turn the sink off. There is no way back.
    fn set_disabled(&self);

    /// Whether messages are still written
    fn is_enabled(&self) -> bool;

    /// Label prefixed to every message, usually the application name
    fn set_tag(&self, _tag: &str) {}

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

/// Sink forwarding to `tracing`
#[derive(Debug)]
pub struct TracingSink {
    tag: RwLock<String>,
    enabled: AtomicBool,
}

impl TracingSink {
    pub fn new() -> Self {
        Self {
            tag: RwLock::new(String::new()),
            enabled: AtomicBool::new(true),
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.is_enabled() {
            return;
        }
        let tag = self.tag.read();
        match level {
            LogLevel::Debug => tracing::debug!(app = %tag.as_str(), "{}", message),
            LogLevel::Info => tracing::info!(app = %tag.as_str(), "{}", message),
            LogLevel::Warn => tracing::warn!(app = %tag.as_str(), "{}", message),
            LogLevel::Error => tracing::error!(app = %tag.as_str(), "{}", message),
        }
    }

    fn set_disabled(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_tag(&self, tag: &str) {
        *self.tag.write() = tag.to_string();
    }
}

/// Sink that keeps every message in memory
#[derive(Debug)]
pub struct RecordingSink {
    lines: Mutex<Vec<(LogLevel, String)>>,
    enabled: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Messages written so far
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Messages of exactly this level
    pub fn lines_at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: LogLevel, message: &str) {
        if self.is_enabled() {
            self.lines.lock().push((level, message.to_string()));
        }
    }

    fn set_disabled(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_collects_by_level() {
        let sink = RecordingSink::new();
        sink.info("started");
        sink.warn("low disk");
        sink.info("ready");

        assert_eq!(sink.lines().len(), 3);
        assert_eq!(sink.lines_at(LogLevel::Info), vec!["started", "ready"]);
        assert_eq!(sink.lines_at(LogLevel::Warn), vec!["low disk"]);
    }

    #[test]
    fn test_disabled_sink_drops_messages() {
        let sink = RecordingSink::new();
        sink.info("before");
        sink.set_disabled();
        sink.error("after");

        assert!(!sink.is_enabled());
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_tracing_sink_disable() {
        let sink = TracingSink::new();
        sink.set_tag("Demo");
        assert!(sink.is_enabled());
        sink.set_disabled();
        sink.info("ignored");
        assert!(!sink.is_enabled());
    }
}
