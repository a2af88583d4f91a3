//! Logging service implementation

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with level filtering
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create a console service with the level taken from SBN_LOG_LEVEL
    pub fn from_env() -> Self {
        let min_level = min_level_from_env();
        Self::new(Arc::new(ConsoleLogger::new(min_level)), min_level)
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    /// Convenience method: log error with code
    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    /// Convenience method: log info
    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    /// Convenience method: log success
    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }
}

fn min_level_from_env() -> LogLevel {
    match std::env::var("SBN_LOG_LEVEL").ok().as_deref() {
        Some("error") => LogLevel::Error,
        Some("warn") | Some("warning") => LogLevel::Warning,
        Some("debug") => LogLevel::Debug,
        _ => LogLevel::Info,
    }
}

/// Console logger writing human-readable lines to stderr
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }

        let timestamp: DateTime<Local> = event.timestamp.into();
        let mut line = format!(
            "[{} {} {}] {}",
            timestamp.format("%H:%M:%S%.3f"),
            event.level.as_str(),
            event.code,
            event.message
        );

        if let Some(span) = event.span {
            line.push_str(&format!(" @ {}", span));
        }

        if !event.context.is_empty() {
            let mut pairs: Vec<_> = event.context.iter().collect();
            pairs.sort_by_key(|(k, _)| k.as_str());
            let rendered: Vec<String> =
                pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            line.push_str(&format!(" ({})", rendered.join(", ")));
        }

        eprintln!("{}", line);
    }
}

/// In-memory logger for tests and programmatic inspection
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of captured events
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Count of captured events at a given level
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.events()
            .iter()
            .filter(|event| event.level == level)
            .count()
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
