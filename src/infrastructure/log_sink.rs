//! Structured log sink for reset progress.
//!
//! Callers pass the indentation level with every event; no formatting
//! state is shared between calls.

use std::fmt;

/// Spaces per indentation level.
const PADDING: usize = 3;

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// A single log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub severity: Severity,
    /// Nesting depth, 0 for top level.
    pub indent: usize,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEvent {
    /// Value of the named field, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:width$}{}", "", self.message, width = self.indent * PADDING)?;
        for (key, value) in &self.fields {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Destination for log events.
pub trait LogSink: Send + Sync {
    fn emit(&self, event: LogEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, event: LogEvent) {
        match event.severity {
            Severity::Info => tracing::info!("{event}"),
            Severity::Warn => tracing::warn!("{event}"),
            Severity::Error => tracing::error!("{event}"),
        }
    }
}

/// Thin wrapper that builds events for a sink.
#[derive(Clone, Copy)]
pub struct Logger<'a> {
    sink: &'a dyn LogSink,
}

impl<'a> Logger<'a> {
    #[must_use]
    pub const fn new(sink: &'a dyn LogSink) -> Self {
        Self { sink }
    }

    pub fn info(&self, indent: usize, message: &str, fields: &[(&'static str, String)]) {
        self.log(Severity::Info, indent, message, fields);
    }

    pub fn warn(&self, indent: usize, message: &str, fields: &[(&'static str, String)]) {
        self.log(Severity::Warn, indent, message, fields);
    }

    pub fn error(&self, indent: usize, message: &str, fields: &[(&'static str, String)]) {
        self.log(Severity::Error, indent, message, fields);
    }

    fn log(&self, severity: Severity, indent: usize, message: &str, fields: &[(&'static str, String)]) {
        self.sink.emit(LogEvent {
            severity,
            indent,
            message: message.to_string(),
            fields: fields.to_vec(),
        });
    }
}

/// Collects events in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<LogEvent>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl LogSink for MemorySink {
    fn emit(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_by_indent() {
        let event = LogEvent {
            severity: Severity::Warn,
            indent: 2,
            message: "file not found".into(),
            fields: vec![("path", "/tmp/lp/db-shm".into())],
        };
        assert_eq!(event.to_string(), "      file not found path=/tmp/lp/db-shm");
        assert_eq!(event.field("path"), Some("/tmp/lp/db-shm"));
        assert_eq!(event.field("missing"), None);
    }

    #[test]
    fn test_logger_forwards_indent_per_call() {
        let sink = MemorySink::default();
        let log = Logger::new(&sink);

        log.info(1, "restarting Dock", &[]);
        log.error(0, "failed", &[("step", "stop owner".into())]);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].indent, 1);
        assert_eq!(events[0].severity, Severity::Info);
        assert_eq!(events[1].indent, 0);
        assert_eq!(events[1].field("step"), Some("stop owner"));
    }
}
