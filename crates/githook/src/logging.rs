//! Dispatch log records and the sinks that receive them.
//!
//! The dispatcher reports each routing decision as a [`LogRecord`] on an
//! injected [`LogSink`]. In production that is [`TracingLogSink`], which turns
//! records into `tracing` events; tests use [`MemoryLogSink`] and assert on the
//! captured records directly.

use std::sync::{Mutex, PoisonError};

use tracing::Level;

/// One structured dispatch observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    /// Event token the record refers to, verbatim
    pub event: String,
}

impl LogRecord {
    #[must_use]
    pub fn info(message: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            level: Level::INFO,
            message: message.into(),
            event: event.into(),
        }
    }
}

/// Receiver of dispatch log records.
pub trait LogSink: Send + Sync {
    fn record(&self, record: LogRecord);
}

/// Forwards records to the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn record(&self, record: LogRecord) {
        let LogRecord {
            level,
            message,
            event,
        } = record;

        // `tracing` macros need the level at compile time.
        match level {
            Level::ERROR => tracing::error!(event = %event, "{message}"),
            Level::WARN => tracing::warn!(event = %event, "{message}"),
            Level::INFO => tracing::info!(event = %event, "{message}"),
            Level::DEBUG => tracing::debug!(event = %event, "{message}"),
            _ => tracing::trace!(event = %event, "{message}"),
        }
    }
}

/// Keeps every record in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records captured so far.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages of the captured records, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
