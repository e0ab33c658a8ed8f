//! # Log sinks for the log-and-continue policy.
//!
//! [`LogSink`] is the injection point through which
//! [`LogAndContinue`](crate::LogAndContinue) records handler failures.
//! [`TracingSink`] forwards to the `tracing` ecosystem and is the default.
//!
//! ## Example output (with a `tracing-subscriber` fmt layer)
//! ```text
//! WARN relay: handler(s) failed during event dispatch label="handler_failure" failures=2 error=2 handler(s) failed; first: handler failed: boom
//! ```

use crate::error::HandlerFailure;

/// Severity a sink records a failure with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Very verbose diagnostics.
    Trace,
    /// Debugging information.
    Debug,
    /// Informational message.
    Info,
    /// Something went wrong but dispatch continued (default).
    #[default]
    Warn,
    /// Serious failure.
    Error,
}

impl Severity {
    /// Returns the lowercase severity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

/// Destination for failures recorded by a logging policy.
///
/// ### Implementation requirements
/// - Must not panic; a panicking sink propagates out of `notify`.
pub trait LogSink: Send + Sync + 'static {
    /// Records one aggregated failure.
    fn log(&self, severity: Severity, message: &str, failure: &HandlerFailure);
}

/// Sink that emits a `tracing` event per failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Construct a new [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str, failure: &HandlerFailure) {
        let label = failure.as_label();
        let failures = failure.len();
        match severity {
            Severity::Trace => {
                tracing::trace!(label, failures, error = %failure, "{message}");
            }
            Severity::Debug => {
                tracing::debug!(label, failures, error = %failure, "{message}");
            }
            Severity::Info => {
                tracing::info!(label, failures, error = %failure, "{message}");
            }
            Severity::Warn => {
                tracing::warn!(label, failures, error = %failure, "{message}");
            }
            Severity::Error => {
                tracing::error!(label, failures, error = %failure, "{message}");
            }
        }
    }
}
