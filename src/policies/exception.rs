//! # Exception policies for dispatchers.
//!
//! An [`ExceptionPolicy`] decides what happens to the handler errors of a pass.
//! It is consulted at most once per pass, after every handler has run and
//! after staged modifications have been applied.
//!
//! - [`LogAndContinue`] records the failure through a [`LogSink`] and returns normally (default).
//! - [`Rethrow`] hands the failure back; `notify` returns [`DispatchError::Escalated`](crate::DispatchError::Escalated).
//! - Any `Fn(HandlerFailure) -> Result<(), HandlerFailure>` closure is a policy too.
//!
//! ## Choosing the right policy
//! ```text
//! LogAndContinue::tracing()   → producers never see handler errors
//! Rethrow                     → producers get Err(Escalated(failure)) after the full pass
//! |failure| { ...; Ok(()) }   → custom accounting, metrics, etc.
//! ```
//!
//! Policies carry no per-dispatcher state and are shared as [`PolicyRef`].

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use crate::error::HandlerFailure;

use super::sink::{LogSink, Severity, TracingSink};

/// Shared handle to a policy.
pub type PolicyRef = Arc<dyn ExceptionPolicy>;

/// Strategy applied to the aggregated handler errors of one pass.
pub trait ExceptionPolicy: Send + Sync + 'static {
    /// Handles the failure of a pass.
    ///
    /// Returning `Err` escalates the failure to the caller of `notify`.
    fn handle(&self, failure: HandlerFailure) -> Result<(), HandlerFailure>;

    /// Returns the policy name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> ExceptionPolicy for F
where
    F: Fn(HandlerFailure) -> Result<(), HandlerFailure> + Send + Sync + 'static,
{
    fn handle(&self, failure: HandlerFailure) -> Result<(), HandlerFailure> {
        self(failure)
    }
}

/// Records failures through a sink and lets `notify` succeed.
#[derive(Clone)]
pub struct LogAndContinue {
    sink: Arc<dyn LogSink>,
    severity: Severity,
    message: Cow<'static, str>,
}

impl LogAndContinue {
    /// Default log message.
    pub const DEFAULT_MESSAGE: &'static str = "handler(s) failed during event dispatch";

    /// Creates a policy writing to `sink` at [`Severity::Warn`].
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            severity: Severity::default(),
            message: Cow::Borrowed(Self::DEFAULT_MESSAGE),
        }
    }

    /// Creates a policy writing to [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Sets the severity failures are recorded with.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the message failures are recorded with.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Configured severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Configured message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for LogAndContinue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogAndContinue")
            .field("severity", &self.severity)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl ExceptionPolicy for LogAndContinue {
    fn handle(&self, failure: HandlerFailure) -> Result<(), HandlerFailure> {
        self.sink.log(self.severity, &self.message, &failure);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log_and_continue"
    }
}

/// Escalates every failure to the caller of `notify`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rethrow;

impl ExceptionPolicy for Rethrow {
    fn handle(&self, failure: HandlerFailure) -> Result<(), HandlerFailure> {
        Err(failure)
    }

    fn name(&self) -> &'static str {
        "rethrow"
    }
}

/// Returns the shared default policy: [`LogAndContinue`] over [`TracingSink`].
///
/// Every call returns a clone of the same immutable instance.
pub fn default_policy() -> PolicyRef {
    static DEFAULT: OnceLock<PolicyRef> = OnceLock::new();
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(LogAndContinue::tracing())))
}
