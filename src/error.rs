//! Error types used by dispatchers, handlers and wrappers.
//!
//! This module defines the error taxonomy of the crate:
//!
//! - [`HandlerError`]: what a single handler produced during a pass (an error or a panic).
//! - [`HandlerFailure`]: all handler errors of one pass, rooted at the first one.
//! - [`DispatchError`]: what a caller of `notify` can observe.
//! - [`ConstructionError`]: raised eagerly when building a wrapper.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::fmt;

use thiserror::Error;

/// Boxed error type returned by fallible handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Error produced by one handler invocation.
///
/// Handlers never abort a pass: whatever they produce is captured here and
/// aggregated into a [`HandlerFailure`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {source}")]
    Failed {
        /// The error returned by the handler.
        #[source]
        source: BoxError,
    },

    /// The handler panicked; the panic was caught by the dispatcher.
    #[error("handler panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use relay::HandlerError;
    ///
    /// let err = HandlerError::Panicked { message: "boom".into() };
    /// assert_eq!(err.as_label(), "handler_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { source } => format!("error: {source}"),
            HandlerError::Panicked { message } => format!("panic: {message}"),
        }
    }

    /// Builds a [`HandlerError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        HandlerError::Panicked { message }
    }
}

/// # Aggregated handler errors of a single pass.
///
/// The first error of the pass is the [`primary`](HandlerFailure::primary);
/// every later one is attached as a suppressed error, in the order it happened.
/// Nothing is ever discarded.
///
/// [`std::error::Error::source`] returns the primary error.
#[derive(Debug)]
pub struct HandlerFailure {
    primary: HandlerError,
    suppressed: Vec<HandlerError>,
}

impl HandlerFailure {
    /// Starts a new aggregate rooted at `primary`.
    pub fn new(primary: HandlerError) -> Self {
        Self {
            primary,
            suppressed: Vec::new(),
        }
    }

    /// Attaches a later error as suppressed.
    pub fn suppress(&mut self, error: HandlerError) {
        self.suppressed.push(error);
    }

    /// First error of the pass.
    pub fn primary(&self) -> &HandlerError {
        &self.primary
    }

    /// Errors that happened after the primary one, in order.
    pub fn suppressed(&self) -> &[HandlerError] {
        &self.suppressed
    }

    /// Total number of failed handlers (primary included).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.suppressed.len() + 1
    }

    /// Iterates over every error, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &HandlerError> {
        std::iter::once(&self.primary).chain(self.suppressed.iter())
    }

    /// Splits the aggregate into its primary and suppressed errors.
    pub fn into_parts(self) -> (HandlerError, Vec<HandlerError>) {
        (self.primary, self.suppressed)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        "handler_failure"
    }

    /// Returns a human-readable message listing every error.
    pub fn as_message(&self) -> String {
        let parts: Vec<String> = self.iter().map(HandlerError::as_message).collect();
        format!("{} handler(s) failed: [{}]", self.len(), parts.join("; "))
    }
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} handler(s) failed; first: {}", self.len(), self.primary)
    }
}

impl std::error::Error for HandlerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.primary)
    }
}

/// # Errors observed by callers of `notify`.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// `notify` was called while the same dispatcher was already running a pass.
    ///
    /// No handler was invoked by the rejected call.
    #[error("cannot recursively invoke a dispatcher")]
    Reentrant,

    /// The exception policy chose to re-raise the handler errors of a pass.
    #[error("exception policy escalated: {0}")]
    Escalated(#[from] HandlerFailure),
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use relay::DispatchError;
    ///
    /// assert_eq!(DispatchError::Reentrant.as_label(), "dispatch_reentrant");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Reentrant => "dispatch_reentrant",
            DispatchError::Escalated(_) => "dispatch_escalated",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Reentrant => "recursive invocation rejected".to_string(),
            DispatchError::Escalated(failure) => failure.as_message(),
        }
    }

    /// Returns the aggregated handler errors if this error was escalated by a policy.
    pub fn failure(&self) -> Option<&HandlerFailure> {
        match self {
            DispatchError::Escalated(failure) => Some(failure),
            DispatchError::Reentrant => None,
        }
    }
}

/// # Errors raised while building a wrapper.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A `link_to`/`map_to` target is the dispatcher being wrapped.
    #[error("cannot {wrapper} a dispatcher to itself")]
    SelfLink {
        /// Name of the wrapper that rejected the link.
        wrapper: &'static str,
    },
}

impl ConstructionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConstructionError::SelfLink { .. } => "construction_self_link",
        }
    }
}
