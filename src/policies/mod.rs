//! Exception policies and log sinks.
//!
//! This module groups the knobs that control **what happens** to handler errors
//! once a pass has finished.
//!
//! ## Contents
//! - [`ExceptionPolicy`] strategy trait, consulted once per failing pass
//! - [`LogAndContinue`]  record through a [`LogSink`], then continue (default)
//! - [`Rethrow`]         escalate to the caller of `notify`
//! - [`TracingSink`]     sink backed by the `tracing` crate
//!
//! ## Quick wiring
//! ```text
//! EventDispatcher { policy: PolicyRef }
//!      └─► notify() after the pass:
//!           - no errors       → Ok(())
//!           - errors          → policy.handle(failure)
//!                                ├─ Ok(())   → Ok(())
//!                                └─ Err(f)   → Err(DispatchError::Escalated(f))
//! ```
//!
//! ## Defaults
//! - [`default_policy()`] → a single shared `LogAndContinue` over `TracingSink`,
//!   severity `Warn`.

mod exception;
mod sink;

pub use exception::{default_policy, ExceptionPolicy, LogAndContinue, PolicyRef, Rethrow};
pub use sink::{LogSink, Severity, TracingSink};
