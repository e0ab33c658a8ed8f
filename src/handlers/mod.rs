//! # Handlers and the ordered set that stores them.
//!
//! This module provides the [`Handler`] reference type and [`HandlerSet`],
//! the insertion-ordered collection a dispatcher walks on every pass.
//!
//! ## Identity
//! ```text
//! let h = Handler::infallible(|_, v: &u32| ...);
//! let g = h.clone();          // same identity as h
//! let k = Handler::infallible(|_, v: &u32| ...);  // a different handler,
//!                                                 // even with identical code
//! ```
//! Handlers are compared by identity only. Registering the same handler twice
//! creates two independent slots.

mod handler;
mod set;

pub use handler::{Handler, HandlerResult};
pub use set::HandlerSet;
