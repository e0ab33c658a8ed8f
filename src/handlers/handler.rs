//! # Closure-backed handler references (`Handler`)
//!
//! [`Handler`] wraps a closure `F: Fn(&dyn Any, &T) -> HandlerResult` behind an
//! `Arc`. Cloning a handler clones the reference, not the closure, so every
//! clone has the same identity and removes the same registration.
//!
//! ## Example
//! ```rust
//! use relay::Handler;
//!
//! let h: Handler<u32> = Handler::infallible(|_sender, value| {
//!     assert!(*value > 0);
//! });
//! let same = h.clone();
//! let other: Handler<u32> = Handler::infallible(|_sender, _value| {});
//!
//! assert!(h.ptr_eq(&same));
//! assert!(!h.ptr_eq(&other));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;

/// Outcome of one handler invocation.
pub type HandlerResult = Result<(), BoxError>;

type HandlerFn<T> = dyn Fn(&dyn Any, &T) -> HandlerResult + Send + Sync;

/// Shared, identity-compared reference to an event callback.
///
/// The callback receives the sender (an opaque `&dyn Any` the producer passed to
/// `notify`) and a reference to the event value.
pub struct Handler<T> {
    f: Arc<HandlerFn<T>>,
}

impl<T> Handler<T> {
    /// Creates a handler from a fallible closure.
    ///
    /// Errors returned by the closure never stop a pass; they are aggregated and
    /// handed to the dispatcher's exception policy.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Any, &T) -> HandlerResult + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Creates a handler from a closure that cannot fail.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(&dyn Any, &T) + Send + Sync + 'static,
    {
        Self::new(move |sender, value| {
            f(sender, value);
            Ok(())
        })
    }

    /// Invokes the callback.
    pub fn call(&self, sender: &dyn Any, value: &T) -> HandlerResult {
        (self.f)(sender, value)
    }

    /// Returns `true` if both references point at the same callback.
    #[inline]
    pub fn ptr_eq(&self, other: &Handler<T>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.f), Arc::as_ptr(&other.f))
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("addr", &Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}
