//! Boundary to an externally owned event source.
//!
//! A host runtime owns its own listener list and calls back when *its* events
//! fire. [`HostSource`] is the minimal surface the bridge needs from it: one
//! registration call returning a token and one deregistration call taking it
//! back.

use std::any::Any;
use std::sync::Arc;

/// Callback a host invokes for every occurrence of its event.
pub type HostCallback<T> = Arc<dyn Fn(&dyn Any, &T) + Send + Sync>;

/// An event source owned by a host runtime.
///
/// Implementations must not invoke `callback` from inside [`register`](Self::register)
/// or [`unregister`](Self::unregister).
pub trait HostSource<T>: Send + Sync + 'static {
    /// Handle returned by `register` and consumed by `unregister`.
    type Token: Send + 'static;

    /// Registers `callback` with the host.
    fn register(&self, callback: HostCallback<T>) -> Self::Token;

    /// Removes the registration identified by `token`.
    fn unregister(&self, token: Self::Token);

    /// Human-readable name of the host event, used in logs.
    fn describe(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<T, S> HostSource<T> for Arc<S>
where
    S: HostSource<T> + ?Sized,
{
    type Token = S::Token;

    fn register(&self, callback: HostCallback<T>) -> Self::Token {
        (**self).register(callback)
    }

    fn unregister(&self, token: Self::Token) {
        (**self).unregister(token);
    }

    fn describe(&self) -> &str {
        (**self).describe()
    }
}
