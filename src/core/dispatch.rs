//! # The dispatcher contract.
//!
//! [`Dispatch`] is the single interface shared by the base
//! [`EventDispatcher`](crate::EventDispatcher), every composition wrapper and the
//! host bridge. Wrappers hold their inner dispatcher by value and implement the
//! same six operations, so they stack transparently:
//!
//! ```text
//! Synchronized ─► Filter ─► LinkTo ─► EventDispatcher
//!                              └────► other dispatcher
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use relay::{Dispatch, EventDispatcher, Handler};
//!
//! let seen = Arc::new(AtomicU32::new(0));
//! let counter = {
//!     let seen = Arc::clone(&seen);
//!     Handler::infallible(move |_, v: &u32| {
//!         seen.fetch_add(*v, Ordering::SeqCst);
//!     })
//! };
//!
//! let evens = EventDispatcher::<u32>::new().filter(|v| v % 2 == 0);
//! evens.add_handler(counter);
//!
//! evens.notify(&(), &3).unwrap();
//! evens.notify(&(), &4).unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 4);
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::error::{BoxError, ConstructionError, DispatchError};
use crate::handlers::Handler;
use crate::wrappers::{Filter, LinkTo, MapTo, SyncLock, Synchronized};

/// Identity of a dispatcher instance, used to reject self-links.
///
/// Smart pointers and references report the identity of their pointee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(usize);

impl InstanceId {
    /// Identity derived from the address of `value`.
    pub fn of<D: ?Sized>(value: &D) -> Self {
        Self((value as *const D).cast::<()>() as usize)
    }
}

/// Registration and broadcast operations every dispatcher provides.
///
/// All operations take `&self`, so handlers may call back into the dispatcher
/// that is invoking them.
pub trait Dispatch<T>: Send + Sync {
    /// Invokes every registered handler with `(sender, value)`, in registration order.
    ///
    /// # Errors
    /// - [`DispatchError::Reentrant`] if a pass is already running on this dispatcher.
    /// - [`DispatchError::Escalated`] if handlers failed and the policy re-raised.
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError>;

    /// Registers `handler`. Duplicates are kept as separate registrations.
    fn add_handler(&self, handler: Handler<T>);

    /// Removes the earliest registration of `handler`, if any.
    fn remove_handler(&self, handler: &Handler<T>);

    /// Returns `true` if `handler` is currently registered.
    fn has_handler(&self, handler: &Handler<T>) -> bool;

    /// Removes every handler.
    fn clear_handlers(&self);

    /// Number of handlers currently registered.
    fn handler_count(&self) -> usize;

    /// Identity of this dispatcher.
    fn instance_id(&self) -> InstanceId {
        InstanceId::of(self)
    }

    /// Registers every handler of `handlers`, in order.
    fn add_handlers<I>(&self, handlers: I)
    where
        Self: Sized,
        I: IntoIterator<Item = Handler<T>>,
    {
        for handler in handlers {
            self.add_handler(handler);
        }
    }

    /// Removes every handler of `handlers`, in order.
    fn remove_handlers<'a, I>(&self, handlers: I)
    where
        Self: Sized,
        T: 'a,
        I: IntoIterator<Item = &'a Handler<T>>,
    {
        for handler in handlers {
            self.remove_handler(handler);
        }
    }

    /// Forwards `notify` only for values accepted by `predicate`.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: Fn(&T) -> bool + Send + Sync,
    {
        Filter::new(self, predicate)
    }

    /// Also notifies `other` after this dispatcher's own handlers.
    ///
    /// # Errors
    /// [`ConstructionError::SelfLink`] if `other` is this dispatcher.
    fn link_to<O>(self, other: O) -> Result<LinkTo<Self, O>, ConstructionError>
    where
        Self: Sized,
        O: Dispatch<T>,
    {
        LinkTo::new::<T>(self, other)
    }

    /// Also notifies `other` with `mapper(value)` after this dispatcher's own handlers.
    ///
    /// # Errors
    /// [`ConstructionError::SelfLink`] if `other` is this dispatcher.
    fn map_to<V, O, M>(self, other: O, mapper: M) -> Result<MapTo<Self, O, M>, ConstructionError>
    where
        Self: Sized,
        O: Dispatch<V>,
        M: Fn(&T) -> V + Send + Sync,
    {
        MapTo::new::<T, V>(self, other, mapper)
    }

    /// Serializes every operation behind a private reentrant lock.
    fn synchronize(self) -> Synchronized<Self>
    where
        Self: Sized,
    {
        Synchronized::new(self)
    }

    /// Serializes every operation behind `lock`.
    fn synchronize_with(self, lock: SyncLock) -> Synchronized<Self>
    where
        Self: Sized,
    {
        Synchronized::with_lock(self, lock)
    }

    /// Turns a shared dispatcher into a handler that notifies it.
    ///
    /// Errors of the nested `notify` are reported as errors of the handler.
    /// Registering a dispatcher on itself keeps it alive forever and every
    /// nested call fails as reentrant.
    fn into_handler(self: Arc<Self>) -> Handler<T>
    where
        Self: Sized + 'static,
        T: 'static,
    {
        Handler::new(move |sender, value| {
            self.notify(sender, value)
                .map_err(|err| Box::new(err) as BoxError)
        })
    }
}

impl<T, D> Dispatch<T> for Arc<D>
where
    D: Dispatch<T> + ?Sized,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        (**self).notify(sender, value)
    }

    fn add_handler(&self, handler: Handler<T>) {
        (**self).add_handler(handler);
    }

    fn remove_handler(&self, handler: &Handler<T>) {
        (**self).remove_handler(handler);
    }

    fn has_handler(&self, handler: &Handler<T>) -> bool {
        (**self).has_handler(handler)
    }

    fn clear_handlers(&self) {
        (**self).clear_handlers();
    }

    fn handler_count(&self) -> usize {
        (**self).handler_count()
    }

    fn instance_id(&self) -> InstanceId {
        (**self).instance_id()
    }
}

impl<T, D> Dispatch<T> for &D
where
    D: Dispatch<T> + ?Sized,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        (**self).notify(sender, value)
    }

    fn add_handler(&self, handler: Handler<T>) {
        (**self).add_handler(handler);
    }

    fn remove_handler(&self, handler: &Handler<T>) {
        (**self).remove_handler(handler);
    }

    fn has_handler(&self, handler: &Handler<T>) -> bool {
        (**self).has_handler(handler)
    }

    fn clear_handlers(&self) {
        (**self).clear_handlers();
    }

    fn handler_count(&self) -> usize {
        (**self).handler_count()
    }

    fn instance_id(&self) -> InstanceId {
        (**self).instance_id()
    }
}
