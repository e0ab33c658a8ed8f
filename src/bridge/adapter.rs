//! # HostBridge: lazy attachment to a host event source.
//!
//! [`HostBridge`] wraps a dispatcher and keeps exactly one host registration
//! alive while the dispatcher has handlers, and none while it is empty.
//!
//! ```text
//! add_handler ──► inner.add_handler ──► sync: count 0→1 ──► source.register(callback)
//! host fires  ──► callback ──► inner.notify ──► sync (a pass may have emptied the set)
//! remove/clear ─► inner.remove/clear ─► sync: count 1→0 ──► source.unregister(token)
//! ```
//!
//! The bridge re-checks `handler_count` after every operation it forwards, so
//! staged removals are noticed as soon as the pass that staged them returns.
//! Edits made directly on the inner dispatcher are picked up by the next
//! operation that goes through the bridge. A pass that unwinds (a panicking
//! policy, for instance) is still followed by the re-check before the panic
//! continues.
//!
//! Host-fired passes hand the host's sender to the handlers unchanged.
//!
//! The host callback holds only a weak reference to the bridge; dropping the
//! last bridge clone unregisters from the host.

use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::core::{Dispatch, InstanceId};
use crate::error::DispatchError;
use crate::handlers::Handler;

use super::host::{HostCallback, HostSource};

struct Shared<T, D, S: HostSource<T>> {
    inner: D,
    source: S,
    attachment: Mutex<Option<S::Token>>,
    _event: PhantomData<fn(&T)>,
}

impl<T, D, S> Shared<T, D, S>
where
    T: 'static,
    D: Dispatch<T> + 'static,
    S: HostSource<T>,
{
    fn notify(this: &Arc<Self>, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| this.inner.notify(sender, value)));
        Self::sync(this);
        outcome.unwrap_or_else(|payload| panic::resume_unwind(payload))
    }

    /// Attaches or detaches so that the host registration matches the handler count.
    ///
    /// The count is read without holding the attachment lock, so it can be stale
    /// by the time the lock is taken. Every attach or detach is therefore
    /// followed by another round; a round that changes nothing ends the loop.
    fn sync(this: &Arc<Self>) {
        loop {
            let count = this.inner.handler_count();
            let mut attachment = this.attachment.lock();

            if count > 0 && attachment.is_none() {
                let weak = Arc::downgrade(this);
                *attachment = Some(this.source.register(Self::callback(weak)));
                drop(attachment);
                tracing::debug!(host = this.source.describe(), handlers = count, "attached to host event");
            } else if count == 0 && attachment.is_some() {
                let token = attachment.take();
                drop(attachment);
                if let Some(token) = token {
                    this.source.unregister(token);
                }
                tracing::debug!(host = this.source.describe(), "detached from host event");
            } else {
                return;
            }
        }
    }

    fn callback(weak: Weak<Self>) -> HostCallback<T> {
        Arc::new(move |sender: &dyn Any, value: &T| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if let Err(err) = Self::notify(&shared, sender, value) {
                tracing::warn!(
                    host = shared.source.describe(),
                    label = err.as_label(),
                    error = %err,
                    "host-fired dispatch failed"
                );
            }
        })
    }
}

impl<T, D, S: HostSource<T>> Drop for Shared<T, D, S> {
    fn drop(&mut self) {
        if let Some(token) = self.attachment.get_mut().take() {
            self.source.unregister(token);
        }
    }
}

/// Dispatcher that mirrors its non-empty state into a host registration.
///
/// Clones share the same inner dispatcher and host registration.
pub struct HostBridge<T, D, S: HostSource<T>> {
    shared: Arc<Shared<T, D, S>>,
}

impl<T, D, S> HostBridge<T, D, S>
where
    T: 'static,
    D: Dispatch<T> + 'static,
    S: HostSource<T>,
{
    /// Bridges `inner` to `source`.
    ///
    /// If `inner` already has handlers the bridge attaches immediately.
    pub fn new(inner: D, source: S) -> Self {
        let shared = Arc::new(Shared {
            inner,
            source,
            attachment: Mutex::new(None),
            _event: PhantomData,
        });
        Shared::sync(&shared);
        Self { shared }
    }

    /// Returns `true` while a host registration is held.
    pub fn is_attached(&self) -> bool {
        self.shared.attachment.lock().is_some()
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.shared.inner
    }

    /// The host event source.
    pub fn source(&self) -> &S {
        &self.shared.source
    }

    /// Re-reads the handler count and attaches or detaches accordingly.
    pub fn refresh(&self) {
        Shared::sync(&self.shared);
    }
}

impl<T, D, S: HostSource<T>> Clone for HostBridge<T, D, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, D, S: HostSource<T>> std::fmt::Debug for HostBridge<T, D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("host", &self.shared.source.describe())
            .field("attached", &self.shared.attachment.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl<T, D, S> Dispatch<T> for HostBridge<T, D, S>
where
    T: 'static,
    D: Dispatch<T> + 'static,
    S: HostSource<T>,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        Shared::notify(&self.shared, sender, value)
    }

    fn add_handler(&self, handler: Handler<T>) {
        self.shared.inner.add_handler(handler);
        self.refresh();
    }

    fn remove_handler(&self, handler: &Handler<T>) {
        self.shared.inner.remove_handler(handler);
        self.refresh();
    }

    fn has_handler(&self, handler: &Handler<T>) -> bool {
        self.shared.inner.has_handler(handler)
    }

    fn clear_handlers(&self) {
        self.shared.inner.clear_handlers();
        self.refresh();
    }

    fn handler_count(&self) -> usize {
        self.shared.inner.handler_count()
    }

    fn instance_id(&self) -> InstanceId {
        InstanceId::of(&*self.shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MemoryHost;
    use crate::EventDispatcher;

    #[test]
    fn test_attaches_on_construction_when_not_empty() {
        let inner = EventDispatcher::<u8>::new();
        inner.add_handler(Handler::infallible(|_, _| {}));

        let host = Arc::new(MemoryHost::<u8>::new("tick"));
        let bridge = HostBridge::new(inner, Arc::clone(&host));
        assert!(bridge.is_attached());
        assert_eq!(host.listener_count(), 1);
    }

    #[test]
    fn test_drop_unregisters() {
        let host = Arc::new(MemoryHost::<u8>::new("tick"));
        let bridge = HostBridge::new(EventDispatcher::new(), Arc::clone(&host));
        bridge.add_handler(Handler::infallible(|_, _| {}));
        let clone = bridge.clone();

        drop(bridge);
        assert_eq!(host.listener_count(), 1);
        drop(clone);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.unregistrations(), 1);
    }

    #[test]
    fn test_clones_share_identity() {
        let host = Arc::new(MemoryHost::<u8>::new("tick"));
        let bridge = HostBridge::new(EventDispatcher::new(), host);
        assert_eq!(bridge.instance_id(), bridge.clone().instance_id());
    }
}
