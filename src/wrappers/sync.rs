//! # Synchronized: lock-serialized dispatch
//!
//! [`Synchronized`] runs each contract operation of the inner dispatcher while
//! holding a [`SyncLock`]. The lock is reentrant: a handler running under it may
//! call back into the same wrapper on its own thread (to add a handler, for
//! instance) without deadlocking. Other threads block until the outer call
//! returns.
//!
//! ```text
//! thread A: notify ──lock──► inner.notify ─► handler ─► add_handler ──lock (reentrant)──► staged
//! thread B: add_handler ──lock (blocks until A's notify returns)──► applied immediately
//! ```
//!
//! Two wrappers may share one lock through [`Synchronized::with_lock`]; wrappers
//! with different locks over the same inner dispatcher are allowed but do not
//! exclude each other.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::core::Dispatch;
use crate::error::DispatchError;
use crate::handlers::Handler;

/// Guard returned by [`SyncLock::lock`].
pub type SyncGuard<'a> = ReentrantMutexGuard<'a, ()>;

/// Shareable reentrant lock used by [`Synchronized`].
///
/// Clones refer to the same lock.
#[derive(Clone, Default)]
pub struct SyncLock {
    inner: Arc<ReentrantMutex<()>>,
}

impl SyncLock {
    /// Creates a new, unshared lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock, blocking while another thread holds it.
    ///
    /// Holding the guard makes a sequence of calls on every wrapper using this
    /// lock atomic with respect to other threads.
    pub fn lock(&self) -> SyncGuard<'_> {
        self.inner.lock()
    }

    /// Returns `true` if both values refer to the same lock.
    pub fn ptr_eq(&self, other: &SyncLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SyncLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncLock")
            .field("addr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

/// Serializes every operation of the inner dispatcher behind one lock.
#[derive(Debug)]
pub struct Synchronized<D> {
    inner: D,
    lock: SyncLock,
}

impl<D> Synchronized<D> {
    /// Wraps `inner` with a private lock.
    pub fn new(inner: D) -> Self {
        Self::with_lock(inner, SyncLock::new())
    }

    /// Wraps `inner` with a caller-supplied lock.
    pub fn with_lock(inner: D, lock: SyncLock) -> Self {
        Self { inner, lock }
    }

    /// The lock guarding this wrapper.
    pub fn sync_lock(&self) -> &SyncLock {
        &self.lock
    }

    /// The wrapped dispatcher; calls through it bypass the lock.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<T, D> Dispatch<T> for Synchronized<D>
where
    D: Dispatch<T>,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        let _guard = self.lock.lock();
        self.inner.notify(sender, value)
    }

    fn add_handler(&self, handler: Handler<T>) {
        let _guard = self.lock.lock();
        self.inner.add_handler(handler);
    }

    fn remove_handler(&self, handler: &Handler<T>) {
        let _guard = self.lock.lock();
        self.inner.remove_handler(handler);
    }

    fn has_handler(&self, handler: &Handler<T>) -> bool {
        let _guard = self.lock.lock();
        self.inner.has_handler(handler)
    }

    fn clear_handlers(&self) {
        let _guard = self.lock.lock();
        self.inner.clear_handlers();
    }

    fn handler_count(&self) -> usize {
        let _guard = self.lock.lock();
        self.inner.handler_count()
    }

    fn add_handlers<I>(&self, handlers: I)
    where
        I: IntoIterator<Item = Handler<T>>,
    {
        let _guard = self.lock.lock();
        for handler in handlers {
            self.inner.add_handler(handler);
        }
    }

    fn remove_handlers<'a, I>(&self, handlers: I)
    where
        T: 'a,
        I: IntoIterator<Item = &'a Handler<T>>,
    {
        let _guard = self.lock.lock();
        for handler in handlers {
            self.inner.remove_handler(handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventDispatcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_handler_may_reenter_the_wrapper() {
        let sync = Arc::new(EventDispatcher::<u8>::new().synchronize());
        let hits = Arc::new(AtomicUsize::new(0));
        let late = {
            let hits = Arc::clone(&hits);
            Handler::infallible(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        {
            let weak = Arc::downgrade(&sync);
            let late = late.clone();
            sync.add_handler(Handler::infallible(move |_, _| {
                if let Some(sync) = weak.upgrade() {
                    if !sync.has_handler(&late) {
                        sync.add_handler(late.clone());
                    }
                }
            }));
        }

        sync.notify(&(), &0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        sync.notify(&(), &0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_lock() {
        let lock = SyncLock::new();
        let a = EventDispatcher::<u8>::new().synchronize_with(lock.clone());
        let b = EventDispatcher::<u8>::new().synchronize_with(lock.clone());
        let c = EventDispatcher::<u8>::new().synchronize();

        assert!(a.sync_lock().ptr_eq(b.sync_lock()));
        assert!(!a.sync_lock().ptr_eq(c.sync_lock()));
    }

    #[test]
    fn test_bulk_operations() {
        let sync = EventDispatcher::<u8>::new().synchronize();
        let handlers: Vec<Handler<u8>> = (0..4).map(|_| Handler::infallible(|_, _| {})).collect();

        sync.add_handlers(handlers.iter().cloned());
        assert_eq!(sync.handler_count(), 4);
        sync.remove_handlers(&handlers[..3]);
        assert_eq!(sync.handler_count(), 1);
        assert!(sync.has_handler(&handlers[3]));
    }
}
