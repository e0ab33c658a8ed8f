//! Predicate-gated dispatch.

use std::any::Any;

use crate::core::Dispatch;
use crate::error::DispatchError;

/// Forwards `notify` to the inner dispatcher only when `predicate(value)` holds.
///
/// Values the predicate rejects are dropped silently; `notify` returns `Ok(())`.
pub struct Filter<D, P> {
    inner: D,
    predicate: P,
}

impl<D, P> Filter<D, P> {
    /// Wraps `inner` behind `predicate`.
    pub fn new(inner: D, predicate: P) -> Self {
        Self { inner, predicate }
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Unwraps the inner dispatcher.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: std::fmt::Debug, P> std::fmt::Debug for Filter<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<T, D, P> Dispatch<T> for Filter<D, P>
where
    D: Dispatch<T>,
    P: Fn(&T) -> bool + Send + Sync,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        if (self.predicate)(value) {
            self.inner.notify(sender, value)
        } else {
            Ok(())
        }
    }

    delegate_registration!(inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventDispatcher, Handler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_registration_reaches_inner() {
        let filter = EventDispatcher::<u8>::new().filter(|_| false);
        let h = Handler::infallible(|_, _| {});
        filter.add_handler(h.clone());

        assert!(filter.inner().has_handler(&h));
        assert_eq!(filter.handler_count(), 1);
        filter.remove_handler(&h);
        assert_eq!(filter.into_inner().handler_count(), 0);
    }

    #[test]
    fn test_rejected_values_skip_handlers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let filter = EventDispatcher::<u8>::new().filter(|v| *v > 10);
        {
            let hits = Arc::clone(&hits);
            filter.add_handler(Handler::infallible(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }

        filter.notify(&(), &1).unwrap();
        filter.notify(&(), &11).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
