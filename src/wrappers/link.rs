//! # Chaining dispatchers (`LinkTo`, `MapTo`)
//!
//! ```text
//! LinkTo::notify(s, v)  ─► inner.notify(s, v)? ─► other.notify(s, v)
//! MapTo::notify(s, v)   ─► inner.notify(s, v)? ─► other.notify(s, &mapper(v))
//! ```
//!
//! If the inner pass returns an error, `other` is not notified. Both wrappers
//! refuse to link a dispatcher to itself, since the forwarded call would be a
//! recursive invocation.

use std::any::Any;

use crate::core::Dispatch;
use crate::error::{ConstructionError, DispatchError};

/// Notifies `other` with the same value after the inner dispatcher.
#[derive(Debug)]
pub struct LinkTo<D, O> {
    inner: D,
    other: O,
}

impl<D, O> LinkTo<D, O> {
    /// Links `inner` to `other`.
    ///
    /// # Errors
    /// [`ConstructionError::SelfLink`] if `other` is the same instance as `inner`.
    pub fn new<T>(inner: D, other: O) -> Result<Self, ConstructionError>
    where
        D: Dispatch<T>,
        O: Dispatch<T>,
    {
        if inner.instance_id() == other.instance_id() {
            return Err(ConstructionError::SelfLink { wrapper: "link" });
        }
        Ok(Self { inner, other })
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The linked dispatcher.
    pub fn other(&self) -> &O {
        &self.other
    }
}

impl<T, D, O> Dispatch<T> for LinkTo<D, O>
where
    D: Dispatch<T>,
    O: Dispatch<T>,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        self.inner.notify(sender, value)?;
        self.other.notify(sender, value)
    }

    delegate_registration!(inner);
}

/// Notifies `other` with `mapper(value)` after the inner dispatcher.
pub struct MapTo<D, O, M> {
    inner: D,
    other: O,
    mapper: M,
}

impl<D, O, M> MapTo<D, O, M> {
    /// Links `inner` to `other` through `mapper`.
    ///
    /// # Errors
    /// [`ConstructionError::SelfLink`] if `other` is the same instance as `inner`.
    pub fn new<T, V>(inner: D, other: O, mapper: M) -> Result<Self, ConstructionError>
    where
        D: Dispatch<T>,
        O: Dispatch<V>,
        M: Fn(&T) -> V,
    {
        if inner.instance_id() == other.instance_id() {
            return Err(ConstructionError::SelfLink { wrapper: "map" });
        }
        Ok(Self {
            inner,
            other,
            mapper,
        })
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The linked dispatcher.
    pub fn other(&self) -> &O {
        &self.other
    }
}

impl<D: std::fmt::Debug, O: std::fmt::Debug, M> std::fmt::Debug for MapTo<D, O, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapTo")
            .field("inner", &self.inner)
            .field("other", &self.other)
            .finish_non_exhaustive()
    }
}

impl<T, V, D, O, M> Dispatch<T> for MapTo<D, O, M>
where
    D: Dispatch<T>,
    O: Dispatch<V>,
    M: Fn(&T) -> V + Send + Sync,
{
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        self.inner.notify(sender, value)?;
        let mapped = (self.mapper)(value);
        self.other.notify(sender, &mapped)
    }

    delegate_registration!(inner);
}
