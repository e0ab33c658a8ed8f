//! # HandlerSet: insertion-ordered handler storage
//!
//! [`HandlerSet`] keeps handler references in registration order. It is the
//! live structure a dispatcher walks on each pass.
//!
//! ## What it guarantees
//! - Iteration order == registration order (FIFO).
//! - Duplicates are kept as independent slots.
//! - `remove` drops only the earliest slot holding the handler; the relative
//!   order of the remaining slots is preserved.
//!
//! ## What it does **not** do
//! - No synchronization; the owning dispatcher provides it.
//! - No staging; mutations are immediate. Deferral during a pass is the
//!   dispatcher's job.
//!
//! ## Capacity
//! ```text
//!  add:    len == cap  ──► grow (Vec amortized doubling)
//!  remove: len < cap/2 ──► shrink to max(len + 1, floor)
//! ```

use super::Handler;

/// Ordered, duplicate-permitting collection of handlers.
pub struct HandlerSet<T> {
    slots: Vec<Handler<T>>,
    floor: usize,
    shrink: bool,
}

impl<T> HandlerSet<T> {
    /// Creates an empty set with no reserved capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, true)
    }

    /// Creates an empty set reserving `capacity` slots.
    ///
    /// `capacity` is also the floor the set never shrinks below. With
    /// `shrink = false` the set keeps whatever capacity it has grown to.
    #[must_use]
    pub fn with_capacity(capacity: usize, shrink: bool) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            floor: capacity,
            shrink,
        }
    }

    /// Appends a handler at the end.
    pub fn add(&mut self, handler: Handler<T>) {
        self.slots.push(handler);
    }

    /// Removes the earliest slot holding `handler`.
    ///
    /// Returns the index the handler occupied, or `None` if it was not present.
    pub fn remove(&mut self, handler: &Handler<T>) -> Option<usize> {
        let index = self.position(handler)?;
        self.slots.remove(index);
        self.trim();
        Some(index)
    }

    /// Returns `true` if some slot holds `handler`.
    #[must_use]
    pub fn contains(&self, handler: &Handler<T>) -> bool {
        self.position(handler).is_some()
    }

    /// Removes every handler.
    ///
    /// Returns `true` if the set was not already empty.
    pub fn clear(&mut self) -> bool {
        if self.slots.is_empty() {
            return false;
        }
        self.slots.clear();
        self.trim();
        true
    }

    /// Number of live slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if there are no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reserved slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Handler at `index`, in registration order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Handler<T>> {
        self.slots.get(index)
    }

    /// Iterates handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Handler<T>> {
        self.slots.iter()
    }

    fn position(&self, handler: &Handler<T>) -> Option<usize> {
        self.slots.iter().position(|h| h.ptr_eq(handler))
    }

    fn trim(&mut self) {
        if !self.shrink {
            return;
        }
        let len = self.slots.len();
        if len < self.slots.capacity() / 2 {
            let target = (len + 1).max(self.floor);
            if target < self.slots.capacity() {
                self.slots.shrink_to(target);
            }
        }
    }
}

impl<T> Default for HandlerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for HandlerSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("len", &self.slots.len())
            .field("capacity", &self.slots.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler<u8> {
        Handler::infallible(|_, _| {})
    }

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let (a, b) = (noop(), noop());
        let mut set = HandlerSet::new();
        set.add(a.clone());
        set.add(b.clone());
        set.add(a.clone());

        assert_eq!(set.len(), 3);
        let order: Vec<bool> = set.iter().map(|h| h.ptr_eq(&a)).collect();
        assert_eq!(order, vec![true, false, true]);
    }

    #[test]
    fn test_remove_takes_earliest_slot_only() {
        let (a, b) = (noop(), noop());
        let mut set = HandlerSet::new();
        set.add(b.clone());
        set.add(a.clone());
        set.add(a.clone());

        assert_eq!(set.remove(&a), Some(1));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
        assert!(set.get(0).is_some_and(|h| h.ptr_eq(&b)));
        assert!(set.get(1).is_some_and(|h| h.ptr_eq(&a)));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut set = HandlerSet::new();
        set.add(noop());
        assert_eq!(set.remove(&noop()), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_clear_reports_change() {
        let mut set = HandlerSet::new();
        assert!(!set.clear());
        set.add(noop());
        assert!(set.clear());
        assert!(set.is_empty());
    }

    #[test]
    fn test_shrink_respects_floor() {
        let mut set = HandlerSet::with_capacity(4, true);
        let handlers: Vec<_> = (0..64).map(|_| noop()).collect();
        for h in &handlers {
            set.add(h.clone());
        }
        for h in &handlers[1..] {
            set.remove(h);
        }

        assert_eq!(set.len(), 1);
        assert!(set.capacity() >= 4);
        assert!(set.capacity() < 64);
    }

    #[test]
    fn test_no_shrink_keeps_capacity() {
        let mut set = HandlerSet::with_capacity(0, false);
        let handlers: Vec<_> = (0..32).map(|_| noop()).collect();
        for h in &handlers {
            set.add(h.clone());
        }
        let grown = set.capacity();
        assert!(set.clear());
        assert_eq!(set.capacity(), grown);
    }
}
