//! Modifications requested while a pass is running.
//!
//! During a pass the live [`HandlerSet`] is frozen; `add`/`remove`/`clear`
//! requests are queued here and applied by the dispatcher once the pass ends.
//!
//! ```text
//! staged:  [Add(a), Remove(b)]  ──clear──►  [Clear]  ──add(c)──►  [Clear, Add(c)]
//! apply:   clear live set, then append c
//! ```
//! A staged clear discards everything queued before it; requests queued after
//! it still apply on top of the emptied set.

use crate::handlers::{Handler, HandlerSet};

/// One deferred mutation.
pub(crate) enum Modification<T> {
    Add(Handler<T>),
    Remove(Handler<T>),
    Clear,
}

/// Queue of deferred mutations, in request order.
pub(crate) struct Staged<T> {
    queue: Vec<Modification<T>>,
}

impl<T> Staged<T> {
    pub(crate) fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub(crate) fn add(&mut self, handler: Handler<T>) {
        self.queue.push(Modification::Add(handler));
    }

    pub(crate) fn remove(&mut self, handler: Handler<T>) {
        self.queue.push(Modification::Remove(handler));
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.queue.push(Modification::Clear);
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drains the queue into `set`.
    ///
    /// A clear can only sit at the front of the queue, so it is applied first.
    pub(crate) fn apply(&mut self, set: &mut HandlerSet<T>) {
        for modification in self.queue.drain(..) {
            match modification {
                Modification::Clear => {
                    set.clear();
                }
                Modification::Add(handler) => set.add(handler),
                Modification::Remove(handler) => {
                    set.remove(&handler);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler<()> {
        Handler::infallible(|_, _| {})
    }

    #[test]
    fn test_apply_in_request_order() {
        let (a, b) = (noop(), noop());
        let mut set = HandlerSet::new();
        set.add(a.clone());

        let mut staged = Staged::new();
        staged.add(b.clone());
        staged.remove(a.clone());
        staged.add(a.clone());
        staged.apply(&mut set);

        assert!(staged.is_empty());
        let order: Vec<bool> = set.iter().map(|h| h.ptr_eq(&b)).collect();
        assert_eq!(order, vec![true, false]);
    }

    #[test]
    fn test_clear_discards_earlier_requests() {
        let (a, b, c) = (noop(), noop(), noop());
        let mut set = HandlerSet::new();
        set.add(a.clone());

        let mut staged = Staged::new();
        staged.add(b.clone());
        staged.clear();
        staged.add(c.clone());
        assert_eq!(staged.len(), 2);

        staged.apply(&mut set);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&c));
        assert!(!set.contains(&a));
        assert!(!set.contains(&b));
    }

    #[test]
    fn test_remove_of_absent_handler_is_ignored() {
        let mut set = HandlerSet::new();
        let mut staged = Staged::new();
        staged.remove(noop());
        staged.apply(&mut set);
        assert!(set.is_empty());
    }
}
