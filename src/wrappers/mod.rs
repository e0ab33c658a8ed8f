//! # Composition wrappers.
//!
//! Each wrapper holds an inner dispatcher by value, implements the full
//! [`Dispatch`](crate::Dispatch) contract by delegating to it, and adds one
//! behavior:
//!
//! | Wrapper          | Adds                                                   |
//! |------------------|--------------------------------------------------------|
//! | [`Filter`]       | `notify` reaches the inner dispatcher only if a predicate accepts the value |
//! | [`LinkTo`]       | after the inner pass, the same value goes to another dispatcher |
//! | [`MapTo`]        | after the inner pass, a mapped value goes to another dispatcher |
//! | [`Synchronized`] | every operation runs under one reentrant lock          |
//!
//! Registration methods always reach the innermost dispatcher unchanged.
//!
//! ## Composition notes
//! - A filter predicate runs outside any lock of an inner `Synchronized`;
//!   synchronize the outermost wrapper if the predicate needs it.
//! - `LinkTo`/`MapTo` give no atomicity across the two dispatchers.

/// Implements the registration half of the contract by forwarding to `self.$field`.
macro_rules! delegate_registration {
    ($field:ident) => {
        fn add_handler(&self, handler: $crate::handlers::Handler<T>) {
            self.$field.add_handler(handler);
        }

        fn remove_handler(&self, handler: &$crate::handlers::Handler<T>) {
            self.$field.remove_handler(handler);
        }

        fn has_handler(&self, handler: &$crate::handlers::Handler<T>) -> bool {
            self.$field.has_handler(handler)
        }

        fn clear_handlers(&self) {
            self.$field.clear_handlers();
        }

        fn handler_count(&self) -> usize {
            self.$field.handler_count()
        }
    };
}

mod filter;
mod link;
mod sync;

pub use filter::Filter;
pub use link::{LinkTo, MapTo};
pub use sync::{SyncGuard, SyncLock, Synchronized};
