//! # relay
//!
//! **Relay** is a small, synchronous, in-process event dispatch library for Rust.
//!
//! Components register handlers against a typed event, producers broadcast a
//! value to every current handler, and handlers may add, remove or clear
//! handlers (their own included) while a broadcast is in progress. Such edits
//! are staged and take effect on the next broadcast.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  producer #1 │   │  producer #2 │   │  host event  │
//!     │   notify()   │   │   notify()   │   │ (HostSource) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │                  │                  ▼
//!            │                  │           ┌──────────────┐
//!            │                  │           │  HostBridge  │ attach on 0→1,
//!            │                  │           │              │ detach on 1→0
//!            ▼                  ▼           └──────┬───────┘
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Wrappers (optional, stackable)                                   │
//! │  - Synchronized (reentrant lock around every operation)           │
//! │  - Filter       (predicate gate on notify)                        │
//! │  - LinkTo/MapTo (chain into another dispatcher after the pass)    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventDispatcher                                                  │
//! │  - HandlerSet  (live, insertion-ordered, frozen during a pass)    │
//! │  - Staged      (add/remove/clear requested during a pass)         │
//! │  - invoking    (Idle ⇄ Invoking, nested notify rejected)          │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!    handler #1         handler #2         handler #N
//!        │  errors and panics are caught, the pass continues
//!        ▼
//!  HandlerFailure ──► ExceptionPolicy (LogAndContinue | Rethrow | closure)
//! ```
//!
//! ### Pass
//! ```text
//! notify(sender, value)
//!   ├─► invoking? ── yes ─► Err(Reentrant), nothing runs
//!   ├─► invoking = true
//!   ├─► for each handler registered at entry, in order:
//!   │       ├─ Ok          ─► next
//!   │       └─ Err / panic ─► first error, later ones suppressed; next
//!   ├─► invoking = false
//!   ├─► apply staged modifications in request order
//!   └─► errors? ─► policy.handle(failure)
//!                   ├─ Ok(())  ─► Ok(())
//!                   └─ Err(f)  ─► Err(Escalated(f))
//! ```
//!
//! ## Features
//! | Area           | Description                                                         | Key types / traits                          |
//! |----------------|---------------------------------------------------------------------|---------------------------------------------|
//! | **Dispatch**   | Ordered, reentrancy-safe broadcast with staged modification.        | [`Dispatch`], [`EventDispatcher`]           |
//! | **Handlers**   | Identity-compared closure references.                               | [`Handler`], [`HandlerSet`]                 |
//! | **Policies**   | Decide what happens to handler errors after a pass.                 | [`ExceptionPolicy`], [`LogAndContinue`], [`Rethrow`] |
//! | **Wrappers**   | Filter, chain, map and serialize dispatchers.                       | [`Filter`], [`LinkTo`], [`MapTo`], [`Synchronized`] |
//! | **Host bridge**| Hold a host registration only while someone listens.               | [`HostSource`], [`HostBridge`], [`MemoryHost`] |
//! | **Errors**     | Typed errors for dispatch, handlers and construction.               | [`DispatchError`], [`HandlerFailure`], [`ConstructionError`] |
//! | **Configuration** | Initial capacity and shrink behavior of the handler list.        | [`DispatcherConfig`]                        |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use relay::{Dispatch, EventDispatcher, Handler, Rethrow};
//!
//! let dispatcher = Arc::new(EventDispatcher::<String>::with_policy(Rethrow));
//! let calls = Arc::new(AtomicUsize::new(0));
//!
//! // A handler that unregisters itself after its first call.
//! let once = {
//!     let weak = Arc::downgrade(&dispatcher);
//!     let calls = Arc::clone(&calls);
//!     let slot = Arc::new(parking_lot::Mutex::new(None::<Handler<String>>));
//!     let handler = {
//!         let slot = Arc::clone(&slot);
//!         Handler::infallible(move |_, _: &String| {
//!             calls.fetch_add(1, Ordering::SeqCst);
//!             if let (Some(d), Some(me)) = (weak.upgrade(), slot.lock().clone()) {
//!                 d.remove_handler(&me);
//!             }
//!         })
//!     };
//!     *slot.lock() = Some(handler.clone());
//!     handler
//! };
//!
//! dispatcher.add_handler(once);
//! dispatcher.notify(&(), &"first".to_string())?;
//! dispatcher.notify(&(), &"second".to_string())?;
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! assert_eq!(dispatcher.handler_count(), 0);
//! # Ok::<(), relay::DispatchError>(())
//! ```

mod bridge;
mod config;
mod core;
mod error;
mod handlers;
mod policies;
mod wrappers;

// ---- Public re-exports ----

pub use bridge::{HostBridge, HostCallback, HostSource, MemoryHost, MemoryToken};
pub use config::DispatcherConfig;
pub use self::core::{CountObserver, Dispatch, DispatcherBuilder, EventDispatcher, InstanceId};
pub use error::{BoxError, ConstructionError, DispatchError, HandlerError, HandlerFailure};
pub use handlers::{Handler, HandlerResult, HandlerSet};
pub use policies::{
    default_policy, ExceptionPolicy, LogAndContinue, LogSink, PolicyRef, Rethrow, Severity,
    TracingSink,
};
pub use wrappers::{Filter, LinkTo, MapTo, SyncGuard, SyncLock, Synchronized};
