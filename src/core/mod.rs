//! # Core: the dispatcher contract and its base implementation.
//!
//! This module contains the pieces every other module builds on.
//!
//! ## Files
//! - **dispatch.rs** the [`Dispatch`] contract, [`InstanceId`] and the combinator methods
//! - **dispatcher.rs** [`EventDispatcher`], the two-state base dispatcher
//! - **pending.rs** staged modifications recorded during a pass
//! - **builder.rs** [`DispatcherBuilder`] for config, policy and count observer
//!
//! ## Wiring
//! ```text
//! producer ── notify(sender, value) ──► EventDispatcher
//!                                          ├─ HandlerSet (live, frozen during a pass)
//!                                          ├─ Staged     (add/remove/clear during a pass)
//!                                          └─ PolicyRef  (handler errors after the pass)
//! handler  ── add/remove/clear ──────────► same dispatcher (staged while invoking)
//! ```

mod builder;
mod dispatch;
mod dispatcher;
mod pending;

pub use builder::DispatcherBuilder;
pub use dispatch::{Dispatch, InstanceId};
pub use dispatcher::{CountObserver, EventDispatcher};
