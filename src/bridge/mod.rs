//! # Host bridge
//!
//! Connects a dispatcher to an event source owned by some host runtime,
//! holding a host registration only while the dispatcher has handlers.
//!
//! - [`HostSource`] the register/unregister surface a host must offer.
//! - [`HostBridge`] the dispatcher wrapper that attaches on 0→1 and detaches on 1→0.
//! - [`MemoryHost`] an in-process host source for tests and demos.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use relay::{Dispatch, EventDispatcher, Handler, HostBridge, MemoryHost};
//!
//! let host = Arc::new(MemoryHost::<u32>::new("player_join"));
//! let bridge = HostBridge::new(EventDispatcher::new(), Arc::clone(&host));
//! assert!(!bridge.is_attached());
//!
//! let h = Handler::infallible(|_, _: &u32| {});
//! bridge.add_handler(h.clone());
//! assert_eq!(host.listener_count(), 1);
//!
//! host.fire(&(), &7);
//!
//! bridge.remove_handler(&h);
//! assert_eq!(host.listener_count(), 0);
//! ```

mod adapter;
mod host;
mod memory;

pub use adapter::HostBridge;
pub use host::{HostCallback, HostSource};
pub use memory::{MemoryHost, MemoryToken};
