//! # Example: host_bridge
//!
//! Keep a host-level registration only while the dispatcher has listeners.
//!
//! Demonstrates how to:
//! - Wrap a dispatcher in a `HostBridge` over an in-memory host source.
//! - Watch the bridge attach on the first handler and detach on the last.
//! - Let a handler clear the dispatcher from inside a host-fired pass.
//!
//! ## Flow
//! ```text
//! host.fire()              ─► nobody attached, 0 listeners called
//! bridge.add_handler(...)  ─► 0→1, register with host
//! host.fire()              ─► callback ─► bridge ─► handlers
//!                               (last handler clears; applied after the pass)
//!                          ─► 1→0, unregister from host
//! host.fire()              ─► 0 listeners called
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example host_bridge
//! ```

use std::sync::Arc;

use relay::{Dispatch, EventDispatcher, Handler, HostBridge, MemoryHost};

#[derive(Debug)]
struct PlayerJoin {
    name: &'static str,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let host = Arc::new(MemoryHost::<PlayerJoin>::new("player_join"));
    let inner = Arc::new(EventDispatcher::<PlayerJoin>::new());
    let bridge = HostBridge::new(Arc::clone(&inner), Arc::clone(&host));

    let called = host.fire(&(), &PlayerJoin { name: "early" });
    println!("[host] fired before any handler, {called} listener(s) called");

    bridge.add_handler(Handler::infallible(|_, ev: &PlayerJoin| {
        println!("[welcome] hello, {}", ev.name);
    }));
    println!("[bridge] attached: {}", bridge.is_attached());

    // Stop listening after the first join.
    let weak = Arc::downgrade(&inner);
    bridge.add_handler(Handler::infallible(move |_, ev: &PlayerJoin| {
        println!("[gate] {} joined, no longer listening", ev.name);
        if let Some(inner) = weak.upgrade() {
            inner.clear_handlers();
        }
    }));

    host.fire(&(), &PlayerJoin { name: "alice" });
    println!("[bridge] attached: {}", bridge.is_attached());

    let called = host.fire(&(), &PlayerJoin { name: "bob" });
    println!(
        "[host] fired after detach, {called} listener(s) called; registrations={}, unregistrations={}",
        host.registrations(),
        host.unregistrations()
    );
}
