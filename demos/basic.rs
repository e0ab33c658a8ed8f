//! # Example: basic
//!
//! Register handlers, broadcast values, and edit the handler list from inside
//! a running pass.
//!
//! Demonstrates how to:
//! - Build a dispatcher with a count observer and the `Rethrow` policy.
//! - Add a one-shot handler that removes itself while it runs.
//! - See handler errors aggregated into a single `HandlerFailure`.
//! - Stack a `Filter` and a `MapTo` on top of the base dispatcher.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► notify("hello")   ─► greeter, once (once removes itself, staged)
//!   ├─► notify("again")   ─► greeter only
//!   ├─► add two failing handlers
//!   ├─► notify("boom")    ─► Err(Escalated { 2 failures })
//!   └─► lengths: filter(len > 3) ─► map(len) ─► numbers dispatcher
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use relay::{Dispatch, DispatcherConfig, EventDispatcher, Handler, Rethrow};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 1) Dispatcher that reports every handler-count change
    let messages = Arc::new(
        EventDispatcher::<String>::builder(DispatcherConfig::default())
            .with_policy(Rethrow)
            .on_count_change(|old, new| println!("[count] {old} -> {new}"))
            .build(),
    );

    messages.add_handler(Handler::infallible(|_, msg: &String| {
        println!("[greeter] got {msg:?}");
    }));

    // 2) A handler that unregisters itself on first use
    let slot: Arc<Mutex<Option<Handler<String>>>> = Arc::new(Mutex::new(None));
    let once = {
        let weak = Arc::downgrade(&messages);
        let slot = Arc::clone(&slot);
        Handler::infallible(move |_, msg: &String| {
            println!("[once] got {msg:?}, removing myself");
            let me = slot.lock().take();
            if let (Some(d), Some(me)) = (weak.upgrade(), me) {
                d.remove_handler(&me);
            }
        })
    };
    *slot.lock() = Some(once.clone());
    messages.add_handler(once);

    messages.notify(&(), &"hello".to_string())?;
    messages.notify(&(), &"again".to_string())?;

    // 3) Failing handlers do not stop the pass; errors are aggregated
    messages.add_handler(Handler::new(|_, _: &String| Err("first failure".into())));
    messages.add_handler(Handler::new(|_, _: &String| Err("second failure".into())));
    if let Err(err) = messages.notify(&(), &"boom".to_string()) {
        println!("[main] notify failed: {err}");
    }
    messages.clear_handlers();

    // 4) Filter long words and forward their lengths to another dispatcher
    let numbers = Arc::new(EventDispatcher::<usize>::new());
    numbers.add_handler(Handler::infallible(|_, n: &usize| {
        println!("[numbers] length {n}");
    }));

    let lengths = EventDispatcher::<String>::new()
        .map_to(Arc::clone(&numbers), |s: &String| s.len())?
        .filter(|s: &String| s.len() > 3);

    for word in ["a", "dispatch", "is", "reentrant"] {
        lengths.notify(&(), &word.to_string())?;
    }

    Ok(())
}
