//! In-memory [`HostSource`] used by tests and demos.
//!
//! [`MemoryHost`] keeps its listeners in registration order and counts every
//! register/unregister call, which is what the attach/detach tests assert on.

use std::any::Any;
use std::borrow::Cow;

use parking_lot::Mutex;

use super::host::{HostCallback, HostSource};

/// Token handed out by [`MemoryHost::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryToken(u64);

struct HostState<T> {
    next: u64,
    listeners: Vec<(u64, HostCallback<T>)>,
    registrations: usize,
    unregistrations: usize,
}

/// Host event source living entirely in process memory.
pub struct MemoryHost<T> {
    name: Cow<'static, str>,
    state: Mutex<HostState<T>>,
}

impl<T> MemoryHost<T> {
    /// Creates a host event source called `name`.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(HostState {
                next: 0,
                listeners: Vec::new(),
                registrations: 0,
                unregistrations: 0,
            }),
        }
    }

    /// Fires the host event, returning how many listeners were called.
    ///
    /// Listeners are snapshotted first, so they may unregister while running.
    pub fn fire(&self, sender: &dyn Any, value: &T) -> usize {
        let listeners: Vec<HostCallback<T>> = self
            .state
            .lock()
            .listeners
            .iter()
            .map(|(_, cb)| HostCallback::clone(cb))
            .collect();
        for listener in &listeners {
            listener(sender, value);
        }
        listeners.len()
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Total `register` calls so far.
    pub fn registrations(&self) -> usize {
        self.state.lock().registrations
    }

    /// Total `unregister` calls so far.
    pub fn unregistrations(&self) -> usize {
        self.state.lock().unregistrations
    }
}

impl<T> std::fmt::Debug for MemoryHost<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryHost")
            .field("name", &self.name)
            .field("listeners", &state.listeners.len())
            .field("registrations", &state.registrations)
            .field("unregistrations", &state.unregistrations)
            .finish()
    }
}

impl<T: 'static> HostSource<T> for MemoryHost<T> {
    type Token = MemoryToken;

    fn register(&self, callback: HostCallback<T>) -> MemoryToken {
        let mut state = self.state.lock();
        let id = state.next;
        state.next += 1;
        state.registrations += 1;
        state.listeners.push((id, callback));
        MemoryToken(id)
    }

    fn unregister(&self, token: MemoryToken) {
        let mut state = self.state.lock();
        state.unregistrations += 1;
        state.listeners.retain(|(id, _)| *id != token.0);
    }

    fn describe(&self) -> &str {
        &self.name
    }
}
