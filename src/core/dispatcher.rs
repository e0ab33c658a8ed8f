//! # EventDispatcher: the base dispatcher.
//!
//! [`EventDispatcher`] owns one [`HandlerSet`], a staged-modification queue and
//! the `invoking` flag that makes it a two-state machine.
//!
//! ## Pass lifecycle
//! ```text
//! Idle ── notify(sender, value) ──► Invoking
//!   ▲                                  │
//!   │       for i in 0..len_at_entry:  │
//!   │         catch_unwind(handler[i]) ├─► Err/panic ─► first error, or suppressed
//!   │                                  │
//!   └── invoking = false ◄─────────────┘
//!       apply staged (clear?, adds/removes in order)
//!       errors? ─► policy.handle(failure)
//!       report count change (also when the policy panics)
//! ```
//!
//! ## Rules
//! - While a pass runs, `add`/`remove`/`clear` are staged and take effect on the
//!   **next** pass; the live set is never touched mid-pass.
//! - `has_handler`/`handler_count` always read the live set, so they do not
//!   reflect staged requests.
//! - A nested `notify` fails with [`DispatchError::Reentrant`] and invokes nothing.
//! - Handler errors and panics never stop a pass.
//!
//! ## Threading
//! The dispatcher is `Send + Sync`, but it is meant to be driven from one logical
//! thread at a time. The internal mutex is held only while reading or editing
//! the handler list, never while a handler runs. Two threads calling `notify`
//! concurrently get [`DispatchError::Reentrant`] on one of them; wrap the
//! dispatcher in [`Synchronized`](crate::Synchronized) to serialize them instead.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::DispatcherConfig;
use crate::error::{DispatchError, HandlerError, HandlerFailure};
use crate::handlers::{Handler, HandlerSet};
use crate::policies::{default_policy, ExceptionPolicy, PolicyRef};

use super::builder::DispatcherBuilder;
use super::dispatch::Dispatch;
use super::pending::Staged;

/// Callback observing handler-count changes as `(old, new)`; never called with `old == new`.
pub type CountObserver = Arc<dyn Fn(usize, usize) + Send + Sync>;

struct State<T> {
    handlers: HandlerSet<T>,
    staged: Staged<T>,
    invoking: bool,
}

/// Ordered, reentrancy-safe dispatcher.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use relay::{Dispatch, EventDispatcher, Handler};
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let dispatcher = EventDispatcher::<String>::new();
///
/// for tag in ["a", "b", "c"] {
///     let log = Arc::clone(&log);
///     dispatcher.add_handler(Handler::infallible(move |_, v: &String| {
///         log.lock().push(format!("{tag}:{v}"));
///     }));
/// }
///
/// dispatcher.notify(&(), &"x".to_string()).unwrap();
/// assert_eq!(*log.lock(), vec!["a:x", "b:x", "c:x"]);
/// ```
pub struct EventDispatcher<T> {
    state: Mutex<State<T>>,
    policy: PolicyRef,
    observer: Option<CountObserver>,
}

impl<T> EventDispatcher<T> {
    /// Creates an empty dispatcher with the default config and policy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DispatcherConfig::default(), default_policy(), None)
    }

    /// Creates an empty dispatcher using `policy` for handler errors.
    #[must_use]
    pub fn with_policy(policy: impl ExceptionPolicy) -> Self {
        Self::from_parts(DispatcherConfig::default(), Arc::new(policy), None)
    }

    /// Creates an empty dispatcher from `config` with the default policy.
    #[must_use]
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self::from_parts(config, default_policy(), None)
    }

    /// Returns a builder for a dispatcher with custom config, policy or observer.
    #[must_use]
    pub fn builder(config: DispatcherConfig) -> DispatcherBuilder<T> {
        DispatcherBuilder::new(config)
    }

    pub(crate) fn from_parts(
        config: DispatcherConfig,
        policy: PolicyRef,
        observer: Option<CountObserver>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                handlers: HandlerSet::with_capacity(
                    config.capacity_floor(),
                    config.shrink_enabled(),
                ),
                staged: Staged::new(),
                invoking: false,
            }),
            policy,
            observer,
        }
    }

    /// Returns `true` while a pass is running.
    pub fn is_invoking(&self) -> bool {
        self.state.lock().invoking
    }

    /// Number of modifications staged by the running pass.
    pub fn staged_count(&self) -> usize {
        self.state.lock().staged.len()
    }

    /// The exception policy of this dispatcher.
    pub fn policy(&self) -> &PolicyRef {
        &self.policy
    }

    fn report(&self, old: usize, new: usize) {
        if old != new {
            if let Some(observer) = &self.observer {
                observer(old, new);
            }
        }
    }

    /// Edits the live set now, or stages the edit if a pass is running.
    fn modify(
        &self,
        live: impl FnOnce(&mut HandlerSet<T>),
        staged: impl FnOnce(&mut Staged<T>),
    ) {
        let change = {
            let mut state = self.state.lock();
            if state.invoking {
                staged(&mut state.staged);
                None
            } else {
                let old = state.handlers.len();
                live(&mut state.handlers);
                Some((old, state.handlers.len()))
            }
        };
        if let Some((old, new)) = change {
            self.report(old, new);
        }
    }

    fn begin_pass(&self) -> Result<usize, DispatchError> {
        let mut state = self.state.lock();
        if state.invoking {
            tracing::debug!("recursive notify rejected");
            return Err(DispatchError::Reentrant);
        }
        state.invoking = true;
        let len = state.handlers.len();
        tracing::trace!(handlers = len, "dispatch pass started");
        Ok(len)
    }

    /// Restores `Idle` and applies staged modifications.
    ///
    /// Returns the `(old, new)` live counts; the caller reports them once the
    /// policy has seen the pass's failure.
    fn end_pass(&self) -> (usize, usize) {
        let (old, new) = {
            let mut state = self.state.lock();
            state.invoking = false;
            let old = state.handlers.len();
            if !state.staged.is_empty() {
                tracing::trace!(staged = state.staged.len(), "applying staged modifications");
                let State {
                    handlers, staged, ..
                } = &mut *state;
                staged.apply(handlers);
            }
            (old, state.handlers.len())
        };
        tracing::trace!(handlers = new, "dispatch pass finished");
        (old, new)
    }

    fn handler_at(&self, index: usize) -> Option<Handler<T>> {
        self.state.lock().handlers.get(index).cloned()
    }
}

impl<T> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventDispatcher")
            .field("handlers", &state.handlers)
            .field("staged", &state.staged.len())
            .field("invoking", &state.invoking)
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl<T> Dispatch<T> for EventDispatcher<T> {
    fn notify(&self, sender: &dyn Any, value: &T) -> Result<(), DispatchError> {
        let len = self.begin_pass()?;

        let mut failure: Option<HandlerFailure> = None;
        // The live set is frozen until end_pass, so index i is stable.
        for index in 0..len {
            let Some(handler) = self.handler_at(index) else {
                break;
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.call(sender, value)));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(source)) => HandlerError::Failed { source },
                Err(payload) => HandlerError::from_panic(payload),
            };
            match failure.as_mut() {
                Some(first) => first.suppress(error),
                None => failure = Some(HandlerFailure::new(error)),
            }
        }

        let (old, new) = self.end_pass();

        // The policy sees the failure before the observer runs; a panicking
        // policy still lets the count change be reported.
        let outcome = failure.map(|failure| {
            panic::catch_unwind(AssertUnwindSafe(|| self.policy.handle(failure)))
        });
        self.report(old, new);

        match outcome {
            None => Ok(()),
            Some(Ok(handled)) => handled.map_err(DispatchError::Escalated),
            Some(Err(payload)) => panic::resume_unwind(payload),
        }
    }

    fn add_handler(&self, handler: Handler<T>) {
        let staged = handler.clone();
        self.modify(|set| set.add(handler), |queue| queue.add(staged));
    }

    fn remove_handler(&self, handler: &Handler<T>) {
        self.modify(
            |set| {
                set.remove(handler);
            },
            |queue| queue.remove(handler.clone()),
        );
    }

    fn has_handler(&self, handler: &Handler<T>) -> bool {
        self.state.lock().handlers.contains(handler)
    }

    fn clear_handlers(&self) {
        self.modify(
            |set| {
                set.clear();
            },
            Staged::clear,
        );
    }

    fn handler_count(&self) -> usize {
        self.state.lock().handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::Rethrow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(hits: &Arc<AtomicUsize>) -> Handler<i32> {
        let hits = Arc::clone(hits);
        Handler::infallible(move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_invoking_flag_is_visible_inside_handlers() {
        let dispatcher = Arc::new(EventDispatcher::<i32>::new());
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let weak = Arc::downgrade(&dispatcher);
            let seen = Arc::clone(&seen);
            dispatcher.add_handler(Handler::infallible(move |_, _| {
                if weak.upgrade().is_some_and(|d| d.is_invoking()) {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        dispatcher.notify(&(), &0).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(!dispatcher.is_invoking());
    }

    #[test]
    fn test_staged_requests_are_counted_then_drained() {
        let dispatcher = Arc::new(EventDispatcher::<i32>::new());
        let staged_during = Arc::new(AtomicUsize::new(0));
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let weak = Arc::downgrade(&dispatcher);
            let staged_during = Arc::clone(&staged_during);
            let extra = counter(&hits);
            dispatcher.add_handler(Handler::infallible(move |_, _| {
                if let Some(d) = weak.upgrade() {
                    d.add_handler(extra.clone());
                    d.remove_handler(&extra);
                    staged_during.store(d.staged_count(), Ordering::SeqCst);
                }
            }));
        }

        dispatcher.notify(&(), &0).unwrap();
        assert_eq!(staged_during.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.staged_count(), 0);
        assert_eq!(dispatcher.handler_count(), 1);
    }

    #[test]
    fn test_count_observer_sees_every_change() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = {
            let changes = Arc::clone(&changes);
            EventDispatcher::<i32>::builder(DispatcherConfig::default())
                .on_count_change(move |old, new| changes.lock().push((old, new)))
                .build()
        };
        let hits = Arc::new(AtomicUsize::new(0));
        let h = counter(&hits);

        dispatcher.add_handler(h.clone());
        dispatcher.add_handler(h.clone());
        dispatcher.remove_handler(&h);
        dispatcher.remove_handler(&counter(&hits));
        dispatcher.clear_handlers();
        dispatcher.clear_handlers();

        assert_eq!(*changes.lock(), vec![(0, 1), (1, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let dispatcher = EventDispatcher::<i32>::with_policy(Rethrow);
        let hits = Arc::new(AtomicUsize::new(0));
        dispatcher.add_handler(Handler::infallible(|_, _| panic!("kaboom")));
        dispatcher.add_handler(counter(&hits));

        let err = dispatcher.notify(&(), &1).unwrap_err();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let failure = err.failure().expect("escalated");
        assert_eq!(failure.primary().as_message(), "panic: kaboom");
        assert!(!dispatcher.is_invoking());
    }

    fn stage_add_then_fail(dispatcher: &Arc<EventDispatcher<i32>>, extra: Handler<i32>) {
        let weak = Arc::downgrade(dispatcher);
        dispatcher.add_handler(Handler::new(move |_, _| {
            if let Some(d) = weak.upgrade() {
                d.add_handler(extra.clone());
            }
            Err("failed after staging".into())
        }));
    }

    #[test]
    fn test_policy_sees_failure_before_observer_panics() {
        let policy_calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = {
            let policy_calls = Arc::clone(&policy_calls);
            Arc::new(
                EventDispatcher::<i32>::builder(DispatcherConfig::default())
                    .with_policy(move |failure: HandlerFailure| -> Result<(), HandlerFailure> {
                        policy_calls.fetch_add(1, Ordering::SeqCst);
                        Err(failure)
                    })
                    .on_count_change(|_, new| {
                        if new == 2 {
                            panic!("observer bug");
                        }
                    })
                    .build(),
            )
        };
        let hits = Arc::new(AtomicUsize::new(0));
        stage_add_then_fail(&dispatcher, counter(&hits));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.notify(&(), &0)));
        assert!(outcome.is_err());
        assert_eq!(policy_calls.load(Ordering::SeqCst), 1);
        assert!(!dispatcher.is_invoking());
        assert_eq!(dispatcher.handler_count(), 2);
    }

    #[test]
    fn test_count_reported_when_policy_panics() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = {
            let changes = Arc::clone(&changes);
            Arc::new(
                EventDispatcher::<i32>::builder(DispatcherConfig::default())
                    .with_policy(|_: HandlerFailure| -> Result<(), HandlerFailure> {
                        panic!("policy bug")
                    })
                    .on_count_change(move |old, new| changes.lock().push((old, new)))
                    .build(),
            )
        };
        let hits = Arc::new(AtomicUsize::new(0));
        stage_add_then_fail(&dispatcher, counter(&hits));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.notify(&(), &0)));
        assert!(outcome.is_err());
        assert_eq!(*changes.lock(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_debug_reports_state() {
        let dispatcher = EventDispatcher::<i32>::new();
        let rendered = format!("{dispatcher:?}");
        assert!(rendered.contains("invoking: false"));
        assert!(rendered.contains("log_and_continue"));
    }
}
