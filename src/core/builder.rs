use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::DispatcherConfig;
use crate::policies::{default_policy, ExceptionPolicy, PolicyRef};

use super::dispatcher::{CountObserver, EventDispatcher};

/// Builder for constructing an [`EventDispatcher`] with optional features.
pub struct DispatcherBuilder<T> {
    cfg: DispatcherConfig,
    policy: Option<PolicyRef>,
    observer: Option<CountObserver>,
    _event: PhantomData<fn(&T)>,
}

impl<T> DispatcherBuilder<T> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self {
            cfg,
            policy: None,
            observer: None,
            _event: PhantomData,
        }
    }

    /// Sets the exception policy.
    ///
    /// Without one, the dispatcher uses the shared [`default_policy`].
    pub fn with_policy(self, policy: impl ExceptionPolicy) -> Self {
        self.with_policy_ref(Arc::new(policy))
    }

    /// Sets an already shared exception policy.
    ///
    /// Policies are stateless, so one instance may serve many dispatchers.
    pub fn with_policy_ref(mut self, policy: PolicyRef) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets a callback observing handler-count changes as `(old, new)`.
    ///
    /// The callback runs after the change, outside the dispatcher's lock, so it
    /// may read the dispatcher. It fires for immediate mutations and once per
    /// pass for the staged modifications applied at its end.
    pub fn on_count_change<F>(mut self, observer: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Builds and returns the dispatcher.
    pub fn build(self) -> EventDispatcher<T> {
        let policy = self.policy.unwrap_or_else(default_policy);
        EventDispatcher::from_parts(self.cfg, policy, self.observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::Rethrow;

    #[test]
    fn test_defaults_to_shared_policy() {
        let dispatcher = DispatcherBuilder::<u8>::new(DispatcherConfig::default()).build();
        assert!(Arc::ptr_eq(dispatcher.policy(), &default_policy()));
    }

    #[test]
    fn test_custom_policy_is_used() {
        let dispatcher = DispatcherBuilder::<u8>::new(DispatcherConfig::default())
            .with_policy(Rethrow)
            .build();
        assert_eq!(dispatcher.policy().name(), "rethrow");
    }
}
