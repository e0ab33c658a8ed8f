//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the storage settings of a base
//! [`EventDispatcher`](crate::EventDispatcher).
//!
//! Config is used in two ways:
//! 1. **Direct creation**: `EventDispatcher::with_config(config)`
//! 2. **Builder**: `DispatcherBuilder::new(config)`
//!
//! ## Sentinel values
//! - `initial_capacity = 0` → no slots are reserved until the first handler is added

/// Storage configuration for a dispatcher's handler set.
///
/// ## Field semantics
/// - `initial_capacity`: slots reserved up front, and the floor the set never shrinks below
/// - `shrink`: release spare slots once fewer than half of them are in use
///
/// Both knobs affect memory only; registration order and dispatch semantics
/// are identical for every configuration.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Number of handler slots reserved when the dispatcher is created.
    pub initial_capacity: usize,

    /// Whether the handler set gives back capacity after removals.
    pub shrink: bool,
}

impl DispatcherConfig {
    /// Returns the capacity floor used when shrinking.
    #[inline]
    pub fn capacity_floor(&self) -> usize {
        self.initial_capacity
    }

    /// Returns `true` when the handler set may release spare slots.
    #[inline]
    pub fn shrink_enabled(&self) -> bool {
        self.shrink
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `initial_capacity = 8`
    /// - `shrink = true`
    fn default() -> Self {
        Self {
            initial_capacity: 8,
            shrink: true,
        }
    }
}
