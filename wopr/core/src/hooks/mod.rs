//! System Condition Hooks
//!
//! A hook is a condition probe with edge-triggered semantics: `check`
//! samples a metric and reports `true` only when the derived alert level
//! changes, never while a condition merely persists. On trigger a hook can
//! emit an [`AlertMessage`](crate::alert::AlertMessage) for the running
//! pattern and, when linked, cause the supervisor to start a pattern.

mod level;
mod monitors;
mod test_hook;

use thiserror::Error;
use tracing::debug;

use crate::alert::AlertMessage;

pub use level::LevelTracker;
pub use monitors::{
    cpu_load_hook, cpu_temp_monitor, disk_space_monitor, memory_monitor, under_voltage_monitor,
    MonitorHook, Probe,
};
pub use test_hook::{TestHook, TEST_HOOK_EVENT};

/// Error raised by a hook's `check`.
#[derive(Debug, Error)]
pub enum HookError {
    /// The underlying metric source produced no reading.
    #[error("probe for '{0}' returned no reading")]
    ProbeUnavailable(String),

    /// I/O failure while sampling.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fallback action a hook may request when it has no pattern link.
///
/// Returned as a value rather than invoked on the supervisor directly so
/// the polling loop never re-enters supervisor state mid-iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookAction {
    /// Start the named pattern.
    StartPattern(String),
    /// Stop whatever pattern is running.
    StopPattern,
}

/// Contract for a system condition hook.
pub trait Hook: Send {
    /// Stable event name; also the link key.
    fn event_name(&self) -> &str;

    /// Sample the condition. `Ok(true)` only on a level transition.
    fn check(&mut self) -> Result<bool, HookError>;

    /// Payload to broadcast to the running pattern after a `true` check.
    fn get_message(&self) -> Option<AlertMessage> {
        None
    }

    /// Fallback action when the hook triggered without a pattern link.
    fn on_trigger(&self) -> Option<HookAction> {
        None
    }

    /// Arm the hook manually. Only the test hook supports this; everything
    /// else reports `false`.
    fn trigger(&mut self) -> bool {
        false
    }
}

/// Factory producing a fresh hook instance.
pub type HookFactory = fn() -> Box<dyn Hook>;

/// Registry of loaded hooks, rebuilt wholesale on reload like the pattern
/// registry. Hooks keep per-instance threshold state, so the registry owns
/// them mutably.
pub struct HookRegistry {
    factories: Vec<HookFactory>,
    hooks: Vec<Box<dyn Hook>>,
}

impl HookRegistry {
    /// Build a registry from a factory table and load it.
    #[must_use]
    pub fn new(factories: Vec<HookFactory>) -> Self {
        let mut registry = Self {
            factories,
            hooks: Vec::new(),
        };
        registry.reload();
        registry
    }

    /// Registry with no factories; entries are added via [`Self::insert`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Clear and rebuild from the factory table, returning the event names.
    pub fn reload(&mut self) -> Vec<String> {
        self.hooks.clear();
        for factory in &self.factories {
            let hook = factory();
            debug!(hook = %hook.event_name(), "loaded hook");
            self.hooks.push(hook);
        }
        self.event_names()
    }

    /// Insert a pre-built hook.
    pub fn insert(&mut self, hook: Box<dyn Hook>) {
        self.hooks.push(hook);
    }

    /// Event names of all loaded hooks, in load order.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.hooks.iter().map(|h| h.event_name().to_string()).collect()
    }

    /// Whether a hook with this event name is loaded.
    #[must_use]
    pub fn contains(&self, event_name: &str) -> bool {
        self.hooks.iter().any(|h| h.event_name() == event_name)
    }

    /// Mutable access to a hook by event name.
    pub fn get_mut(&mut self, event_name: &str) -> Option<&mut (dyn Hook + 'static)> {
        self.hooks
            .iter_mut()
            .find(|h| h.event_name() == event_name)
            .map(Box::as_mut)
    }

    /// Iterate all hooks mutably, in load order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Hook>> {
        self.hooks.iter_mut()
    }
}

/// Factory table for the built-in hooks.
#[must_use]
pub fn builtin_hooks() -> Vec<HookFactory> {
    vec![
        || Box::new(cpu_load_hook("cpu_over_20", 20.0)) as Box<dyn Hook>,
        || Box::new(cpu_load_hook("cpu_over_50", 50.0)) as Box<dyn Hook>,
        || Box::new(cpu_load_hook("cpu_over_75", 75.0)) as Box<dyn Hook>,
        || Box::new(cpu_temp_monitor()) as Box<dyn Hook>,
        || Box::new(memory_monitor()) as Box<dyn Hook>,
        || Box::new(disk_space_monitor()) as Box<dyn Hook>,
        || Box::new(under_voltage_monitor()) as Box<dyn Hook>,
        || Box::new(TestHook::default()) as Box<dyn Hook>,
    ]
}
