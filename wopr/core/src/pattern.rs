//! Pattern Contract and Registry
//!
//! A pattern is a self-contained animation routine. The supervisor owns a
//! registry of them, built from an explicit factory table rather than
//! runtime discovery, and runs at most one at a time on its own task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::alert::AlertReceiver;
use crate::strip::SharedStrip;

/// A self-contained LED animation routine.
///
/// `run` executes until the cancel token fires or the implementation returns
/// voluntarily; it must observe the token at every frame boundary so that
/// cancellation latency stays well under a second. While a pattern runs it
/// is the only writer to the strip.
#[async_trait]
pub trait Pattern: Send + Sync {
    /// Stable, non-empty display name. Also the registry key.
    fn name(&self) -> &str;

    /// Short description of what the pattern does.
    fn description(&self) -> &str;

    /// Execute the animation until cancelled.
    ///
    /// `alerts` carries hook notifications; patterns that do not adapt to
    /// alerts simply drop the receiver.
    async fn run(&self, strip: SharedStrip, cancel: CancellationToken, alerts: AlertReceiver);

    /// Best-effort teardown, invoked exactly once after `run` returns.
    ///
    /// Must leave the strip all-off. Errors are logged by the caller, never
    /// fatal.
    async fn cleanup(&self, strip: SharedStrip) -> std::io::Result<()> {
        let mut strip = strip.lock();
        strip.clear();
        strip.render()
    }
}

/// Sleep for `duration` unless the token fires first.
///
/// Returns `false` when cancelled, so frame loops can write
/// `if !sleep_or_cancel(...).await { return; }`.
pub async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

/// Factory producing a fresh pattern instance.
pub type PatternFactory = fn() -> Arc<dyn Pattern>;

/// Registry of loaded patterns, keyed by display name.
///
/// Built from a factory table; [`PatternRegistry::reload`] clears and
/// rebuilds the whole map so edited tables take effect and stale entries
/// disappear. A pattern still running from a previous generation keeps
/// executing via its own `Arc`; reload never touches it.
pub struct PatternRegistry {
    factories: Vec<PatternFactory>,
    patterns: HashMap<String, Arc<dyn Pattern>>,
}

impl PatternRegistry {
    /// Build a registry from a factory table and load it.
    #[must_use]
    pub fn new(factories: Vec<PatternFactory>) -> Self {
        let mut registry = Self {
            factories,
            patterns: HashMap::new(),
        };
        registry.reload();
        registry
    }

    /// Registry with no factories; entries are added via [`Self::insert`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
            patterns: HashMap::new(),
        }
    }

    /// Clear and rebuild the registry from the factory table.
    ///
    /// Returns the loaded names. Colliding names overwrite, keeping the
    /// later factory's instance.
    pub fn reload(&mut self) -> Vec<String> {
        self.patterns.clear();
        for factory in &self.factories {
            let pattern = factory();
            let name = pattern.name().to_string();
            if self.patterns.insert(name.clone(), pattern).is_some() {
                warn!(pattern = %name, "duplicate pattern name, earlier entry replaced");
            } else {
                debug!(pattern = %name, "loaded pattern");
            }
        }
        self.names()
    }

    /// Insert a pre-built instance, replacing any entry with the same name.
    pub fn insert(&mut self, pattern: Arc<dyn Pattern>) {
        self.patterns.insert(pattern.name().to_string(), pattern);
    }

    /// Look up a pattern by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Pattern>> {
        self.patterns.get(name).cloned()
    }

    /// Whether a pattern with this name is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Sorted list of loaded pattern names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.patterns.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Factory table for the built-in patterns.
#[must_use]
pub fn builtin_patterns() -> Vec<PatternFactory> {
    use crate::patterns::{KnightRider, LoadingBar, RandomBlink, SmoothFade};

    vec![
        || Arc::new(KnightRider::default()) as Arc<dyn Pattern>,
        || Arc::new(LoadingBar::default()) as Arc<dyn Pattern>,
        || Arc::new(SmoothFade::default()) as Arc<dyn Pattern>,
        || Arc::new(RandomBlink::default()) as Arc<dyn Pattern>,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::alert_channel;
    use crate::strip::{shared_strip, LedStrip, MemoryStrip};

    struct Stub(&'static str);

    #[async_trait]
    impl Pattern for Stub {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "stub"
        }

        async fn run(&self, _strip: SharedStrip, cancel: CancellationToken, _alerts: AlertReceiver) {
            cancel.cancelled().await;
        }
    }

    #[test]
    fn reload_rebuilds_from_factories() {
        let mut registry = PatternRegistry::new(builtin_patterns());
        let first = registry.names();
        assert!(first.contains(&"Knight Rider".to_string()));

        // Stale direct inserts vanish on reload.
        registry.insert(Arc::new(Stub("Transient")));
        assert!(registry.contains("Transient"));
        registry.reload();
        assert!(!registry.contains("Transient"));
        assert_eq!(registry.names(), first);
    }

    #[test]
    fn colliding_names_overwrite() {
        let mut registry = PatternRegistry::empty();
        registry.insert(Arc::new(Stub("Same")));
        registry.insert(Arc::new(Stub("Same")));
        assert_eq!(registry.names().len(), 1);
    }

    #[tokio::test]
    async fn default_cleanup_clears_the_strip() {
        let concrete = Arc::new(parking_lot::Mutex::new(MemoryStrip::new(5)));
        concrete.lock().fill(crate::strip::Rgb::RED);
        let strip: SharedStrip = concrete.clone();

        Stub("Cleanup").cleanup(strip).await.unwrap();

        let strip = concrete.lock();
        assert!(strip.is_dark());
        assert_eq!(strip.frames(), 1);
    }

    #[tokio::test]
    async fn sleep_or_cancel_returns_false_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!sleep_or_cancel(&cancel, Duration::from_secs(30)).await);
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let strip = shared_strip(MemoryStrip::new(3));
        let (_tx, rx) = alert_channel(4);
        let cancel = CancellationToken::new();
        let pattern = Arc::new(Stub("Waiter"));

        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            pattern.run(strip, task_cancel, rx).await;
        });

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pattern honored cancellation")
            .unwrap();
    }
}
