//! Pattern lifecycle supervisor.
//!
//! Owns the registries, the persistence store, and at most one running
//! pattern task. All mutation goes through `&mut self`, so callers serialize
//! operations by wrapping the supervisor in a single async mutex; start and
//! stop are therefore totally ordered.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::alert::{alert_channel, AlertSender, DEFAULT_ALERT_CAPACITY};
use crate::error::SupervisorError;
use crate::hooks::{HookAction, HookRegistry, TEST_HOOK_EVENT};
use crate::pattern::PatternRegistry;
use crate::store::PersistenceStore;
use crate::strip::SharedStrip;

/// Grace period a pattern gets to honor cancellation before its task is
/// abandoned.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Cadence at which the host loop should call [`PatternSupervisor::poll_hooks`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Lifecycle phase of the supervisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorState {
    /// No pattern running.
    Idle,
    /// A start is in flight.
    Starting,
    /// A pattern task is live.
    Running,
    /// A stop is waiting for the task to wind down.
    Stopping,
}

struct RunningPattern {
    name: String,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
    alerts: AlertSender,
}

/// The manager: one running pattern, hook polling, persistence.
pub struct PatternSupervisor {
    strip: SharedStrip,
    patterns: PatternRegistry,
    hooks: HookRegistry,
    store: PersistenceStore,
    current: Option<RunningPattern>,
    state: SupervisorState,
    /// Runtime hook-to-pattern links consulted each polling tick.
    hook_links: BTreeMap<String, String>,
    /// In-memory startup registrations, lost on restart.
    startup_patterns: Vec<String>,
    startup_links: BTreeMap<String, String>,
    stop_timeout: Duration,
    alert_capacity: usize,
}

impl PatternSupervisor {
    /// Supervisor over the given strip, registries, and store.
    #[must_use]
    pub fn new(
        strip: SharedStrip,
        patterns: PatternRegistry,
        hooks: HookRegistry,
        store: PersistenceStore,
    ) -> Self {
        Self {
            strip,
            patterns,
            hooks,
            store,
            current: None,
            state: SupervisorState::Idle,
            hook_links: BTreeMap::new(),
            startup_patterns: Vec::new(),
            startup_links: BTreeMap::new(),
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
        }
    }

    /// Override the stop grace period.
    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Override the alert channel capacity used for new patterns.
    #[must_use]
    pub fn with_alert_capacity(mut self, capacity: usize) -> Self {
        self.alert_capacity = capacity;
        self
    }

    /// Name of the running pattern, if any.
    #[must_use]
    pub fn current_pattern(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.name.as_str())
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Start the named pattern, implicitly stopping whatever runs now.
    ///
    /// Each start gets a fresh alert channel and cancellation token. The
    /// pattern's `cleanup` runs inside the spawned task right after `run`
    /// returns, so it executes exactly once for both cancellation and
    /// voluntary completion.
    pub async fn start_pattern(&mut self, name: &str) -> Result<(), SupervisorError> {
        let pattern = self
            .patterns
            .get(name)
            .ok_or_else(|| SupervisorError::PatternNotFound(name.to_string()))?;

        self.stop_current().await;
        self.state = SupervisorState::Starting;

        let (alerts, alert_rx) = alert_channel(self.alert_capacity);
        let cancel = CancellationToken::new();
        let strip = Arc::clone(&self.strip);
        let task_cancel = cancel.clone();
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            pattern
                .run(Arc::clone(&strip), task_cancel, alert_rx)
                .await;
            if let Err(err) = pattern.cleanup(strip).await {
                warn!(pattern = %task_name, error = %err, "pattern cleanup failed");
            }
        });

        self.current = Some(RunningPattern {
            name: name.to_string(),
            handle,
            cancel,
            alerts,
        });
        self.state = SupervisorState::Running;
        info!(pattern = name, "pattern started");
        Ok(())
    }

    /// Stop the running pattern and forget the resume marker. A no-op when
    /// nothing is running.
    pub async fn stop_pattern(&mut self) -> Result<(), SupervisorError> {
        self.stop_current().await;
        if let Err(err) = self.store.clear_last_pattern() {
            warn!(error = %err, "failed to clear last-pattern marker");
        }
        Ok(())
    }

    /// Stop the running pattern without touching persisted state. Used at
    /// daemon shutdown so a restart can resume the saved pattern.
    pub async fn shutdown(&mut self) {
        self.stop_current().await;
    }

    async fn stop_current(&mut self) {
        let Some(running) = self.current.take() else {
            return;
        };
        self.state = SupervisorState::Stopping;
        running.cancel.cancel();

        let mut handle = running.handle;
        match tokio::time::timeout(self.stop_timeout, &mut handle).await {
            Ok(Ok(())) => debug!(pattern = %running.name, "pattern stopped"),
            Ok(Err(err)) if err.is_panic() => {
                warn!(pattern = %running.name, "pattern task panicked");
            }
            Ok(Err(_)) => {}
            Err(_) => {
                // The abandoned task may still write to the strip for a
                // moment after the next pattern starts.
                handle.abort();
                let err = SupervisorError::StopTimeout {
                    name: running.name.clone(),
                    timeout_ms: self.stop_timeout.as_millis().try_into().unwrap_or(u64::MAX),
                };
                error!(error = %err, "pattern ignored cancellation, task abandoned");
            }
        }
        self.state = SupervisorState::Idle;
    }

    /// Run one polling tick over every loaded hook.
    ///
    /// Hooks with neither a link nor a running pattern to alert are skipped.
    /// Check failures are logged per hook and never abort the tick. Pattern
    /// switches requested by links are collected first and applied after the
    /// sweep; a link whose pattern is already running is left alone to avoid
    /// a visible animation reset.
    pub async fn poll_hooks(&mut self) {
        let current_name = self.current.as_ref().map(|c| c.name.clone());
        let mut pending_starts: Vec<String> = Vec::new();
        let mut pending_actions: Vec<HookAction> = Vec::new();

        for hook in self.hooks.iter_mut() {
            let event = hook.event_name().to_string();
            if !self.hook_links.contains_key(&event) && current_name.is_none() {
                continue;
            }
            match hook.check() {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    warn!(hook = %event, error = %err, "hook check failed");
                    continue;
                }
            }
            info!(hook = %event, "hook triggered");

            if let (Some(message), Some(running)) = (hook.get_message(), self.current.as_ref()) {
                running.alerts.send(message);
            }

            if let Some(pattern) = self.hook_links.get(&event) {
                if current_name.as_deref() == Some(pattern.as_str()) {
                    debug!(hook = %event, pattern = %pattern, "linked pattern already running");
                } else {
                    pending_starts.push(pattern.clone());
                }
            } else if let Some(action) = hook.on_trigger() {
                pending_actions.push(action);
            }
        }

        for name in pending_starts {
            if let Err(err) = self.start_pattern(&name).await {
                warn!(pattern = %name, error = %err, "hook-linked start failed");
            }
        }
        for action in pending_actions {
            match action {
                HookAction::StartPattern(name) => {
                    if let Err(err) = self.start_pattern(&name).await {
                        warn!(pattern = %name, error = %err, "hook fallback start failed");
                    }
                }
                HookAction::StopPattern => {
                    if let Err(err) = self.stop_pattern().await {
                        warn!(error = %err, "hook fallback stop failed");
                    }
                }
            }
        }
    }

    /// Rebuild the pattern registry from its factory table and return the
    /// loaded names. A pattern running from the old generation keeps its own
    /// handle on the instance and is left running, orphaned.
    pub fn load_patterns(&mut self) -> Vec<String> {
        self.patterns.reload()
    }

    /// Rebuild the hook registry from its factory table and return the
    /// loaded event names. Threshold state resets with the instances.
    pub fn load_hooks(&mut self) -> Vec<String> {
        self.hooks.reload()
    }

    /// Link a hook trigger to a pattern start, in memory only.
    pub fn link_hook(&mut self, hook_event: &str, pattern_name: &str) -> Result<(), SupervisorError> {
        if !self.hooks.contains(hook_event) {
            return Err(SupervisorError::HookNotFound(hook_event.to_string()));
        }
        if !self.patterns.contains(pattern_name) {
            return Err(SupervisorError::PatternNotFound(pattern_name.to_string()));
        }
        self.hook_links
            .insert(hook_event.to_string(), pattern_name.to_string());
        Ok(())
    }

    /// Remove a runtime hook link.
    pub fn unlink_hook(&mut self, hook_event: &str) -> Result<(), SupervisorError> {
        if !self.hooks.contains(hook_event) {
            return Err(SupervisorError::HookNotFound(hook_event.to_string()));
        }
        if self.hook_links.remove(hook_event).is_none() {
            return Err(SupervisorError::HookNotLinked(hook_event.to_string()));
        }
        Ok(())
    }

    /// Link state for every loaded hook, unlinked hooks included.
    #[must_use]
    pub fn hook_pattern_links(&self) -> BTreeMap<String, Option<String>> {
        self.hooks
            .event_names()
            .into_iter()
            .map(|event| {
                let link = self.hook_links.get(&event).cloned();
                (event, link)
            })
            .collect()
    }

    /// Register a pattern to start at boot, optionally tied to a hook.
    /// In-memory only; persistence goes through the store operations.
    pub fn register_startup_pattern(
        &mut self,
        name: &str,
        linked_hook: Option<&str>,
    ) -> Result<(), SupervisorError> {
        if !self.patterns.contains(name) {
            return Err(SupervisorError::PatternNotFound(name.to_string()));
        }
        if let Some(hook) = linked_hook {
            if !self.hooks.contains(hook) {
                return Err(SupervisorError::HookNotFound(hook.to_string()));
            }
            self.startup_links.insert(hook.to_string(), name.to_string());
            self.hook_links.insert(hook.to_string(), name.to_string());
        } else if !self.startup_patterns.iter().any(|p| p == name) {
            self.startup_patterns.push(name.to_string());
        }
        Ok(())
    }

    /// Drop a startup registration, both standalone and hook-linked forms.
    /// Unknown names are a no-op.
    pub fn unregister_startup_pattern(&mut self, name: &str) {
        self.startup_patterns.retain(|p| p != name);
        let dropped: Vec<String> = self
            .startup_links
            .iter()
            .filter(|(_, pattern)| pattern.as_str() == name)
            .map(|(hook, _)| hook.clone())
            .collect();
        for hook in dropped {
            self.startup_links.remove(&hook);
            self.hook_links.remove(&hook);
        }
    }

    /// Registered standalone startup patterns, in registration order.
    #[must_use]
    pub fn startup_pattern_list(&self) -> &[String] {
        &self.startup_patterns
    }

    /// Registered startup hook links.
    #[must_use]
    pub fn startup_links(&self) -> &BTreeMap<String, String> {
        &self.startup_links
    }

    /// Start every registered standalone startup pattern, best-effort. A
    /// failure is logged and the remaining patterns are still attempted;
    /// when several start, the last one wins the strip.
    pub async fn start_startup_patterns(&mut self) {
        let names = self.startup_patterns.clone();
        for name in names {
            if let Err(err) = self.start_pattern(&name).await {
                warn!(pattern = %name, error = %err, "startup pattern failed to start");
            }
        }
    }

    /// Persist a hook link and apply it in memory. Both sides must exist in
    /// the registries.
    pub fn add_persistent_link(
        &mut self,
        hook_event: &str,
        pattern_name: &str,
    ) -> Result<(), SupervisorError> {
        self.link_hook(hook_event, pattern_name)?;
        self.store.add_link(hook_event, pattern_name)?;
        Ok(())
    }

    /// Remove a persisted hook link and its in-memory counterpart. Removing
    /// an absent link succeeds.
    pub fn remove_persistent_link(&mut self, hook_event: &str) -> Result<(), SupervisorError> {
        self.store.remove_link(hook_event)?;
        self.hook_links.remove(hook_event);
        self.startup_links.remove(hook_event);
        Ok(())
    }

    /// Persisted hook links as stored on disk.
    pub fn persistent_links(&self) -> Result<BTreeMap<String, String>, SupervisorError> {
        Ok(self.store.load()?.linked)
    }

    /// Persist a standalone auto-start pattern. The pattern must exist.
    pub fn add_startup_pattern(&mut self, pattern_name: &str) -> Result<(), SupervisorError> {
        if !self.patterns.contains(pattern_name) {
            return Err(SupervisorError::PatternNotFound(pattern_name.to_string()));
        }
        self.store.add_standalone(pattern_name)?;
        Ok(())
    }

    /// Remove a persisted standalone auto-start pattern.
    pub fn remove_startup_pattern(&mut self, pattern_name: &str) -> Result<(), SupervisorError> {
        self.store.remove_standalone(pattern_name)?;
        Ok(())
    }

    /// Persisted standalone auto-start patterns.
    pub fn persisted_startup_patterns(&self) -> Result<Vec<String>, SupervisorError> {
        Ok(self.store.load()?.standalone.into_iter().collect())
    }

    /// Record a pattern name as the restart resume target. Deliberately not
    /// validated against the registry, matching the historical control
    /// surface.
    pub fn save_pattern(&self, name: &str) -> Result<(), SupervisorError> {
        self.store.save_last_pattern(name)?;
        Ok(())
    }

    /// Forget the restart resume target without stopping anything.
    pub fn clear_saved_pattern(&self) -> Result<(), SupervisorError> {
        self.store.clear_last_pattern()?;
        Ok(())
    }

    /// Arm the built-in test hook so the next polling tick fires it.
    pub fn trigger_test_hook(&mut self) -> Result<(), SupervisorError> {
        let hook = self
            .hooks
            .get_mut(TEST_HOOK_EVENT)
            .ok_or_else(|| SupervisorError::HookNotFound(TEST_HOOK_EVENT.to_string()))?;
        if hook.trigger() {
            Ok(())
        } else {
            Err(SupervisorError::NotTriggerable(TEST_HOOK_EVENT.to_string()))
        }
    }

    /// Apply the persisted startup document: links whose hook and pattern
    /// still exist are restored, standalone patterns are queued for
    /// [`Self::start_startup_patterns`]. Entries referencing unloaded names
    /// are logged and skipped.
    pub fn restore_persisted_state(&mut self) -> Result<(), SupervisorError> {
        let config = self.store.load()?;
        for (hook, pattern) in &config.linked {
            match self.link_hook(hook, pattern) {
                Ok(()) => {
                    self.startup_links.insert(hook.clone(), pattern.clone());
                }
                Err(err) => warn!(hook = %hook, pattern = %pattern, error = %err, "skipping persisted link"),
            }
        }
        for pattern in &config.standalone {
            if !self.patterns.contains(pattern) {
                warn!(pattern = %pattern, "skipping persisted startup pattern, not in registry");
                continue;
            }
            if !self.startup_patterns.iter().any(|p| p == pattern) {
                self.startup_patterns.push(pattern.clone());
            }
        }
        Ok(())
    }

    /// Resume the explicitly saved pattern, if one was recorded and still
    /// exists in the registry. Returns whether a pattern was started.
    pub async fn restore_last_pattern(&mut self) -> Result<bool, SupervisorError> {
        let Some(name) = self.store.load_last_pattern()? else {
            return Ok(false);
        };
        if !self.patterns.contains(&name) {
            warn!(pattern = %name, "saved pattern no longer in registry");
            return Ok(false);
        }
        self.start_pattern(&name).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::alert::AlertReceiver;
    use crate::hooks::TestHook;
    use crate::pattern::Pattern;
    use crate::strip::{shared_strip, MemoryStrip};

    struct Recorder {
        name: String,
        cleanups: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Pattern for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "records cleanup calls"
        }

        async fn run(
            &self,
            _strip: SharedStrip,
            cancel: CancellationToken,
            _alerts: AlertReceiver,
        ) {
            cancel.cancelled().await;
        }

        async fn cleanup(&self, _strip: SharedStrip) -> std::io::Result<()> {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Stubborn;

    #[async_trait]
    impl Pattern for Stubborn {
        fn name(&self) -> &str {
            "Stubborn"
        }

        fn description(&self) -> &str {
            "ignores cancellation"
        }

        async fn run(
            &self,
            _strip: SharedStrip,
            _cancel: CancellationToken,
            _alerts: AlertReceiver,
        ) {
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }
    }

    fn supervisor_with(
        patterns: Vec<Arc<dyn Pattern>>,
        state_dir: &std::path::Path,
    ) -> PatternSupervisor {
        let mut registry = PatternRegistry::empty();
        for pattern in patterns {
            registry.insert(pattern);
        }
        let mut hooks = HookRegistry::empty();
        hooks.insert(Box::new(TestHook::default()));
        PatternSupervisor::new(
            shared_strip(MemoryStrip::new(8)),
            registry,
            hooks,
            PersistenceStore::new(state_dir),
        )
    }

    #[tokio::test]
    async fn starting_b_stops_a_and_cleans_it_up_once() {
        let dir = tempdir().unwrap();
        let cleanups_a = Arc::new(AtomicUsize::new(0));
        let cleanups_b = Arc::new(AtomicUsize::new(0));
        let mut supervisor = supervisor_with(
            vec![
                Arc::new(Recorder {
                    name: "A".into(),
                    cleanups: cleanups_a.clone(),
                }),
                Arc::new(Recorder {
                    name: "B".into(),
                    cleanups: cleanups_b.clone(),
                }),
            ],
            dir.path(),
        );

        supervisor.start_pattern("A").await.unwrap();
        supervisor.start_pattern("B").await.unwrap();

        assert_eq!(supervisor.current_pattern(), Some("B"));
        assert_eq!(cleanups_a.load(Ordering::SeqCst), 1);
        assert_eq!(cleanups_b.load(Ordering::SeqCst), 0);

        supervisor.stop_pattern().await.unwrap();
        assert_eq!(cleanups_b.load(Ordering::SeqCst), 1);
        assert_eq!(supervisor.current_pattern(), None);
        assert_eq!(supervisor.state(), SupervisorState::Idle);
    }

    #[tokio::test]
    async fn stop_on_an_idle_supervisor_is_a_no_op() {
        let dir = tempdir().unwrap();
        let mut supervisor = supervisor_with(vec![], dir.path());

        supervisor.stop_pattern().await.unwrap();
        supervisor.stop_pattern().await.unwrap();
        assert_eq!(supervisor.current_pattern(), None);
    }

    #[tokio::test]
    async fn unknown_pattern_start_reports_not_found() {
        let dir = tempdir().unwrap();
        let mut supervisor = supervisor_with(vec![], dir.path());

        let err = supervisor.start_pattern("Ghost").await.unwrap_err();
        assert!(matches!(err, SupervisorError::PatternNotFound(name) if name == "Ghost"));
    }

    #[tokio::test]
    async fn stubborn_pattern_is_abandoned_after_the_timeout() {
        let dir = tempdir().unwrap();
        let mut supervisor = supervisor_with(vec![Arc::new(Stubborn)], dir.path())
            .with_stop_timeout(Duration::from_millis(50));

        supervisor.start_pattern("Stubborn").await.unwrap();
        supervisor.stop_pattern().await.unwrap();
        assert_eq!(supervisor.current_pattern(), None);
    }

    #[tokio::test]
    async fn triggered_test_hook_starts_its_linked_pattern() {
        let dir = tempdir().unwrap();
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut supervisor = supervisor_with(
            vec![Arc::new(Recorder {
                name: "Linked".into(),
                cleanups,
            })],
            dir.path(),
        );

        supervisor.link_hook(TEST_HOOK_EVENT, "Linked").unwrap();
        supervisor.trigger_test_hook().unwrap();
        supervisor.poll_hooks().await;

        assert_eq!(supervisor.current_pattern(), Some("Linked"));

        // Re-triggering while the linked pattern runs must not restart it.
        supervisor.trigger_test_hook().unwrap();
        supervisor.poll_hooks().await;
        assert_eq!(supervisor.current_pattern(), Some("Linked"));
    }

    #[tokio::test]
    async fn link_validation_checks_both_sides() {
        let dir = tempdir().unwrap();
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut supervisor = supervisor_with(
            vec![Arc::new(Recorder {
                name: "Real".into(),
                cleanups,
            })],
            dir.path(),
        );

        assert!(matches!(
            supervisor.link_hook("no_such_hook", "Real"),
            Err(SupervisorError::HookNotFound(_))
        ));
        assert!(matches!(
            supervisor.link_hook(TEST_HOOK_EVENT, "Ghost"),
            Err(SupervisorError::PatternNotFound(name)) if name == "Ghost"
        ));
        assert!(matches!(
            supervisor.unlink_hook(TEST_HOOK_EVENT),
            Err(SupervisorError::HookNotLinked(_))
        ));
    }

    #[tokio::test]
    async fn persistent_links_survive_a_simulated_restart() {
        let dir = tempdir().unwrap();
        let cleanups = Arc::new(AtomicUsize::new(0));
        {
            let mut supervisor = supervisor_with(
                vec![Arc::new(Recorder {
                    name: "P1".into(),
                    cleanups: cleanups.clone(),
                })],
                dir.path(),
            );
            supervisor
                .add_persistent_link(TEST_HOOK_EVENT, "P1")
                .unwrap();
        }

        let mut restarted = supervisor_with(
            vec![Arc::new(Recorder {
                name: "P1".into(),
                cleanups,
            })],
            dir.path(),
        );
        restarted.restore_persisted_state().unwrap();

        let links = restarted.persistent_links().unwrap();
        assert_eq!(links.get(TEST_HOOK_EVENT).map(String::as_str), Some("P1"));
        assert_eq!(
            restarted.hook_pattern_links()[TEST_HOOK_EVENT].as_deref(),
            Some("P1")
        );
    }

    #[tokio::test]
    async fn saved_pattern_is_restored_when_still_registered() {
        let dir = tempdir().unwrap();
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut supervisor = supervisor_with(
            vec![Arc::new(Recorder {
                name: "Resume".into(),
                cleanups,
            })],
            dir.path(),
        );

        supervisor.save_pattern("Resume").unwrap();
        assert!(supervisor.restore_last_pattern().await.unwrap());
        assert_eq!(supervisor.current_pattern(), Some("Resume"));

        supervisor.stop_pattern().await.unwrap();
        // stop_pattern cleared the marker.
        assert!(!supervisor.restore_last_pattern().await.unwrap());
    }

    #[tokio::test]
    async fn startup_registrations_are_in_memory_and_best_effort() {
        let dir = tempdir().unwrap();
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut supervisor = supervisor_with(
            vec![Arc::new(Recorder {
                name: "Boot".into(),
                cleanups,
            })],
            dir.path(),
        );

        supervisor.register_startup_pattern("Boot", None).unwrap();
        assert!(matches!(
            supervisor.register_startup_pattern("Ghost", None),
            Err(SupervisorError::PatternNotFound(_))
        ));
        assert_eq!(supervisor.startup_pattern_list(), ["Boot".to_string()]);

        supervisor.start_startup_patterns().await;
        assert_eq!(supervisor.current_pattern(), Some("Boot"));

        supervisor.unregister_startup_pattern("Boot");
        assert!(supervisor.startup_pattern_list().is_empty());
    }
}
