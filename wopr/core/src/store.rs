//! On-disk persistence for hook links, standalone startup patterns, and the
//! last running pattern.
//!
//! Two files live under the state directory: `startup.json` holds the
//! structured startup document, `last_pattern` holds a single pattern name
//! so a restart can resume where the daemon left off.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const STARTUP_FILE: &str = "startup.json";
const LAST_PATTERN_FILE: &str = "last_pattern";

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("state file {path}: {source}")]
    Io {
        /// File the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The startup document is not valid JSON of either shape.
    #[error("malformed startup document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The hook already has a standalone entry, which is exclusive with a link.
    #[error("hook '{0}' conflicts with an existing standalone entry")]
    AlreadyStandalone(String),

    /// The pattern is already linked to a hook.
    #[error("pattern '{0}' is already linked to hook '{1}'")]
    AlreadyLinked(String, String),
}

/// Persisted startup document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Hook event name to pattern name.
    #[serde(default)]
    pub linked: BTreeMap<String, String>,
    /// Patterns started at boot with no hook attached.
    #[serde(default)]
    pub standalone: BTreeSet<String>,
}

impl StartupConfig {
    /// Parse a startup document, upgrading the legacy flat-map layout where
    /// the whole object was hook-to-pattern links.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if let Some(object) = value.as_object() {
            if !object.contains_key("linked") && !object.contains_key("standalone") {
                let linked: BTreeMap<String, String> =
                    serde_json::from_value(value.clone())?;
                debug!(links = linked.len(), "upgraded legacy startup document");
                return Ok(Self {
                    linked,
                    standalone: BTreeSet::new(),
                });
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// File-backed store rooted at a state directory.
#[derive(Debug)]
pub struct PersistenceStore {
    state_dir: PathBuf,
}

impl PersistenceStore {
    /// Store rooted at `state_dir`; the directory is created on first write.
    #[must_use]
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    fn startup_path(&self) -> PathBuf {
        self.state_dir.join(STARTUP_FILE)
    }

    fn last_pattern_path(&self) -> PathBuf {
        self.state_dir.join(LAST_PATTERN_FILE)
    }

    fn io_err(path: PathBuf) -> impl FnOnce(std::io::Error) -> StoreError {
        move |source| StoreError::Io { path, source }
    }

    /// Load the startup document; a missing file yields the empty default.
    pub fn load(&self) -> Result<StartupConfig, StoreError> {
        let path = self.startup_path();
        match fs::read_to_string(&path) {
            Ok(text) => StartupConfig::from_json(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(StartupConfig::default()),
            Err(err) => Err(StoreError::Io { path, source: err }),
        }
    }

    /// Write the startup document, creating the state directory as needed.
    pub fn save(&self, config: &StartupConfig) -> Result<(), StoreError> {
        fs::create_dir_all(&self.state_dir)
            .map_err(Self::io_err(self.state_dir.clone()))?;
        let path = self.startup_path();
        let text = serde_json::to_string_pretty(config)?;
        fs::write(&path, text).map_err(Self::io_err(path.clone()))?;
        debug!(path = %path.display(), "saved startup document");
        Ok(())
    }

    /// Persist a hook-to-pattern link. Fails if the hook already has a
    /// standalone entry for the same pattern slot.
    pub fn add_link(&self, hook_event: &str, pattern_name: &str) -> Result<(), StoreError> {
        let mut config = self.load()?;
        if config.standalone.contains(pattern_name) {
            return Err(StoreError::AlreadyStandalone(pattern_name.to_string()));
        }
        config
            .linked
            .insert(hook_event.to_string(), pattern_name.to_string());
        self.save(&config)?;
        info!(hook = hook_event, pattern = pattern_name, "persisted hook link");
        Ok(())
    }

    /// Remove a persisted link. Removing an absent link is a no-op.
    pub fn remove_link(&self, hook_event: &str) -> Result<(), StoreError> {
        let mut config = self.load()?;
        if config.linked.remove(hook_event).is_some() {
            self.save(&config)?;
            info!(hook = hook_event, "removed persisted hook link");
        }
        Ok(())
    }

    /// Persist a standalone startup pattern. Fails if the pattern is already
    /// the target of a link.
    pub fn add_standalone(&self, pattern_name: &str) -> Result<(), StoreError> {
        let mut config = self.load()?;
        if let Some((hook, _)) = config
            .linked
            .iter()
            .find(|(_, pattern)| pattern.as_str() == pattern_name)
        {
            return Err(StoreError::AlreadyLinked(
                pattern_name.to_string(),
                hook.clone(),
            ));
        }
        if config.standalone.insert(pattern_name.to_string()) {
            self.save(&config)?;
            info!(pattern = pattern_name, "persisted standalone startup pattern");
        }
        Ok(())
    }

    /// Remove a standalone startup pattern. Absent entries are a no-op.
    pub fn remove_standalone(&self, pattern_name: &str) -> Result<(), StoreError> {
        let mut config = self.load()?;
        if config.standalone.remove(pattern_name) {
            self.save(&config)?;
            info!(pattern = pattern_name, "removed standalone startup pattern");
        }
        Ok(())
    }

    /// Record the currently running pattern for restart resume.
    pub fn save_last_pattern(&self, pattern_name: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.state_dir)
            .map_err(Self::io_err(self.state_dir.clone()))?;
        let path = self.last_pattern_path();
        fs::write(&path, pattern_name).map_err(Self::io_err(path))
    }

    /// Forget the resume marker, e.g. after an explicit stop.
    pub fn clear_last_pattern(&self) -> Result<(), StoreError> {
        let path = self.last_pattern_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io { path, source: err }),
        }
    }

    /// Pattern to resume after restart, if any was recorded.
    pub fn load_last_pattern(&self) -> Result<Option<String>, StoreError> {
        let path = self.last_pattern_path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let name = text.trim();
                Ok(if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io { path, source: err }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_files_read_as_empty_state() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::new(dir.path());

        assert_eq!(store.load().unwrap(), StartupConfig::default());
        assert_eq!(store.load_last_pattern().unwrap(), None);
    }

    #[test]
    fn links_and_standalone_entries_survive_a_reload() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::new(dir.path());

        store.add_link("cpu_over_50", "Knight Rider").unwrap();
        store.add_standalone("Loading Bar").unwrap();

        let reloaded = PersistenceStore::new(dir.path()).load().unwrap();
        assert_eq!(
            reloaded.linked.get("cpu_over_50").map(String::as_str),
            Some("Knight Rider")
        );
        assert!(reloaded.standalone.contains("Loading Bar"));
    }

    #[test]
    fn legacy_flat_map_documents_are_upgraded() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join(STARTUP_FILE), r#"{"h1": "P1"}"#).unwrap();

        let store = PersistenceStore::new(dir.path());
        let config = store.load().unwrap();
        assert_eq!(config.linked.get("h1").map(String::as_str), Some("P1"));
        assert!(config.standalone.is_empty());

        // Saving writes the structured layout back out.
        store.save(&config).unwrap();
        let text = fs::read_to_string(dir.path().join(STARTUP_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["linked"]["h1"], "P1");
        assert_eq!(value["standalone"], serde_json::json!([]));
    }

    #[test]
    fn linked_and_standalone_are_mutually_exclusive() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::new(dir.path());

        store.add_standalone("Smooth Fade").unwrap();
        assert!(matches!(
            store.add_link("memory_monitor", "Smooth Fade"),
            Err(StoreError::AlreadyStandalone(name)) if name == "Smooth Fade"
        ));

        store.add_link("memory_monitor", "Random Blink").unwrap();
        assert!(matches!(
            store.add_standalone("Random Blink"),
            Err(StoreError::AlreadyLinked(pattern, hook))
                if pattern == "Random Blink" && hook == "memory_monitor"
        ));
    }

    #[test]
    fn removals_are_idempotent() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::new(dir.path());

        store.remove_link("never_linked").unwrap();
        store.remove_standalone("never_added").unwrap();

        store.add_link("h", "P").unwrap();
        store.remove_link("h").unwrap();
        store.remove_link("h").unwrap();
        assert!(store.load().unwrap().linked.is_empty());
    }

    #[test]
    fn last_pattern_round_trips_and_clears() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::new(dir.path());

        store.save_last_pattern("Knight Rider").unwrap();
        assert_eq!(
            store.load_last_pattern().unwrap().as_deref(),
            Some("Knight Rider")
        );

        store.clear_last_pattern().unwrap();
        store.clear_last_pattern().unwrap();
        assert_eq!(store.load_last_pattern().unwrap(), None);
    }
}
