//! Hook Alert Pipeline
//!
//! Hooks notify the running pattern through typed [`AlertMessage`]s on a
//! bounded channel. The channel is created fresh at every pattern start and
//! dropped at stop. Producers never block: on overflow the newest message
//! is dropped and logged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use crate::strip::Rgb;

/// Default capacity for the per-pattern alert channel.
pub const DEFAULT_ALERT_CAPACITY: usize = 32;

/// Severity level carried by an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    /// Condition is back in its normal range.
    Normal,
    /// Condition crossed the warning threshold.
    Warning,
    /// Condition crossed the critical threshold.
    Critical,
}

impl AlertLevel {
    /// Default display color for this level.
    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            Self::Normal => Rgb::GREEN,
            Self::Warning => Rgb::ORANGE,
            Self::Critical => Rgb::RED,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Immutable notification sent from a hook to the running pattern.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlertMessage {
    /// Event name of the hook that produced this alert.
    pub hook_name: String,
    /// Severity of the alert.
    pub level: AlertLevel,
    /// Color the pattern should adopt for this alert.
    pub color: Rgb,
    /// Scalar context, e.g. `{"cpu_percent": 75.0}`.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AlertMessage {
    /// Build a message for `level` with the level's default color.
    pub fn for_level(hook_name: impl Into<String>, level: AlertLevel) -> Self {
        Self {
            hook_name: hook_name.into(),
            level,
            color: level.color(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata scalar.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Producer half of an alert channel. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AlertSender {
    tx: mpsc::Sender<AlertMessage>,
}

/// Consumer half of an alert channel; owned by the running pattern task.
pub type AlertReceiver = mpsc::Receiver<AlertMessage>;

/// Allocate a fresh bounded alert channel.
#[must_use]
pub fn alert_channel(capacity: usize) -> (AlertSender, AlertReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (AlertSender { tx }, rx)
}

impl AlertSender {
    /// Enqueue a message without blocking.
    ///
    /// A full or closed channel drops the message with a warning; the
    /// producer never observes an error.
    pub fn send(&self, message: AlertMessage) {
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(hook = %dropped.hook_name, "alert channel full, dropping message");
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                warn!(hook = %dropped.hook_name, "alert channel closed, dropping message");
            }
        }
    }
}
