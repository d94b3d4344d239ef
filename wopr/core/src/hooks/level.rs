//! Two-threshold edge detection shared by the monitor hooks.

use crate::alert::AlertLevel;

/// Tracks a sampled value against warning and critical thresholds and
/// reports only level *transitions*.
///
/// Rising trackers (CPU load, temperature) treat higher readings as worse;
/// falling trackers (free disk space) treat lower readings as worse.
#[derive(Debug)]
pub struct LevelTracker {
    warn: f64,
    crit: f64,
    rising: bool,
    last_level: Option<AlertLevel>,
    last_value: f64,
}

impl LevelTracker {
    /// Tracker where readings at or above the thresholds escalate.
    #[must_use]
    pub fn rising(warn: f64, crit: f64) -> Self {
        Self {
            warn,
            crit,
            rising: true,
            last_level: None,
            last_value: 0.0,
        }
    }

    /// Tracker where readings at or below the thresholds escalate.
    #[must_use]
    pub fn falling(warn: f64, crit: f64) -> Self {
        Self {
            warn,
            crit,
            rising: false,
            last_level: None,
            last_value: 0.0,
        }
    }

    fn classify(&self, value: f64) -> AlertLevel {
        if self.rising {
            if value >= self.crit {
                AlertLevel::Critical
            } else if value >= self.warn {
                AlertLevel::Warning
            } else {
                AlertLevel::Normal
            }
        } else if value <= self.crit {
            AlertLevel::Critical
        } else if value <= self.warn {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        }
    }

    /// Record a reading. Returns `true` only when the derived level differs
    /// from the previous observation, including recovery back to normal.
    pub fn observe(&mut self, value: f64) -> bool {
        let level = self.classify(value);
        self.last_value = value;
        let changed = self.last_level != Some(level);
        self.last_level = Some(level);
        changed
    }

    /// Level of the most recent observation.
    #[must_use]
    pub fn level(&self) -> AlertLevel {
        self.last_level.unwrap_or(AlertLevel::Normal)
    }

    /// Value of the most recent observation.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.last_value
    }
}
