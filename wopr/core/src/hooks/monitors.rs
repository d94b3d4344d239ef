//! Built-in system metric monitors.
//!
//! Each monitor wraps a [`Probe`] closure around a [`LevelTracker`], so the
//! sampling side (sysinfo, `vcgencmd`) stays separate from the threshold
//! logic and tests can inject synthetic readings.

use std::process::Command;
use std::sync::Arc;

use parking_lot::Mutex;
use sysinfo::{Components, Disks, System};
use tracing::warn;

use super::level::LevelTracker;
use super::{Hook, HookError};
use crate::alert::AlertMessage;

/// Samples one numeric reading, `None` when the source is unavailable.
pub type Probe = Box<dyn Fn() -> Option<f64> + Send>;

/// A hook that classifies a probed value against thresholds and triggers on
/// level transitions only.
pub struct MonitorHook {
    event_name: String,
    metadata_key: &'static str,
    tracker: LevelTracker,
    probe: Probe,
}

impl MonitorHook {
    /// Build a monitor from its parts.
    #[must_use]
    pub fn new(
        event_name: impl Into<String>,
        metadata_key: &'static str,
        tracker: LevelTracker,
        probe: Probe,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            metadata_key,
            tracker,
            probe,
        }
    }
}

impl Hook for MonitorHook {
    fn event_name(&self) -> &str {
        &self.event_name
    }

    fn check(&mut self) -> Result<bool, HookError> {
        let value = (self.probe)()
            .ok_or_else(|| HookError::ProbeUnavailable(self.event_name.clone()))?;
        Ok(self.tracker.observe(value))
    }

    fn get_message(&self) -> Option<AlertMessage> {
        // Also emitted on recovery so a running pattern can drop back to
        // its normal color.
        Some(
            AlertMessage::for_level(&self.event_name, self.tracker.level())
                .with_metadata(self.metadata_key, self.tracker.value()),
        )
    }
}

/// CPU load monitor triggering at a single percentage threshold.
#[must_use]
pub fn cpu_load_hook(event_name: &str, threshold: f64) -> MonitorHook {
    let system = Arc::new(Mutex::new(System::new()));
    let probe: Probe = Box::new(move || {
        let mut sys = system.lock();
        sys.refresh_cpu_usage();
        Some(f64::from(sys.global_cpu_usage()))
    });
    MonitorHook::new(
        event_name,
        "cpu_percent",
        LevelTracker::rising(threshold, threshold),
        probe,
    )
}

/// CPU temperature monitor, warning at 65°C and critical at 80°C.
#[must_use]
pub fn cpu_temp_monitor() -> MonitorHook {
    let probe: Probe = Box::new(|| {
        let components = Components::new_with_refreshed_list();
        components
            .iter()
            .filter(|c| {
                let label = c.label().to_ascii_lowercase();
                label.contains("cpu") || label.contains("coretemp") || label.contains("soc")
            })
            // Sensors without a current reading are skipped, not errors.
            .filter_map(|c| c.temperature().map(f64::from))
            .fold(None, |max: Option<f64>, t| {
                Some(max.map_or(t, |m| m.max(t)))
            })
    });
    MonitorHook::new(
        "cpu_temp_monitor",
        "temp_celsius",
        LevelTracker::rising(65.0, 80.0),
        probe,
    )
}

/// Memory usage monitor, warning at 70% and critical at 90% used.
#[must_use]
pub fn memory_monitor() -> MonitorHook {
    let system = Arc::new(Mutex::new(System::new()));
    let probe: Probe = Box::new(move || {
        let mut sys = system.lock();
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(sys.used_memory() as f64 / total as f64 * 100.0)
    });
    MonitorHook::new(
        "memory_monitor",
        "memory_percent",
        LevelTracker::rising(70.0, 90.0),
        probe,
    )
}

/// Root filesystem free-space monitor. Falling thresholds: warning at 15%
/// free, critical at 10%.
#[must_use]
pub fn disk_space_monitor() -> MonitorHook {
    let probe: Probe = Box::new(|| {
        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))?;
        let total = root.total_space();
        if total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(root.available_space() as f64 / total as f64 * 100.0)
    });
    MonitorHook::new(
        "disk_space_monitor",
        "free_percent",
        LevelTracker::falling(15.0, 10.0),
        probe,
    )
}

/// Raspberry Pi under-voltage monitor backed by `vcgencmd get_throttled`.
///
/// Reads 2.0 while under-voltage is active, 1.0 when it has occurred since
/// boot, 0.0 otherwise. On non-Pi hardware the command is missing and the
/// probe settles on a harmless 0.0.
#[must_use]
pub fn under_voltage_monitor() -> MonitorHook {
    const UNDER_VOLTAGE_NOW: u32 = 0x1;
    const UNDER_VOLTAGE_OCCURRED: u32 = 0x10000;

    let probe: Probe = Box::new(|| {
        let output = match Command::new("vcgencmd").arg("get_throttled").output() {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                warn!(status = %output.status, "vcgencmd get_throttled failed");
                return Some(0.0);
            }
            Err(_) => return Some(0.0),
        };
        let text = String::from_utf8_lossy(&output.stdout);
        let bits = text
            .trim()
            .strip_prefix("throttled=0x")
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())?;
        if bits & UNDER_VOLTAGE_NOW != 0 {
            Some(2.0)
        } else if bits & UNDER_VOLTAGE_OCCURRED != 0 {
            Some(1.0)
        } else {
            Some(0.0)
        }
    });
    MonitorHook::new(
        "voltage_monitor",
        "throttle_state",
        LevelTracker::rising(1.0, 2.0),
        probe,
    )
}
