//! Loading bar: fills the strip LED by LED, then empties it again.
//!
//! This is the alert-aware pattern: it drains the alert channel at every
//! frame and recolors itself with whatever color the latest alert carried.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::alert::AlertReceiver;
use crate::pattern::{sleep_or_cancel, Pattern};
use crate::strip::{Rgb, SharedStrip};

/// Fill-then-drain bar that recolors on alerts.
pub struct LoadingBar {
    frame_delay: Duration,
}

impl Default for LoadingBar {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(150),
        }
    }
}

fn drain_alerts(alerts: &mut AlertReceiver, color: &mut Rgb) {
    while let Ok(message) = alerts.try_recv() {
        *color = message.color;
        info!(hook = %message.hook_name, level = %message.level, "loading bar recolored by alert");
    }
}

#[async_trait]
impl Pattern for LoadingBar {
    fn name(&self) -> &str {
        "Loading Bar"
    }

    fn description(&self) -> &str {
        "Loading bar effect that adopts alert colors"
    }

    async fn run(&self, strip: SharedStrip, cancel: CancellationToken, mut alerts: AlertReceiver) {
        let num_leds = strip.lock().num_leds();
        if num_leds == 0 {
            return;
        }
        let mut color = Rgb::GREEN;

        loop {
            for index in 0..num_leds {
                drain_alerts(&mut alerts, &mut color);
                {
                    let mut strip = strip.lock();
                    strip.set_led(index, color);
                    if let Err(e) = strip.render() {
                        warn!(error = %e, "strip render failed");
                    }
                }
                if !sleep_or_cancel(&cancel, self.frame_delay).await {
                    return;
                }
            }
            for index in (0..num_leds).rev() {
                drain_alerts(&mut alerts, &mut color);
                {
                    let mut strip = strip.lock();
                    strip.set_led(index, Rgb::BLACK);
                    if let Err(e) = strip.render() {
                        warn!(error = %e, "strip render failed");
                    }
                }
                if !sleep_or_cancel(&cancel, self.frame_delay).await {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{alert_channel, AlertLevel, AlertMessage};
    use crate::strip::MemoryStrip;

    #[test]
    fn drain_keeps_the_latest_alert_color() {
        let (tx, mut rx) = alert_channel(8);
        tx.send(AlertMessage::for_level("h", AlertLevel::Warning));
        tx.send(AlertMessage::for_level("h", AlertLevel::Critical));

        let mut color = Rgb::GREEN;
        drain_alerts(&mut rx, &mut color);
        assert_eq!(color, AlertLevel::Critical.color());
    }

    #[tokio::test]
    async fn zero_led_strip_returns_instead_of_spinning() {
        let strip = crate::strip::shared_strip(MemoryStrip::new(0));
        let (_tx, rx) = alert_channel(4);
        let cancel = CancellationToken::new();

        let handle =
            tokio::spawn(async move { LoadingBar::default().run(strip, cancel, rx).await });

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("run returned on an empty strip")
            .unwrap();
    }
}
