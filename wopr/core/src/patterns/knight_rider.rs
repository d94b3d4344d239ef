//! Knight Rider / Cylon effect: a single lit LED sweeping back and forth.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::alert::AlertReceiver;
use crate::pattern::{sleep_or_cancel, Pattern};
use crate::strip::{Rgb, SharedStrip};

/// The scanning-eye sweep.
pub struct KnightRider {
    color: Rgb,
    frame_delay: Duration,
}

impl Default for KnightRider {
    fn default() -> Self {
        Self {
            color: Rgb::RED,
            frame_delay: Duration::from_millis(50),
        }
    }
}

impl KnightRider {
    fn draw(&self, strip: &SharedStrip, index: usize) {
        let mut strip = strip.lock();
        strip.fill(Rgb::BLACK);
        strip.set_led(index, self.color);
        if let Err(e) = strip.render() {
            warn!(error = %e, "strip render failed");
        }
    }
}

#[async_trait]
impl Pattern for KnightRider {
    fn name(&self) -> &str {
        "Knight Rider"
    }

    fn description(&self) -> &str {
        "A scanning LED that sweeps back and forth"
    }

    async fn run(&self, strip: SharedStrip, cancel: CancellationToken, _alerts: AlertReceiver) {
        let num_leds = strip.lock().num_leds();
        if num_leds == 0 {
            return;
        }

        loop {
            for index in 0..num_leds {
                self.draw(&strip, index);
                if !sleep_or_cancel(&cancel, self.frame_delay).await {
                    return;
                }
            }
            for index in (0..num_leds).rev() {
                self.draw(&strip, index);
                if !sleep_or_cancel(&cancel, self.frame_delay).await {
                    return;
                }
            }
        }
    }
}
