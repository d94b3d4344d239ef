//! Smooth cosine fade across the whole strip.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::alert::AlertReceiver;
use crate::pattern::{sleep_or_cancel, Pattern};
use crate::strip::{Rgb, SharedStrip};

/// Cosine-driven white fade.
pub struct SmoothFade {
    frame_delay: Duration,
}

impl Default for SmoothFade {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(10),
        }
    }
}

#[async_trait]
impl Pattern for SmoothFade {
    fn name(&self) -> &str {
        "Smooth Fade"
    }

    fn description(&self) -> &str {
        "Smooth fade animation based on cosine"
    }

    async fn run(&self, strip: SharedStrip, cancel: CancellationToken, _alerts: AlertReceiver) {
        let start = Instant::now();

        loop {
            let t = start.elapsed().as_secs_f64();
            {
                let mut strip = strip.lock();
                for index in 0..strip.num_leds() {
                    let phase = (index as f64).mul_add(0.01, t);
                    let intensity = (phase.cos().mul_add(0.5, 0.5) * 255.0) as u8;
                    strip.set_led(index, Rgb(intensity, intensity, intensity));
                }
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
