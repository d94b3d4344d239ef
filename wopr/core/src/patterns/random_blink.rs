//! Random blink: random subsets of LEDs flash in random colors.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::alert::AlertReceiver;
use crate::pattern::{sleep_or_cancel, Pattern};
use crate::strip::{Rgb, SharedStrip};

/// Randomly blinks LEDs with random colors.
pub struct RandomBlink {
    on_delay: Duration,
    off_delay: Duration,
}

impl Default for RandomBlink {
    fn default() -> Self {
        Self {
            on_delay: Duration::from_millis(200),
            off_delay: Duration::from_millis(100),
        }
    }
}

#[async_trait]
impl Pattern for RandomBlink {
    fn name(&self) -> &str {
        "Random Blink"
    }

    fn description(&self) -> &str {
        "Randomly blinks LEDs with random colors"
    }

    async fn run(&self, strip: SharedStrip, cancel: CancellationToken, _alerts: AlertReceiver) {
        let num_leds = strip.lock().num_leds();
        if num_leds == 0 {
            return;
        }

        loop {
            // ThreadRng is not Send; keep all randomness inside one block
            // so it never lives across an await point.
            let lit: Vec<usize> = {
                let mut rng = rand::thread_rng();
                let count = rng.gen_range(1..=std::cmp::max(1, num_leds / 3));
                rand::seq::index::sample(&mut rng, num_leds, count).into_vec()
            };

            {
                let mut rng = rand::thread_rng();
                let mut strip = strip.lock();
                for &index in &lit {
                    let color = Rgb(rng.gen(), rng.gen(), rng.gen());
                    strip.set_led(index, color);
                }
                if let Err(e) = strip.render() {
                    warn!(error = %e, "strip render failed");
                }
            }
            if !sleep_or_cancel(&cancel, self.on_delay).await {
                return;
            }

            {
                let mut strip = strip.lock();
                for &index in &lit {
                    strip.set_led(index, Rgb::BLACK);
                }
                if let Err(e) = strip.render() {
                    warn!(error = %e, "strip render failed");
                }
            }
            if !sleep_or_cancel(&cancel, self.off_delay).await {
                return;
            }
        }
    }
}
