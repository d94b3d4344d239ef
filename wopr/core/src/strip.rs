//! LED Strip Boundary
//!
//! The strip driver is an external collaborator: a dumb device that accepts a
//! pixel buffer and pushes it to hardware. Everything the supervisor needs
//! from it is captured by the [`LedStrip`] trait; the rest of the crate never
//! sees a concrete driver type.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// An RGB color, one byte per channel.
///
/// Serializes as a `[r, g, b]` triple, which is also the wire shape used in
/// alert messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// All channels off.
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// Full red.
    pub const RED: Rgb = Rgb(255, 0, 0);
    /// Full green.
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    /// Orange, used for warning alerts.
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    /// All channels on.
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Contract for an addressable LED strip driver.
///
/// Mutating calls update an in-memory pixel buffer; [`LedStrip::render`]
/// pushes the buffer to hardware. Exactly one pattern task writes to the
/// strip at a time; the supervisor enforces that, not the driver.
pub trait LedStrip: Send {
    /// Number of addressable LEDs on the strip.
    fn num_leds(&self) -> usize;

    /// Set a single pixel. Out-of-range indices are ignored.
    fn set_led(&mut self, index: usize, color: Rgb);

    /// Set every pixel to the same color.
    fn fill(&mut self, color: Rgb);

    /// Turn every pixel off.
    fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Push the pixel buffer to the hardware.
    fn render(&mut self) -> io::Result<()>;
}

/// Shared handle to the strip, passed into pattern tasks.
pub type SharedStrip = Arc<Mutex<dyn LedStrip>>;

/// Wrap a concrete driver in a [`SharedStrip`] handle.
pub fn shared_strip(strip: impl LedStrip + 'static) -> SharedStrip {
    Arc::new(Mutex::new(strip))
}

/// In-memory strip with no hardware behind it.
///
/// Used by the daemon when no hardware backend is configured, and by every
/// test that needs to observe what a pattern drew.
#[derive(Debug)]
pub struct MemoryStrip {
    pixels: Vec<Rgb>,
    frames: u64,
}

impl MemoryStrip {
    /// Create a strip with `num_leds` pixels, all off.
    #[must_use]
    pub fn new(num_leds: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; num_leds],
            frames: 0,
        }
    }

    /// Current pixel buffer contents.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Number of frames pushed via [`LedStrip::render`].
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether every pixel is currently off.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|p| *p == Rgb::BLACK)
    }
}

impl LedStrip for MemoryStrip {
    fn num_leds(&self) -> usize {
        self.pixels.len()
    }

    fn set_led(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn render(&mut self) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
