//! Built-in Patterns
//!
//! The stock animation set. Each pattern is an independent type satisfying
//! the [`Pattern`](crate::pattern::Pattern) contract; the factory table in
//! [`crate::pattern::builtin_patterns`] registers them by display name.

mod knight_rider;
mod loading_bar;
mod random_blink;
mod smooth_fade;

pub use knight_rider::KnightRider;
pub use loading_bar::LoadingBar;
pub use random_blink::RandomBlink;
pub use smooth_fade::SmoothFade;
