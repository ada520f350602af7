//! Playback controller -- transport state and the single outstanding wait.
//!
//! Split into focused submodules:
//! - `core`: controller struct, constructor, and read accessors
//! - `transport`: play / pause / reset / stop / speed changes
//! - `delay`: the cancellable, pausable scoped delay handed to steppers

mod core;
mod delay;
mod transport;

pub use self::core::PlaybackController;
pub use self::delay::DelayScope;
