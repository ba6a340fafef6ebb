//! Low-level DSP used by the supervisor.
//!
//! Everything here is allocation-free once constructed and safe to call
//! from the audio callback. The looper and filter are the crate's own
//! implementations of the engine contracts in [`crate::engine`].

/// Knob/jack combination and range curves.
pub mod curve;
/// Resonant state-variable low-pass (the default tone shaper).
pub mod filter;
/// Record/overdub loop buffer (the default transport).
pub mod looper;
/// Complementary dry/loop gains.
pub mod mix;
/// Sine phase accumulator.
pub mod oscillator;

pub use curve::{combine, map, Curve};
pub use filter::SVFilter;
pub use looper::{Looper, LooperState};
pub use mix::Crossfade;
