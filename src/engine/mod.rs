//! Contracts the supervisor needs from its engines.
//!
//! The looping buffer and the resonant filter are collaborators: the
//! supervisor only ever drives them through these traits. The crate's own
//! implementations live in [`crate::dsp::looper`] and [`crate::dsp::filter`];
//! tests substitute recording mocks.

pub mod tone;
pub mod transport;

pub use tone::ToneShaper;
pub use transport::TransportEngine;
