//! Control and modulation supervisor for a stereo looper effect.
//!
//! Two timing domains cooperate: a free-running control loop that maps knobs
//! and CV into engine parameters (with slow "wobble" layered on top), and a
//! fixed-period audio callback that owns the engines, detects record/clear
//! gestures and mixes the dry signal with the loop. Both halves are built
//! together by [`supervisor::Supervisor`].

pub mod channel;
pub mod config;
pub mod dsp; // Curves, mixing, default looper and filter engines
pub mod engine; // Contracts for the transport and tone-shaping collaborators
pub mod input; // Debounced switches, gates and the half-speed machine
pub mod io;
pub mod modulation; // LFO and random-walk wobble sources
pub mod supervisor;

pub use channel::Channel;
pub use config::{ConfigError, FeatureFlags, LooperConfig, ModulationKind};
pub use io::{AnalogInput, ControlFrame, ControlSurface};
pub use supervisor::{AudioProcessor, BlockStatus, ControlLoop, DerivedParams, Supervisor};

pub const MAX_BLOCK_SIZE: usize = 2048;
