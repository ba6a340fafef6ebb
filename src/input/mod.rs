//! Digital inputs: the record button, the half-speed toggle and the two
//! record gates.
//!
//! All of these are debounced in exactly one place, the audio callback, by
//! an [`InputTracker`]. Nothing else derives edges from raw levels.

pub mod gate;
pub mod half_speed;
pub mod switch;

pub use gate::GateInput;
pub use half_speed::{Edge, HalfSpeedState};
pub use switch::Switch;

use crate::{channel::Channel, io::ControlFrame};

#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    button: Switch,
    toggle: Switch,
    gates: [GateInput; 2],
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debounce every digital input once. Call exactly once per tick.
    pub fn process(&mut self, controls: &ControlFrame, now_ms: f64) {
        self.button.debounce(controls.button, now_ms);
        self.toggle.debounce(controls.toggle, now_ms);
        for channel in Channel::ALL {
            self.gates[channel.index()].update(controls.gate(channel));
        }
    }

    pub fn button(&self) -> &Switch {
        &self.button
    }

    pub fn toggle(&self) -> &Switch {
        &self.toggle
    }

    pub fn gate(&self, channel: Channel) -> &GateInput {
        &self.gates[channel.index()]
    }

    /// The toggle's edge this tick, if any.
    pub fn toggle_edge(&self) -> Option<Edge> {
        if self.toggle.rising_edge() {
            Some(Edge::Rising)
        } else if self.toggle.falling_edge() {
            Some(Edge::Falling)
        } else {
            None
        }
    }
}
