//! Virtual front panel shared by the UI, control and audio threads

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use drift_looper::{AnalogInput, Channel, ControlFrame, ControlSurface};

/// Knob positions and switch levels as atomics.
///
/// The UI thread writes, the control and audio threads read. Every field is
/// one scalar, so a reader never sees a half-written value.
pub struct Panel {
    analog: [AtomicU32; AnalogInput::COUNT],
    button: AtomicBool,
    toggle: AtomicBool,
    gates: [AtomicBool; 2],
    status: AtomicU32,
}

impl Panel {
    pub fn new() -> Self {
        let panel = Self {
            analog: Default::default(),
            button: AtomicBool::new(false),
            // Toggle rests up: normal speed.
            toggle: AtomicBool::new(true),
            gates: Default::default(),
            status: AtomicU32::new(0.0f32.to_bits()),
        };
        panel.set_analog(AnalogInput::Blend, 0.5);
        panel.set_analog(AnalogInput::FeedbackKnob, 0.5);
        panel.set_analog(AnalogInput::FilterKnob, 1.0);
        panel
    }

    pub fn analog(&self, input: AnalogInput) -> f32 {
        f32::from_bits(self.analog[input.index()].load(Ordering::Relaxed))
    }

    pub fn set_analog(&self, input: AnalogInput, value: f32) {
        self.analog[input.index()].store(value.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn nudge(&self, input: AnalogInput, delta: f32) {
        self.set_analog(input, self.analog(input) + delta);
    }

    pub fn set_button(&self, pressed: bool) {
        self.button.store(pressed, Ordering::Relaxed);
    }

    pub fn button(&self) -> bool {
        self.button.load(Ordering::Relaxed)
    }

    /// Flip the half-speed toggle, returning its new level.
    pub fn flip_toggle(&self) -> bool {
        !self.toggle.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn toggle(&self) -> bool {
        self.toggle.load(Ordering::Relaxed)
    }

    pub fn set_gate(&self, channel: Channel, high: bool) {
        self.gates[channel.index()].store(high, Ordering::Relaxed);
    }

    pub fn gate(&self, channel: Channel) -> bool {
        self.gates[channel.index()].load(Ordering::Relaxed)
    }

    pub fn status_volts(&self) -> f32 {
        f32::from_bits(self.status.load(Ordering::Relaxed))
    }
}

impl ControlSurface for Panel {
    fn read_controls(&self) -> ControlFrame {
        let mut frame = ControlFrame {
            button: self.button(),
            toggle: self.toggle(),
            gates: [self.gate(Channel::Left), self.gate(Channel::Right)],
            ..ControlFrame::default()
        };
        for input in AnalogInput::ALL {
            frame.set_analog(input, self.analog(input));
        }
        frame
    }

    fn write_status(&self, volts: f32) {
        self.status.store(volts.to_bits(), Ordering::Relaxed);
    }
}
