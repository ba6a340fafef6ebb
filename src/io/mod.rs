// Purpose - the hardware boundary: control snapshots in, status voltage out

use crate::channel::Channel;

/// The eight analog control inputs, in CV_1..CV_8 order.
///
/// Readings are unipolar: 0.0 is fully counter-clockwise (or 0 V at a jack),
/// 1.0 is fully clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogInput {
    /// CV_1: dry/loop blend
    Blend,
    /// CV_2
    SlipKnob,
    /// CV_3
    FeedbackKnob,
    /// CV_4: cutoff up, resonance down
    FilterKnob,
    /// CV_5
    FeedbackJack,
    /// CV_6
    FilterJack,
    /// CV_7: left slows, right speeds up
    DetuneJack,
    /// CV_8
    SlipJack,
}

impl AnalogInput {
    pub const COUNT: usize = 8;

    pub const ALL: [AnalogInput; Self::COUNT] = [
        AnalogInput::Blend,
        AnalogInput::SlipKnob,
        AnalogInput::FeedbackKnob,
        AnalogInput::FilterKnob,
        AnalogInput::FeedbackJack,
        AnalogInput::FilterJack,
        AnalogInput::DetuneJack,
        AnalogInput::SlipJack,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalogInput::Blend => "blend",
            AnalogInput::SlipKnob => "slip",
            AnalogInput::FeedbackKnob => "feedback",
            AnalogInput::FilterKnob => "filter",
            AnalogInput::FeedbackJack => "feedback cv",
            AnalogInput::FilterJack => "filter cv",
            AnalogInput::DetuneJack => "detune cv",
            AnalogInput::SlipJack => "slip cv",
        }
    }
}

/// One scan of every control input. Cheap to copy; taken fresh each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlFrame {
    pub analog: [f32; AnalogInput::COUNT],
    pub button: bool,
    pub toggle: bool,
    pub gates: [bool; 2],
}

impl ControlFrame {
    /// Normalized reading, clamped into [0, 1].
    #[inline]
    pub fn analog(&self, input: AnalogInput) -> f32 {
        self.analog[input.index()].clamp(0.0, 1.0)
    }

    #[inline]
    pub fn gate(&self, channel: Channel) -> bool {
        self.gates[channel.index()]
    }

    pub fn set_analog(&mut self, input: AnalogInput, value: f32) {
        self.analog[input.index()] = value;
    }

    pub fn with_analog(mut self, input: AnalogInput, value: f32) -> Self {
        self.set_analog(input, value);
        self
    }

    pub fn with_button(mut self, pressed: bool) -> Self {
        self.button = pressed;
        self
    }

    pub fn with_toggle(mut self, up: bool) -> Self {
        self.toggle = up;
        self
    }

    pub fn with_gate(mut self, channel: Channel, high: bool) -> Self {
        self.gates[channel.index()] = high;
        self
    }
}

/// Platform wrapper around the physical panel.
///
/// Both timing domains read from it, so methods take `&self`; implementations
/// back it with atomics or memory-mapped registers.
pub trait ControlSurface: Send + Sync {
    fn read_controls(&self) -> ControlFrame;

    /// Drive the status LED / CV out with a voltage-like level.
    fn write_status(&self, volts: f32);
}
