use crate::channel::Channel;

/// Parameter writes from the control loop to the audio callback.
///
/// Every field is a single scalar; the audio side applies them in order at
/// the top of the next block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParamMessage {
    Decay { channel: Channel, value: f32 },
    Cutoff { channel: Channel, hz: f32 },
    Resonance { channel: Channel, value: f32 },
    RateMultiplier { channel: Channel, value: f32 },
    ReadOffset { channel: Channel, samples: usize },
    ResetPosition { channel: Channel },
    HalfSpeed { channel: Channel, enabled: bool },
}

/// Upper bound on messages one control tick can emit:
/// decay, cutoff, resonance and rate for both channels, one read offset,
/// two position resets and two half-speed writes.
pub const MAX_MESSAGES_PER_TICK: usize = 4 * 2 + 1 + 2 + 2;
