use std::sync::Arc;

use rtrb::Producer;
use tracing::{debug, info, warn};

use crate::{
    channel::Channel,
    config::LooperConfig,
    dsp::{combine, map, Curve},
    input::HalfSpeedState,
    io::{AnalogInput, ControlFrame},
    modulation::{spread, ModulationBank},
    supervisor::{message::ParamMessage, shared::SharedState},
};

/// Decay written to a transport always stays strictly inside (0, 1).
const DECAY_FLOOR: f32 = 0.001;
const DECAY_CEILING: f32 = 0.999;

/// Everything one control tick derived, for display and inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedParams {
    pub decay: [f32; 2],
    pub cutoff: [f32; 2],
    pub resonance: [f32; 2],
    pub rate: [f32; 2],
    pub slip: f32,
    /// Offset sent to the left transport this tick, if one was sent.
    pub read_offset: Option<usize>,
    pub half_speed: bool,
}

impl Default for DerivedParams {
    fn default() -> Self {
        Self {
            decay: [0.5; 2],
            cutoff: [20_000.0; 2],
            resonance: [0.707; 2],
            rate: [1.0; 2],
            slip: 0.0,
            read_offset: None,
            half_speed: false,
        }
    }
}

/// The ~1 kHz half of the supervisor.
///
/// Reads analog controls, shapes them through the curves and the wobble
/// bank, and pushes the results to the audio callback. Never blocks: a
/// message that doesn't fit in the ring is dropped and counted.
///
/// Continuous parameters are rewritten every tick, so a dropped one heals
/// itself. Half-speed changes and playhead resyncs happen once, so they stay
/// pending per channel and go out ahead of everything else until the ring
/// accepts them.
pub struct ControlLoop {
    config: LooperConfig,
    tx: Producer<ParamMessage>,
    shared: Arc<SharedState>,
    wobble: ModulationBank,
    half_speed: HalfSpeedState,

    previous_slip: Option<f32>,
    pending_half_speed: [Option<bool>; 2],
    pending_resync: [bool; 2],
    observed_recording: [bool; 2],
    observed_len: [usize; 2],

    dropping: bool,
    ticks: u64,
    params: DerivedParams,
}

impl ControlLoop {
    pub(crate) fn new(
        config: LooperConfig,
        tx: Producer<ParamMessage>,
        shared: Arc<SharedState>,
        wobble: ModulationBank,
    ) -> Self {
        Self {
            config,
            tx,
            shared,
            wobble,
            half_speed: HalfSpeedState::default(),
            previous_slip: None,
            pending_half_speed: [None; 2],
            pending_resync: [false; 2],
            observed_recording: [false; 2],
            observed_len: [0; 2],
            dropping: false,
            ticks: 0,
            params: DerivedParams::default(),
        }
    }

    /// Run one control tick.
    pub fn tick(&mut self, controls: &ControlFrame) -> &DerivedParams {
        self.observe_audio();

        self.update_half_speed();
        if self.config.features.slip_enabled {
            self.update_slip(controls);
        }
        self.flush_pending();

        let wobble = self.wobble.sample();
        let ranges = self.config.ranges;
        let tone_shaping = self.config.features.tone_shaping;

        let feedback_sum = combine(
            controls.analog(AnalogInput::FeedbackKnob),
            controls.analog(AnalogInput::FeedbackJack),
        );
        let feedback = map(
            feedback_sum,
            ranges.feedback.lo,
            ranges.feedback.hi,
            Curve::Linear,
        );

        // One knob: cutoff rises while resonance falls.
        let filter_sum = combine(
            controls.analog(AnalogInput::FilterKnob),
            controls.analog(AnalogInput::FilterJack),
        );
        let cutoff = map(
            filter_sum,
            ranges.cutoff.lo,
            ranges.cutoff.hi,
            Curve::Exponential,
        );
        let resonance = map(
            1.0 - filter_sum,
            ranges.resonance.lo,
            ranges.resonance.hi,
            Curve::Logarithmic,
        );

        for channel in Channel::ALL {
            let i = channel.index();

            let decay = spread(feedback, wobble.feedback[i], channel).clamp(DECAY_FLOOR, DECAY_CEILING);
            self.params.decay[i] = decay;
            self.send(ParamMessage::Decay {
                channel,
                value: decay,
            });

            let hz = spread(cutoff, wobble.cutoff[i], channel);
            // Resonance drifts the same direction on both sides.
            let q = resonance * (1.0 + wobble.resonance);
            self.params.cutoff[i] = hz;
            self.params.resonance[i] = q;
            if tone_shaping {
                self.send(ParamMessage::Cutoff { channel, hz });
                self.send(ParamMessage::Resonance { channel, value: q });
            }
        }

        if let Some(samples) = self.params.read_offset {
            self.send(ParamMessage::ReadOffset {
                channel: Channel::Left,
                samples,
            });
        }

        let detune = map(
            controls.analog(AnalogInput::DetuneJack),
            0.0,
            ranges.max_detune,
            Curve::Linear,
        );
        for channel in Channel::ALL {
            // Left slows down, right speeds up.
            let rate = 1.0 - channel.spread_sign() * detune;
            self.params.rate[channel.index()] = rate;
            self.send(ParamMessage::RateMultiplier {
                channel,
                value: rate,
            });
        }

        self.ticks += 1;
        &self.params
    }

    fn update_slip(&mut self, controls: &ControlFrame) {
        let slip_sum = combine(
            controls.analog(AnalogInput::SlipKnob),
            controls.analog(AnalogInput::SlipJack),
        );
        let slip = map(slip_sum, 0.0, self.config.ranges.slip_max, Curve::Linear);
        self.params.slip = slip;

        // Only the left channel slips; right stays the reference.
        let len = self.shared.recorded_length(Channel::Left);
        self.params.read_offset = if len > 0 {
            Some((slip * len as f32).floor() as usize)
        } else {
            None
        };

        let arrived_at_zero = slip == 0.0 && self.previous_slip.map_or(true, |prev| prev != 0.0);
        if arrived_at_zero {
            debug!(tick = self.ticks, "slip at zero, resyncing playheads");
            self.pending_resync = [true; 2];
        }
        self.previous_slip = Some(slip);
    }

    fn update_half_speed(&mut self) {
        let Some(edge) = self.shared.take_toggle_edge() else {
            return;
        };
        if let Some(state) = self.half_speed.on_edge(edge) {
            let enabled = state.is_half_speed();
            debug!(?edge, half_speed = enabled, "playback speed changed");
            self.pending_half_speed = [Some(enabled); 2];
        }
        self.params.half_speed = self.half_speed.is_half_speed();
    }

    /// Retry the one-shot messages that haven't reached the ring yet.
    fn flush_pending(&mut self) {
        for channel in Channel::ALL {
            let i = channel.index();
            if let Some(enabled) = self.pending_half_speed[i] {
                if self.send(ParamMessage::HalfSpeed { channel, enabled }) {
                    self.pending_half_speed[i] = None;
                }
            }
            if self.pending_resync[i] && self.send(ParamMessage::ResetPosition { channel }) {
                self.pending_resync[i] = false;
            }
        }
    }

    /// Half-speed or resync messages still waiting for ring space.
    pub fn has_pending(&self) -> bool {
        self.pending_half_speed.iter().any(Option::is_some) || self.pending_resync.contains(&true)
    }

    /// Log transport transitions the audio side has published since the
    /// last tick.
    fn observe_audio(&mut self) {
        for channel in Channel::ALL {
            let i = channel.index();

            let recording = self.shared.is_recording(channel);
            if recording != self.observed_recording[i] {
                let len = self.shared.recorded_length(channel);
                if recording {
                    info!(channel = channel.name(), recorded_len = len, "recording");
                } else {
                    info!(channel = channel.name(), recorded_len = len, "playing");
                }
                self.observed_recording[i] = recording;
            }

            let len = self.shared.recorded_length(channel);
            if len == 0 && self.observed_len[i] > 0 {
                info!(channel = channel.name(), "loop cleared");
            }
            self.observed_len[i] = len;
        }
    }

    /// Push one message; false when the ring was full and it was dropped.
    fn send(&mut self, msg: ParamMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => {
                self.dropping = false;
                true
            }
            Err(_) => {
                let dropped = self.shared.note_dropped();
                if !self.dropping {
                    warn!(
                        dropped,
                        "parameter ring full, dropping messages"
                    );
                    self.dropping = true;
                }
                false
            }
        }
    }

    pub fn params(&self) -> &DerivedParams {
        &self.params
    }

    pub fn half_speed(&self) -> bool {
        self.half_speed.is_half_speed()
    }

    /// Messages dropped because the ring was full.
    pub fn dropped_messages(&self) -> u64 {
        self.shared.dropped_messages()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &LooperConfig {
        &self.config
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn wobble(&self) -> &ModulationBank {
        &self.wobble
    }
}
