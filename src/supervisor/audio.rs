use std::sync::Arc;

use rtrb::Consumer;

use crate::{
    channel::Channel,
    config::LooperConfig,
    dsp::Crossfade,
    engine::{ToneShaper, TransportEngine},
    input::InputTracker,
    io::{AnalogInput, ControlFrame},
    supervisor::{message::ParamMessage, shared::SharedState},
};

/// What one audio block left the transports doing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockStatus {
    pub status_volts: f32,
    pub recording: [bool; 2],
}

/// The audio-rate half of the supervisor.
///
/// Owns both channels' engines and is the only place digital inputs are
/// debounced. `process_block` is bounded: no allocation, no locks, no
/// logging.
pub struct AudioProcessor<T, S> {
    config: LooperConfig,
    rx: Consumer<ParamMessage>,
    shared: Arc<SharedState>,

    transports: [T; 2],
    shapers: [S; 2],
    inputs: InputTracker,

    samples: u64,
    clear_armed: bool,
    status: BlockStatus,
}

impl<T, S> AudioProcessor<T, S>
where
    T: TransportEngine,
    S: ToneShaper,
{
    pub(crate) fn new(
        config: LooperConfig,
        rx: Consumer<ParamMessage>,
        shared: Arc<SharedState>,
        transports: [T; 2],
        shapers: [S; 2],
    ) -> Self {
        Self {
            config,
            rx,
            shared,
            transports,
            shapers,
            inputs: InputTracker::new(),
            samples: 0,
            clear_armed: true,
            status: BlockStatus::default(),
        }
    }

    /// Process one block of stereo audio.
    ///
    /// `controls` is the panel scan for this block. Frames beyond the
    /// shortest of the four slices are left untouched.
    pub fn process_block(
        &mut self,
        controls: &ControlFrame,
        input: [&[f32]; 2],
        output: [&mut [f32]; 2],
    ) -> BlockStatus {
        while let Ok(msg) = self.rx.pop() {
            self.apply(msg);
        }

        self.inputs.process(controls, self.elapsed_ms());
        if let Some(edge) = self.inputs.toggle_edge() {
            self.shared.publish_toggle_edge(edge);
        }

        self.resolve_record();
        self.resolve_clear();

        let recording = [
            self.transports[0].is_recording(),
            self.transports[1].is_recording(),
        ];
        let per_channel = self.config.status_channel_volts;
        let volts: f32 = recording
            .iter()
            .map(|&rec| if rec { per_channel } else { 0.0 })
            .sum();
        self.shared.publish_status(volts);

        let fade = Crossfade::new(controls.analog(AnalogInput::Blend));
        let tone_shaping = self.config.features.tone_shaping;
        let frames = input
            .iter()
            .map(|buf| buf.len())
            .chain(output.iter().map(|buf| buf.len()))
            .min()
            .unwrap_or(0);

        for (i, out) in output.into_iter().enumerate() {
            let transport = &mut self.transports[i];
            let shaper = &mut self.shapers[i];

            for (y, &x) in out[..frames].iter_mut().zip(&input[i][..frames]) {
                let dry = x * fade.dry();
                let wet = transport.process(x) * fade.wet();
                let wet = if tone_shaping { shaper.process(wet) } else { wet };
                *y = wet + dry;
            }
        }

        for channel in Channel::ALL {
            let transport = &self.transports[channel.index()];
            self.shared.publish_channel(
                channel,
                transport.recorded_length(),
                transport.is_recording(),
            );
        }

        self.samples += frames as u64;
        self.status = BlockStatus {
            status_volts: volts,
            recording,
        };
        self.status
    }

    fn apply(&mut self, msg: ParamMessage) {
        match msg {
            ParamMessage::Decay { channel, value } => {
                self.transports[channel.index()].set_decay(value)
            }
            ParamMessage::Cutoff { channel, hz } => self.shapers[channel.index()].set_cutoff(hz),
            ParamMessage::Resonance { channel, value } => {
                self.shapers[channel.index()].set_resonance(value)
            }
            ParamMessage::RateMultiplier { channel, value } => {
                self.transports[channel.index()].set_rate_multiplier(value)
            }
            ParamMessage::ReadOffset { channel, samples } => {
                self.transports[channel.index()].set_read_offset(samples)
            }
            ParamMessage::ResetPosition { channel } => {
                self.transports[channel.index()].reset_position()
            }
            ParamMessage::HalfSpeed { channel, enabled } => {
                self.transports[channel.index()].set_half_speed(enabled)
            }
        }
    }

    /// Button edge beats the gates and moves both channels together.
    fn resolve_record(&mut self) {
        if self.inputs.button().rising_edge() {
            for transport in &mut self.transports {
                transport.trigger_record();
            }
            return;
        }

        for channel in Channel::ALL {
            if self.inputs.gate(channel).rising_edge() {
                self.transports[channel.index()].trigger_record();
            }
        }
    }

    /// Long press clears both loops, once per hold.
    fn resolve_clear(&mut self) {
        let button = self.inputs.button();
        if !button.pressed() {
            self.clear_armed = true;
            return;
        }

        if self.clear_armed && button.time_held_ms() >= self.config.clear_hold_ms as f64 {
            for transport in &mut self.transports {
                transport.clear();
            }
            self.clear_armed = false;
        }
    }

    /// Milliseconds of audio processed so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.samples as f64 * 1000.0 / self.config.sample_rate as f64
    }

    pub fn status(&self) -> BlockStatus {
        self.status
    }

    pub fn transport(&self, channel: Channel) -> &T {
        &self.transports[channel.index()]
    }

    pub fn shaper(&self, channel: Channel) -> &S {
        &self.shapers[channel.index()]
    }

    pub fn inputs(&self) -> &InputTracker {
        &self.inputs
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }
}
