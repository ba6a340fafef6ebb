//! The looper supervisor: the context shared by the control loop and the
//! audio callback.

/*
Two Timing Domains
==================

    ┌──────────────────┐   ParamMessage ring (rtrb)   ┌──────────────────┐
    │   ControlLoop    │ ───────────────────────────→ │  AudioProcessor  │
    │   ~1 kHz, may    │                              │  48 kHz / 48     │
    │   log, never     │ ←─────────────────────────── │  frames, never   │
    │   touches audio  │   SharedState (atomics)      │  blocks or logs  │
    └──────────────────┘                              └──────────────────┘

The control loop owns everything slow: curve mapping, wobble, slip and
detune math, the half-speed state machine and logging. It never calls an
engine directly; every parameter travels as a ParamMessage.

The audio processor owns both channels' engines and the input debouncers.
It is the ONLY place edges are derived. Record and clear act immediately
inside the block that saw the edge; a toggle edge is parked in a one-slot
atomic that the control loop consumes with a swap, so each physical edge is
acted on exactly once.

Building
--------

`Supervisor::new` validates the config, sizes the loop buffers, rolls the
wobble dice from the seed and returns both halves. Nothing is allocated
after that: the halves can move to their own threads, or stay together and
be driven in turn.
*/

pub mod audio;
pub mod control;
pub mod message;
pub mod shared;

use std::sync::Arc;

use rand::{rngs::SmallRng, SeedableRng};
use rtrb::RingBuffer;
use tracing::info;

use crate::{
    channel::Channel,
    config::{ConfigError, LooperConfig},
    dsp::{Looper, SVFilter},
    engine::{ToneShaper, TransportEngine},
    modulation::{ModulationBank, Wobble},
};

pub use audio::{AudioProcessor, BlockStatus};
pub use control::{ControlLoop, DerivedParams};
pub use message::{ParamMessage, MAX_MESSAGES_PER_TICK};
pub use shared::SharedState;

pub struct Supervisor<T = Looper, S = SVFilter> {
    pub control: ControlLoop,
    pub audio: AudioProcessor<T, S>,
}

impl Supervisor<Looper, SVFilter> {
    /// Build with the crate's own looper and filter engines.
    pub fn new(config: LooperConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let capacity = config.loop_capacity();
        let transports = [Looper::new(capacity), Looper::new(capacity)];
        let open = config.ranges.cutoff.hi;
        let shapers = [
            SVFilter::lowpass(config.sample_rate, open),
            SVFilter::lowpass(config.sample_rate, open),
        ];

        Self::with_engines(config, seed, transports, shapers)
    }
}

impl<T, S> Supervisor<T, S>
where
    T: TransportEngine,
    S: ToneShaper,
{
    /// Build around caller-supplied engines, one per channel.
    pub fn with_engines(
        config: LooperConfig,
        seed: u64,
        transports: [T; 2],
        shapers: [S; 2],
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (tx, rx) = RingBuffer::new(config.message_capacity);
        let shared = Arc::new(SharedState::new());

        let mut rng = SmallRng::seed_from_u64(seed);
        let wobble = ModulationBank::random(
            config.features.feedback_modulation,
            &config.wobble,
            config.control_rate_hz,
            &mut rng,
        );

        info!(
            seed,
            sample_rate = config.sample_rate,
            loop_capacity = config.loop_capacity(),
            modulation = ?config.features.feedback_modulation,
            slip = config.features.slip_enabled,
            tone_shaping = config.features.tone_shaping,
            "looper built"
        );
        for channel in Channel::ALL {
            info!(
                channel = channel.name(),
                feedback_depth = wobble.feedback(channel).amplitude(),
                cutoff_depth = wobble.cutoff(channel).amplitude(),
                "wobble drawn"
            );
        }

        let control = ControlLoop::new(config, tx, Arc::clone(&shared), wobble);
        let audio = AudioProcessor::new(config, rx, shared, transports, shapers);

        Ok(Self { control, audio })
    }

    /// Split into the two halves so each can live on its own thread.
    pub fn split(self) -> (ControlLoop, AudioProcessor<T, S>) {
        (self.control, self.audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        io::{AnalogInput, ControlFrame},
        ModulationKind,
    };

    fn quiet_config() -> LooperConfig {
        let mut config = LooperConfig {
            loop_seconds: 0.5,
            ..LooperConfig::default()
        };
        config.features.feedback_modulation = ModulationKind::None;
        config
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = LooperConfig {
            sample_rate: 0.0,
            ..LooperConfig::default()
        };
        assert!(Supervisor::new(config, 0).is_err());
    }

    #[test]
    fn test_tick_maps_controls_without_wobble() {
        let Supervisor { mut control, .. } = Supervisor::new(quiet_config(), 7).unwrap();

        let frame = ControlFrame::default()
            .with_analog(AnalogInput::FeedbackKnob, 1.0)
            .with_analog(AnalogInput::FilterKnob, 0.0)
            .with_analog(AnalogInput::DetuneJack, 1.0);
        let params = *control.tick(&frame);

        assert!((params.decay[0] - 0.95).abs() < 1e-5, "decay {:?}", params.decay);
        assert_eq!(params.decay[0], params.decay[1]);
        assert!((params.cutoff[0] - 20.0).abs() < 1e-3, "cutoff {:?}", params.cutoff);
        assert!((params.resonance[0] - 10.0).abs() < 1e-3, "q {:?}", params.resonance);
        assert!((params.rate[0] - 0.97).abs() < 1e-6, "rate {:?}", params.rate);
        assert!((params.rate[1] - 1.03).abs() < 1e-6, "rate {:?}", params.rate);
    }

    #[test]
    fn test_one_tick_fits_in_the_ring() {
        let config = LooperConfig {
            message_capacity: MAX_MESSAGES_PER_TICK,
            ..quiet_config()
        };
        let (mut control, _audio) = Supervisor::new(config, 1).unwrap().split();

        control.tick(&ControlFrame::default());
        assert_eq!(control.dropped_messages(), 0);

        // Nobody drains the ring, so the second tick overflows.
        control.tick(&ControlFrame::default());
        assert!(control.dropped_messages() > 0);
    }

    #[test]
    fn test_half_speed_change_survives_full_ring() {
        let config = LooperConfig {
            message_capacity: MAX_MESSAGES_PER_TICK,
            ..quiet_config()
        };
        let (mut control, mut audio) = Supervisor::new(config, 5).unwrap().split();
        let frame = ControlFrame::default();

        // Two undrained ticks fill the ring.
        control.tick(&frame);
        control.tick(&frame);

        control.shared().publish_toggle_edge(crate::input::Edge::Falling);
        let dropped_before = control.dropped_messages();
        control.tick(&frame);
        assert!(control.half_speed());
        assert!(control.has_pending(), "half speed should wait for ring space");
        assert!(control.dropped_messages() > dropped_before);

        let mut out_l = [0.0; 48];
        let mut out_r = [0.0; 48];
        let silence = [0.0; 48];
        for _ in 0..200 {
            audio.process_block(&frame, [&silence[..], &silence[..]], [&mut out_l[..], &mut out_r[..]]);
            control.tick(&frame);
        }
        audio.process_block(&frame, [&silence[..], &silence[..]], [&mut out_l[..], &mut out_r[..]]);

        assert!(!control.has_pending());
        for channel in Channel::ALL {
            assert!(
                audio.transport(channel).half_speed(),
                "{} transport never reached half speed",
                channel.name()
            );
        }
    }

    #[test]
    fn test_wobble_keeps_decay_inside_unit_interval() {
        let mut config = quiet_config();
        config.features.feedback_modulation = ModulationKind::RandomWalk;
        config.wobble.walk_step_ticks = 1;
        let (mut control, mut audio) = Supervisor::new(config, 99).unwrap().split();

        let mut out_l = [0.0; 48];
        let mut out_r = [0.0; 48];
        let silence = [0.0; 48];

        for knob in [0.0, 1.0] {
            let frame = ControlFrame::default().with_analog(AnalogInput::FeedbackKnob, knob);
            for _ in 0..200 {
                let params = *control.tick(&frame);
                audio.process_block(&frame, [&silence[..], &silence[..]], [&mut out_l[..], &mut out_r[..]]);
                for decay in params.decay {
                    assert!(decay > 0.0 && decay < 1.0, "decay {} at knob {}", decay, knob);
                }
            }
        }
    }
}
