//! Wobble: slow, bounded drift layered over control-derived parameters.

/*
Wobble
======

A looper that repeats exactly is a tape machine nobody loves. Wobble nudges
feedback, filter cutoff and resonance around their knob-set values so the
loop breathes while it repeats.

Every source answers one question per control tick: "what is my offset
now?" The offset is a FRACTION of the base value, and it is applied
multiplicatively with opposite signs on the two channels:

    left  = base × (1 + offset_left)
    right = base × (1 - offset_right)

Each channel has its own sources, so the two sides drift apart instead of
moving together. That divergence is the stereo decorrelation.


Sources
-------

LFO
    A sine at a sub-hertz rate (≤ 0.25 Hz: one cycle every 4+ seconds).
    Smooth, periodic, "tape wow" motion.

        offset = amplitude × sin(2π · phase)        ∈ [-amp, +amp]

RANDOM WALK
    A sample-and-hold: a random offset held for N ticks, then redrawn.
    Stepped, aperiodic, "something is slightly off" motion.

        offset ∈ [-amp/2, +amp/2], redrawn every period

    Each walk owns its own step timer. Periods are multiples of a base step
    (1×, 2×, 3×, ...) so walks rarely redraw on the same tick.

OFF
    Offset is always zero.


Rolling the Dice
----------------

Rates and depths are drawn ONCE at startup from uniform randoms:

    depth ∈ (0, max_amplitude]      max_amplitude ≤ 0.05 (5%)
    rate  ∈ (0, max_frequency]

A draw of exactly zero is replaced by a small floor so no source is ever
frozen or silent. Every power cycle gives the effect a slightly different
personality; the same seed always gives the same one.
*/

pub mod lfo;
pub mod random_walk;

use rand::Rng;

use crate::{
    channel::Channel,
    config::{ModulationKind, WobbleConfig},
};

pub use lfo::LfoWobble;
pub use random_walk::{RandomWalk, StepTimer};

/// A bounded, continuously varying offset.
pub trait Wobble {
    /// Advance one update and return the current offset.
    fn sample(&mut self) -> f32;

    /// Largest magnitude [`Wobble::sample`] can return.
    fn amplitude(&self) -> f32;
}

/// Scale a unit draw into `(0, max]`, replacing an exact zero with `floor`.
#[inline]
pub fn scaled_draw(unit: f32, max: f32, floor: f32) -> f32 {
    let drawn = unit.clamp(0.0, 1.0) * max;
    if drawn == 0.0 {
        floor
    } else {
        drawn
    }
}

/// Apply a fractional offset with the channel's spread sign.
#[inline]
pub fn spread(base: f32, offset: f32, channel: Channel) -> f32 {
    base * (1.0 + channel.spread_sign() * offset)
}

#[derive(Debug, Clone)]
pub enum WobbleSource {
    Lfo(LfoWobble),
    RandomWalk(RandomWalk),
    Off,
}

impl WobbleSource {
    /// Build one source of `kind`. `step_multiple` stretches the random-walk
    /// period so sibling walks don't redraw together.
    pub fn random<R: Rng + ?Sized>(
        kind: ModulationKind,
        config: &WobbleConfig,
        update_rate: f32,
        step_multiple: u32,
        rng: &mut R,
    ) -> Self {
        match kind {
            ModulationKind::Lfo => WobbleSource::Lfo(LfoWobble::random(config, update_rate, rng)),
            ModulationKind::RandomWalk => {
                let period = config.walk_step_ticks.saturating_mul(step_multiple.max(1));
                WobbleSource::RandomWalk(RandomWalk::random(config, period, rng))
            }
            ModulationKind::None => WobbleSource::Off,
        }
    }
}

impl Wobble for WobbleSource {
    #[inline]
    fn sample(&mut self) -> f32 {
        match self {
            WobbleSource::Lfo(lfo) => lfo.sample(),
            WobbleSource::RandomWalk(walk) => walk.sample(),
            WobbleSource::Off => 0.0,
        }
    }

    fn amplitude(&self) -> f32 {
        match self {
            WobbleSource::Lfo(lfo) => lfo.amplitude(),
            WobbleSource::RandomWalk(walk) => walk.amplitude(),
            WobbleSource::Off => 0.0,
        }
    }
}

/// Offsets produced by one tick of the bank.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WobbleFrame {
    pub feedback: [f32; 2],
    pub cutoff: [f32; 2],
    pub resonance: f32,
}

/// Every wobble source the control loop drives: feedback and cutoff per
/// channel, plus one resonance source shared by both sides.
#[derive(Debug, Clone)]
pub struct ModulationBank {
    feedback: [WobbleSource; 2],
    cutoff: [WobbleSource; 2],
    resonance: WobbleSource,
}

impl ModulationBank {
    pub fn random<R: Rng + ?Sized>(
        kind: ModulationKind,
        config: &WobbleConfig,
        update_rate: f32,
        rng: &mut R,
    ) -> Self {
        let mut next =
            |multiple| WobbleSource::random(kind, config, update_rate, multiple, &mut *rng);

        let feedback = [next(1), next(2)];
        let cutoff = [next(3), next(4)];
        let resonance = next(5);

        Self {
            feedback,
            cutoff,
            resonance,
        }
    }

    pub fn sample(&mut self) -> WobbleFrame {
        WobbleFrame {
            feedback: [self.feedback[0].sample(), self.feedback[1].sample()],
            cutoff: [self.cutoff[0].sample(), self.cutoff[1].sample()],
            resonance: self.resonance.sample(),
        }
    }

    pub fn feedback(&self, channel: Channel) -> &WobbleSource {
        &self.feedback[channel.index()]
    }

    pub fn cutoff(&self, channel: Channel) -> &WobbleSource {
        &self.cutoff[channel.index()]
    }

    pub fn resonance(&self) -> &WobbleSource {
        &self.resonance
    }

    /// Deepest source in the bank.
    pub fn max_amplitude(&self) -> f32 {
        self.feedback
            .iter()
            .chain(self.cutoff.iter())
            .chain(std::iter::once(&self.resonance))
            .map(Wobble::amplitude)
            .fold(0.0, f32::max)
    }
}
