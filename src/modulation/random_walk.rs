use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::config::WobbleConfig;

use super::{scaled_draw, Wobble};

/// Counts ticks and fires every `period` of them.
#[derive(Debug, Clone)]
pub struct StepTimer {
    count: u32,
    period: u32,
}

impl StepTimer {
    pub fn new(period: u32) -> Self {
        Self {
            count: 0,
            period: period.max(1),
        }
    }

    /// Advance one tick. Returns true on the tick the period elapses, then
    /// starts counting from zero again.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}

/// Stepped wobble: hold a random offset, redraw it every few ticks.
///
/// Offsets are uniform in `[-amplitude/2, +amplitude/2]`.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    timer: StepTimer,
    amplitude: f32,
    offset: f32,
    rng: SmallRng,
}

impl RandomWalk {
    pub fn new(period: u32, amplitude: f32, seed: u64) -> Self {
        let mut walk = Self {
            timer: StepTimer::new(period),
            amplitude,
            offset: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        };
        walk.redraw();
        walk
    }

    /// Depth is rolled once in `(0, max_amplitude]`; the walk gets its own
    /// generator seeded from `rng`.
    pub fn random<R: Rng + ?Sized>(config: &WobbleConfig, period: u32, rng: &mut R) -> Self {
        let amplitude = scaled_draw(
            rng.gen::<f32>(),
            config.max_amplitude,
            config.amplitude_floor,
        );
        Self::new(period, amplitude, rng.gen())
    }

    fn redraw(&mut self) {
        let half = self.amplitude * 0.5;
        self.offset = (self.rng.gen::<f32>() * 2.0 - 1.0) * half;
    }

    pub fn period(&self) -> u32 {
        self.timer.period()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}

impl Wobble for RandomWalk {
    #[inline]
    fn sample(&mut self) -> f32 {
        if self.timer.tick() {
            self.redraw();
        }
        self.offset
    }

    fn amplitude(&self) -> f32 {
        self.amplitude
    }
}
