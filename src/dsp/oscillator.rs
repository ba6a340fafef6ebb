use std::f32::consts::TAU;

/// Sine phase accumulator.
///
/// Phase lives in [0, 1) and advances by `frequency / update_rate` each call
/// to [`SineOscillator::next_sample`]. The update rate is whatever cadence the
/// caller ticks at: the sample rate for audio use, the control rate for wobble.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    phase: f32,
    increment: f32,
    amplitude: f32,
}

impl SineOscillator {
    pub fn new(update_rate: f32, frequency: f32, amplitude: f32) -> Self {
        Self {
            phase: 0.0,
            increment: frequency / update_rate,
            amplitude,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = self.amplitude * (TAU * self.phase).sin();

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        out
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}
