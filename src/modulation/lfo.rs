use rand::Rng;

use crate::{config::WobbleConfig, dsp::oscillator::SineOscillator};

use super::{scaled_draw, Wobble};

/// Periodic wobble: a slow sine whose rate and depth are rolled once at
/// startup and then left alone.
#[derive(Debug, Clone)]
pub struct LfoWobble {
    osc: SineOscillator,
    frequency: f32,
}

impl LfoWobble {
    pub fn new(update_rate: f32, frequency: f32, amplitude: f32) -> Self {
        Self {
            osc: SineOscillator::new(update_rate, frequency, amplitude),
            frequency,
        }
    }

    /// Roll rate in `(0, max_frequency_hz]` and depth in `(0, max_amplitude]`.
    pub fn random<R: Rng + ?Sized>(config: &WobbleConfig, update_rate: f32, rng: &mut R) -> Self {
        let frequency = scaled_draw(
            rng.gen::<f32>(),
            config.max_frequency_hz,
            config.frequency_floor_hz,
        );
        let amplitude = scaled_draw(
            rng.gen::<f32>(),
            config.max_amplitude,
            config.amplitude_floor,
        );
        Self::new(update_rate, frequency, amplitude)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl Wobble for LfoWobble {
    #[inline]
    fn sample(&mut self) -> f32 {
        self.osc.next_sample()
    }

    fn amplitude(&self) -> f32 {
        self.osc.amplitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_random_lfo_respects_bounds() {
        let config = WobbleConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..500 {
            let lfo = LfoWobble::random(&config, 1000.0, &mut rng);
            assert!(lfo.frequency() > 0.0 && lfo.frequency() <= config.max_frequency_hz);
            assert!(lfo.amplitude() > 0.0 && lfo.amplitude() <= config.max_amplitude);
        }
    }

    #[test]
    fn test_output_swings_both_ways() {
        let mut lfo = LfoWobble::new(100.0, 1.0, 0.05);
        let samples: Vec<f32> = (0..100).map(|_| lfo.sample()).collect();

        assert!(samples.iter().any(|&s| s > 0.04));
        assert!(samples.iter().any(|&s| s < -0.04));
        assert!(samples.iter().all(|&s| s.abs() <= 0.05 + 1e-6));
    }
}
