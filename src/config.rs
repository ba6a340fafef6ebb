//! Startup configuration.
//!
//! `LooperConfig::default()` reproduces the hardware constants the effect
//! ships with. Everything here is read once when the supervisor is built;
//! nothing is reconfigured while audio runs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{supervisor::message::MAX_MESSAGES_PER_TICK, MAX_BLOCK_SIZE};

/// Largest wobble depth allowed, as a fraction of the base parameter.
pub const WOBBLE_AMPLITUDE_LIMIT: f32 = 0.05;
/// Largest slip allowed, as a fraction of the recorded loop length.
pub const SLIP_LIMIT: f32 = 0.1;
/// Largest playback-rate detune allowed, as a fraction of unity rate.
pub const DETUNE_LIMIT: f32 = 0.03;

/// Which wobble source drives the feedback, cutoff and resonance drift.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulationKind {
    #[default]
    Lfo,
    RandomWalk,
    None,
}

/// Optional behaviours. One implementation branches on these.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureFlags {
    pub feedback_modulation: ModulationKind,
    pub slip_enabled: bool,
    pub tone_shaping: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            feedback_modulation: ModulationKind::Lfo,
            slip_enabled: true,
            tone_shaping: true,
        }
    }
}

/// Closed interval a mapped parameter lives in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub lo: f32,
    pub hi: f32,
}

impl ParamRange {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRanges {
    /// Filter corner in Hz (exponential curve).
    pub cutoff: ParamRange,
    /// Filter Q (logarithmic curve, inverted against the filter knob).
    pub resonance: ParamRange,
    /// Overdub decay (linear curve).
    pub feedback: ParamRange,
    /// Fraction of the left loop length the slip control can reach.
    pub slip_max: f32,
    /// Fraction of unity rate the detune jack can reach.
    pub max_detune: f32,
}

impl Default for ParamRanges {
    fn default() -> Self {
        Self {
            cutoff: ParamRange::new(20.0, 20_000.0),
            resonance: ParamRange::new(0.05, 10.0),
            feedback: ParamRange::new(0.1, 0.95),
            slip_max: SLIP_LIMIT,
            max_detune: DETUNE_LIMIT,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WobbleConfig {
    /// Upper bound for every drawn depth (fraction of the base value).
    pub max_amplitude: f32,
    /// Upper bound for every drawn LFO rate.
    pub max_frequency_hz: f32,
    /// Depth used when the random draw lands exactly on zero.
    pub amplitude_floor: f32,
    /// Rate used when the random draw lands exactly on zero.
    pub frequency_floor_hz: f32,
    /// Control ticks between random-walk redraws for the fastest walk.
    pub walk_step_ticks: u32,
}

impl Default for WobbleConfig {
    fn default() -> Self {
        Self {
            max_amplitude: WOBBLE_AMPLITUDE_LIMIT,
            max_frequency_hz: 0.25,
            amplitude_floor: 0.001,
            frequency_floor_hz: 0.01,
            walk_step_ticks: 2000,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LooperConfig {
    pub sample_rate: f32,
    /// Frames per audio callback.
    pub block_size: usize,
    /// Maximum loop duration per channel; sizes the transport buffers.
    pub loop_seconds: f32,
    /// Nominal rate the control loop is ticked at.
    pub control_rate_hz: f32,
    /// Capacity of the control → audio parameter ring.
    pub message_capacity: usize,
    /// Button hold time that clears both loops.
    pub clear_hold_ms: f32,
    /// Status output contribution of each recording channel.
    pub status_channel_volts: f32,
    pub features: FeatureFlags,
    pub ranges: ParamRanges,
    pub wobble: WobbleConfig,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_size: 48,
            loop_seconds: 60.0,
            control_rate_hz: 1_000.0,
            message_capacity: 256,
            clear_hold_ms: 1_000.0,
            status_channel_volts: 2.5,
            features: FeatureFlags::default(),
            ranges: ParamRanges::default(),
            wobble: WobbleConfig::default(),
        }
    }
}

impl LooperConfig {
    /// Samples each transport buffer holds.
    pub fn loop_capacity(&self) -> usize {
        (self.sample_rate * self.loop_seconds) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sample_rate", self.sample_rate)?;
        positive("loop_seconds", self.loop_seconds)?;
        positive("control_rate_hz", self.control_rate_hz)?;
        positive("clear_hold_ms", self.clear_hold_ms)?;

        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::BlockSize {
                value: self.block_size,
                max: MAX_BLOCK_SIZE,
            });
        }

        if self.message_capacity < MAX_MESSAGES_PER_TICK {
            return Err(ConfigError::MessageCapacity {
                value: self.message_capacity,
                min: MAX_MESSAGES_PER_TICK,
            });
        }

        let ranges = &self.ranges;
        ordered("ranges.cutoff", ranges.cutoff)?;
        ordered("ranges.resonance", ranges.resonance)?;
        ordered("ranges.feedback", ranges.feedback)?;

        // Exponential and logarithmic curves need a nonzero floor.
        curve_floor("ranges.cutoff", ranges.cutoff)?;
        curve_floor("ranges.resonance", ranges.resonance)?;

        if ranges.feedback.lo <= 0.0 || ranges.feedback.hi >= 1.0 {
            return Err(ConfigError::FeedbackRange {
                lo: ranges.feedback.lo,
                hi: ranges.feedback.hi,
            });
        }

        within("ranges.slip_max", ranges.slip_max, 0.0, SLIP_LIMIT)?;
        within("ranges.max_detune", ranges.max_detune, 0.0, DETUNE_LIMIT)?;

        let wobble = &self.wobble;
        positive("wobble.max_amplitude", wobble.max_amplitude)?;
        within(
            "wobble.max_amplitude",
            wobble.max_amplitude,
            0.0,
            WOBBLE_AMPLITUDE_LIMIT,
        )?;
        positive("wobble.amplitude_floor", wobble.amplitude_floor)?;
        within(
            "wobble.amplitude_floor",
            wobble.amplitude_floor,
            0.0,
            wobble.max_amplitude,
        )?;
        positive("wobble.max_frequency_hz", wobble.max_frequency_hz)?;
        positive("wobble.frequency_floor_hz", wobble.frequency_floor_hz)?;
        within(
            "wobble.frequency_floor_hz",
            wobble.frequency_floor_hz,
            0.0,
            wobble.max_frequency_hz,
        )?;
        if wobble.walk_step_ticks == 0 {
            return Err(ConfigError::NonPositive {
                field: "wobble.walk_step_ticks",
                value: 0.0,
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // Written this way round so NaN is rejected too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ordered(field: &'static str, range: ParamRange) -> Result<(), ConfigError> {
    if range.lo < range.hi {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange {
            field,
            lo: range.lo,
            hi: range.hi,
        })
    }
}

fn curve_floor(field: &'static str, range: ParamRange) -> Result<(), ConfigError> {
    if range.lo > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::CurveFloor { field, lo: range.lo })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfBounds {
            field,
            value,
            min,
            max,
        })
    }
}

/// Reasons a configuration is rejected before anything is allocated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f32 },
    BlockSize { value: usize, max: usize },
    MessageCapacity { value: usize, min: usize },
    EmptyRange { field: &'static str, lo: f32, hi: f32 },
    /// Exponential/logarithmic curves are undefined at a zero floor
    CurveFloor { field: &'static str, lo: f32 },
    /// Decay must stay strictly inside (0, 1)
    FeedbackRange { lo: f32, hi: f32 },
    OutOfBounds {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            ConfigError::BlockSize { value, max } => {
                write!(f, "block_size must be between 1 and {}, got {}", max, value)
            }
            ConfigError::MessageCapacity { value, min } => {
                write!(
                    f,
                    "message_capacity must hold at least one control tick ({} messages), got {}",
                    min, value
                )
            }
            ConfigError::EmptyRange { field, lo, hi } => {
                write!(f, "{} is empty: lo {} is not below hi {}", field, lo, hi)
            }
            ConfigError::CurveFloor { field, lo } => {
                write!(
                    f,
                    "{} needs a floor above zero for its curve, got {}",
                    field, lo
                )
            }
            ConfigError::FeedbackRange { lo, hi } => {
                write!(
                    f,
                    "ranges.feedback must lie strictly inside (0, 1), got {}..{}",
                    lo, hi
                )
            }
            ConfigError::OutOfBounds {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "{} must be within {}..={}, got {}", field, min, max, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LooperConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_loop_capacity_is_sixty_seconds() {
        let config = LooperConfig::default();
        assert_eq!(config.loop_capacity(), 48_000 * 60);
    }

    #[test]
    fn test_rejects_zero_curve_floor() {
        let mut config = LooperConfig::default();
        config.ranges.cutoff.lo = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CurveFloor {
                field: "ranges.cutoff",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_wobble_deeper_than_five_percent() {
        let mut config = LooperConfig::default();
        config.wobble.max_amplitude = 0.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfBounds {
                field: "wobble.max_amplitude",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_feedback_reaching_unity() {
        let mut config = LooperConfig::default();
        config.ranges.feedback.hi = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FeedbackRange { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_block() {
        let mut config = LooperConfig::default();
        config.block_size = MAX_BLOCK_SIZE + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BlockSize { .. })
        ));
    }

    #[test]
    fn test_rejects_nan_sample_rate() {
        let mut config = LooperConfig::default();
        config.sample_rate = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "sample_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = ConfigError::OutOfBounds {
            field: "ranges.slip_max",
            value: 0.5,
            min: 0.0,
            max: 0.1,
        };
        assert!(err.to_string().contains("ranges.slip_max"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: LooperConfig = toml::from_str(
            r#"
            block_size = 64

            [features]
            feedback_modulation = "random_walk"
            slip_enabled = false
            "#,
        )
        .expect("parse config");

        assert_eq!(config.block_size, 64);
        assert_eq!(config.features.feedback_modulation, ModulationKind::RandomWalk);
        assert!(!config.features.slip_enabled);
        assert!(config.features.tone_shaping);
        assert_eq!(config.ranges, ParamRanges::default());
    }
}
