#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One side of the stereo pair. Each side owns its own transport, filter and
/// wobble sources.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }

    /// Sign of the stereo perturbation: left drifts up, right drifts down.
    #[inline]
    pub fn spread_sign(self) -> f32 {
        match self {
            Channel::Left => 1.0,
            Channel::Right => -1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Left => "left",
            Channel::Right => "right",
        }
    }
}
