#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a debounced transition.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Toggle-driven playback speed.
///
/// ```text
/// Normal --(falling edge)--> HalfSpeed --(rising edge)--> Normal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HalfSpeedState {
    #[default]
    Normal,
    HalfSpeed,
}

impl HalfSpeedState {
    /// Apply one edge. Returns the new state when it changed.
    pub fn on_edge(&mut self, edge: Edge) -> Option<HalfSpeedState> {
        let next = match edge {
            Edge::Falling => HalfSpeedState::HalfSpeed,
            Edge::Rising => HalfSpeedState::Normal,
        };
        if next == *self {
            None
        } else {
            *self = next;
            Some(next)
        }
    }

    pub fn is_half_speed(self) -> bool {
        self == HalfSpeedState::HalfSpeed
    }
}
