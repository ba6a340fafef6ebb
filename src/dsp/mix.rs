//! Dry/loop crossfade weights.

/*
Dry/Loop Blend
==============

The blend knob (CV_1) crossfades between the live input and the loop:

    blend = 0.0  →  100% dry,   0% loop
    blend = 0.5  →   50% dry,  50% loop
    blend = 1.0  →    0% dry, 100% loop

The loop weight is the knob reading; the dry weight is its complement, so
the two always sum to exactly 1.0 and a full-scale input never gets boosted
by the mix.

Only the loop half goes through the tone-shaping filter. The filtered loop
is ADDED back to the dry half:

    out = filter(loop × w) + dry × (1 - w)

so the dry path's gain never depends on what the filter is doing.
*/

/// A complementary pair of gains that always sums to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade {
    dry: f32,
    wet: f32,
}

impl Crossfade {
    pub fn new(balance: f32) -> Self {
        let wet = balance.clamp(0.0, 1.0);
        Self {
            dry: 1.0 - wet,
            wet,
        }
    }

    #[inline]
    pub fn dry(&self) -> f32 {
        self.dry
    }

    #[inline]
    pub fn wet(&self) -> f32 {
        self.wet
    }
}
