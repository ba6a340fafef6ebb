//! Control curves: knob + jack combination and range mapping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Control Curves
==============

A knob or CV jack arrives as a normalized reading in [0, 1]. Parameters live
in physical ranges (Hz, Q, decay fraction) where equal knob travel should feel
like an equal musical change. A curve bends the reading before it is scaled
into the range.

Vocabulary
----------

  normalized    A raw control reading in [0, 1]. Unipolar everywhere in this
                crate: 0 = knob fully counter-clockwise / jack at 0 V.

  range         The (lo, hi) interval the parameter is mapped into.

  combine       Knob and jack drive the same parameter by ADDING. The sum
                saturates at 1 so a jack can only push a knob further open.


The Curves
----------

LINEAR
    lo + v * (hi - lo)
    Good for: decay amounts, blend, anything already perceptually linear.

EXPONENTIAL
    lo * (hi / lo)^v
    Equal knob travel = equal frequency RATIO. 20 Hz - 20 kHz spans ten
    octaves, so each tenth of the knob is one octave.
    Good for: filter cutoff, rates.

LOGARITHMIC
    The inverse of the exponential curve:

        lo + (hi - lo) * ln(1 + v * (hi/lo - 1)) / ln(hi/lo)

    Rises quickly then flattens. Used for resonance so the squelchy top of
    the range doesn't crowd into the last few degrees of the knob.

        hi ┤          ____------          LOG
           │     _--''
           │   /'                   ___-- EXP
           │  /              ___--''
        lo ┼-'______-----''
           0                      1

Both bent curves divide by lo, so lo must be above zero. Ranges here use
20 Hz and Q = 0.05 as floors for exactly this reason.

Inverse relationships (more knob = less resonance) are the caller's job:
map `1.0 - v` instead of `v`.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    Exponential,
    Logarithmic,
}

/// Combine a knob and a jack reading into one normalized control.
///
/// Saturates at 1.0 and never goes negative, whatever the inputs.
#[inline]
pub fn combine(a: f32, b: f32) -> f32 {
    (a + b).clamp(0.0, 1.0)
}

/// Map a normalized value into `lo..=hi` along `curve`.
///
/// Bent curves with a non-positive `lo` fall back to linear rather than
/// producing NaN.
#[inline]
pub fn map(value: f32, lo: f32, hi: f32, curve: Curve) -> f32 {
    let v = value.clamp(0.0, 1.0);

    let bent = matches!(curve, Curve::Exponential | Curve::Logarithmic);
    debug_assert!(!bent || lo > 0.0, "{:?} curve needs lo > 0, got {}", curve, lo);
    if bent && (lo <= 0.0 || hi <= lo) {
        return lo + v * (hi - lo);
    }

    match curve {
        Curve::Linear => lo + v * (hi - lo),
        Curve::Exponential => (lo * (hi / lo).powf(v)).clamp(lo, hi),
        Curve::Logarithmic => {
            let ratio = hi / lo;
            let shaped = (1.0 + v * (ratio - 1.0)).ln() / ratio.ln();
            (lo + shaped * (hi - lo)).clamp(lo, hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: usize = 100;

    fn grid() -> impl Iterator<Item = f32> {
        (0..=STEPS).map(|i| i as f32 / STEPS as f32)
    }

    #[test]
    fn test_combine_saturates_and_commutes() {
        for a in grid() {
            for b in grid() {
                let expected = (a + b).min(1.0);
                assert_eq!(combine(a, b), expected, "combine({}, {})", a, b);
                assert_eq!(combine(a, b), combine(b, a));
            }
        }
    }

    #[test]
    fn test_combine_never_leaves_unit_range() {
        assert_eq!(combine(-0.5, 0.2), 0.0);
        assert_eq!(combine(2.0, 3.0), 1.0);
        assert_eq!(combine(-1.0, -1.0), 0.0);
    }

    #[test]
    fn test_linear_endpoints_and_midpoint() {
        assert_eq!(map(0.0, 0.1, 0.95, Curve::Linear), 0.1);
        assert!((map(1.0, 0.1, 0.95, Curve::Linear) - 0.95).abs() < 1e-6);
        assert!((map(0.5, 0.0, 0.1, Curve::Linear) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_exponential_is_monotonic_with_exact_endpoints() {
        let (lo, hi) = (20.0, 20_000.0);
        assert_eq!(map(0.0, lo, hi, Curve::Exponential), lo);
        assert_eq!(map(1.0, lo, hi, Curve::Exponential), hi);

        let mut previous = f32::MIN;
        for v in grid() {
            let mapped = map(v, lo, hi, Curve::Exponential);
            assert!(
                mapped > previous,
                "exponential map not increasing at {}: {} <= {}",
                v,
                mapped,
                previous
            );
            previous = mapped;
        }
    }

    #[test]
    fn test_exponential_midpoint_is_geometric_mean() {
        let mid = map(0.5, 20.0, 20_000.0, Curve::Exponential);
        let geometric = (20.0f32 * 20_000.0).sqrt();
        assert!((mid - geometric).abs() < 0.5, "got {}", mid);
    }

    #[test]
    fn test_logarithmic_inverts_exponential_shape() {
        let (lo, hi) = (0.05, 10.0);
        assert!((map(0.0, lo, hi, Curve::Logarithmic) - lo).abs() < 1e-6);
        assert!((map(1.0, lo, hi, Curve::Logarithmic) - hi).abs() < 1e-4);

        // Log sits above the linear line, exponential below it.
        let linear = map(0.3, lo, hi, Curve::Linear);
        assert!(map(0.3, lo, hi, Curve::Logarithmic) > linear);
        assert!(map(0.3, lo, hi, Curve::Exponential) < linear);
    }

    #[test]
    fn test_logarithmic_is_monotonic() {
        let mut previous = f32::MIN;
        for v in grid() {
            let mapped = map(v, 0.05, 10.0, Curve::Logarithmic);
            assert!(mapped >= previous, "not increasing at {}", v);
            previous = mapped;
        }
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        assert_eq!(map(-1.0, 20.0, 200.0, Curve::Exponential), 20.0);
        assert_eq!(map(4.0, 20.0, 200.0, Curve::Exponential), 200.0);
    }
}
