/// Per-channel resonant low-pass.
///
/// Sample rate is fixed at construction.
pub trait ToneShaper: Send {
    fn process(&mut self, input: f32) -> f32;

    fn set_cutoff(&mut self, cutoff_hz: f32);

    fn set_resonance(&mut self, resonance: f32);
}
