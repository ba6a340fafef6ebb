use std::f32::consts::PI;

use crate::engine::ToneShaper;

/*
Loop Tone Filter
================

Each channel's loop runs through a resonant low-pass before it is added back
to the dry signal. One knob sweeps the corner up while sweeping resonance
down, so a closed filter squelches and an open one is clean.

Topology
--------

A TPT (topology-preserving transform) state-variable filter:

    g  = tan(π · fc / fs)          prewarped integrator gain
    k  = 1 / Q                     damping
    h  = 1 / (1 + g·(g + k))

    v3 = x - ic2
    v1 = h · (ic1 + g · v3)        bandpass
    v2 = ic2 + g · v1              lowpass

    ic1 ← 2·v1 - ic1
    ic2 ← 2·v2 - ic2

Resonance is taken as Q directly, so the 0.05 - 10 control range maps to
k = 20 (heavily damped, gentle slope) down to k = 0.1 (tall peak). k stays
positive across the whole range, which keeps the filter stable at any
setting the knob can reach.

g needs a tan() and is only recomputed when the cutoff actually changes;
the control loop rewrites cutoff every tick but wobble moves it slowly.
*/

const MIN_CUTOFF_HZ: f32 = 20.0;
const MIN_Q: f32 = 0.05;
const MAX_Q: f32 = 20.0;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate,
            cutoff_hz: 0.0,
            resonance: 0.0,
            g: 0.0,
            k: 0.0,
        };
        filter.set_cutoff(cutoff_hz);
        filter.set_resonance(0.707);
        filter
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }
}

impl ToneShaper for SVFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.next_sample(input)
    }

    fn set_cutoff(&mut self, cutoff_hz: f32) {
        let nyquist_guard = 0.45 * self.sample_rate;
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, nyquist_guard);
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.g = (PI * cutoff / self.sample_rate).tan();
        }
    }

    fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(MIN_Q, MAX_Q);
        self.k = 1.0 / self.resonance;
    }
}
