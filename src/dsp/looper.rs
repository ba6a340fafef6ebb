use crate::engine::TransportEngine;

/*
Loop Buffer
===========

One channel's record/playback engine. The buffer is allocated once, sized
for the longest loop, and never touched by the allocator again.

States
------

    ┌───────┐ trigger ┌───────────┐ trigger / full ┌─────────┐
    │ Empty │ ──────→ │ FirstPass │ ─────────────→ │ Playing │
    └───────┘         └───────────┘                └─────────┘
        ↑                                           │     ↑
        │ clear (from any state)           trigger  │     │ trigger
        │                                           ↓     │
        └─────────────────────────────────────── ┌────────────┐
                                                 │ Overdubbing│
                                                 └────────────┘

FirstPass writes the input at unity gain. Closing it fixes the loop length.
A first pass that is closed before any sample arrives leaves the looper
Empty again.

Overdubbing mixes new input over the old material, fading the old by the
decay amount each pass:

    buffer[i] = buffer[i] × decay + input


Playhead
--------

The playhead is fractional and kept in f64: at 60 s a loop spans 2.88M
samples, far past where an f32 can still resolve a 0.97 step. It advances by

    rate_multiplier × (0.5 if half speed else 1.0)

samples per sample, and wraps at the loop length. Reads interpolate linearly
between neighbouring samples, starting `read_offset` samples ahead of the
playhead. That offset is the "slip": left reads slightly ahead of right and
the two sides phase against each other.

Overdub writes land on the playhead itself (no offset), so slip never
smears what is being recorded. Each buffer index is written at most once per
visit: at half speed the playhead sits on every index for two samples, and
only the first of them overdubs.


Clearing
--------

Clearing only forgets the length. The next first pass overwrites from index
zero and the loop never reads past what that pass wrote, so stale samples are
unreachable and no 60-second zero-fill is needed inside the audio callback.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperState {
    Empty,
    FirstPass,
    Playing,
    Overdubbing,
}

pub struct Looper {
    buffer: Vec<f32>,
    state: LooperState,
    recorded_len: usize,
    write_pos: usize,

    playhead: f64,
    last_overdub: Option<usize>,
    read_offset: usize,
    decay: f32,
    rate_multiplier: f32,
    half_speed: bool,
}

impl Looper {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            state: LooperState::Empty,
            recorded_len: 0,
            write_pos: 0,
            playhead: 0.0,
            last_overdub: None,
            read_offset: 0,
            decay: 0.5,
            rate_multiplier: 1.0,
            half_speed: false,
        }
    }

    pub fn state(&self) -> LooperState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn half_speed(&self) -> bool {
        self.half_speed
    }

    #[inline]
    fn increment(&self) -> f64 {
        let speed = if self.half_speed { 0.5 } else { 1.0 };
        self.rate_multiplier as f64 * speed
    }

    fn close_first_pass(&mut self) {
        self.recorded_len = self.write_pos;
        self.write_pos = 0;
        self.playhead = 0.0;
        self.state = if self.recorded_len == 0 {
            LooperState::Empty
        } else {
            LooperState::Playing
        };
    }

    #[inline]
    fn read(&self, len: usize) -> f32 {
        let whole = self.playhead as usize;
        let frac = (self.playhead - whole as f64) as f32;

        let a = (whole + self.read_offset) % len;
        let b = (a + 1) % len;

        self.buffer[a] + (self.buffer[b] - self.buffer[a]) * frac
    }

    #[inline]
    fn advance(&mut self, len: usize) {
        let len = len as f64;
        self.playhead += self.increment();
        if self.playhead >= len {
            self.playhead %= len;
            self.last_overdub = None;
        }
    }
}

impl TransportEngine for Looper {
    fn trigger_record(&mut self) {
        match self.state {
            LooperState::Empty => {
                self.write_pos = 0;
                self.state = LooperState::FirstPass;
            }
            LooperState::FirstPass => self.close_first_pass(),
            LooperState::Playing => {
                self.last_overdub = None;
                self.state = LooperState::Overdubbing;
            }
            LooperState::Overdubbing => self.state = LooperState::Playing,
        }
    }

    fn clear(&mut self) {
        self.state = LooperState::Empty;
        self.recorded_len = 0;
        self.write_pos = 0;
        self.playhead = 0.0;
        self.last_overdub = None;
    }

    fn is_recording(&self) -> bool {
        matches!(
            self.state,
            LooperState::FirstPass | LooperState::Overdubbing
        )
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        match self.state {
            LooperState::Empty => 0.0,
            LooperState::FirstPass => {
                self.buffer[self.write_pos] = input;
                self.write_pos += 1;
                if self.write_pos >= self.buffer.len() {
                    self.close_first_pass();
                }
                0.0
            }
            LooperState::Playing => {
                let len = self.recorded_len;
                let out = self.read(len);
                self.advance(len);
                out
            }
            LooperState::Overdubbing => {
                let len = self.recorded_len;
                let out = self.read(len);

                let idx = (self.playhead as usize) % len;
                if self.last_overdub != Some(idx) {
                    self.buffer[idx] = self.buffer[idx] * self.decay + input;
                    self.last_overdub = Some(idx);
                }

                self.advance(len);
                out
            }
        }
    }

    fn set_decay(&mut self, decay: f32) {
        self.decay = decay.clamp(0.0, 1.0);
    }

    fn set_rate_multiplier(&mut self, multiplier: f32) {
        self.rate_multiplier = multiplier.max(0.0);
    }

    fn set_read_offset(&mut self, samples: usize) {
        self.read_offset = samples;
    }

    fn reset_position(&mut self) {
        self.playhead = 0.0;
        self.last_overdub = None;
    }

    fn set_half_speed(&mut self, half_speed: bool) {
        self.half_speed = half_speed;
    }

    fn recorded_length(&self) -> usize {
        self.recorded_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_ramp(looper: &mut Looper, len: usize) {
        looper.trigger_record();
        for i in 0..len {
            looper.process(i as f32);
        }
        looper.trigger_record();
    }

    #[test]
    fn test_first_pass_sets_length_and_plays_back() {
        let mut looper = Looper::new(64);
        record_ramp(&mut looper, 8);

        assert_eq!(looper.state(), LooperState::Playing);
        assert_eq!(looper.recorded_length(), 8);
        assert!(!looper.is_recording());

        let played: Vec<f32> = (0..10).map(|_| looper.process(0.0)).collect();
        assert_eq!(played, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 0.0, 1.0]);
    }

    #[test]
    fn test_recorded_length_is_zero_during_first_pass() {
        let mut looper = Looper::new(64);
        looper.trigger_record();
        looper.process(1.0);
        looper.process(1.0);

        assert!(looper.is_recording());
        assert_eq!(looper.recorded_length(), 0);
    }

    #[test]
    fn test_empty_first_pass_returns_to_empty() {
        let mut looper = Looper::new(64);
        looper.trigger_record();
        looper.trigger_record();
        assert_eq!(looper.state(), LooperState::Empty);
    }

    #[test]
    fn test_first_pass_closes_when_buffer_fills() {
        let mut looper = Looper::new(4);
        looper.trigger_record();
        for _ in 0..4 {
            looper.process(0.5);
        }
        assert_eq!(looper.state(), LooperState::Playing);
        assert_eq!(looper.recorded_length(), 4);
    }

    #[test]
    fn test_overdub_applies_decay() {
        let mut looper = Looper::new(16);
        looper.trigger_record();
        for _ in 0..4 {
            looper.process(1.0);
        }
        looper.trigger_record();
        looper.set_decay(0.5);

        looper.trigger_record();
        assert_eq!(looper.state(), LooperState::Overdubbing);
        for _ in 0..4 {
            looper.process(0.25);
        }
        looper.trigger_record();

        let played: Vec<f32> = (0..4).map(|_| looper.process(0.0)).collect();
        assert!(played.iter().all(|&s| (s - 0.75).abs() < 1e-6), "{:?}", played);
    }

    #[test]
    fn test_half_speed_interpolates_between_samples() {
        let mut looper = Looper::new(16);
        record_ramp(&mut looper, 4);
        looper.set_half_speed(true);

        let played: Vec<f32> = (0..4).map(|_| looper.process(0.0)).collect();
        assert_eq!(played, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_half_speed_overdub_writes_each_index_once() {
        let mut looper = Looper::new(16);
        looper.trigger_record();
        for _ in 0..4 {
            looper.process(1.0);
        }
        looper.trigger_record();
        looper.set_decay(0.5);
        looper.set_half_speed(true);

        // Eight samples at half speed cover the four-sample loop once.
        looper.trigger_record();
        for _ in 0..8 {
            looper.process(0.25);
        }
        looper.trigger_record();
        looper.set_half_speed(false);

        let played: Vec<f32> = (0..4).map(|_| looper.process(0.0)).collect();
        assert!(
            played.iter().all(|&s| (s - 0.75).abs() < 1e-6),
            "each index should decay and mix once: {:?}",
            played
        );
    }

    #[test]
    fn test_detune_holds_on_long_loop() {
        let len = 1_200_000;
        let mut looper = Looper::new(len + 16);
        looper.trigger_record();
        for _ in 0..len {
            looper.process(0.0);
        }
        looper.trigger_record();
        looper.set_rate_multiplier(0.97);

        for _ in 0..1_100_000 {
            looper.process(0.0);
        }
        let start = looper.playhead();
        for _ in 0..1_000 {
            looper.process(0.0);
        }
        let moved = looper.playhead() - start;
        assert!(
            start > 1_000_000.0 && (moved - 970.0).abs() < 1e-3,
            "moved {} over 1000 samples from {} (expected 970)",
            moved,
            start
        );
    }

    #[test]
    fn test_read_offset_reads_ahead() {
        let mut looper = Looper::new(16);
        record_ramp(&mut looper, 8);
        looper.set_read_offset(3);

        assert_eq!(looper.process(0.0), 3.0);
        assert_eq!(looper.process(0.0), 4.0);
    }

    #[test]
    fn test_reset_position_rewinds() {
        let mut looper = Looper::new(16);
        record_ramp(&mut looper, 8);
        for _ in 0..5 {
            looper.process(0.0);
        }
        looper.reset_position();
        assert_eq!(looper.process(0.0), 0.0);
    }

    #[test]
    fn test_clear_forgets_loop() {
        let mut looper = Looper::new(16);
        record_ramp(&mut looper, 8);
        looper.trigger_record();
        looper.clear();

        assert_eq!(looper.recorded_length(), 0);
        assert!(!looper.is_recording());
        assert_eq!(looper.process(1.0), 0.0);
    }

    #[test]
    fn test_detuned_rate_stays_inside_loop() {
        let mut looper = Looper::new(64);
        record_ramp(&mut looper, 10);
        looper.set_rate_multiplier(1.03);
        for _ in 0..10_000 {
            looper.process(0.0);
            assert!(looper.playhead() < 10.0);
        }
    }
}
