use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, AtomicUsize, Ordering};

use crate::{channel::Channel, input::Edge};

const NO_EDGE: u8 = 0;
const RISING: u8 = 1;
const FALLING: u8 = 2;

/// State the audio callback publishes for the control loop.
///
/// Each slot is a single atomic scalar with one writer, so no locks are
/// needed. The audio side writes everything except the dropped-message
/// counter, which belongs to the control loop. The toggle edge slot is
/// consumed by `swap`, so every edge reaches the control loop exactly once.
#[derive(Debug, Default)]
pub struct SharedState {
    recorded_len: [AtomicUsize; 2],
    recording: [AtomicBool; 2],
    status_bits: AtomicU32,
    toggle_edge: AtomicU8,
    dropped: AtomicU64,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded_length(&self, channel: Channel) -> usize {
        self.recorded_len[channel.index()].load(Ordering::Acquire)
    }

    pub fn is_recording(&self, channel: Channel) -> bool {
        self.recording[channel.index()].load(Ordering::Acquire)
    }

    pub fn status_volts(&self) -> f32 {
        f32::from_bits(self.status_bits.load(Ordering::Relaxed))
    }

    /// Parameter messages the control loop dropped on a full ring.
    pub fn dropped_messages(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Count one dropped message, returning the new total.
    pub(crate) fn note_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn publish_channel(&self, channel: Channel, recorded_len: usize, recording: bool) {
        self.recorded_len[channel.index()].store(recorded_len, Ordering::Release);
        self.recording[channel.index()].store(recording, Ordering::Release);
    }

    pub(crate) fn publish_status(&self, volts: f32) {
        self.status_bits.store(volts.to_bits(), Ordering::Relaxed);
    }

    /// Latest toggle edge wins: it always matches the switch's final level.
    pub(crate) fn publish_toggle_edge(&self, edge: Edge) {
        let code = match edge {
            Edge::Rising => RISING,
            Edge::Falling => FALLING,
        };
        self.toggle_edge.store(code, Ordering::Release);
    }

    /// Take the pending toggle edge, marking it consumed.
    pub(crate) fn take_toggle_edge(&self) -> Option<Edge> {
        match self.toggle_edge.swap(NO_EDGE, Ordering::AcqRel) {
            RISING => Some(Edge::Rising),
            FALLING => Some(Edge::Falling),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_edge_consumed_once() {
        let shared = SharedState::new();
        assert_eq!(shared.take_toggle_edge(), None);

        shared.publish_toggle_edge(Edge::Falling);
        assert_eq!(shared.take_toggle_edge(), Some(Edge::Falling));
        assert_eq!(shared.take_toggle_edge(), None);
    }

    #[test]
    fn test_latest_toggle_edge_wins() {
        let shared = SharedState::new();
        shared.publish_toggle_edge(Edge::Falling);
        shared.publish_toggle_edge(Edge::Rising);
        assert_eq!(shared.take_toggle_edge(), Some(Edge::Rising));
    }

    #[test]
    fn test_status_round_trips_through_bits() {
        let shared = SharedState::new();
        shared.publish_status(2.5);
        assert_eq!(shared.status_volts(), 2.5);
    }
}
