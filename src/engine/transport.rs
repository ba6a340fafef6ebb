/// Record/playback buffer for one channel.
///
/// Every method is called from the audio domain and must be bounded in time
/// and allocation-free. Construction is where the buffer gets sized.
pub trait TransportEngine: Send {
    /// Edge-toggle between recording and playing. What a re-trigger means
    /// (close the first pass, start/stop overdub) is up to the engine.
    fn trigger_record(&mut self);

    /// Forget the recorded loop and stop recording.
    fn clear(&mut self);

    fn is_recording(&self) -> bool;

    /// Record `input` while recording, play back the loop otherwise.
    fn process(&mut self, input: f32) -> f32;

    /// Fraction of old material kept on each overdub pass, in (0, 1).
    fn set_decay(&mut self, decay: f32);

    fn set_rate_multiplier(&mut self, multiplier: f32);

    /// Read this many samples ahead of the playhead.
    fn set_read_offset(&mut self, samples: usize);

    /// Jump the playhead back to the start of the loop.
    fn reset_position(&mut self);

    fn set_half_speed(&mut self, half_speed: bool);

    /// Loop length in samples; zero until a loop exists.
    fn recorded_length(&self) -> usize;
}
