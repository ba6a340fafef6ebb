/*
Debounced Switch
================

Mechanical contacts bounce: a single press reads as a burst of on/off
transitions for a few milliseconds. The debouncer keeps the last eight raw
reads in a shift register and only believes a level that has been stable
for seven of them.

    state = (state << 1) | raw

    0b0111_1111   rising edge   seven highs after a low
    0b1000_0000   falling edge  seven lows after a high
    0b1111_1111   pressed       eight highs in a row

Edges are true for exactly one call. `debounce` must run once per tick, and
the answers only describe that tick.

Held time is measured from the tick the rising edge was seen. It reads zero
whenever the switch isn't fully pressed.
*/

const RISING: u8 = 0b0111_1111;
const FALLING: u8 = 0b1000_0000;
const PRESSED: u8 = 0b1111_1111;

#[derive(Debug, Clone, Default)]
pub struct Switch {
    state: u8,
    rising_at_ms: f64,
    now_ms: f64,
}

impl Switch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift in one raw read taken at `now_ms`.
    #[inline]
    pub fn debounce(&mut self, raw: bool, now_ms: f64) {
        self.state = (self.state << 1) | raw as u8;
        self.now_ms = now_ms;
        if self.rising_edge() {
            self.rising_at_ms = now_ms;
        }
    }

    #[inline]
    pub fn rising_edge(&self) -> bool {
        self.state == RISING
    }

    #[inline]
    pub fn falling_edge(&self) -> bool {
        self.state == FALLING
    }

    #[inline]
    pub fn pressed(&self) -> bool {
        self.state == PRESSED
    }

    /// Milliseconds since the rising edge, or zero when not pressed.
    #[inline]
    pub fn time_held_ms(&self) -> f64 {
        if self.pressed() {
            self.now_ms - self.rising_at_ms
        } else {
            0.0
        }
    }
}
