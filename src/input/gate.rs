/// Level-sense gate input.
///
/// Gates come from other modules' clean logic outputs, so there is no
/// debouncing: the level is taken as read and an edge is a low → high change
/// between consecutive ticks.
#[derive(Debug, Clone, Default)]
pub struct GateInput {
    level: bool,
    previous: bool,
}

impl GateInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, level: bool) {
        self.previous = self.level;
        self.level = level;
    }

    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    #[inline]
    pub fn rising_edge(&self) -> bool {
        self.level && !self.previous
    }
}
