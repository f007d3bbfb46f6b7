/// Continuous in-zone time, tracked alongside the score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WarmupStreak {
    current: f64,
    best: f64,
}

impl WarmupStreak {
    /// Extend the streak by `dt` on a perfect frame, otherwise break it.
    pub fn update(&mut self, dt: f64, perfect: bool) {
        if perfect {
            self.current += dt;
            self.best = self.best.max(self.current);
        } else {
            self.current = 0.0;
        }
    }

    /// Seconds in zone since the last miss.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Longest streak seen since the last reset.
    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
