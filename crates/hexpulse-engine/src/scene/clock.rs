//! Simulation clock.

/// Monotonically increasing simulation time, advanced once per frame
/// by the frame delta. Owned exclusively by the frame driver.
#[derive(Debug, Copy, Clone, Default)]
pub struct SceneClock {
    cur_time: f32,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in seconds.
    pub fn time(self) -> f32 {
        self.cur_time
    }

    /// Advances the clock by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.cur_time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(SceneClock::new().time(), 0.0);
    }

    #[test]
    fn accumulates_deltas() {
        let mut clock = SceneClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.time() - 0.75).abs() < 1e-6);
    }
}
