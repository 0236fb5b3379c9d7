use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum ClockMode {
    /// Measured wall-clock deltas, clamped to `[dt_min, dt_max]`.
    Wall { dt_min: Duration, dt_max: Duration },
    /// Constant synthetic delta, used for offline capture runs.
    Fixed(Duration),
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per render loop, so applications do not share delta-time
/// state. In wall-clock mode delta time is clamped to avoid
/// pathological values when the application is paused by the debugger,
/// minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    mode: ClockMode,
}

impl FrameClock {
    /// Creates a wall-clock frame clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            mode: ClockMode::Wall {
                dt_min: Duration::from_micros(100), // 0.0001s
                dt_max: Duration::from_millis(250), // 0.25s
            },
        }
    }

    /// Creates a clock that always reports the given synthetic delta.
    ///
    /// Used when capturing frames offline at a fixed rate, where wall
    /// time is irrelevant.
    pub fn fixed(dt: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            mode: ClockMode::Fixed(dt),
        }
    }

    /// Resets the clock baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from
    /// suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();

        let dt = match self.mode {
            ClockMode::Wall { dt_min, dt_max } => {
                now.saturating_duration_since(self.last).clamp(dt_min, dt_max)
            }
            ClockMode::Fixed(dt) => dt,
        };

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_reports_constant_dt() {
        let mut clock = FrameClock::fixed(Duration::from_millis(25));
        for _ in 0..5 {
            let ft = clock.tick();
            assert_eq!(ft.dt, 0.025);
        }
    }

    #[test]
    fn frame_index_is_monotonic() {
        let mut clock = FrameClock::fixed(Duration::from_millis(1));
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn wall_mode_clamps_tiny_deltas() {
        let mut clock = FrameClock::new();
        // Two immediate ticks; dt must respect the minimum clamp.
        clock.tick();
        let ft = clock.tick();
        assert!(ft.dt >= 0.0001);
    }
}
