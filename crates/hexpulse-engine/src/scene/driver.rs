//! Per-frame driver state machine.

use crate::core::AppControl;

use super::clock::SceneClock;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum DriverState {
    Running,
    Closing,
}

/// Drives the render loop's simulation side: one clock, two states.
///
/// Close requests are observed only between frames; once `Closing` is
/// entered the driver invokes no further render callbacks and reports
/// exit, letting any in-flight frame complete normally.
#[derive(Debug)]
pub struct FrameDriver {
    clock: SceneClock,
    state: DriverState,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            clock: SceneClock::new(),
            state: DriverState::Running,
        }
    }

    /// Records an external close request (escape key, window close).
    ///
    /// Takes effect at the next frame boundary.
    pub fn request_close(&mut self) {
        self.state = DriverState::Closing;
    }

    pub fn is_closing(&self) -> bool {
        self.state == DriverState::Closing
    }

    /// Current simulation time.
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Runs one frame.
    ///
    /// While running, `render` receives the current simulation time and
    /// the clock then advances by `dt`. Once closing, `render` is never
    /// invoked and the call reports [`AppControl::Exit`].
    pub fn frame<F>(&mut self, dt: f32, render: F) -> AppControl
    where
        F: FnOnce(f32) -> AppControl,
    {
        if self.state == DriverState::Closing {
            return AppControl::Exit;
        }

        let control = render(self.clock.time());
        self.clock.advance(dt);
        control
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{GridDims, HeightField, TileShape};

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn starts_running() {
        assert!(!FrameDriver::new().is_closing());
    }

    #[test]
    fn closing_suppresses_render_and_reports_exit() {
        let mut driver = FrameDriver::new();
        driver.request_close();

        let mut rendered = false;
        let control = driver.frame(0.016, |_| {
            rendered = true;
            AppControl::Continue
        });

        assert_eq!(control, AppControl::Exit);
        assert!(!rendered, "no draws may be issued after a close request");
    }

    #[test]
    fn close_request_only_applies_between_frames() {
        // A request made during a frame still lets that frame finish.
        let mut driver = FrameDriver::new();
        let mut calls = 0;
        let control = driver.frame(0.016, |_| {
            calls += 1;
            AppControl::Continue
        });
        driver.request_close();
        assert_eq!(control, AppControl::Continue);
        assert_eq!(calls, 1);
        assert_eq!(driver.frame(0.016, |_| AppControl::Continue), AppControl::Exit);
    }

    // ── clock integration ─────────────────────────────────────────────────

    #[test]
    fn render_sees_time_before_advance() {
        let mut driver = FrameDriver::new();
        driver.frame(1.0, |t| {
            assert_eq!(t, 0.0);
            AppControl::Continue
        });
        driver.frame(1.0, |t| {
            assert_eq!(t, 1.0);
            AppControl::Continue
        });
    }

    #[test]
    fn one_cycle_in_sixty_steps_matches_analytic_elevation() {
        // Advance exactly one cycle (3.0s) in 60 equal steps and check
        // the final elevation of hexagon (0, 0) against the closed
        // form.
        let field = HeightField::seed(GridDims::new(12, 12), 1234);
        let mut driver = FrameDriver::new();
        let dt = 3.0 / 60.0;

        let mut last = 0.0;
        for _ in 0..60 {
            driver.frame(dt, |t| {
                last = field.elevation(TileShape::Hexagon, (0, 0), t);
                AppControl::Continue
            });
        }

        // After 60 frames the clock sits at 3.0; the last rendered
        // frame saw t = 3.0 - dt. Render one more to observe t = 3.0.
        driver.frame(dt, |t| {
            assert!((t - 3.0).abs() < 1e-4);
            last = field.elevation(TileShape::Hexagon, (0, 0), t);
            AppControl::Continue
        });

        let phase = field.phase(TileShape::Hexagon, (0, 0));
        let expected = 2.5 * (1.0 + (3.0 + phase).sin());
        assert!((last - expected).abs() < 1e-4);
    }
}
