//! Light and camera view-projection rigs.
//!
//! Both are pure derived values recomputed every frame from constants;
//! neither carries mutable state. Projections use glam's `_rh` builders
//! ([0, 1] clip depth, wgpu convention).

use glam::{Mat4, Vec3};

use crate::coords::Viewport;

/// Directional light observer: fixed position looking at the origin,
/// orthographic projection over a fixed symmetric scene box.
#[derive(Debug, Copy, Clone)]
pub struct LightRig {
    pub position: Vec3,
}

impl LightRig {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Orthographic view-projection; constant across frames.
    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 1.0, 50.0);
        let view = Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y);
        projection * view
    }
}

/// Viewer observer: fixed eye looking at the origin, 45° vertical fov
/// perspective whose aspect follows the live viewport.
#[derive(Debug, Copy, Clone)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraRig {
    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }

    /// Perspective view-projection for the given viewport.
    ///
    /// The aspect term is taken from `viewport` each call; nothing is
    /// cached, so resizes are picked up immediately.
    pub fn view_projection(&self, viewport: Viewport) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fov_y, viewport.aspect(), self.near, self.far);
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        projection * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── light ─────────────────────────────────────────────────────────────

    #[test]
    fn light_view_projection_is_constant() {
        // No time dependency: repeated evaluation yields the same
        // matrix bit for bit.
        let light = LightRig::new(Vec3::new(-6.0, -12.0, 15.0));
        assert_eq!(light.view_projection(), light.view_projection());
    }

    #[test]
    fn light_matrix_is_finite() {
        let m = LightRig::new(Vec3::new(-6.0, -12.0, 15.0)).view_projection();
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
    }

    // ── camera ────────────────────────────────────────────────────────────

    #[test]
    fn camera_aspect_follows_viewport() {
        let cam = CameraRig::new(Vec3::new(0.0, -6.0, 12.0));
        let square = cam.view_projection(Viewport::new(800, 800));
        let wide = cam.view_projection(Viewport::new(1600, 800));
        assert_ne!(square, wide);

        // Only the projection's x focal term depends on aspect, so
        // doubling the aspect halves every x-row entry of the composed
        // matrix while the shared view factor cancels out.
        let s = square.to_cols_array_2d();
        let w = wide.to_cols_array_2d();
        for (sc, wc) in s.iter().zip(w.iter()) {
            assert!((wc[0] * 2.0 - sc[0]).abs() < 1e-5);
        }
        for (sc, wc) in s.iter().zip(w.iter()) {
            for k in 1..4 {
                assert!((sc[k] - wc[k]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn camera_matrix_is_deterministic() {
        let cam = CameraRig::new(Vec3::new(0.0, -6.0, 12.0));
        let vp = Viewport::new(800, 800);
        assert_eq!(cam.view_projection(vp), cam.view_projection(vp));
    }
}
