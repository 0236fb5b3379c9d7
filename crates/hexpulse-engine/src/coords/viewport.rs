/// Viewport size in physical pixels.
///
/// Renderers treat this as the basis for aspect-ratio computation; it
/// must always reflect the live drawable size, never a cached one.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, guarding the degenerate zero-height case.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_square() {
        assert_eq!(Viewport::new(800, 800).aspect(), 1.0);
    }

    #[test]
    fn aspect_wide() {
        assert_eq!(Viewport::new(1600, 800).aspect(), 2.0);
    }

    #[test]
    fn aspect_zero_height_is_finite() {
        assert!(Viewport::new(800, 0).aspect().is_finite());
    }
}
