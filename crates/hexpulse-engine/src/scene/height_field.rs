//! Per-cell elevation state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::grid::{GridDims, TileShape};

/// Upper bound (exclusive) of the random per-cell phase.
pub const PHASE_MAX: f32 = 2.5;

/// Upper bound of [`HeightField::elevation`]: `2.5 * (1 + sin)` peaks
/// at 5.
pub const ELEVATION_MAX: f32 = 5.0;

/// Dense per-cell phase table for one shape's lattice.
///
/// Bounds are fixed at construction; cells are never added or removed.
struct PhaseGrid {
    dims: GridDims,
    phases: Vec<f32>,
}

impl PhaseGrid {
    fn fill(dims: GridDims, rng: &mut StdRng) -> Self {
        let phases = (0..dims.cell_count())
            .map(|_| rng.gen_range(0.0..PHASE_MAX))
            .collect();
        Self { dims, phases }
    }

    fn phase(&self, row: u32, col: u32) -> f32 {
        debug_assert!(row < self.dims.rows && col < self.dims.cols);
        self.phases[(row * self.dims.cols + col) as usize]
    }
}

/// Immutable random phases for every hexagon and diamond cell.
///
/// Seeded exactly once; elevation afterwards is a pure function of
/// (shape, cell, time).
pub struct HeightField {
    hexagon: PhaseGrid,
    diamond: PhaseGrid,
}

impl HeightField {
    /// Draws one uniform phase in `[0, PHASE_MAX)` per cell of each
    /// lattice, hexagons first, from a deterministic seed.
    pub fn seed(base: GridDims, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let hexagon = PhaseGrid::fill(TileShape::Hexagon.grid_dims(base), &mut rng);
        let diamond = PhaseGrid::fill(TileShape::Diamond.grid_dims(base), &mut rng);
        Self { hexagon, diamond }
    }

    /// Fixed phase of one cell.
    pub fn phase(&self, shape: TileShape, (row, col): (u32, u32)) -> f32 {
        match shape {
            TileShape::Hexagon => self.hexagon.phase(row, col),
            TileShape::Diamond => self.diamond.phase(row, col),
        }
    }

    /// Elevation of one cell at simulation time `time`.
    ///
    /// Always in `[0, ELEVATION_MAX]`, periodic in `time` with period
    /// 2π, continuous everywhere.
    pub fn elevation(&self, shape: TileShape, cell: (u32, u32), time: f32) -> f32 {
        0.5 * ELEVATION_MAX * (1.0 + (time + self.phase(shape, cell)).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAU: f32 = std::f32::consts::TAU;

    fn field() -> HeightField {
        HeightField::seed(GridDims::new(12, 12), 42)
    }

    // ── seeding ───────────────────────────────────────────────────────────

    #[test]
    fn seeding_is_deterministic() {
        let a = field();
        let b = field();
        for shape in super::super::grid::TILE_SHAPES {
            let dims = shape.grid_dims(GridDims::new(12, 12));
            for i in 0..dims.rows {
                for j in 0..dims.cols {
                    assert_eq!(a.phase(shape, (i, j)), b.phase(shape, (i, j)));
                }
            }
        }
    }

    #[test]
    fn phases_within_bounds() {
        let f = field();
        for shape in super::super::grid::TILE_SHAPES {
            let dims = shape.grid_dims(GridDims::new(12, 12));
            for i in 0..dims.rows {
                for j in 0..dims.cols {
                    let p = f.phase(shape, (i, j));
                    assert!((0.0..PHASE_MAX).contains(&p), "phase {p} out of range");
                }
            }
        }
    }

    // ── elevation ─────────────────────────────────────────────────────────

    #[test]
    fn elevation_stays_in_range() {
        let f = field();
        for step in -200..200 {
            let t = step as f32 * 0.173;
            for shape in super::super::grid::TILE_SHAPES {
                let e = f.elevation(shape, (0, 0), t);
                assert!((0.0..=ELEVATION_MAX).contains(&e), "elevation {e} at t={t}");
            }
        }
    }

    #[test]
    fn elevation_is_periodic_in_tau() {
        let f = field();
        for step in 0..50 {
            let t = step as f32 * 0.37;
            let a = f.elevation(TileShape::Hexagon, (3, 4), t);
            let b = f.elevation(TileShape::Hexagon, (3, 4), t + TAU);
            assert!((a - b).abs() < 1e-4, "period violated at t={t}: {a} vs {b}");
        }
    }

    #[test]
    fn elevation_is_continuous() {
        // Sampled finite differences stay bounded by the analytic
        // derivative limit (2.5 * dt) plus float slack.
        let f = field();
        let dt = 1e-3;
        for step in 0..1000 {
            let t = step as f32 * 0.01;
            let a = f.elevation(TileShape::Diamond, (5, 5), t);
            let b = f.elevation(TileShape::Diamond, (5, 5), t + dt);
            assert!((b - a).abs() <= 2.5 * dt + 1e-4);
        }
    }

    #[test]
    fn elevation_matches_analytic_form() {
        let f = field();
        let phase = f.phase(TileShape::Hexagon, (0, 0));
        let t = 3.0;
        let expected = 2.5 * (1.0 + (t + phase).sin());
        assert!((f.elevation(TileShape::Hexagon, (0, 0), t) - expected).abs() < 1e-6);
    }
}
