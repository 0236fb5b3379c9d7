//! Tile shapes and grid-to-world layout.
//!
//! Two interlocking lattices: hexagons on the base grid, diamonds in
//! the gaps between them (one fewer row and column). Layout arithmetic
//! lives here and nowhere else so both render passes place geometry
//! identically.

/// cos(30°); hexagon half-width and the horizontal cell pitch factor.
const COS_30: f32 = 0.866_025_4;

/// The two tile shapes, in draw order.
pub const TILE_SHAPES: [TileShape; 2] = [TileShape::Hexagon, TileShape::Diamond];

/// Closed shape dispatch: each variant carries its own outline and
/// grid dimensions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TileShape {
    Hexagon,
    Diamond,
}

impl TileShape {
    /// Shape-local outline points, wound counter-clockwise.
    ///
    /// Shared read-only by every instance of the shape; renderers draw
    /// them as a closed line loop.
    pub fn outline(self) -> &'static [[f32; 2]] {
        match self {
            TileShape::Hexagon => &[
                [COS_30, 0.5],
                [0.0, 1.0],
                [-COS_30, 0.5],
                [-COS_30, -0.5],
                [0.0, -1.0],
                [COS_30, -0.5],
            ],
            TileShape::Diamond => &[
                [COS_30, 0.0],
                [0.0, 0.5],
                [-COS_30, 0.0],
                [0.0, -0.5],
            ],
        }
    }

    /// Grid dimensions for this shape given the base (hexagon) grid.
    ///
    /// Diamonds occupy the gaps between hexagons, so their lattice has
    /// one fewer row and column.
    pub fn grid_dims(self, base: GridDims) -> GridDims {
        match self {
            TileShape::Hexagon => base,
            TileShape::Diamond => {
                GridDims::new(base.rows.saturating_sub(1), base.cols.saturating_sub(1))
            }
        }
    }
}

/// Row/column counts of a tile lattice, fixed at construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GridDims {
    pub rows: u32,
    pub cols: u32,
}

impl GridDims {
    #[inline]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    #[inline]
    pub const fn cell_count(self) -> u32 {
        self.rows * self.cols
    }
}

/// World-space center of cell (row, col) for a lattice of `dims`.
///
/// The lattice is centered on the world origin; using each shape's own
/// dimensions offsets the diamond lattice by half a cell in both axes,
/// placing diamonds exactly in the hexagon gaps.
pub fn cell_center(dims: GridDims, row: u32, col: u32) -> [f32; 2] {
    let x = 2.0 * COS_30 * (col as f32 - 0.5 * dims.cols.saturating_sub(1) as f32);
    let y = 2.0 * (row as f32 - 0.5 * dims.rows.saturating_sub(1) as f32);
    [x, y]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── outlines ──────────────────────────────────────────────────────────

    #[test]
    fn outline_point_counts() {
        assert_eq!(TileShape::Hexagon.outline().len(), 6);
        assert_eq!(TileShape::Diamond.outline().len(), 4);
    }

    #[test]
    fn outlines_are_origin_symmetric() {
        for shape in TILE_SHAPES {
            let pts = shape.outline();
            for p in pts {
                let mirrored = [-p[0], -p[1]];
                assert!(
                    pts.iter().any(|q| *q == mirrored),
                    "{shape:?} outline not symmetric at {p:?}"
                );
            }
        }
    }

    // ── dimensions ────────────────────────────────────────────────────────

    #[test]
    fn diamond_grid_is_one_smaller() {
        let base = GridDims::new(12, 12);
        assert_eq!(TileShape::Hexagon.grid_dims(base), base);
        assert_eq!(TileShape::Diamond.grid_dims(base), GridDims::new(11, 11));
    }

    #[test]
    fn zero_dimension_grids_do_not_underflow() {
        // The diamond lattice saturates at zero instead of wrapping.
        let empty = GridDims::new(0, 0);
        assert_eq!(TileShape::Diamond.grid_dims(empty), empty);
        assert_eq!(TileShape::Diamond.grid_dims(empty).cell_count(), 0);

        let [x, y] = cell_center(empty, 0, 0);
        assert!(x.is_finite() && y.is_finite());
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn centers_symmetric_about_origin() {
        // For a 12x12 hexagon lattice the sets of x and y coordinates
        // must each be symmetric around zero.
        let dims = GridDims::new(12, 12);
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for i in 0..dims.rows {
            for j in 0..dims.cols {
                let [x, y] = cell_center(dims, i, j);
                xs.push(x);
                ys.push(y);
            }
        }
        for &x in &xs {
            assert!(xs.iter().any(|&o| (o + x).abs() < 1e-4), "x {x} unmatched");
        }
        for &y in &ys {
            assert!(ys.iter().any(|&o| (o + y).abs() < 1e-4), "y {y} unmatched");
        }
    }

    #[test]
    fn horizontal_pitch_is_two_cos_30() {
        let dims = GridDims::new(12, 12);
        let [x0, _] = cell_center(dims, 0, 0);
        let [x1, _] = cell_center(dims, 0, 1);
        assert!((x1 - x0 - 2.0 * COS_30).abs() < 1e-6);
    }

    #[test]
    fn vertical_pitch_is_two() {
        let dims = GridDims::new(12, 12);
        let [_, y0] = cell_center(dims, 0, 0);
        let [_, y1] = cell_center(dims, 1, 0);
        assert!((y1 - y0 - 2.0).abs() < 1e-6);
    }
}
