//! Immutable 2D occupancy grid.
//!
//! A `Grid` is built once per plan request and never mutated afterward; the
//! search, line-of-sight predicate, and simplifier all share read-only
//! access to the same instance, so a `Grid` may be planned over
//! concurrently from multiple threads without synchronization.

/// A grid cell address, `(row, column)`, both nonnegative. Row is the first
/// axis everywhere in this crate; any (x, y) = (column, row) swap belongs to
/// a rendering layer outside this crate.
pub type Cell = (usize, usize);

/// Rectangular binary occupancy map.
#[derive(Debug, Clone)]
pub struct Grid {
    height: usize,
    width: usize,
    /// Row-major; `true` means blocked.
    blocked: Vec<bool>,
}

impl Grid {
    /// Create an entirely free grid of the given dimensions.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            blocked: vec![false; height * width],
        }
    }

    /// Build a grid from a pre-decoded byte matrix: `0` is free, any other
    /// byte is blocked. All rows must share the same length.
    ///
    /// # Panics
    /// Panics if `rows` is empty or rows have differing lengths.
    pub fn from_bytes(rows: &[Vec<u8>]) -> Self {
        assert!(!rows.is_empty(), "grid must have at least one row");
        let width = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == width),
            "all grid rows must share the same width"
        );

        let height = rows.len();
        let mut blocked = Vec::with_capacity(height * width);
        for row in rows {
            for &b in row {
                blocked.push(b != 0);
            }
        }

        Self {
            height,
            width,
            blocked,
        }
    }

    /// Build a grid from a grayscale intensity matrix and a threshold:
    /// cells with intensity strictly less than `threshold` are blocked.
    /// Image decoding itself is out of scope; `intensities` is already a
    /// decoded matrix.
    pub fn from_thresholded(intensities: &[Vec<u8>], threshold: u8) -> Self {
        assert!(!intensities.is_empty(), "grid must have at least one row");
        let width = intensities[0].len();
        assert!(
            intensities.iter().all(|r| r.len() == width),
            "all grid rows must share the same width"
        );

        let height = intensities.len();
        let mut blocked = Vec::with_capacity(height * width);
        for row in intensities {
            for &px in row {
                blocked.push(px < threshold);
            }
        }

        Self {
            height,
            width,
            blocked,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `true` iff `(r, c)` addresses a cell in the grid.
    #[inline]
    pub fn in_bounds(&self, (r, c): Cell) -> bool {
        r < self.height && c < self.width
    }

    /// `true` iff `(r, c)` is in bounds and free. Out-of-bounds cells are
    /// never passable.
    #[inline]
    pub fn passable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.blocked[self.index(cell)]
    }

    #[inline]
    fn index(&self, (r, c): Cell) -> usize {
        r * self.width + c
    }

    /// Set a single cell's occupancy. Out-of-bounds cells are ignored.
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if self.in_bounds(cell) {
            let idx = self.index(cell);
            self.blocked[idx] = blocked;
        }
    }
}

/// Inflate obstacles by `radius` cells using a two-pass squared Euclidean
/// distance transform, marking every cell within `radius` of a blocked cell
/// as blocked. A pure grid transform (no image I/O); the underlying math
/// mirrors the distance-transform buffering a cost-map builder would do
/// ahead of planning.
pub fn inflate_obstacles(grid: &Grid, radius: f64) -> Grid {
    let (h, w) = (grid.height(), grid.width());
    let inf = i64::MAX / 4;
    let mut dist_sq = vec![inf; h * w];

    for r in 0..h {
        for c in 0..w {
            if grid.blocked[r * w + c] {
                dist_sq[r * w + c] = 0;
            }
        }
    }

    // Two-pass chamfer-style squared distance transform: forward pass
    // (top-left to bottom-right) then backward pass, each relaxing against
    // the 8 already-visited neighbors. This is an approximation of the true
    // Euclidean distance transform, sufficient for an inflation radius.
    let neighbors_fwd: [(i64, i64); 4] = [(-1, 0), (0, -1), (-1, -1), (-1, 1)];
    let neighbors_bwd: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

    let relax = |dist_sq: &mut [i64], r: usize, c: usize, deltas: &[(i64, i64); 4]| {
        for &(dr, dc) in deltas {
            let nr = r as i64 + dr;
            let nc = c as i64 + dc;
            if nr < 0 || nc < 0 || nr >= h as i64 || nc >= w as i64 {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            let candidate = dist_sq[nr * w + nc] + dr * dr + dc * dc;
            if candidate < dist_sq[r * w + c] {
                dist_sq[r * w + c] = candidate;
            }
        }
    };

    for r in 0..h {
        for c in 0..w {
            relax(&mut dist_sq, r, c, &neighbors_fwd);
        }
    }
    for r in (0..h).rev() {
        for c in (0..w).rev() {
            relax(&mut dist_sq, r, c, &neighbors_bwd);
        }
    }

    let radius_sq = (radius * radius) as i64;
    let mut rows = vec![vec![0u8; w]; h];
    for r in 0..h {
        for c in 0..w {
            if dist_sq[r * w + c] <= radius_sq {
                rows[r][c] = 1;
            }
        }
    }

    Grid::from_bytes(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_entirely_free() {
        let grid = Grid::new(5, 5);
        for r in 0..5 {
            for c in 0..5 {
                assert!(grid.passable((r, c)));
            }
        }
    }

    #[test]
    fn out_of_bounds_is_never_passable() {
        let grid = Grid::new(3, 3);
        assert!(!grid.in_bounds((3, 0)));
        assert!(!grid.passable((3, 0)));
        assert!(!grid.passable((0, 3)));
    }

    #[test]
    fn from_bytes_marks_nonzero_as_blocked() {
        let grid = Grid::from_bytes(&[vec![0, 1, 0], vec![0, 0, 2]]);
        assert!(grid.passable((0, 0)));
        assert!(!grid.passable((0, 1)));
        assert!(!grid.passable((1, 2)));
    }

    #[test]
    fn from_thresholded_blocks_dark_pixels() {
        let grid = Grid::from_thresholded(&[vec![255, 100], vec![0, 200]], 150);
        assert!(grid.passable((0, 0)));
        assert!(!grid.passable((0, 1)));
        assert!(!grid.passable((1, 0)));
        assert!(grid.passable((1, 1)));
    }

    #[test]
    fn set_blocked_round_trips() {
        let mut grid = Grid::new(3, 3);
        grid.set_blocked((1, 1), true);
        assert!(!grid.passable((1, 1)));
        grid.set_blocked((1, 1), false);
        assert!(grid.passable((1, 1)));
    }

    #[test]
    fn inflate_obstacles_grows_a_single_point() {
        let mut rows = vec![vec![0u8; 7]; 7];
        rows[3][3] = 1;
        let grid = Grid::from_bytes(&rows);

        let inflated = inflate_obstacles(&grid, 1.5);
        assert!(!inflated.passable((3, 3)));
        assert!(!inflated.passable((3, 4)));
        assert!(!inflated.passable((2, 3)));
        // Far corner untouched.
        assert!(inflated.passable((0, 0)));
    }

    #[test]
    fn inflate_obstacles_zero_radius_is_identity() {
        let mut rows = vec![vec![0u8; 5]; 5];
        rows[2][2] = 1;
        let grid = Grid::from_bytes(&rows);

        let inflated = inflate_obstacles(&grid, 0.0);
        assert!(!inflated.passable((2, 2)));
        assert!(inflated.passable((2, 3)));
        assert!(inflated.passable((1, 2)));
    }
}
