//! Symmetric integer line-of-sight predicate: a supercover grid traversal
//! between two cells, with the diagonal tie-break resolved as an
//! unconditional corner pass-through (see DESIGN.md, Open Question 1).

use crate::grid::{Cell, Grid};

/// `true` iff every cell on the symmetric integer traversal from `a` to `b`
/// is in bounds and free, `a` and `b` included. Out-of-bounds or blocked
/// input cells make this return `false`; there is no error path.
pub fn line_of_sight(grid: &Grid, a: Cell, b: Cell) -> bool {
    let (mut x, mut y) = (a.0 as i64, a.1 as i64);
    let (x2, y2) = (b.0 as i64, b.1 as i64);

    let mut dx = (x2 - x).abs();
    let mut dy = (y2 - y).abs();
    let x_inc = if x2 > x { 1 } else { -1 };
    let y_inc = if y2 > y { 1 } else { -1 };
    let mut error = dx - dy;

    let mut n = 1 + dx + dy;
    dx *= 2;
    dy *= 2;

    while n > 0 {
        if x < 0 || y < 0 || !grid.in_bounds((x as usize, y as usize)) {
            return false;
        }
        if !grid.passable((x as usize, y as usize)) {
            return false;
        }

        match error.cmp(&0) {
            std::cmp::Ordering::Greater => {
                x += x_inc;
                error -= dy;
            }
            std::cmp::Ordering::Less => {
                y += y_inc;
                error += dx;
            }
            std::cmp::Ordering::Equal => {
                // Exact diagonal: cross the corner in one step.
                x += x_inc;
                y += y_inc;
                error += dx - dy;
                n -= 1;
            }
        }
        n -= 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn sees_through_open_space() {
        let grid = Grid::new(10, 10);
        assert!(line_of_sight(&grid, (0, 0), (9, 9)));
    }

    #[test]
    fn blocked_by_an_intervening_wall() {
        let mut grid = Grid::new(10, 10);
        for r in 0..10 {
            grid.set_blocked((r, 5), true);
        }
        assert!(!line_of_sight(&grid, (0, 0), (9, 9)));
    }

    #[test]
    fn sees_through_a_gate_in_a_wall() {
        let mut grid = Grid::new(10, 10);
        for r in 0..10 {
            if r != 5 {
                grid.set_blocked((r, 5), true);
            }
        }
        // A straight horizontal ray through the gate row must see through.
        assert!(line_of_sight(&grid, (5, 0), (5, 9)));
    }

    #[test]
    fn out_of_bounds_endpoint_fails_closed() {
        let grid = Grid::new(5, 5);
        assert!(!line_of_sight(&grid, (0, 0), (10, 10)));
    }

    #[test]
    fn a_point_sees_itself() {
        let grid = Grid::new(5, 5);
        assert!(line_of_sight(&grid, (2, 2), (2, 2)));
    }

    #[test]
    fn blocked_endpoint_fails() {
        let mut grid = Grid::new(5, 5);
        grid.set_blocked((4, 4), true);
        assert!(!line_of_sight(&grid, (0, 0), (4, 4)));
    }

    #[test]
    fn symmetry_fuzz() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..1000 {
            let size = 64usize;
            let mut rows = vec![vec![0u8; size]; size];
            for row in rows.iter_mut() {
                for cell in row.iter_mut() {
                    if rng.gen_bool(0.3) {
                        *cell = 1;
                    }
                }
            }
            let grid = Grid::from_bytes(&rows);

            for _ in 0..1000 {
                let a = (rng.gen_range(0..size), rng.gen_range(0..size));
                let b = (rng.gen_range(0..size), rng.gen_range(0..size));
                assert_eq!(
                    line_of_sight(&grid, a, b),
                    line_of_sight(&grid, b, a),
                    "LoS({a:?}, {b:?}) must equal LoS({b:?}, {a:?})"
                );
            }
        }
    }
}
