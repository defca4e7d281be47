//! Geometric polyline simplification: a greedy forward/reverse scan that
//! collapses a raw cell path down to the minimal set of mutually visible
//! waypoints.

use crate::grid::{Cell, Grid};
use crate::line_of_sight::line_of_sight;

/// Default maximum segment length (in cells) before `split_long_segments`
/// inserts intermediate waypoints.
pub const DEFAULT_MAX_SEGMENT_LENGTH: f64 = 10.0;

/// Default number of `forward_pass` + `reverse_pass` repetitions.
pub const DEFAULT_PASSES: u32 = 5;

/// Greedy forward simplification: from each index, jump to the farthest
/// visible index ahead. If the first and last points end up mutually
/// visible, the whole thing collapses to just those two.
pub fn forward_pass(grid: &Grid, path: &[Cell]) -> Vec<Cell> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut optimized = vec![path[0]];
    let mut current = 0usize;

    while current < path.len() - 1 {
        let mut advanced = false;
        for next in (current + 1..path.len()).rev() {
            if line_of_sight(grid, path[current], path[next]) {
                optimized.push(path[next]);
                current = next;
                advanced = true;
                break;
            }
        }
        if !advanced {
            current += 1;
            optimized.push(path[current]);
        }
    }

    if optimized.len() > 2 && line_of_sight(grid, optimized[0], *optimized.last().unwrap()) {
        return vec![optimized[0], *optimized.last().unwrap()];
    }

    optimized
}

/// The mirror of [`forward_pass`]: walks from the end toward the start,
/// so corners only visible from the far end are not missed.
pub fn reverse_pass(grid: &Grid, path: &[Cell]) -> Vec<Cell> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut optimized = vec![*path.last().unwrap()];
    let mut current = path.len() - 1;

    while current > 0 {
        let mut advanced = false;
        for next in 0..current {
            if line_of_sight(grid, path[next], path[current]) {
                optimized.push(path[next]);
                current = next;
                advanced = true;
                break;
            }
        }
        if !advanced {
            current -= 1;
            optimized.push(path[current]);
        }
    }

    optimized.reverse();
    optimized
}

/// Insert equidistant, integer-rounded waypoints so every consecutive pair
/// is separated by at most `max_length` cells. This re-seeds the next pass
/// with intermediate candidates a pure greedy scan could not discover.
pub fn split_long_segments(path: &[Cell], max_length: f64) -> Vec<Cell> {
    if path.len() < 2 {
        return path.to_vec();
    }

    let mut new_path = vec![path[0]];
    for pair in path.windows(2) {
        let (r1, c1) = pair[0];
        let (r2, c2) = pair[1];
        let dr = r2 as f64 - r1 as f64;
        let dc = c2 as f64 - c1 as f64;
        let distance = (dr * dr + dc * dc).sqrt();

        if distance > max_length {
            let segments = (distance / max_length) as usize + 1;
            for s in 1..segments {
                let ratio = s as f64 / segments as f64;
                let new_r = (r1 as f64 + dr * ratio).round() as usize;
                let new_c = (c1 as f64 + dc * ratio).round() as usize;
                new_path.push((new_r, new_c));
            }
        }
        new_path.push(pair[1]);
    }

    new_path
}

/// Alternating forward/reverse simplification passes, each preceded by
/// re-seeding via [`split_long_segments`].
pub fn multi_pass(
    grid: &Grid,
    path: &[Cell],
    passes: u32,
    max_segment_length: f64,
) -> Vec<Cell> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut current = path.to_vec();
    for _ in 0..passes {
        let seeded = split_long_segments(&current, max_segment_length);
        current = forward_pass(grid, &seeded);

        let seeded = split_long_segments(&current, max_segment_length);
        current = reverse_pass(grid, &seeded);
    }
    current
}

/// `true` iff every consecutive pair of `path` is mutually visible on
/// `grid` — the invariant a simplified polyline must satisfy.
pub fn is_fully_visible(grid: &Grid, path: &[Cell]) -> bool {
    path.windows(2).all(|pair| line_of_sight(grid, pair[0], pair[1]))
}
