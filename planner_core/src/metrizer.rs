//! Arc-length metrization: resampling a simplified polyline at a fixed
//! world-space offset and attaching heading and curvature.

use crate::grid::Cell;
use crate::trajectory::{Trajectory, TrajectorySample};

/// Default lead/trail resampling offset, in centimeters.
pub const DEFAULT_RESAMPLE_OFFSET_CM: f64 = 50.0;

/// One leg of the polyline in world coordinates.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: (f64, f64),
    end: (f64, f64),
    length: f64,
}

fn to_world(cell: Cell, cell_size_cm: f64) -> (f64, f64) {
    (cell.0 as f64 * cell_size_cm, cell.1 as f64 * cell_size_cm)
}

fn build_segments(points: &[(f64, f64)]) -> Vec<Segment> {
    points
        .windows(2)
        .map(|pair| {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            Segment {
                start: pair[0],
                end: pair[1],
                length,
            }
        })
        .collect()
}

/// Walks a fixed distance along a chain of segments, tracking which segment
/// it currently sits on. Moving past the final segment clamps at the
/// polyline's end rather than erroring.
struct Walker<'a> {
    segments: &'a [Segment],
    segment_idx: usize,
    distance_into_segment: f64,
    distance_traveled: f64,
}

impl<'a> Walker<'a> {
    fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            segment_idx: 0,
            distance_into_segment: 0.0,
            distance_traveled: 0.0,
        }
    }

    fn position(&self) -> (f64, f64) {
        if self.segments.is_empty() {
            return (0.0, 0.0);
        }
        let seg = &self.segments[self.segment_idx.min(self.segments.len() - 1)];
        if seg.length <= f64::EPSILON {
            return seg.start;
        }
        let t = (self.distance_into_segment / seg.length).min(1.0);
        (
            seg.start.0 + (seg.end.0 - seg.start.0) * t,
            seg.start.1 + (seg.end.1 - seg.start.1) * t,
        )
    }

    /// Advance by `distance`, clamping at the end of the last segment.
    fn advance(&mut self, distance: f64) {
        let mut remaining = distance;
        while remaining > 0.0 {
            if self.segment_idx >= self.segments.len() {
                break;
            }
            let seg = self.segments[self.segment_idx];
            let left_in_segment = seg.length - self.distance_into_segment;

            if remaining < left_in_segment || self.segment_idx == self.segments.len() - 1 {
                let step = remaining.min(left_in_segment.max(0.0));
                self.distance_into_segment += step;
                self.distance_traveled += step;
                remaining -= step;
                if remaining > 0.0 && self.segment_idx == self.segments.len() - 1 {
                    // Clamp: no further segments to spill into.
                    break;
                }
            } else {
                self.distance_traveled += left_in_segment;
                remaining -= left_in_segment;
                self.segment_idx += 1;
                self.distance_into_segment = 0.0;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.segment_idx >= self.segments.len().saturating_sub(1)
            && (self.segments.is_empty()
                || self.distance_into_segment >= self.segments[self.segment_idx].length - 1e-9)
    }
}

/// Resample the polyline by walking a lead point and a trail point offset
/// `offset_cm` behind it, emitting their midpoint at every 1cm step. This is
/// a moving-average smoother in addition to a resampler.
fn smooth_path(points: &[(f64, f64)], offset_cm: f64) -> Vec<(f64, f64)> {
    let segments = build_segments(points);
    if segments.is_empty() {
        return points.to_vec();
    }

    let mut lead = Walker::new(&segments);
    lead.advance(offset_cm);
    let mut trail = Walker::new(&segments);

    let mut out = Vec::new();
    loop {
        let (lx, ly) = lead.position();
        let (tx, ty) = trail.position();
        out.push(((lx + tx) / 2.0, (ly + ty) / 2.0));

        if lead.at_end() {
            break;
        }
        lead.advance(1.0);
        trail.advance(1.0);
    }

    if out.is_empty() {
        vec![points[0], *points.last().unwrap()]
    } else {
        out
    }
}

fn normalize_heading_deg(mut deg: f64) -> f64 {
    deg %= 360.0;
    if deg < 0.0 {
        deg += 360.0;
    }
    deg
}

/// Normalize an angle difference into `(-180, 180]`.
fn normalize_turn_deg(mut deg: f64) -> f64 {
    while deg > 180.0 {
        deg -= 360.0;
    }
    while deg <= -180.0 {
        deg += 360.0;
    }
    deg
}

fn heading_deg(from: (f64, f64), to: (f64, f64)) -> f64 {
    normalize_heading_deg((to.1 - from.1).atan2(to.0 - from.0).to_degrees())
}

/// Convert a simplified cell polyline into an arc-length-parametrized
/// trajectory (without speed limits, which [`crate::speed_solver`] fills
/// in). A single-point path is the degenerate case: it returns one sample
/// with zero curvature and zero arc length, and never fails.
pub fn metrize(path: &[Cell], cell_size_cm: f64, resample_offset_cm: f64) -> Trajectory {
    if path.len() <= 1 {
        let (x, y) = path
            .first()
            .map(|&c| to_world(c, cell_size_cm))
            .unwrap_or((0.0, 0.0));
        return Trajectory {
            samples: vec![TrajectorySample {
                x,
                y,
                curvature: 0.0,
                heading: 0.0,
                arc_length: 0.0,
                speed_limit: 0.0,
            }],
        };
    }

    let world_points: Vec<(f64, f64)> = path.iter().map(|&c| to_world(c, cell_size_cm)).collect();
    let resampled = smooth_path(&world_points, resample_offset_cm);

    let n = resampled.len();
    let mut headings = vec![0.0; n];
    for i in 0..n.saturating_sub(1) {
        headings[i] = heading_deg(resampled[i], resampled[i + 1]);
    }
    if n >= 2 {
        headings[n - 1] = headings[n - 2];
    }

    let seg_len = |i: usize, j: usize| -> f64 {
        let (x1, y1) = resampled[i];
        let (x2, y2) = resampled[j];
        ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
    };

    let mut curvature = vec![0.0; n];
    for i in 1..n.saturating_sub(1) {
        let turn = normalize_turn_deg(headings[i] - headings[i - 1]);
        let avg_len = (seg_len(i - 1, i) + seg_len(i, i + 1)) / 2.0;
        curvature[i] = if avg_len > f64::EPSILON {
            turn / avg_len
        } else {
            0.0
        };
    }

    let mut arc_length = vec![0.0; n];
    for i in 1..n {
        arc_length[i] = arc_length[i - 1] + seg_len(i - 1, i);
    }

    let samples = (0..n)
        .map(|i| TrajectorySample {
            x: resampled[i].0,
            y: resampled[i].1,
            curvature: curvature[i],
            heading: headings[i],
            arc_length: arc_length[i],
            speed_limit: 0.0,
        })
        .collect();

    Trajectory { samples }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_path_is_degenerate() {
        let trajectory = metrize(&[(2, 2)], 10.0, DEFAULT_RESAMPLE_OFFSET_CM);
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.samples[0].curvature, 0.0);
        assert_eq!(trajectory.samples[0].arc_length, 0.0);
    }

    #[test]
    fn empty_path_is_degenerate() {
        let trajectory = metrize(&[], 10.0, DEFAULT_RESAMPLE_OFFSET_CM);
        assert_eq!(trajectory.len(), 1);
    }

    #[test]
    fn straight_line_has_zero_curvature_and_constant_heading() {
        let path = vec![(0, 0), (0, 10), (0, 20), (0, 30)];
        let trajectory = metrize(&path, 10.0, DEFAULT_RESAMPLE_OFFSET_CM);

        for sample in &trajectory.samples {
            assert!(sample.curvature.abs() < 1e-6, "curvature should vanish on a line");
        }
        let first_heading = trajectory.samples[0].heading;
        for sample in &trajectory.samples {
            assert!((sample.heading - first_heading).abs() < 1e-6);
        }
    }

    #[test]
    fn arc_length_is_nondecreasing_and_starts_at_zero() {
        let path = vec![(0, 0), (3, 4), (3, 10), (0, 14)];
        let trajectory = metrize(&path, 5.0, 10.0);

        assert_eq!(trajectory.samples[0].arc_length, 0.0);
        for pair in trajectory.samples.windows(2) {
            assert!(pair[1].arc_length >= pair[0].arc_length);
        }
    }

    #[test]
    fn short_path_under_the_resample_offset_still_yields_samples() {
        // Total length well under the default 50cm offset: the walker
        // clamps immediately, but metrize must still return endpoints
        // rather than an empty trajectory.
        let path = vec![(0, 0), (0, 1)];
        let trajectory = metrize(&path, 1.0, DEFAULT_RESAMPLE_OFFSET_CM);
        assert!(!trajectory.is_empty());
    }

    #[test]
    fn heading_points_along_travel_direction() {
        let path = vec![(0, 0), (10, 0)];
        let trajectory = metrize(&path, 10.0, 5.0);
        // Row maps to the world x-axis (to_world maps cell.0 -> x); a pure
        // row-increasing, column-constant path should have heading 0 degrees.
        assert!((trajectory.samples[0].heading - 0.0).abs() < 1.0);
    }

    #[test]
    fn right_angle_turn_produces_nonzero_curvature() {
        let path = vec![(0, 0), (0, 20), (0, 40), (20, 40), (40, 40)];
        let trajectory = metrize(&path, 1.0, 5.0);
        let has_turn = trajectory.samples.iter().any(|s| s.curvature.abs() > 1e-3);
        assert!(has_turn, "a right-angle corner must show up as curvature");
    }
}
