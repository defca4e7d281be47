//! Kinematic speed-limit solving: Gaussian-weighted curvature smoothing,
//! a turning-rate cap, and forward/backward acceleration-bounded passes,
//! in the same pass-oriented style as `simplifier::multi_pass`.

use crate::trajectory::Trajectory;

/// Tunable limits for [`solve_speed_limits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicLimits {
    pub v_min_cm_s: f64,
    pub v_max_cm_s: f64,
    pub omega_max_rad_s: f64,
    pub a_max_cm_s2: f64,
    pub d_max_cm_s2: f64,
    pub smoothing_window_cm: f64,
}

impl Default for KinematicLimits {
    fn default() -> Self {
        Self {
            v_min_cm_s: 20.0,
            v_max_cm_s: 100.0,
            omega_max_rad_s: 1.0,
            a_max_cm_s2: 50.0,
            d_max_cm_s2: 50.0,
            smoothing_window_cm: 50.0,
        }
    }
}

/// Gaussian-weighted moving average of `curvatures` against `distances`,
/// windowed at `window_cm`. Points farther than `window_cm / 2` away
/// contribute zero weight; the Gaussian standard deviation is `window_cm / 4`.
fn smooth_curvature(distances: &[f64], curvatures: &[f64], window_cm: f64) -> Vec<f64> {
    let half_window = window_cm / 2.0;
    let sigma = window_cm / 4.0;
    let two_sigma_sq = 2.0 * sigma * sigma;

    (0..distances.len())
        .map(|i| {
            let mut weight_sum = 0.0;
            let mut weighted = 0.0;
            for j in 0..distances.len() {
                let dist_from_center = (distances[j] - distances[i]).abs();
                if dist_from_center > half_window {
                    continue;
                }
                let weight = if two_sigma_sq > f64::EPSILON {
                    (-(dist_from_center * dist_from_center) / two_sigma_sq).exp()
                } else {
                    1.0
                };
                weight_sum += weight;
                weighted += curvatures[j] * weight;
            }
            if weight_sum > f64::EPSILON {
                weighted / weight_sum
            } else {
                curvatures[i]
            }
        })
        .collect()
}

/// Attach a kinematically feasible speed limit to every sample of
/// `trajectory`. Degenerate (single-sample) trajectories get `v_min`
/// everywhere and are returned unchanged otherwise.
pub fn solve_speed_limits(mut trajectory: Trajectory, limits: &KinematicLimits) -> Trajectory {
    let n = trajectory.samples.len();
    if n <= 1 {
        if let Some(sample) = trajectory.samples.first_mut() {
            sample.speed_limit = limits.v_min_cm_s;
        }
        return trajectory;
    }

    let distances: Vec<f64> = trajectory.samples.iter().map(|s| s.arc_length).collect();
    let curvatures_deg_per_cm: Vec<f64> = trajectory.samples.iter().map(|s| s.curvature).collect();
    let smoothed = smooth_curvature(&distances, &curvatures_deg_per_cm, limits.smoothing_window_cm);

    let mut speed = vec![0.0; n];
    for i in 0..n {
        let curvature_rad_per_cm = smoothed[i].to_radians();
        let turning_limit = limits.omega_max_rad_s / (curvature_rad_per_cm.abs() + 1e-6);
        speed[i] = turning_limit.clamp(limits.v_min_cm_s, limits.v_max_cm_s);
    }

    // The vehicle starts and ends at rest speed, regardless of curvature
    // there. The forward/backward passes below only ever shrink a value,
    // and the reachable bound they compute from a v_min neighbor is never
    // below v_min, so this floor survives both passes unchanged.
    speed[0] = limits.v_min_cm_s;
    speed[n - 1] = limits.v_min_cm_s;

    // Forward pass: cap speed by how fast the vehicle could have
    // accelerated from the previous sample.
    for i in 1..n {
        let ds = distances[i] - distances[i - 1];
        let reachable = (speed[i - 1].powi(2) + 2.0 * limits.a_max_cm_s2 * ds).sqrt();
        speed[i] = speed[i].min(reachable);
    }

    // Backward pass: cap speed by how fast the vehicle must decelerate to
    // satisfy the following sample's limit.
    for i in (0..n - 1).rev() {
        let ds = distances[i + 1] - distances[i];
        let reachable = (speed[i + 1].powi(2) + 2.0 * limits.d_max_cm_s2 * ds).sqrt();
        speed[i] = speed[i].min(reachable);
    }

    for (sample, v) in trajectory.samples.iter_mut().zip(speed) {
        sample.speed_limit = v;
    }

    trajectory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::TrajectorySample;

    fn sample(arc_length: f64, curvature: f64) -> TrajectorySample {
        TrajectorySample {
            x: 0.0,
            y: 0.0,
            curvature,
            heading: 0.0,
            arc_length,
            speed_limit: 0.0,
        }
    }

    #[test]
    fn degenerate_trajectory_gets_v_min() {
        let trajectory = Trajectory {
            samples: vec![sample(0.0, 0.0)],
        };
        let limits = KinematicLimits::default();
        let solved = solve_speed_limits(trajectory, &limits);
        assert_eq!(solved.samples[0].speed_limit, limits.v_min_cm_s);
    }

    #[test]
    fn straight_line_is_a_monotone_speed_profile() {
        // Scenario 5: a long straight line ramps up from v_min, saturates
        // at v_max around the middle, then ramps back down to v_min.
        let samples = (0..20)
            .map(|i| sample(i as f64 * 50.0, 0.0))
            .collect::<Vec<_>>();
        let trajectory = Trajectory { samples };
        let limits = KinematicLimits::default();
        let solved = solve_speed_limits(trajectory, &limits);

        assert_eq!(solved.samples.first().unwrap().speed_limit, limits.v_min_cm_s);
        assert_eq!(solved.samples.last().unwrap().speed_limit, limits.v_min_cm_s);

        let mid = solved.samples[solved.samples.len() / 2].speed_limit;
        assert!((mid - limits.v_max_cm_s).abs() < 1e-6, "mid-path should saturate at v_max");

        let peak_idx = solved
            .samples
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.speed_limit.total_cmp(&b.1.speed_limit))
            .map(|(i, _)| i)
            .unwrap();
        for pair in solved.samples[..=peak_idx].windows(2) {
            assert!(pair[1].speed_limit >= pair[0].speed_limit - 1e-9, "must ramp up to the peak");
        }
        for pair in solved.samples[peak_idx..].windows(2) {
            assert!(pair[1].speed_limit <= pair[0].speed_limit + 1e-9, "must ramp down from the peak");
        }
    }

    #[test]
    fn speed_never_exceeds_bounds() {
        let samples = (0..30)
            .map(|i| sample(i as f64 * 10.0, (i as f64 * 3.7) % 20.0 - 10.0))
            .collect::<Vec<_>>();
        let trajectory = Trajectory { samples };
        let limits = KinematicLimits::default();
        let solved = solve_speed_limits(trajectory, &limits);

        for sample in &solved.samples {
            assert!(sample.speed_limit >= limits.v_min_cm_s - 1e-9);
            assert!(sample.speed_limit <= limits.v_max_cm_s + 1e-9);
        }
    }

    #[test]
    fn sharp_curvature_lowers_the_speed_limit() {
        let mut samples = vec![sample(0.0, 0.0); 10];
        for (i, s) in samples.iter_mut().enumerate() {
            s.arc_length = i as f64 * 5.0;
        }
        samples[5].curvature = 60.0; // a sharp turn in the middle

        let trajectory = Trajectory { samples };
        let limits = KinematicLimits::default();
        let solved = solve_speed_limits(trajectory, &limits);

        let at_turn = solved.samples[5].speed_limit;
        let away_from_turn = solved.samples[0].speed_limit;
        assert!(at_turn <= away_from_turn);
    }

    #[test]
    fn forward_pass_respects_acceleration_limit() {
        // Zero curvature throughout, so the only thing holding the middle
        // sample's speed down is how far it is (in arc length) from the
        // v_min-forced start.
        let samples = vec![sample(0.0, 0.0), sample(1.0, 0.0), sample(2.0, 0.0)];
        let trajectory = Trajectory { samples };
        let mut limits = KinematicLimits::default();
        limits.a_max_cm_s2 = 1.0;
        let solved = solve_speed_limits(trajectory, &limits);

        assert_eq!(solved.samples[0].speed_limit, limits.v_min_cm_s);

        let ds = 1.0;
        let max_reachable = (limits.v_min_cm_s.powi(2) + 2.0 * limits.a_max_cm_s2 * ds).sqrt();
        assert!(solved.samples[1].speed_limit <= max_reachable + 1e-9);
    }
}
