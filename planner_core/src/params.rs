//! Planning parameters: the single configuration struct threaded through
//! the whole pipeline.
//!
//! A flat, serde-derived config struct with a `Default` impl and explicit
//! validation, rather than scattered free function arguments.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::planner::SearchMode;
use crate::speed_solver::KinematicLimits;

/// All tunables for a single `route()` call.
///
/// The heuristic itself is not a free knob here: `route()` always pairs
/// Manhattan with plain A* and Euclidean with Theta*, per
/// [`crate::planner::Heuristic::for_mode`]. `heuristic_weight` still scales
/// whichever of the two gets picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// World size of one grid cell, in centimeters.
    pub cell_size_cm: f64,

    pub search_mode: SearchMode,
    pub heuristic_weight: f64,
    /// Maximum nodes popped from the open set before giving up. `None`
    /// means unbounded.
    pub expansion_budget: Option<usize>,

    /// `forward_pass` / `reverse_pass` repetitions in `multi_pass`.
    pub simplifier_passes: u32,
    /// Maximum cell-space gap `split_long_segments` will leave unsplit.
    pub max_segment_length: f64,

    /// Lead/trail resampling offset for the metrizer, in centimeters.
    pub resample_offset_cm: f64,

    pub v_min_cm_s: f64,
    pub v_max_cm_s: f64,
    pub omega_max_rad_s: f64,
    pub a_max_cm_s2: f64,
    pub d_max_cm_s2: f64,
    pub smoothing_window_cm: f64,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            cell_size_cm: 5.0,
            search_mode: SearchMode::ThetaStar,
            heuristic_weight: 1.0,
            expansion_budget: None,
            simplifier_passes: crate::simplifier::DEFAULT_PASSES,
            max_segment_length: crate::simplifier::DEFAULT_MAX_SEGMENT_LENGTH,
            resample_offset_cm: crate::metrizer::DEFAULT_RESAMPLE_OFFSET_CM,
            v_min_cm_s: 20.0,
            v_max_cm_s: 100.0,
            omega_max_rad_s: 1.0,
            a_max_cm_s2: 50.0,
            d_max_cm_s2: 50.0,
            smoothing_window_cm: 50.0,
        }
    }
}

impl PlanParams {
    /// Reject out-of-range parameters before they reach the pipeline.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.cell_size_cm <= 0.0 {
            return Err(PlannerError::InvalidParameters("cell_size_cm must be positive"));
        }
        if self.heuristic_weight < 1.0 {
            return Err(PlannerError::InvalidParameters(
                "heuristic_weight must be at least 1.0",
            ));
        }
        if self.simplifier_passes == 0 {
            return Err(PlannerError::InvalidParameters(
                "simplifier_passes must be at least 1",
            ));
        }
        if self.max_segment_length <= 0.0 {
            return Err(PlannerError::InvalidParameters(
                "max_segment_length must be positive",
            ));
        }
        if self.resample_offset_cm <= 0.0 {
            return Err(PlannerError::InvalidParameters(
                "resample_offset_cm must be positive",
            ));
        }
        if self.v_min_cm_s < 0.0 {
            return Err(PlannerError::InvalidParameters("v_min_cm_s must be nonnegative"));
        }
        if self.v_max_cm_s <= self.v_min_cm_s {
            return Err(PlannerError::InvalidParameters(
                "v_max_cm_s must exceed v_min_cm_s",
            ));
        }
        if self.omega_max_rad_s <= 0.0 {
            return Err(PlannerError::InvalidParameters(
                "omega_max_rad_s must be positive",
            ));
        }
        if self.a_max_cm_s2 <= 0.0 {
            return Err(PlannerError::InvalidParameters("a_max_cm_s2 must be positive"));
        }
        if self.d_max_cm_s2 <= 0.0 {
            return Err(PlannerError::InvalidParameters("d_max_cm_s2 must be positive"));
        }
        if self.smoothing_window_cm <= 0.0 {
            return Err(PlannerError::InvalidParameters(
                "smoothing_window_cm must be positive",
            ));
        }
        Ok(())
    }

    pub(crate) fn kinematic_limits(&self) -> KinematicLimits {
        KinematicLimits {
            v_min_cm_s: self.v_min_cm_s,
            v_max_cm_s: self.v_max_cm_s,
            omega_max_rad_s: self.omega_max_rad_s,
            a_max_cm_s2: self.a_max_cm_s2,
            d_max_cm_s2: self.d_max_cm_s2,
            smoothing_window_cm: self.smoothing_window_cm,
        }
    }
}
