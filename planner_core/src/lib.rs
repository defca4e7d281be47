//! Any-angle path planning: grid search, geometric simplification,
//! arc-length metrization, and kinematic speed-limit solving.
//!
//! [`route`] wires the full pipeline, leaves first: [`grid`] →
//! [`line_of_sight`] → [`planner`] → [`simplifier`] → [`metrizer`] →
//! [`speed_solver`], producing a [`trajectory::Trajectory`].

pub mod error;
pub mod grid;
pub mod line_of_sight;
pub mod metrizer;
pub mod params;
pub mod planner;
pub mod simplifier;
pub mod speed_solver;
pub mod trajectory;

use tracing::{info, warn};

pub use error::{PlannerError, PlannerResult};
pub use grid::{Cell, Grid};
pub use params::PlanParams;
pub use planner::{Heuristic, Planner, SearchMode};
pub use trajectory::{Trajectory, TrajectorySample};

/// Run the full pipeline: search, simplify, metrize, and speed-limit a path
/// from `start` to `goal` over `grid`.
pub fn route(grid: &Grid, start: Cell, goal: Cell, params: &PlanParams) -> PlannerResult<Trajectory> {
    params.validate()?;

    let mut planner = Planner::from_grid(grid.clone());
    planner.set_start(start.0, start.1);
    planner.set_goal(goal.0, goal.1);
    planner.set_mode(params.search_mode);
    planner.set_heuristic(Heuristic::for_mode(params.search_mode));
    planner.set_heuristic_weight(params.heuristic_weight);
    planner.set_expansion_budget(params.expansion_budget);

    let raw = planner.try_plan()?;
    info!(raw_len = raw.len(), ?start, ?goal, "raw path found");

    let simplified = simplifier::multi_pass(
        grid,
        &raw,
        params.simplifier_passes,
        params.max_segment_length,
    );
    if !simplifier::is_fully_visible(grid, &simplified) {
        warn!("simplified path failed its own visibility invariant");
    }

    let trajectory = metrizer::metrize(&simplified, params.cell_size_cm, params.resample_offset_cm);
    let trajectory = speed_solver::solve_speed_limits(trajectory, &params.kinematic_limits());

    info!(
        samples = trajectory.len(),
        arc_length_cm = trajectory.total_arc_length(),
        "route complete"
    );
    Ok(trajectory)
}
