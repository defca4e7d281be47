//! Error types for the planning pipeline.

use thiserror::Error;

use crate::grid::Cell;

/// Errors produced by `planner_core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    /// Start or goal cell is out of bounds or sits on a blocked cell.
    #[error("invalid endpoint {cell:?}: {reason}")]
    InvalidEndpoint { cell: Cell, reason: &'static str },

    /// The open set emptied before the goal was reached.
    #[error("no path from {start:?} to {goal:?}")]
    NoPath { start: Cell, goal: Cell },

    /// The search popped more nodes than the configured expansion budget.
    #[error("expansion budget of {budget} nodes exhausted before reaching {goal:?}")]
    BudgetExhausted { budget: usize, goal: Cell },

    /// A `PlanParams` field is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameters(&'static str),
}

/// Result type for planning operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
