//! Any-angle grid search: plain 4-connected A* and any-angle Theta*.
//!
//! Search records live in a single arena indexed by `u32` rather than as a
//! graph of `Rc`/parent pointers — reparenting in Theta* mode just rewrites
//! the stored parent index, and path reconstruction walks indices back to
//! the start with no possibility of a cycle.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{PlannerError, PlannerResult};
use crate::grid::{Cell, Grid};
use crate::line_of_sight::line_of_sight;

/// Search mode: plain 4-connected A*, or any-angle Theta*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    AStar,
    ThetaStar,
}

/// Heuristic function used to estimate remaining cost to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heuristic {
    /// Admissible and tight under 4-connected uniform costs.
    Manhattan,
    /// Admissible (strictly, since it underestimates diagonal shortcuts)
    /// under 4-connected uniform costs; required for Theta* since any-angle
    /// moves can be shorter than the Manhattan distance.
    Euclidean,
}

impl Heuristic {
    /// The heuristic paired with a given search mode: Manhattan for plain
    /// A* (tight under 4-connected uniform costs), Euclidean for Theta*
    /// (Manhattan would be inadmissible once any-angle shortcuts appear).
    pub fn for_mode(mode: SearchMode) -> Self {
        match mode {
            SearchMode::AStar => Heuristic::Manhattan,
            SearchMode::ThetaStar => Heuristic::Euclidean,
        }
    }
}

const NO_PARENT: u32 = u32::MAX;

/// One arena slot: a node popped-or-pending during the search.
struct Record {
    position: Cell,
    parent: u32,
    g: f64,
}

/// An entry in the open-set binary heap. Ordered by `f` ascending
/// (`Reverse` makes `BinaryHeap`, a max-heap, behave as a min-heap); ties
/// are broken by insertion order so the returned path is deterministic
/// across runs of the same mode on the same grid.
#[derive(PartialEq)]
struct OpenEntry {
    f: f64,
    sequence: u64,
    record_idx: u32,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Any-angle grid search over a [`Grid`].
pub struct Planner {
    grid: Grid,
    start: Option<Cell>,
    goal: Option<Cell>,
    mode: SearchMode,
    heuristic: Heuristic,
    heuristic_weight: f64,
    expansion_budget: Option<usize>,
}

impl Planner {
    /// Create a planner over an all-free grid of the given dimensions.
    pub fn new(height: usize, width: usize) -> Self {
        Self::from_grid(Grid::new(height, width))
    }

    /// Create a planner over an existing [`Grid`].
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            start: None,
            goal: None,
            mode: SearchMode::ThetaStar,
            heuristic: Heuristic::Euclidean,
            heuristic_weight: 1.0,
            expansion_budget: None,
        }
    }

    pub fn set_start(&mut self, r: usize, c: usize) {
        self.start = Some((r, c));
    }

    pub fn set_goal(&mut self, r: usize, c: usize) {
        self.goal = Some((r, c));
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.heuristic = heuristic;
    }

    /// Scale the heuristic term: `f = g + weight * h`. `weight = 1.0` keeps
    /// the search admissible; values above 1.0 trade optimality for speed.
    pub fn set_heuristic_weight(&mut self, weight: f64) {
        self.heuristic_weight = weight;
    }

    /// Cap the number of nodes popped from the open set before giving up
    /// with [`PlannerError::BudgetExhausted`].
    pub fn set_expansion_budget(&mut self, budget: Option<usize>) {
        self.expansion_budget = budget;
    }

    pub fn set_obstacle(&mut self, r: usize, c: usize) {
        self.grid.set_blocked((r, c), true);
    }

    pub fn clear_obstacle(&mut self, r: usize, c: usize) {
        self.grid.set_blocked((r, c), false);
    }

    pub fn clear_obstacles(&mut self) {
        self.grid = Grid::new(self.grid.height(), self.grid.width());
    }

    pub fn set_grid(&mut self, rows: Vec<Vec<bool>>) {
        let byte_rows: Vec<Vec<u8>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(u8::from).collect())
            .collect();
        self.grid = Grid::from_bytes(&byte_rows);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Sum of Euclidean distances between consecutive cells on `path`.
    pub fn path_length(path: &[Cell]) -> f64 {
        path.windows(2)
            .map(|pair| euclidean(pair[0], pair[1]))
            .sum()
    }

    fn heuristic_cost(&self, from: Cell, to: Cell) -> f64 {
        match self.heuristic {
            Heuristic::Manhattan => manhattan(from, to),
            Heuristic::Euclidean => euclidean(from, to),
        }
    }

    /// Run the search and return the raw path, or `None` if unreachable.
    /// Use [`Planner::try_plan`] for the typed `PlannerError` variants
    /// (`InvalidEndpoint`, `NoPath`, `BudgetExhausted`).
    pub fn plan(&self) -> Option<Vec<Cell>> {
        self.try_plan().ok()
    }

    /// Run the search, returning a typed error on failure.
    pub fn try_plan(&self) -> PlannerResult<Vec<Cell>> {
        let start = self.start.ok_or(PlannerError::InvalidParameters(
            "start cell was never set",
        ))?;
        let goal = self.goal.ok_or(PlannerError::InvalidParameters(
            "goal cell was never set",
        ))?;

        if !self.grid.in_bounds(start) {
            return Err(PlannerError::InvalidEndpoint {
                cell: start,
                reason: "start out of bounds",
            });
        }
        if !self.grid.passable(start) {
            return Err(PlannerError::InvalidEndpoint {
                cell: start,
                reason: "start is blocked",
            });
        }
        if !self.grid.in_bounds(goal) {
            return Err(PlannerError::InvalidEndpoint {
                cell: goal,
                reason: "goal out of bounds",
            });
        }
        if !self.grid.passable(goal) {
            return Err(PlannerError::InvalidEndpoint {
                cell: goal,
                reason: "goal is blocked",
            });
        }

        if start == goal {
            return Ok(vec![start]);
        }

        self.search(start, goal)
    }

    fn search(&self, start: Cell, goal: Cell) -> PlannerResult<Vec<Cell>> {
        let mut arena: Vec<Record> = vec![Record {
            position: start,
            parent: NO_PARENT,
            g: 0.0,
        }];
        let mut best_g: std::collections::HashMap<Cell, f64> =
            std::collections::HashMap::new();
        best_g.insert(start, 0.0);
        let mut closed: std::collections::HashSet<Cell> = std::collections::HashSet::new();

        let mut open = BinaryHeap::new();
        let mut sequence = 0u64;
        open.push(OpenEntry {
            f: self.heuristic_weight * self.heuristic_cost(start, goal),
            sequence,
            record_idx: 0,
        });

        let mut popped = 0usize;

        while let Some(entry) = open.pop() {
            let current_idx = entry.record_idx;
            let current_pos = arena[current_idx as usize].position;

            if closed.contains(&current_pos) {
                continue;
            }

            // The re-open policy permits stale duplicate entries in the
            // heap; this check discards any entry that no longer reflects
            // the best known cost for its cell.
            if entry.f
                > self.heuristic_weight * self.heuristic_cost(current_pos, goal)
                    + best_g[&current_pos]
                    + 1e-9
            {
                continue;
            }

            popped += 1;
            if let Some(budget) = self.expansion_budget {
                if popped > budget {
                    debug!(budget, ?goal, "expansion budget exhausted");
                    return Err(PlannerError::BudgetExhausted { budget, goal });
                }
            }

            if current_pos == goal {
                debug!(nodes_popped = popped, "goal reached");
                return Ok(reconstruct(&arena, current_idx));
            }

            closed.insert(current_pos);

            for neighbor in four_connected_neighbors(current_pos) {
                if !self.grid.passable(neighbor) || closed.contains(&neighbor) {
                    continue;
                }

                let (g_child, parent_idx) = self.cost_to_child(&arena, current_idx, neighbor);

                if let Some(&known) = best_g.get(&neighbor) {
                    if known <= g_child {
                        continue;
                    }
                }

                best_g.insert(neighbor, g_child);
                let record_idx = arena.len() as u32;
                arena.push(Record {
                    position: neighbor,
                    parent: parent_idx,
                    g: g_child,
                });

                sequence += 1;
                let f = g_child + self.heuristic_weight * self.heuristic_cost(neighbor, goal);
                trace!(?neighbor, f, "pushing open entry");
                open.push(OpenEntry {
                    f,
                    sequence,
                    record_idx,
                });
            }
        }

        Err(PlannerError::NoPath { start, goal })
    }

    /// Compute the child's tentative cost and the index it should be
    /// parented to. In Theta* mode, if the current node's parent has line
    /// of sight to the child, the child is reparented to the grandparent
    /// with a straight-line cost, bypassing the current node entirely.
    fn cost_to_child(&self, arena: &[Record], current_idx: u32, child: Cell) -> (f64, u32) {
        let current = &arena[current_idx as usize];

        if self.mode == SearchMode::ThetaStar && current.parent != NO_PARENT {
            let grandparent = &arena[current.parent as usize];
            if line_of_sight(&self.grid, grandparent.position, child) {
                let g = grandparent.g + euclidean(grandparent.position, child);
                return (g, current.parent);
            }
        }

        (current.g + 1.0, current_idx)
    }
}

fn reconstruct(arena: &[Record], goal_idx: u32) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut idx = goal_idx;
    loop {
        let record = &arena[idx as usize];
        path.push(record.position);
        if record.parent == NO_PARENT {
            break;
        }
        idx = record.parent;
    }
    path.reverse();
    path
}

fn four_connected_neighbors((r, c): Cell) -> [Cell; 4] {
    [
        (r.wrapping_sub(1), c),
        (r + 1, c),
        (r, c.wrapping_sub(1)),
        (r, c + 1),
    ]
}

fn euclidean(a: Cell, b: Cell) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dc = a.1 as f64 - b.1 as f64;
    (dr * dr + dc * dc).sqrt()
}

fn manhattan(a: Cell, b: Cell) -> f64 {
    (a.0 as f64 - b.0 as f64).abs() + (a.1 as f64 - b.1 as f64).abs()
}
