use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::astar_jps::astar_jps;
use crate::solver::{euclidean_distance, heuristic, Cost, GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid, N_SMALLVEC_SIZE};

/// Neighbours of `node` with their Euclidean step cost (1 cardinal, √2 diagonal).
pub(crate) fn neighborhood_and_cost(
    grid: &PathingGrid,
    node: &GridCell,
) -> SmallVec<[(GridCell, Cost); N_SMALLVEC_SIZE]> {
    grid.neighborhood(*node)
        .into_iter()
        .map(|n| (n, OrderedFloat(euclidean_distance(node, &n))))
        .collect()
}

#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic_factor: f64,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
        }
    }
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let factor = self.heuristic_factor;
        let outcome = astar_jps(
            &start,
            |_, node| neighborhood_and_cost(grid, node),
            |point| OrderedFloat(heuristic(point, &goal) * factor),
            |point| *point == goal,
        );
        SolverOutcome {
            path: outcome.path.map(|(v, _c)| v),
            nodes_expanded: outcome.expanded,
        }
    }
}
