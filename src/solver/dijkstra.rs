use num_traits::Zero;

use crate::astar_jps::astar_jps;
use crate::solver::astar::neighborhood_and_cost;
use crate::solver::{Cost, GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// Uniform-cost search: cardinal steps cost 1, diagonal steps √2, no heuristic. Entries that
/// were superseded by a cheaper route are skipped when popped.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let outcome = astar_jps(
            &start,
            |_, node| neighborhood_and_cost(grid, node),
            |_| Cost::zero(),
            |point| *point == goal,
        );
        SolverOutcome {
            path: outcome.path.map(|(v, _c)| v),
            nodes_expanded: outcome.expanded,
        }
    }
}
