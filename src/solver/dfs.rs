use fxhash::{FxHashMap, FxHashSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::solver::greedy::reconstruct_path;
use crate::solver::{GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// Depth-first search with the neighbour order shuffled on every expansion so the walk has no
/// fixed directional bias. Cells are marked visited when pushed.
#[derive(Clone, Debug)]
pub struct DfsSolver {
    rng: StdRng,
}

impl DfsSolver {
    pub fn new(seed: u64) -> DfsSolver {
        DfsSolver {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl GridSolver for DfsSolver {
    fn name(&self) -> &'static str {
        "DFS"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let mut stack = vec![start];
        let mut visited: FxHashSet<GridCell> = FxHashSet::default();
        let mut parents: FxHashMap<GridCell, GridCell> = FxHashMap::default();
        visited.insert(start);
        let mut expanded = 0;
        while let Some(node) = stack.pop() {
            expanded += 1;
            if node == goal {
                return SolverOutcome {
                    path: Some(reconstruct_path(&parents, goal)),
                    nodes_expanded: expanded,
                };
            }
            let mut neighbours = grid.neighborhood(node);
            neighbours.shuffle(&mut self.rng);
            for n in neighbours {
                if visited.insert(n) {
                    parents.insert(n, node);
                    stack.push(n);
                }
            }
        }
        SolverOutcome {
            path: None,
            nodes_expanded: expanded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_valid_but_not_necessarily_short_path() {
        let mut grid = PathingGrid::new(12, 12, 1);
        grid.add_obstacle(4, 2, 1, 10);
        let mut solver = DfsSolver::new(7);
        let start = GridCell::new(0, 11);
        let goal = GridCell::new(11, 11);
        let result = solver.find_path(&grid, start, goal);
        assert!(result.found);
        assert!(result.path.windows(2).all(|w| grid.can_move_to(w[1], w[0])));
        assert!(result.path_length >= 11.0);
    }

    #[test]
    fn same_seed_same_path() {
        let grid = PathingGrid::new(10, 10, 1);
        let start = GridCell::new(0, 0);
        let goal = GridCell::new(9, 3);
        let a = DfsSolver::new(3).find_path(&grid, start, goal);
        let b = DfsSolver::new(3).find_path(&grid, start, goal);
        assert_eq!(a.path, b.path);
    }
}
