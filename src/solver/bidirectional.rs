use fxhash::FxHashMap;
use std::collections::VecDeque;

use crate::solver::greedy::reconstruct_path;
use crate::solver::{GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// One side of the bidirectional search. The parent map doubles as the visited set; the root
/// has no entry in it and is tracked separately.
struct Wave {
    root: GridCell,
    frontier: VecDeque<GridCell>,
    parents: FxHashMap<GridCell, GridCell>,
}

impl Wave {
    fn new(root: GridCell) -> Wave {
        Wave {
            root,
            frontier: VecDeque::from([root]),
            parents: FxHashMap::default(),
        }
    }

    fn visited(&self, cell: &GridCell) -> bool {
        *cell == self.root || self.parents.contains_key(cell)
    }

    /// Expands exactly the current layer. Returns the first cell that the other wave has
    /// already visited.
    fn expand_layer(
        &mut self,
        grid: &PathingGrid,
        other: &Wave,
        expanded: &mut usize,
    ) -> Option<GridCell> {
        for _ in 0..self.frontier.len() {
            let Some(node) = self.frontier.pop_front() else {
                break;
            };
            *expanded += 1;
            for n in grid.neighborhood(node) {
                if self.visited(&n) {
                    continue;
                }
                self.parents.insert(n, node);
                if other.visited(&n) {
                    return Some(n);
                }
                self.frontier.push_back(n);
            }
        }
        None
    }
}

/// Breadth-first search from both ends, one layer per side per iteration, stopping the moment
/// either wave reaches a cell the other has visited. Steps are unit cost.
#[derive(Clone, Debug, Default)]
pub struct BidirectionalBfsSolver;

impl GridSolver for BidirectionalBfsSolver {
    fn name(&self) -> &'static str {
        "Bidirectional BFS"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let mut forward = Wave::new(start);
        let mut backward = Wave::new(goal);
        let mut expanded = 0;
        let mut meeting = None;
        while !forward.frontier.is_empty() && !backward.frontier.is_empty() {
            meeting = forward.expand_layer(grid, &backward, &mut expanded);
            if meeting.is_some() {
                break;
            }
            meeting = backward.expand_layer(grid, &forward, &mut expanded);
            if meeting.is_some() {
                break;
            }
        }
        let path = meeting.map(|meet| {
            let mut path = reconstruct_path(&forward.parents, meet);
            let mut back_half = reconstruct_path(&backward.parents, meet);
            back_half.reverse();
            // Both halves contain the meeting cell.
            path.extend(back_half.into_iter().skip(1));
            path
        });
        SolverOutcome {
            path,
            nodes_expanded: expanded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stitches_both_halves() {
        let mut grid = PathingGrid::new(15, 15, 1);
        grid.add_obstacle(7, 0, 1, 12);
        let start = GridCell::new(0, 0);
        let goal = GridCell::new(14, 0);
        let result = BidirectionalBfsSolver.find_path(&grid, start, goal);
        assert!(result.found);
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&goal));
        assert!(result.path.windows(2).all(|w| grid.can_move_to(w[1], w[0])));
    }

    #[test]
    fn adjacent_cells_meet_immediately() {
        let grid = PathingGrid::new(5, 5, 1);
        let start = GridCell::new(2, 2);
        let goal = GridCell::new(3, 2);
        let result = BidirectionalBfsSolver.find_path(&grid, start, goal);
        assert_eq!(result.path, vec![start, goal]);
        assert_eq!(result.nodes_expanded, 1);
    }

    #[test]
    fn disconnected_halves_exhaust() {
        let mut grid = PathingGrid::new(10, 10, 1);
        grid.add_obstacle(5, 0, 1, 10);
        let result =
            BidirectionalBfsSolver.find_path(&grid, GridCell::new(0, 0), GridCell::new(9, 9));
        assert!(!result.found);
        assert!(result.nodes_expanded > 0);
    }
}
