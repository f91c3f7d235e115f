use fxhash::{FxHashMap, FxHashSet};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::solver::{heuristic, GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// Walks the parent map back from `node` to the cell without a parent.
pub(crate) fn reconstruct_path(
    parents: &FxHashMap<GridCell, GridCell>,
    node: GridCell,
) -> Vec<GridCell> {
    let mut path = vec![node];
    let mut current = node;
    while let Some(&parent) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Greedy Best-First search ordered on the octile heuristic alone. The first discovery of a
/// cell fixes its parent; duplicate queue entries are dropped by the visited set.
#[derive(Clone, Debug, Default)]
pub struct GreedySolver;

impl GridSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let mut to_see = BinaryHeap::new();
        let mut parents: FxHashMap<GridCell, GridCell> = FxHashMap::default();
        let mut visited: FxHashSet<GridCell> = FxHashSet::default();
        let mut expanded = 0;
        to_see.push(Reverse((OrderedFloat(heuristic(&start, &goal)), start)));
        while let Some(Reverse((_, node))) = to_see.pop() {
            if !visited.insert(node) {
                continue;
            }
            expanded += 1;
            if node == goal {
                return SolverOutcome {
                    path: Some(reconstruct_path(&parents, goal)),
                    nodes_expanded: expanded,
                };
            }
            for n in grid.neighborhood(node) {
                if visited.contains(&n) {
                    continue;
                }
                if n != start && !parents.contains_key(&n) {
                    parents.insert(n, node);
                }
                to_see.push(Reverse((OrderedFloat(heuristic(&n, &goal)), n)));
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
    use crate::cell::CellExt;

    #[test]
    fn heads_straight_for_goal_in_open_space() {
        let grid = PathingGrid::new(30, 30, 1);
        let result = GreedySolver.find_path(&grid, GridCell::new(0, 15), GridCell::new(29, 15));
        assert!(result.found);
        assert_eq!(result.path.len(), 30);
        assert_eq!(result.nodes_expanded, 30);
    }

    #[test]
    fn gets_around_a_wall() {
        let mut grid = PathingGrid::new(20, 20, 1);
        grid.add_obstacle(10, 0, 1, 18);
        let result = GreedySolver.find_path(&grid, GridCell::new(0, 0), GridCell::new(19, 0));
        assert!(result.found);
        assert!(result.path.iter().all(|c| grid.is_valid_cell(*c)));
        assert!(result.path.windows(2).all(|w| w[0].is_adjacent(&w[1])));
    }
}
