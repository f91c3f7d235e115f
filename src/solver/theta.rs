use fxhash::{FxHashMap, FxHashSet};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::solver::greedy::reconstruct_path;
use crate::solver::{euclidean_distance, line_of_sight, Cost, GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// Any-angle search. When a neighbour is relaxed and the current cell's parent can see it, the
/// neighbour is attached to that parent directly, otherwise the relaxation is the A* one.
///
/// The path is returned as waypoints joined by clear lines of sight, so consecutive cells are
/// generally not adjacent. The heuristic is the straight-line distance, which stays admissible
/// for any-angle costs where the octile distance would not.
#[derive(Clone, Debug, Default)]
pub struct ThetaStarSolver;

/// Open-list entry: smallest f first, larger g on equal f.
type OpenEntry = Reverse<(Cost, Reverse<Cost>, GridCell)>;

fn open_entry(f: f64, g: f64, cell: GridCell) -> OpenEntry {
    Reverse((OrderedFloat(f), Reverse(OrderedFloat(g)), cell))
}

impl GridSolver for ThetaStarSolver {
    fn name(&self) -> &'static str {
        "Theta*"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let mut g: FxHashMap<GridCell, f64> = FxHashMap::default();
        let mut parents: FxHashMap<GridCell, GridCell> = FxHashMap::default();
        let mut closed: FxHashSet<GridCell> = FxHashSet::default();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut expanded = 0;

        g.insert(start, 0.0);
        open.push(open_entry(euclidean_distance(&start, &goal), 0.0, start));
        while let Some(Reverse((_, Reverse(OrderedFloat(cost)), node))) = open.pop() {
            if closed.contains(&node) || g.get(&node).is_some_and(|&best| cost > best) {
                continue;
            }
            closed.insert(node);
            expanded += 1;
            if node == goal {
                return SolverOutcome {
                    path: Some(reconstruct_path(&parents, goal)),
                    nodes_expanded: expanded,
                };
            }
            let grandparent = parents
                .get(&node)
                .and_then(|p| g.get(p).map(|&cost_p| (*p, cost_p)));
            for n in grid.neighborhood(node) {
                if closed.contains(&n) {
                    continue;
                }
                let (via, new_cost) = match grandparent {
                    Some((p, cost_p)) if line_of_sight(grid, &p, &n) => {
                        (p, cost_p + euclidean_distance(&p, &n))
                    }
                    _ => (node, cost + euclidean_distance(&node, &n)),
                };
                if g.get(&n).map_or(true, |&old| new_cost < old) {
                    g.insert(n, new_cost);
                    parents.insert(n, via);
                    open.push(open_entry(
                        new_cost + euclidean_distance(&n, &goal),
                        new_cost,
                        n,
                    ));
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
    use crate::solver::astar::AstarSolver;

    #[test]
    fn straight_line_in_open_space() {
        let grid = PathingGrid::new(30, 30, 1);
        let start = GridCell::new(0, 0);
        let goal = GridCell::new(29, 10);
        let result = ThetaStarSolver.find_path(&grid, start, goal);
        assert!(result.found);
        assert_eq!(result.path, vec![start, goal]);
        assert!((result.path_length - euclidean_distance(&start, &goal)).abs() < 1e-9);
    }

    #[test]
    fn open_list_prefers_deeper_nodes_on_ties() {
        let mut open = BinaryHeap::new();
        open.push(open_entry(10.0, 2.0, GridCell::new(0, 0)));
        open.push(open_entry(10.0, 7.0, GridCell::new(5, 5)));
        open.push(open_entry(12.0, 9.0, GridCell::new(1, 1)));
        open.push(open_entry(9.0, 1.0, GridCell::new(2, 2)));
        let order: Vec<GridCell> = std::iter::from_fn(|| open.pop())
            .map(|Reverse((_, _, cell))| cell)
            .collect();
        assert_eq!(
            order,
            vec![
                GridCell::new(2, 2),
                GridCell::new(5, 5),
                GridCell::new(0, 0),
                GridCell::new(1, 1)
            ]
        );
    }

    #[test]
    fn never_longer_than_astar() {
        let mut grid = PathingGrid::new(25, 25, 1);
        grid.add_obstacle(8, 0, 2, 18);
        grid.add_obstacle(16, 7, 2, 18);
        let start = GridCell::new(1, 2);
        let goal = GridCell::new(23, 20);
        let theta = ThetaStarSolver.find_path(&grid, start, goal);
        let astar = AstarSolver::new().find_path(&grid, start, goal);
        assert!(theta.found && astar.found);
        assert!(theta.path_length <= astar.path_length + 1e-9);
        assert!(theta
            .path
            .windows(2)
            .all(|w| line_of_sight(&grid, &w[0], &w[1])));
    }
}
