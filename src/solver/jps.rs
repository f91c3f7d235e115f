use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::astar_jps::astar_jps;
use crate::solver::{euclidean_distance, heuristic, Cost, GridSolver, SolverOutcome};
use crate::{cell::GridCell, pathing_grid::PathingGrid, waypoints_to_path, N_SMALLVEC_SIZE};

/// Jump Point Search for grids without corner cutting. Straight runs of cells are skipped
/// until the goal, a forced neighbour or a dead end is met, so only jump points enter the open
/// list. The returned path is expanded back to single steps.
///
/// With no corner cutting a diagonal step never produces forced neighbours; instead every
/// diagonal step probes its two cardinal components. On a 4-connected grid vertical jumps probe
/// horizontally instead.
#[derive(Clone, Debug, Default)]
pub struct JpsSolver;

impl JpsSolver {
    /// A straight move in `dir` arriving at `node` has a forced neighbour when a side cell is
    /// open but the cell behind it is blocked.
    fn has_forced_neighbour(grid: &PathingGrid, node: GridCell, dir: GridCell) -> bool {
        let (x, y) = (node.x, node.y);
        if dir.x != 0 {
            (grid.is_valid(x, y - 1) && !grid.is_valid(x - dir.x, y - 1))
                || (grid.is_valid(x, y + 1) && !grid.is_valid(x - dir.x, y + 1))
        } else {
            (grid.is_valid(x - 1, y) && !grid.is_valid(x - 1, y - dir.y))
                || (grid.is_valid(x + 1, y) && !grid.is_valid(x + 1, y - dir.y))
        }
    }

    /// Performs the jumping from `initial` in `dir`, skipping over unnecessary cells until a goal
    /// or a forced cell is found. `None` marks a dead end.
    fn jump(
        &self,
        grid: &PathingGrid,
        mut initial: GridCell,
        dir: GridCell,
        goal: GridCell,
    ) -> Option<GridCell> {
        let diagonal = dir.x != 0 && dir.y != 0;
        loop {
            let next = initial + dir;
            if !grid.can_move_to(next, initial) {
                return None;
            }
            initial = next;
            if initial == goal {
                return Some(initial);
            }
            if diagonal {
                if self.jump(grid, initial, GridCell::new(dir.x, 0), goal).is_some()
                    || self.jump(grid, initial, GridCell::new(0, dir.y), goal).is_some()
                {
                    return Some(initial);
                }
            } else {
                if Self::has_forced_neighbour(grid, initial, dir) {
                    return Some(initial);
                }
                if !grid.allow_diagonal_move
                    && dir.y != 0
                    && (self.jump(grid, initial, GridCell::new(1, 0), goal).is_some()
                        || self.jump(grid, initial, GridCell::new(-1, 0), goal).is_some())
                {
                    return Some(initial);
                }
            }
        }
    }

    /// Directions worth jumping in from `node` when it was reached travelling in `dir`.
    fn pruned_directions(grid: &PathingGrid, dir: GridCell) -> SmallVec<[GridCell; 5]> {
        let mut dirs = SmallVec::new();
        if dir.x != 0 && dir.y != 0 {
            dirs.push(GridCell::new(0, dir.y));
            dirs.push(GridCell::new(dir.x, 0));
            dirs.push(dir);
        } else if dir.x != 0 {
            dirs.push(dir);
            dirs.push(GridCell::new(0, 1));
            dirs.push(GridCell::new(0, -1));
            if grid.allow_diagonal_move {
                dirs.push(GridCell::new(dir.x, 1));
                dirs.push(GridCell::new(dir.x, -1));
            }
        } else {
            dirs.push(dir);
            dirs.push(GridCell::new(1, 0));
            dirs.push(GridCell::new(-1, 0));
            if grid.allow_diagonal_move {
                dirs.push(GridCell::new(1, dir.y));
                dirs.push(GridCell::new(-1, dir.y));
            }
        }
        dirs
    }

    fn successors(
        &self,
        grid: &PathingGrid,
        parent: Option<&GridCell>,
        node: &GridCell,
        goal: GridCell,
    ) -> SmallVec<[(GridCell, Cost); N_SMALLVEC_SIZE]> {
        let dirs: SmallVec<[GridCell; 8]> = match parent {
            Some(parent_node) => Self::pruned_directions(grid, parent_node.dir(node))
                .into_iter()
                .collect(),
            // The start expands its full neighbourhood.
            None => grid
                .neighborhood(*node)
                .into_iter()
                .map(|n| n - *node)
                .collect(),
        };
        dirs.into_iter()
            .filter_map(|d| self.jump(grid, *node, d, goal))
            .map(|jumped| (jumped, OrderedFloat(euclidean_distance(node, &jumped))))
            .collect()
    }
}

impl GridSolver for JpsSolver {
    fn name(&self) -> &'static str {
        "JPS"
    }

    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome {
        let outcome = astar_jps(
            &start,
            |parent, node| self.successors(grid, *parent, node, goal),
            |point| OrderedFloat(heuristic(point, &goal)),
            |point| *point == goal,
        );
        SolverOutcome {
            path: outcome.path.map(|(waypoints, _c)| waypoints_to_path(waypoints)),
            nodes_expanded: outcome.expanded,
        }
    }
}
