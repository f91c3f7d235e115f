//! # maze_pathfinding
//!
//! A grid-based pathfinding and maze-generation engine. Seven search strategies
//! ([A*](solver::astar), [Greedy Best-First](solver::greedy),
//! [Bidirectional BFS](solver::bidirectional), [randomized DFS](solver::dfs),
//! [Dijkstra](solver::dijkstra), [Jump Point Search](solver::jps) and
//! [Theta*](solver::theta)) run over a flat occupancy grid and report a uniform
//! [PathResult](solver::PathResult) with timing and expansion counts.
//!
//! The [maze] module generates procedural layouts, among them a "true maze" family whose
//! cell count roughly doubles per level, and the [benchmark] module uses it to estimate
//! the growth order of each algorithm from measured runtime ratios. It also tracks a live
//! race between agents following the different algorithms.
//!
//! Note that corner cutting is never allowed: a diagonal step requires both orthogonal
//! cells next to it to be free.
mod astar_jps;
pub mod benchmark;
pub mod cell;
pub mod config;
pub mod error;
pub mod maze;
pub mod pathing_grid;
pub mod solver;

pub use cell::{CellExt, GridCell};
pub use pathing_grid::{Obstacle, PathingGrid};
pub use solver::{Algorithm, PathResult, Pathfinder};

use std::collections::VecDeque;

/// Inline capacity for neighbourhood and successor lists.
pub const N_SMALLVEC_SIZE: usize = 8;

/// Turns waypoints into a path on the grid which can be followed step by step. Consecutive
/// waypoints must lie on a common row, column or diagonal, as jump points do.
pub fn waypoints_to_path(waypoints: Vec<GridCell>) -> Vec<GridCell> {
    let mut waypoint_queue = waypoints.into_iter().collect::<VecDeque<GridCell>>();
    let mut path: Vec<GridCell> = Vec::new();
    let Some(mut current) = waypoint_queue.pop_front() else {
        return path;
    };
    path.push(current);
    for next in waypoint_queue {
        while current.move_distance(&next) >= 1 {
            let delta = current.dir(&next);
            current = current + delta;
            path.push(current);
        }
    }
    path
}
