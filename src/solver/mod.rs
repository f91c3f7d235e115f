use crate::{cell::GridCell, pathing_grid::PathingGrid};
use itertools::Itertools;
use log::debug;
use ordered_float::OrderedFloat;
use std::time::Instant;

pub mod astar;
pub mod bidirectional;
pub mod dfs;
pub mod dijkstra;
pub mod exploration;
pub mod greedy;
pub mod jps;
pub mod theta;

use astar::AstarSolver;
use bidirectional::BidirectionalBfsSolver;
use dfs::DfsSolver;
use dijkstra::DijkstraSolver;
use greedy::GreedySolver;
use jps::JpsSolver;
use theta::ThetaStarSolver;

/// Totally ordered path cost used by the priority-ordered searches.
pub type Cost = OrderedFloat<f64>;

/// Weight of the diagonal part in the octile heuristic, slightly under √2 - 1.
pub const OCTILE_DIAGONAL_WEIGHT: f64 = 0.414;

/// Identity of a search strategy. `SlimeMold` is the uninformed trail agent, which has no
/// precomputed route and follows its own step-by-step behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    AStar,
    Dijkstra,
    Greedy,
    BidirectionalBfs,
    Dfs,
    Jps,
    ThetaStar,
    SlimeMold,
}

/// Static description of an [Algorithm] for benchmark tables and renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub algorithm: Algorithm,
    pub name: &'static str,
    /// RGB colour of the algorithm's lane and agents.
    pub color: [u8; 3],
    /// Uses the goal position to steer the search.
    pub goal_aware: bool,
    /// Explores blindly through shared exploration state when visualised.
    pub uninformed: bool,
}

const fn info(
    algorithm: Algorithm,
    name: &'static str,
    color: [u8; 3],
    goal_aware: bool,
    uninformed: bool,
) -> AlgorithmInfo {
    AlgorithmInfo {
        algorithm,
        name,
        color,
        goal_aware,
        uninformed,
    }
}

/// One row per [Algorithm], in declaration order so that `REGISTRY[a as usize]` describes `a`.
pub const REGISTRY: [AlgorithmInfo; 8] = [
    info(Algorithm::AStar, "A*", [255, 99, 71], true, false),
    info(Algorithm::Dijkstra, "Dijkstra", [65, 105, 225], false, true),
    info(Algorithm::Greedy, "Greedy", [255, 215, 0], true, false),
    info(Algorithm::BidirectionalBfs, "Bidirectional BFS", [50, 205, 50], false, true),
    info(Algorithm::Dfs, "DFS", [186, 85, 211], false, true),
    info(Algorithm::Jps, "JPS", [0, 206, 209], true, false),
    info(Algorithm::ThetaStar, "Theta*", [255, 140, 0], true, false),
    info(Algorithm::SlimeMold, "Slime Mold", [154, 205, 50], false, true),
];

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::Greedy,
        Algorithm::BidirectionalBfs,
        Algorithm::Dfs,
        Algorithm::Jps,
        Algorithm::ThetaStar,
        Algorithm::SlimeMold,
    ];

    /// The algorithms measured by the doubling experiment.
    pub const GOAL_AWARE: [Algorithm; 4] = [
        Algorithm::AStar,
        Algorithm::Greedy,
        Algorithm::Jps,
        Algorithm::ThetaStar,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
    pub fn from_index(index: usize) -> Option<Algorithm> {
        Algorithm::ALL.get(index).copied()
    }
    pub fn info(self) -> &'static AlgorithmInfo {
        &REGISTRY[self.index()]
    }
    pub fn name(self) -> &'static str {
        self.info().name
    }
    pub fn color(self) -> [u8; 3] {
        self.info().color
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single search. An empty path with `found == true` is the signal to fall back
/// to native step-by-step behaviour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathResult {
    pub path: Vec<GridCell>,
    pub found: bool,
    pub nodes_expanded: usize,
    pub compute_time_ms: f64,
    pub path_length: f64,
}

impl PathResult {
    pub fn not_found(nodes_expanded: usize, compute_time_ms: f64) -> PathResult {
        PathResult {
            nodes_expanded,
            compute_time_ms,
            ..Default::default()
        }
    }
    pub fn found(path: Vec<GridCell>, nodes_expanded: usize, compute_time_ms: f64) -> PathResult {
        let path_length = path_length(&path);
        PathResult {
            path,
            found: true,
            nodes_expanded,
            compute_time_ms,
            path_length,
        }
    }
    /// No precomputed route, the caller should use its native behaviour.
    pub fn native_behaviour() -> PathResult {
        PathResult {
            found: true,
            ..Default::default()
        }
    }
}

/// What a solver's core loop produced.
#[derive(Clone, Debug, Default)]
pub struct SolverOutcome {
    pub path: Option<Vec<GridCell>>,
    pub nodes_expanded: usize,
}

pub trait GridSolver {
    fn name(&self) -> &'static str;

    /// Runs the core search loop. `start` and `goal` are valid, distinct cells of `grid`.
    fn search(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> SolverOutcome;

    /// Validates the query, handles the trivial case and times the core loop.
    fn find_path(&mut self, grid: &PathingGrid, start: GridCell, goal: GridCell) -> PathResult {
        if !grid.is_valid_cell(start) || !grid.is_valid_cell(goal) {
            debug!(
                "{}: start {} or goal {} is out of bounds or blocked",
                self.name(),
                start,
                goal
            );
            return PathResult::not_found(0, 0.0);
        }
        if start == goal {
            return PathResult::found(vec![start], 0, 0.0);
        }
        let before = Instant::now();
        let outcome = self.search(grid, start, goal);
        let compute_time_ms = before.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "{}: {} -> {} expanded {} nodes in {:.3} ms",
            self.name(),
            start,
            goal,
            outcome.nodes_expanded,
            compute_time_ms
        );
        match outcome.path {
            Some(path) => PathResult::found(path, outcome.nodes_expanded, compute_time_ms),
            None => PathResult::not_found(outcome.nodes_expanded, compute_time_ms),
        }
    }
}

/// Octile distance, admissible for 8-directional movement.
pub fn heuristic(a: &GridCell, b: &GridCell) -> f64 {
    let dx = (a.x - b.x).abs() as f64;
    let dy = (a.y - b.y).abs() as f64;
    dx.max(dy) + OCTILE_DIAGONAL_WEIGHT * dx.min(dy)
}

pub fn euclidean_distance(a: &GridCell, b: &GridCell) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

pub fn manhattan_distance(a: &GridCell, b: &GridCell) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Sum of Euclidean distances between consecutive cells.
pub fn path_length(path: &[GridCell]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| euclidean_distance(a, b))
        .sum()
}

/// Bresenham walk from `a` to `b` that fails on the first blocked cell. A step that moves
/// both x and y also needs the two cells beside it free, the same rule single grid steps follow.
pub fn line_of_sight(grid: &PathingGrid, a: &GridCell, b: &GridCell) -> bool {
    let (mut x, mut y) = (a.x, a.y);
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if grid.is_blocked(x, y) {
            return false;
        }
        if x == b.x && y == b.y {
            return true;
        }
        let e2 = 2 * err;
        let step_x = e2 >= dy;
        let step_y = e2 <= dx;
        if step_x && step_y && (grid.is_blocked(x + sx, y) || grid.is_blocked(x, y + sy)) {
            return false;
        }
        if step_x {
            err += dy;
            x += sx;
        }
        if step_y {
            err += dx;
            y += sy;
        }
    }
}

/// Greedily keeps the farthest waypoint visible from the current one.
pub fn simplify_path(grid: &PathingGrid, path: &[GridCell]) -> Vec<GridCell> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let last = path.len() - 1;
    let mut simplified = vec![path[0]];
    let mut i = 0;
    while i < last {
        let mut j = last;
        while j > i + 1 && !line_of_sight(grid, &path[i], &path[j]) {
            j -= 1;
        }
        simplified.push(path[j]);
        i = j;
    }
    simplified
}

/// Maps an [Algorithm] to its solver. Holds one instance of each so that per-solver state
/// such as the DFS random generator persists between calls.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    pub astar: AstarSolver,
    pub dijkstra: DijkstraSolver,
    pub greedy: GreedySolver,
    pub bidirectional: BidirectionalBfsSolver,
    pub dfs: DfsSolver,
    pub jps: JpsSolver,
    pub theta: ThetaStarSolver,
}

impl Pathfinder {
    pub fn new(seed: u64) -> Pathfinder {
        Pathfinder {
            astar: AstarSolver::new(),
            dijkstra: DijkstraSolver,
            greedy: GreedySolver,
            bidirectional: BidirectionalBfsSolver,
            dfs: DfsSolver::new(seed),
            jps: JpsSolver,
            theta: ThetaStarSolver,
        }
    }

    /// Solver behind an algorithm, `None` for the trail agent.
    pub fn solver_mut(&mut self, algorithm: Algorithm) -> Option<&mut dyn GridSolver> {
        match algorithm {
            Algorithm::AStar => Some(&mut self.astar),
            Algorithm::Dijkstra => Some(&mut self.dijkstra),
            Algorithm::Greedy => Some(&mut self.greedy),
            Algorithm::BidirectionalBfs => Some(&mut self.bidirectional),
            Algorithm::Dfs => Some(&mut self.dfs),
            Algorithm::Jps => Some(&mut self.jps),
            Algorithm::ThetaStar => Some(&mut self.theta),
            Algorithm::SlimeMold => None,
        }
    }

    pub fn find_path(
        &mut self,
        algorithm: Algorithm,
        grid: &PathingGrid,
        start: GridCell,
        goal: GridCell,
    ) -> PathResult {
        match self.solver_mut(algorithm) {
            Some(solver) => solver.find_path(grid, start, goal),
            None => PathResult::native_behaviour(),
        }
    }
}

impl Default for Pathfinder {
    fn default() -> Pathfinder {
        Pathfinder::new(0)
    }
}
