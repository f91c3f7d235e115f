//! Exploration state shared by many agents that step through a blind search together, one
//! claim per agent per tick. Every mutation goes through `&mut` on the owning
//! [ExplorationArena]; a multi-threaded agent population has to put the arena behind a single
//! lock rather than sharing the inner tables.
use fxhash::{FxHashMap, FxHashSet};
use log::debug;
use std::collections::VecDeque;

use crate::solver::greedy::reconstruct_path;
use crate::solver::Algorithm;
use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// Default number of frontier cells that may be claimed per algorithm per tick.
pub const DEFAULT_MAX_CLAIMS_PER_FRAME: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontierOrder {
    /// Breadth-first, oldest cell first.
    Fifo,
    /// Depth-first, newest cell first.
    Lifo,
}

impl FrontierOrder {
    pub fn for_algorithm(algorithm: Algorithm) -> FrontierOrder {
        match algorithm {
            Algorithm::Dfs => FrontierOrder::Lifo,
            _ => FrontierOrder::Fifo,
        }
    }
}

/// Frontier, visited set and parent map of one blind search, plus the per-tick claim limiter.
#[derive(Clone, Debug)]
pub struct SharedExploration {
    order: FrontierOrder,
    frontier: VecDeque<GridCell>,
    visited: FxHashSet<GridCell>,
    parents: FxHashMap<GridCell, GridCell>,
    claims_this_tick: usize,
    pub max_claims_per_frame: usize,
}

impl SharedExploration {
    pub fn new(order: FrontierOrder, max_claims_per_frame: usize) -> SharedExploration {
        SharedExploration {
            order,
            frontier: VecDeque::new(),
            visited: FxHashSet::default(),
            parents: FxHashMap::default(),
            claims_this_tick: 0,
            max_claims_per_frame,
        }
    }

    pub fn is_seeded(&self) -> bool {
        !self.visited.is_empty()
    }

    /// Starts the search at `start` unless it already started.
    pub fn seed(&mut self, start: GridCell) {
        if self.visited.insert(start) {
            self.frontier.push_back(start);
        }
    }

    pub fn is_visited(&self, cell: &GridCell) -> bool {
        self.visited.contains(cell)
    }
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    pub fn claims_this_tick(&self) -> usize {
        self.claims_this_tick
    }

    /// Takes the next frontier cell and pushes its unvisited neighbours. Returns `None` when the
    /// tick's claim budget is spent or the frontier is exhausted.
    pub fn claim(&mut self, grid: &PathingGrid) -> Option<GridCell> {
        if self.claims_this_tick >= self.max_claims_per_frame {
            return None;
        }
        let cell = match self.order {
            FrontierOrder::Fifo => self.frontier.pop_front(),
            FrontierOrder::Lifo => self.frontier.pop_back(),
        }?;
        self.claims_this_tick += 1;
        for n in grid.neighborhood(cell) {
            if self.visited.insert(n) {
                self.parents.insert(n, cell);
                self.frontier.push_back(n);
            }
        }
        Some(cell)
    }

    /// Route from the seed to `cell` through the parent map, empty if `cell` was never reached.
    pub fn path_to(&self, cell: GridCell) -> Vec<GridCell> {
        if !self.visited.contains(&cell) {
            return Vec::new();
        }
        reconstruct_path(&self.parents, cell)
    }

    pub fn begin_tick(&mut self) {
        self.claims_this_tick = 0;
    }

    pub fn clear(&mut self) {
        self.frontier.clear();
        self.visited.clear();
        self.parents.clear();
        self.claims_this_tick = 0;
    }
}

/// Visited sets of the forward wave (from the start) and the backward wave (from the goal).
/// The first cell seen by both sides is where the waves met.
#[derive(Clone, Debug, Default)]
pub struct BidirectionalExploration {
    forward: FxHashSet<GridCell>,
    backward: FxHashSet<GridCell>,
    meeting: Option<GridCell>,
}

impl BidirectionalExploration {
    /// Marks `cell` visited by the forward wave, returns whether the waves have met.
    pub fn visit_forward(&mut self, cell: GridCell) -> bool {
        self.forward.insert(cell);
        if self.meeting.is_none() && self.backward.contains(&cell) {
            self.meeting = Some(cell);
        }
        self.has_met()
    }

    /// Marks `cell` visited by the backward wave, returns whether the waves have met.
    pub fn visit_backward(&mut self, cell: GridCell) -> bool {
        self.backward.insert(cell);
        if self.meeting.is_none() && self.forward.contains(&cell) {
            self.meeting = Some(cell);
        }
        self.has_met()
    }

    pub fn has_met(&self) -> bool {
        self.meeting.is_some()
    }
    pub fn meeting_cell(&self) -> Option<GridCell> {
        self.meeting
    }
    pub fn forward_visited(&self, cell: &GridCell) -> bool {
        self.forward.contains(cell)
    }
    pub fn backward_visited(&self, cell: &GridCell) -> bool {
        self.backward.contains(cell)
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
        self.meeting = None;
    }
}

/// Owns the shared exploration of every uninformed algorithm, indexed by [Algorithm], created on
/// first use.
#[derive(Clone, Debug)]
pub struct ExplorationArena {
    tables: Vec<Option<SharedExploration>>,
    pub bidirectional: BidirectionalExploration,
    max_claims_per_frame: usize,
}

impl Default for ExplorationArena {
    fn default() -> ExplorationArena {
        ExplorationArena::new(DEFAULT_MAX_CLAIMS_PER_FRAME)
    }
}

impl ExplorationArena {
    pub fn new(max_claims_per_frame: usize) -> ExplorationArena {
        ExplorationArena {
            tables: vec![None; Algorithm::ALL.len()],
            bidirectional: BidirectionalExploration::default(),
            max_claims_per_frame,
        }
    }

    /// Shared state of `algorithm`, created lazily. `None` for informed algorithms, which plan
    /// their own routes.
    pub fn state_mut(&mut self, algorithm: Algorithm) -> Option<&mut SharedExploration> {
        if !algorithm.info().uninformed {
            return None;
        }
        let max_claims = self.max_claims_per_frame;
        let slot = self.tables.get_mut(algorithm.index())?;
        Some(slot.get_or_insert_with(|| {
            debug!("Creating shared exploration for {}", algorithm);
            SharedExploration::new(FrontierOrder::for_algorithm(algorithm), max_claims)
        }))
    }

    pub fn state(&self, algorithm: Algorithm) -> Option<&SharedExploration> {
        self.tables.get(algorithm.index())?.as_ref()
    }

    /// Seeds the algorithm's search at `start` if needed and claims the next frontier cell.
    pub fn claim(
        &mut self,
        algorithm: Algorithm,
        grid: &PathingGrid,
        start: GridCell,
    ) -> Option<GridCell> {
        let state = self.state_mut(algorithm)?;
        state.seed(start);
        state.claim(grid)
    }

    /// Resets every claim counter; call exactly once per simulation tick.
    pub fn begin_tick(&mut self) {
        self.tables
            .iter_mut()
            .flatten()
            .for_each(SharedExploration::begin_tick);
    }

    pub fn reset(&mut self) {
        self.tables.iter_mut().for_each(|slot| *slot = None);
        self.bidirectional.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_are_rate_limited_per_tick() {
        let grid = PathingGrid::new(10, 10, 1);
        let mut arena = ExplorationArena::new(2);
        let start = GridCell::new(5, 5);
        assert_eq!(arena.claim(Algorithm::Dijkstra, &grid, start), Some(start));
        assert!(arena.claim(Algorithm::Dijkstra, &grid, start).is_some());
        assert!(arena.claim(Algorithm::Dijkstra, &grid, start).is_none());
        arena.begin_tick();
        assert!(arena.claim(Algorithm::Dijkstra, &grid, start).is_some());
        assert_eq!(
            arena.state(Algorithm::Dijkstra).map(|s| s.claims_this_tick()),
            Some(1)
        );
    }

    #[test]
    fn informed_algorithms_have_no_shared_state() {
        let grid = PathingGrid::new(10, 10, 1);
        let mut arena = ExplorationArena::default();
        assert!(arena.claim(Algorithm::AStar, &grid, GridCell::new(0, 0)).is_none());
        assert!(arena.state(Algorithm::AStar).is_none());
    }

    #[test]
    fn exhausted_frontier_returns_none_and_paths_lead_back() {
        let mut grid = PathingGrid::new(3, 1, 1);
        grid.allow_diagonal_move = false;
        let mut arena = ExplorationArena::new(100);
        let start = GridCell::new(0, 0);
        let mut claimed = Vec::new();
        while let Some(c) = arena.claim(Algorithm::Dfs, &grid, start) {
            claimed.push(c);
        }
        assert_eq!(claimed.len(), 3);
        let state = arena.state(Algorithm::Dfs).unwrap();
        assert_eq!(
            state.path_to(GridCell::new(2, 0)),
            vec![start, GridCell::new(1, 0), GridCell::new(2, 0)]
        );
        arena.reset();
        assert!(arena.state(Algorithm::Dfs).is_none());
    }

    #[test]
    fn first_shared_cell_is_the_meeting_point() {
        let mut bidi = BidirectionalExploration::default();
        assert!(!bidi.visit_forward(GridCell::new(0, 0)));
        assert!(!bidi.visit_backward(GridCell::new(3, 0)));
        assert!(!bidi.visit_forward(GridCell::new(1, 0)));
        assert!(bidi.visit_backward(GridCell::new(1, 0)));
        assert!(bidi.visit_forward(GridCell::new(3, 0)));
        assert_eq!(bidi.meeting_cell(), Some(GridCell::new(1, 0)));
        bidi.clear();
        assert!(!bidi.has_met());
    }
}
