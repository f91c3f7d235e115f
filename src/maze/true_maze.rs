//! Perfect mazes with a controlled number of logical cells, used to measure how search cost
//! grows with problem size.
use log::debug;
use petgraph::unionfind::UnionFind;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::cell::{CellExt, GridCell};
use crate::maze::lattice::Lattice;
use crate::maze::MazeRegion;
use crate::pathing_grid::PathingGrid;

/// Lattice size per complexity level. Cell counts grow roughly by doubling.
pub const TRUE_MAZE_LEVELS: [(i32, i32); 6] = [
    (8, 6),
    (12, 9),
    (16, 12),
    (24, 18),
    (32, 24),
    (48, 36),
];

/// Thickness of the left outer wall that entrances are cut through.
const ENTRANCE_DEPTH: i32 = 3;

pub fn dimensions(level: u8) -> (i32, i32) {
    let ix = level.clamp(1, TRUE_MAZE_LEVELS.len() as u8) as usize - 1;
    TRUE_MAZE_LEVELS[ix]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntranceKind {
    /// Entrance into the root cell the maze was grown from.
    Main,
    /// Cut all the way through the outer wall.
    Good,
    /// Stops one cell short of the maze, a dead-end stub.
    Bad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entrance {
    /// Lattice row of the entrance.
    pub row: i32,
    pub kind: EntranceKind,
}

/// Logical structure of a generated true maze.
#[derive(Clone, Debug)]
pub struct TrueMazeLayout {
    pub level: u8,
    pub lattice: Lattice,
    /// Passages of the spanning tree, each stored once as `(min, max)`.
    pub passages: BTreeSet<(GridCell, GridCell)>,
    /// Passages added on top of the tree, one cycle each.
    pub extra_passages: Vec<(GridCell, GridCell)>,
    pub entrances: Vec<Entrance>,
    /// Grid cell of the opening in the right wall.
    pub exit: GridCell,
}

fn canonical(a: GridCell, b: GridCell) -> (GridCell, GridCell) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl TrueMazeLayout {
    pub fn cell_count(&self) -> usize {
        self.lattice.cell_count()
    }

    pub fn has_passage(&self, a: GridCell, b: GridCell) -> bool {
        let key = canonical(a, b);
        self.passages.contains(&key) || self.extra_passages.contains(&key)
    }

    /// Whether the tree passages connect every lattice cell without a cycle.
    pub fn is_spanning_tree(&self) -> bool {
        let n = self.cell_count();
        if n == 0 || self.passages.len() != n - 1 {
            return false;
        }
        let mut components = UnionFind::new(n);
        // n - 1 merges of distinct components leave a single one.
        self.passages.iter().all(|&(a, b)| {
            components.union(self.lattice.index(a), self.lattice.index(b))
        })
    }
}

/// Recursive backtracker over the lattice, carving cell interiors and doorways as it goes.
fn carve_tree(
    grid: &mut PathingGrid,
    lattice: &Lattice,
    rng: &mut StdRng,
    root: GridCell,
) -> BTreeSet<(GridCell, GridCell)> {
    let mut passages = BTreeSet::new();
    let mut visited = vec![false; lattice.cell_count()];
    visited[lattice.index(root)] = true;
    lattice.carve_cell(grid, root);
    let mut stack = vec![root];
    while let Some(&current) = stack.last() {
        let options: SmallVec<[GridCell; 4]> = current
            .neumann_neighborhood()
            .into_iter()
            .filter(|n| lattice.contains(*n) && !visited[lattice.index(*n)])
            .collect();
        match options.choose(rng) {
            Some(&next) => {
                visited[lattice.index(next)] = true;
                lattice.carve_cell(grid, next);
                lattice.carve_passage(grid, current, next);
                passages.insert(canonical(current, next));
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }
    passages
}

/// Builds the maze for `level` into `region`. `None` when the region cannot fit the lattice; the
/// grid is left untouched in that case.
pub(crate) fn generate(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    level: u8,
) -> Option<TrueMazeLayout> {
    let (cells_x, cells_y) = dimensions(level);
    if !region.is_usable() {
        return None;
    }
    let x0 = region.left + ENTRANCE_DEPTH - 1;
    let lattice = Lattice::new(
        x0,
        region.top,
        region.right - 1 - x0,
        region.height() - 1,
        cells_x,
        cells_y,
    )?;
    grid.block_rect(region.left, region.top, region.width(), region.height());

    let root = GridCell::new(0, cells_y / 2);
    let passages = carve_tree(grid, &lattice, rng, root);

    lattice.carve_west_opening(grid, root.y, region.left);
    let mut entrances = vec![Entrance {
        row: root.y,
        kind: EntranceKind::Main,
    }];
    let mut rows: Vec<i32> = (0..cells_y).filter(|&j| j != root.y).collect();
    rows.shuffle(rng);
    for (k, &row) in rows.iter().take(level.saturating_sub(1) as usize).enumerate() {
        let kind = if k % 2 == 0 {
            EntranceKind::Good
        } else {
            EntranceKind::Bad
        };
        if kind == EntranceKind::Good {
            lattice.carve_west_opening(grid, row, region.left);
        } else {
            let (_, y, _, h) = lattice.interior(GridCell::new(0, row));
            grid.clear_rect(region.left, y, x0 - region.left, h);
        }
        entrances.push(Entrance { row, kind });
    }

    let mut candidates: Vec<(GridCell, GridCell)> = lattice
        .cells()
        .flat_map(|c| [(c, c.offset(1, 0)), (c, c.offset(0, 1))])
        .filter(|&(_, n)| lattice.contains(n))
        .filter(|pair| !passages.contains(pair))
        .collect();
    candidates.shuffle(rng);
    let extra_passages: Vec<(GridCell, GridCell)> =
        candidates.into_iter().take(level.saturating_sub(1) as usize).collect();
    for &(a, b) in &extra_passages {
        lattice.carve_passage(grid, a, b);
    }

    let exit = lattice.carve_east_opening(grid, cells_y / 2);
    grid.rebuild_obstacles_from_occupancy();
    debug!(
        "True maze level {}: {} tree passages, {} extra, {} entrances",
        level,
        passages.len(),
        extra_passages.len(),
        entrances.len()
    );
    Some(TrueMazeLayout {
        level,
        lattice,
        passages,
        extra_passages,
        entrances,
        exit,
    })
}
