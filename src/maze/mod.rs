//! Procedural layouts written into a [PathingGrid].
//!
//! Every layout keeps an open spawn margin on the left and an open goal margin on the right of
//! the maze region. Barrier-style modes enclose the region in perimeter walls with entrance gaps
//! at roughly one and two thirds of its height, which funnels agents into the maze.
use fxhash::FxHashSet;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{cell::GridCell, pathing_grid::PathingGrid};

pub mod barriers;
pub mod chambers;
pub mod labyrinth;
pub mod lattice;
pub mod spiral;
pub mod true_maze;

pub use true_maze::{Entrance, EntranceKind, TrueMazeLayout, TRUE_MAZE_LEVELS};

/// Regions smaller than this in either direction are left open.
pub const MIN_REGION_SIZE: i32 = 8;
/// Random obstacles are only scattered when the safe area is at least this wide and high.
pub const MIN_SAFE_CORRIDOR: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MazeMode {
    Simple,
    Labyrinth,
    MultiPath,
    Bottleneck,
    Spiral,
    Chambers,
    TrueMaze,
}

impl MazeMode {
    pub const ALL: [MazeMode; 7] = [
        MazeMode::Simple,
        MazeMode::Labyrinth,
        MazeMode::MultiPath,
        MazeMode::Bottleneck,
        MazeMode::Spiral,
        MazeMode::Chambers,
        MazeMode::TrueMaze,
    ];
}

/// Rectangle of cells, `right` and `bottom` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl MazeRegion {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> MazeRegion {
        MazeRegion {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The maze region of a grid: full height, with a margin of a tenth of the width (at least
    /// two cells) left open on both sides.
    pub fn for_grid(grid: &PathingGrid) -> MazeRegion {
        let margin = (grid.grid_width() / 10).max(2);
        MazeRegion::new(margin, 0, grid.grid_width() - margin, grid.grid_height())
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }
    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }
    pub fn is_usable(&self) -> bool {
        self.width() >= MIN_REGION_SIZE && self.height() >= MIN_REGION_SIZE
    }

    /// The region without its one-cell perimeter.
    pub fn interior(&self) -> MazeRegion {
        MazeRegion::new(self.left + 1, self.top + 1, self.right - 1, self.bottom - 1)
    }

    /// Shrinks every side by `by` cells.
    pub fn inset(&self, by: i32) -> MazeRegion {
        MazeRegion::new(
            self.left + by,
            self.top + by,
            self.right - by,
            self.bottom - by,
        )
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= self.left && cell.x < self.right && cell.y >= self.top && cell.y < self.bottom
    }
}

/// Height of the entrance and exit gaps of the perimeter walls.
pub(crate) fn perimeter_gap(region: &MazeRegion) -> i32 {
    (region.height() / 10).max(2)
}

/// Rows at which the perimeter gaps start, around one and two thirds of the height.
pub(crate) fn funnel_rows(region: &MazeRegion) -> [i32; 2] {
    let gap = perimeter_gap(region);
    let h = region.height();
    [
        region.top + h / 3 - gap / 2,
        region.top + 2 * h / 3 - gap / 2,
    ]
}

/// Adds a horizontal wall on row `y` from `x0` to `x1` (exclusive), leaving `gaps` open.
pub(crate) fn horizontal_wall(grid: &mut PathingGrid, x0: i32, x1: i32, y: i32, gaps: &[(i32, i32)]) {
    let mut x = x0;
    for &(gap_start, gap_len) in gaps {
        if gap_start > x {
            grid.add_obstacle(x, y, gap_start - x, 1);
        }
        x = x.max(gap_start + gap_len);
    }
    if x < x1 {
        grid.add_obstacle(x, y, x1 - x, 1);
    }
}

/// Adds a vertical wall in column `x` from `y0` to `y1` (exclusive), leaving `gaps` open.
pub(crate) fn vertical_wall(grid: &mut PathingGrid, x: i32, y0: i32, y1: i32, gaps: &[(i32, i32)]) {
    let mut y = y0;
    for &(gap_start, gap_len) in gaps {
        if gap_start > y {
            grid.add_obstacle(x, y, 1, gap_start - y);
        }
        y = y.max(gap_start + gap_len);
    }
    if y < y1 {
        grid.add_obstacle(x, y, 1, y1 - y);
    }
}

/// Splits `[start, end)` into `count` equal slots and places one gap of `gap_len` at a random
/// offset in each, so gaps never overlap. Returned sorted by position.
pub(crate) fn random_gaps(
    rng: &mut StdRng,
    start: i32,
    end: i32,
    count: i32,
    gap_len: i32,
) -> Vec<(i32, i32)> {
    let span = end - start;
    if span <= 0 || count <= 0 {
        return Vec::new();
    }
    let count = count.min(span);
    (0..count)
        .map(|k| {
            let slot_start = start + k * span / count;
            let slot_end = start + (k + 1) * span / count;
            let len = gap_len.min(slot_end - slot_start);
            let offset = rng.gen_range(0..=(slot_end - slot_start - len));
            (slot_start + offset, len)
        })
        .collect()
}

/// Perimeter walls around `region` with entrance gaps on the left wall and exit gaps on the right
/// wall.
pub(crate) fn build_containment(grid: &mut PathingGrid, region: &MazeRegion) {
    let gap = perimeter_gap(region);
    let gaps: Vec<(i32, i32)> = funnel_rows(region).iter().map(|&y| (y, gap)).collect();
    horizontal_wall(grid, region.left, region.right, region.top, &[]);
    horizontal_wall(grid, region.left, region.right, region.bottom - 1, &[]);
    vertical_wall(grid, region.left, region.top + 1, region.bottom - 1, &gaps);
    vertical_wall(grid, region.right - 1, region.top + 1, region.bottom - 1, &gaps);
}

/// Cells where scattered obstacles may go: the interior minus a two-cell corridor along the
/// walls. `None` when that area is narrower than [MIN_SAFE_CORRIDOR].
pub(crate) fn safe_area(region: &MazeRegion) -> Option<MazeRegion> {
    let safe = region.interior().inset(2);
    if safe.width() < MIN_SAFE_CORRIDOR || safe.height() < MIN_SAFE_CORRIDOR {
        None
    } else {
        Some(safe)
    }
}

/// Scatters `count` random rectangles of side `1..=max_size` inside the safe area. Does nothing
/// if the safe area is too small.
pub(crate) fn scatter_blocks(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    count: usize,
    max_size: i32,
) {
    let Some(safe) = safe_area(region) else {
        warn!("Safe corridor too narrow, skipping {} random obstacles", count);
        return;
    };
    for _ in 0..count {
        let w = rng.gen_range(1..=max_size.min(safe.width()));
        let h = rng.gen_range(1..=max_size.min(safe.height()));
        let x = rng.gen_range(safe.left..=safe.right - w);
        let y = rng.gen_range(safe.top..=safe.bottom - h);
        grid.add_obstacle(x, y, w, h);
    }
}

/// Breadth-first reachability check from `start` to `goal`. Meant as a debugging aid for
/// generated layouts.
pub fn flood_fill_check(grid: &PathingGrid, start: GridCell, goal: GridCell) -> bool {
    if !grid.is_valid_cell(start) || !grid.is_valid_cell(goal) {
        return false;
    }
    let mut visited: FxHashSet<GridCell> = FxHashSet::default();
    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            return true;
        }
        for n in grid.neighborhood(cell) {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }
    }
    false
}

/// Generates layouts into a grid and remembers the exit and complexity of the last one.
/// Cloning the generator snapshots that state together with the random generator.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    rng: StdRng,
    /// Density / difficulty in `[0, 1]`.
    pub difficulty: f32,
    mode: Option<MazeMode>,
    exit: GridCell,
    complexity_level: u8,
    maze_cell_count: usize,
    true_maze: Option<TrueMazeLayout>,
}

impl MazeGenerator {
    pub fn new(seed: u64, difficulty: f32) -> MazeGenerator {
        MazeGenerator {
            rng: StdRng::seed_from_u64(seed),
            difficulty: difficulty.clamp(0.0, 1.0),
            mode: None,
            exit: GridCell::new(0, 0),
            complexity_level: 1,
            maze_cell_count: 0,
            true_maze: None,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: f32) {
        self.difficulty = difficulty.clamp(0.0, 1.0);
    }

    /// Clears the grid and builds a layout of the given mode. `TrueMaze` uses the current
    /// complexity level. Returns the exit cell.
    pub fn generate(&mut self, grid: &mut PathingGrid, mode: MazeMode) -> GridCell {
        let build: fn(&mut PathingGrid, &MazeRegion, &mut StdRng, f32) = match mode {
            MazeMode::TrueMaze => return self.generate_true_maze(grid, self.complexity_level),
            MazeMode::Simple => barriers::generate_simple,
            MazeMode::MultiPath => barriers::generate_multi_path,
            MazeMode::Bottleneck => barriers::generate_bottleneck,
            MazeMode::Labyrinth => labyrinth::generate_labyrinth,
            MazeMode::Spiral => spiral::generate_spiral,
            MazeMode::Chambers => chambers::generate_chambers,
        };
        grid.clear_obstacles();
        self.mode = Some(mode);
        self.true_maze = None;
        self.maze_cell_count = 0;
        let region = MazeRegion::for_grid(grid);
        self.exit = default_exit(grid, &region);
        if !region.is_usable() {
            warn!(
                "Grid of {}x{} cells leaves no room for a {:?} layout",
                grid.grid_width(),
                grid.grid_height(),
                mode
            );
            return self.exit;
        }
        build(grid, &region, &mut self.rng, self.difficulty);
        info!(
            "Generated {:?} layout with {} obstacles, exit at {}",
            mode,
            grid.obstacles().len(),
            self.exit
        );
        self.exit
    }

    /// Builds the complexity-controlled maze for `level` (clamped to `1..=6`) and returns its exit.
    pub fn generate_true_maze(&mut self, grid: &mut PathingGrid, level: u8) -> GridCell {
        let level = level.clamp(1, TRUE_MAZE_LEVELS.len() as u8);
        grid.clear_obstacles();
        self.mode = Some(MazeMode::TrueMaze);
        self.complexity_level = level;
        let (cells_x, cells_y) = true_maze::dimensions(level);
        self.maze_cell_count = (cells_x * cells_y) as usize;
        let region = MazeRegion::for_grid(grid);
        match true_maze::generate(grid, &region, &mut self.rng, level) {
            Some(layout) => {
                self.exit = layout.exit;
                self.true_maze = Some(layout);
            }
            None => {
                warn!(
                    "Grid of {}x{} cells is too small for a {}x{} maze, leaving it open",
                    grid.grid_width(),
                    grid.grid_height(),
                    cells_x,
                    cells_y
                );
                self.exit = default_exit(grid, &region);
                self.true_maze = None;
            }
        }
        info!("{}, exit at {}", self.complexity_summary(), self.exit);
        self.exit
    }

    pub fn mode(&self) -> Option<MazeMode> {
        self.mode
    }
    pub fn exit(&self) -> GridCell {
        self.exit
    }
    /// Pixel position of the exit, where the goal marker goes.
    pub fn goal_position(&self, grid: &PathingGrid) -> (f32, f32) {
        grid.grid_to_world(self.exit)
    }
    pub fn complexity_level(&self) -> u8 {
        self.complexity_level
    }
    pub fn set_complexity_level(&mut self, level: u8) {
        self.complexity_level = level.clamp(1, TRUE_MAZE_LEVELS.len() as u8);
    }
    /// Number of logical maze cells of the last true maze, the problem size N.
    pub fn maze_cell_count(&self) -> usize {
        self.maze_cell_count
    }
    pub fn true_maze_layout(&self) -> Option<&TrueMazeLayout> {
        self.true_maze.as_ref()
    }

    pub fn complexity_summary(&self) -> String {
        format!(
            "Level {} (N={} cells)",
            self.complexity_level, self.maze_cell_count
        )
    }
}

/// Start cell used for scripted runs: middle of the left margin, vertical centre.
pub fn default_start(grid: &PathingGrid) -> GridCell {
    let region = MazeRegion::for_grid(grid);
    GridCell::new(region.left / 2, grid.grid_height() / 2)
}

/// Exit in the middle of the right margin, vertical centre.
fn default_exit(grid: &PathingGrid, region: &MazeRegion) -> GridCell {
    let margin = grid.grid_width() - region.right;
    GridCell::new(region.right + margin / 2, grid.grid_height() / 2)
}
