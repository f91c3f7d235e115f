//! Settings loaded from a TOML file, every field optional.
//!
//! ```toml
//! [arena]
//! width = 1200        # pixels
//! height = 800
//! cell_size = 5       # pixels per grid cell
//!
//! [pathfinding]
//! allow_diagonal = true
//! max_claims_per_frame = 4
//!
//! [maze]
//! mode = "true_maze"
//! difficulty = 0.5
//! complexity_level = 3
//!
//! [benchmark]
//! agents_per_lane = 5
//! goal_radius = 15.0  # pixels
//! runs_per_level = 3
//! ```
//!
//! The settings are read-only once loaded. Grid dimensions only change through
//! [Settings::apply_to].
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::benchmark::doubling::ComplexityAnalyzer;
use crate::benchmark::BenchmarkState;
use crate::error::{Error, Result};
use crate::maze::{MazeGenerator, MazeMode, TRUE_MAZE_LEVELS};
use crate::pathing_grid::PathingGrid;
use crate::solver::astar::AstarSolver;
use crate::solver::exploration::{ExplorationArena, DEFAULT_MAX_CLAIMS_PER_FRAME};
use crate::solver::Pathfinder;

mod defaults {
    use super::*;

    pub fn width() -> i32 {
        1200
    }
    pub fn height() -> i32 {
        800
    }
    pub fn cell_size() -> i32 {
        5
    }
    pub fn enabled() -> bool {
        true
    }
    pub fn heuristic_factor() -> f64 {
        1.0
    }
    pub fn max_claims_per_frame() -> usize {
        DEFAULT_MAX_CLAIMS_PER_FRAME
    }
    pub fn mode() -> MazeMode {
        MazeMode::Simple
    }
    pub fn difficulty() -> f32 {
        0.5
    }
    pub fn complexity_level() -> u8 {
        1
    }
    pub fn seed() -> u64 {
        42
    }
    pub fn agents_per_lane() -> usize {
        5
    }
    pub fn goal_radius() -> f32 {
        15.0
    }
    pub fn runs_per_level() -> usize {
        3
    }
}

/// Arena size in pixels and the cell size that maps it to the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaSection {
    #[serde(default = "defaults::width")]
    pub width: i32,
    #[serde(default = "defaults::height")]
    pub height: i32,
    #[serde(default = "defaults::cell_size")]
    pub cell_size: i32,
}

impl Default for ArenaSection {
    fn default() -> Self {
        Self {
            width: defaults::width(),
            height: defaults::height(),
            cell_size: defaults::cell_size(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathfindingSection {
    /// 8-connected movement when true, 4-connected otherwise.
    #[serde(default = "defaults::enabled")]
    pub allow_diagonal: bool,
    /// Weight of the A* heuristic, 1.0 keeps A* optimal.
    #[serde(default = "defaults::heuristic_factor")]
    pub heuristic_factor: f64,
    /// Frontier cells each uninformed algorithm may claim per tick.
    #[serde(default = "defaults::max_claims_per_frame")]
    pub max_claims_per_frame: usize,
    /// Seed of the randomized DFS neighbour order.
    #[serde(default)]
    pub seed: u64,
}

impl Default for PathfindingSection {
    fn default() -> Self {
        Self {
            allow_diagonal: defaults::enabled(),
            heuristic_factor: defaults::heuristic_factor(),
            max_claims_per_frame: defaults::max_claims_per_frame(),
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeSection {
    #[serde(default = "defaults::mode")]
    pub mode: MazeMode,
    /// Obstacle density in `[0, 1]`.
    #[serde(default = "defaults::difficulty")]
    pub difficulty: f32,
    /// True maze level, `1..=6`.
    #[serde(default = "defaults::complexity_level")]
    pub complexity_level: u8,
    #[serde(default = "defaults::seed")]
    pub seed: u64,
}

impl Default for MazeSection {
    fn default() -> Self {
        Self {
            mode: defaults::mode(),
            difficulty: defaults::difficulty(),
            complexity_level: defaults::complexity_level(),
            seed: defaults::seed(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSection {
    #[serde(default = "defaults::agents_per_lane")]
    pub agents_per_lane: usize,
    /// Distance to the goal, in pixels, at which an agent counts as arrived.
    #[serde(default = "defaults::goal_radius")]
    pub goal_radius: f32,
    /// Timed searches per algorithm and level in the doubling experiment.
    #[serde(default = "defaults::runs_per_level")]
    pub runs_per_level: usize,
}

impl Default for BenchmarkSection {
    fn default() -> Self {
        Self {
            agents_per_lane: defaults::agents_per_lane(),
            goal_radius: defaults::goal_radius(),
            runs_per_level: defaults::runs_per_level(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub arena: ArenaSection,
    #[serde(default)]
    pub pathfinding: PathfindingSection,
    #[serde(default)]
    pub maze: MazeSection,
    #[serde(default)]
    pub benchmark: BenchmarkSection,
}

impl Settings {
    /// Loads and validates settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = Settings::from_toml_str(&contents)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let arena = &self.arena;
        if arena.width <= 0 || arena.height <= 0 {
            return Err(Error::invalid(
                "arena.width/height",
                format!("{}x{} is not a positive size", arena.width, arena.height),
            ));
        }
        if arena.cell_size < 1 {
            return Err(Error::invalid("arena.cell_size", "must be at least 1"));
        }
        let factor = self.pathfinding.heuristic_factor;
        if !factor.is_finite() || factor < 0.0 {
            return Err(Error::invalid(
                "pathfinding.heuristic_factor",
                "must be a finite, non-negative number",
            ));
        }
        if self.pathfinding.max_claims_per_frame == 0 {
            return Err(Error::invalid(
                "pathfinding.max_claims_per_frame",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.maze.difficulty) {
            return Err(Error::invalid("maze.difficulty", "must lie in [0, 1]"));
        }
        if !(1..=TRUE_MAZE_LEVELS.len() as u8).contains(&self.maze.complexity_level) {
            return Err(Error::invalid(
                "maze.complexity_level",
                format!("must lie in 1..={}", TRUE_MAZE_LEVELS.len()),
            ));
        }
        if self.benchmark.agents_per_lane == 0 || self.benchmark.runs_per_level == 0 {
            return Err(Error::invalid(
                "benchmark.agents_per_lane/runs_per_level",
                "must be at least 1",
            ));
        }
        let radius = self.benchmark.goal_radius;
        if radius.is_nan() || radius <= 0.0 {
            return Err(Error::invalid("benchmark.goal_radius", "must be positive"));
        }
        Ok(())
    }

    /// A grid sized by the arena section.
    pub fn build_grid(&self) -> PathingGrid {
        let mut grid = PathingGrid::new(
            self.arena.width,
            self.arena.height,
            self.arena.cell_size,
        );
        grid.allow_diagonal_move = self.pathfinding.allow_diagonal;
        grid
    }

    /// Re-derives the grid dimensions from the arena section. Clears the grid.
    pub fn apply_to(&self, grid: &mut PathingGrid) {
        grid.set_cell_size(self.arena.cell_size);
        grid.resize(self.arena.width, self.arena.height);
        grid.allow_diagonal_move = self.pathfinding.allow_diagonal;
    }

    pub fn maze_generator(&self) -> MazeGenerator {
        let mut generator = MazeGenerator::new(self.maze.seed, self.maze.difficulty);
        generator.set_complexity_level(self.maze.complexity_level);
        generator
    }

    pub fn pathfinder(&self) -> Pathfinder {
        let mut pathfinder = Pathfinder::new(self.pathfinding.seed);
        pathfinder.astar = AstarSolver {
            heuristic_factor: self.pathfinding.heuristic_factor,
        };
        pathfinder
    }

    pub fn exploration_arena(&self) -> ExplorationArena {
        ExplorationArena::new(self.pathfinding.max_claims_per_frame)
    }

    pub fn benchmark_state(&self) -> BenchmarkState {
        BenchmarkState::new(self.benchmark.goal_radius)
    }

    pub fn complexity_analyzer(&self) -> ComplexityAnalyzer {
        ComplexityAnalyzer::new(self.benchmark.runs_per_level)
    }
}
