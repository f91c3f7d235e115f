//! Empirical doubling experiment: run the goal-aware algorithms on true mazes of growing size
//! and infer the growth order from the ratio of consecutive average runtimes.
use core::fmt;
use log::{info, warn};
use std::fmt::Write;

use crate::maze::{default_start, MazeGenerator, TRUE_MAZE_LEVELS};
use crate::pathing_grid::PathingGrid;
use crate::solver::{Algorithm, Pathfinder};

pub const DEFAULT_RUNS_PER_LEVEL: usize = 3;

/// Growth order bucket. The thresholds are wide to absorb timing noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplexityClass {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    SuperQuadratic,
}

impl ComplexityClass {
    pub fn label(self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n^2)",
            ComplexityClass::SuperQuadratic => "O(n^2+)",
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets the runtime ratio T(2N)/T(N).
pub fn classify_ratio(ratio: f64) -> ComplexityClass {
    if ratio < 1.2 {
        ComplexityClass::Constant
    } else if ratio < 1.5 {
        ComplexityClass::Logarithmic
    } else if ratio < 2.5 {
        ComplexityClass::Linear
    } else if ratio < 3.5 {
        ComplexityClass::Linearithmic
    } else if ratio < 5.0 {
        ComplexityClass::Quadratic
    } else {
        ComplexityClass::SuperQuadratic
    }
}

/// Measurements of one algorithm at one maze level.
#[derive(Clone, Debug, PartialEq)]
pub struct DoublingResult {
    pub algorithm: Algorithm,
    pub level: u8,
    /// Number of logical maze cells.
    pub problem_size: usize,
    pub avg_time_ms: f64,
    pub avg_nodes_expanded: f64,
    /// Whether every run found the exit.
    pub found: bool,
    /// False when the grid was too small for the level's maze and the run timed an open grid.
    /// Such rows carry no ratio or class.
    pub generated: bool,
    /// Ratio to the previous level's average time. `None` on the first level, when the
    /// previous average was too small to divide by, or when either level was not generated.
    pub ratio: Option<f64>,
    pub complexity: Option<ComplexityClass>,
}

#[derive(Clone, Debug)]
pub struct ComplexityAnalyzer {
    pub runs_per_level: usize,
    results: Vec<DoublingResult>,
}

impl Default for ComplexityAnalyzer {
    fn default() -> ComplexityAnalyzer {
        ComplexityAnalyzer::new(DEFAULT_RUNS_PER_LEVEL)
    }
}

impl ComplexityAnalyzer {
    pub fn new(runs_per_level: usize) -> ComplexityAnalyzer {
        ComplexityAnalyzer {
            runs_per_level: runs_per_level.max(1),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[DoublingResult] {
        &self.results
    }

    /// Generates the true maze at every level, times each goal-aware algorithm from the middle of
    /// the spawn margin to the maze exit and replaces the stored rows. Rows are ordered by
    /// algorithm, then level.
    ///
    /// The grid and generator are restored afterwards, so a race in progress on them continues
    /// unaffected.
    pub fn run_doubling_experiment(
        &mut self,
        grid: &mut PathingGrid,
        generator: &mut MazeGenerator,
        pathfinder: &mut Pathfinder,
    ) -> &[DoublingResult] {
        let saved_grid = grid.clone();
        let saved_generator = generator.clone();
        self.results.clear();
        let runs = self.runs_per_level.max(1);
        info!(
            "Doubling experiment over {} levels, {} runs each",
            TRUE_MAZE_LEVELS.len(),
            runs
        );

        let mut previous: [Option<f64>; Algorithm::GOAL_AWARE.len()] =
            [None; Algorithm::GOAL_AWARE.len()];
        for level in 1..=TRUE_MAZE_LEVELS.len() as u8 {
            let exit = generator.generate_true_maze(grid, level);
            let start = default_start(grid);
            let problem_size = generator.maze_cell_count();
            let generated = generator.true_maze_layout().is_some();
            if !generated {
                warn!(
                    "Level {} maze does not fit the grid, its timings are not classified",
                    level
                );
            }
            for (slot, &algorithm) in Algorithm::GOAL_AWARE.iter().enumerate() {
                let mut total_ms = 0.0;
                let mut total_expanded = 0;
                let mut found = true;
                for _ in 0..runs {
                    let result = pathfinder.find_path(algorithm, grid, start, exit);
                    total_ms += result.compute_time_ms;
                    total_expanded += result.nodes_expanded;
                    found &= result.found;
                }
                if !found {
                    warn!("{} did not reach the exit at level {}", algorithm, level);
                }
                let avg_time_ms = total_ms / runs as f64;
                let ratio = previous[slot]
                    .filter(|&prev| generated && prev > f64::EPSILON)
                    .map(|prev| avg_time_ms / prev);
                previous[slot] = generated.then_some(avg_time_ms);
                let row = DoublingResult {
                    algorithm,
                    level,
                    problem_size,
                    avg_time_ms,
                    avg_nodes_expanded: total_expanded as f64 / runs as f64,
                    found,
                    generated,
                    ratio,
                    complexity: ratio.map(classify_ratio),
                };
                info!(
                    "{} level {} (N={}): {:.3} ms, ratio {}",
                    algorithm,
                    level,
                    problem_size,
                    avg_time_ms,
                    ratio.map_or("-".to_string(), |r| format!("{:.2}", r))
                );
                self.results.push(row);
            }
        }
        self.results
            .sort_by_key(|row| (row.algorithm.index(), row.level));

        *grid = saved_grid;
        *generator = saved_generator;
        &self.results
    }

    /// Plain-text table of the last experiment.
    pub fn format_results(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:>5} {:>6} {:>10} {:>10} {:>7}  {}",
            "Algorithm", "Level", "N", "Avg ms", "Expanded", "Ratio", "Class"
        );
        for row in &self.results {
            let ratio = row.ratio.map_or("-".to_string(), |r| format!("{:.2}", r));
            let class = if row.generated {
                row.complexity.map_or("-", ComplexityClass::label)
            } else {
                "open grid"
            };
            let _ = writeln!(
                out,
                "{:<10} {:>5} {:>6} {:>10.3} {:>10.1} {:>7}  {}",
                row.algorithm.name(),
                row.level,
                row.problem_size,
                row.avg_time_ms,
                row.avg_nodes_expanded,
                ratio,
                class
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::MazeMode;

    #[test]
    fn ratio_buckets() {
        assert_eq!(classify_ratio(2.0), ComplexityClass::Linear);
        assert_eq!(classify_ratio(4.0), ComplexityClass::Quadratic);
        assert_eq!(classify_ratio(1.0), ComplexityClass::Constant);
        assert_eq!(classify_ratio(1.2), ComplexityClass::Logarithmic);
        assert_eq!(classify_ratio(3.0), ComplexityClass::Linearithmic);
        assert_eq!(classify_ratio(5.0), ComplexityClass::SuperQuadratic);
        assert_eq!(ComplexityClass::Quadratic.to_string(), "O(n^2)");
    }

    #[test]
    fn experiment_covers_every_level_and_restores_state() {
        let mut grid = PathingGrid::new(1200, 800, 5);
        let mut generator = MazeGenerator::new(1, 0.5);
        let exit = generator.generate(&mut grid, MazeMode::Chambers);
        let obstacles = grid.obstacles().to_vec();
        let mut pathfinder = Pathfinder::default();
        let mut analyzer = ComplexityAnalyzer::new(1);

        let rows = analyzer.run_doubling_experiment(&mut grid, &mut generator, &mut pathfinder);
        assert_eq!(rows.len(), 4 * 6);
        for chunk in rows.chunks(6) {
            assert!(chunk.iter().all(|r| r.algorithm == chunk[0].algorithm && r.found));
            let sizes: Vec<usize> = chunk.iter().map(|r| r.problem_size).collect();
            assert_eq!(sizes, vec![48, 108, 192, 432, 768, 1728]);
            assert!(chunk[0].ratio.is_none());
        }

        assert_eq!(grid.obstacles(), &obstacles[..]);
        assert_eq!(generator.exit(), exit);
        assert_eq!(generator.mode(), Some(MazeMode::Chambers));

        let table = analyzer.format_results();
        assert_eq!(table.lines().count(), 1 + 24);
        assert!(table.contains("Theta*"));
        assert!(!table.contains("open grid"));
    }

    #[test]
    fn levels_that_do_not_fit_are_not_classified() {
        let mut grid = PathingGrid::new(40, 40, 5);
        let mut generator = MazeGenerator::new(2, 0.5);
        let mut pathfinder = Pathfinder::default();
        let mut analyzer = ComplexityAnalyzer::new(2);

        let rows = analyzer.run_doubling_experiment(&mut grid, &mut generator, &mut pathfinder);
        assert_eq!(rows.len(), 4 * 6);
        for row in rows {
            assert!(!row.generated);
            assert!(row.found, "{} level {}", row.algorithm, row.level);
            assert!(row.ratio.is_none());
            assert!(row.complexity.is_none());
        }
        assert_eq!(rows[5].problem_size, 1728);
        let table = analyzer.format_results();
        assert_eq!(table.matches("open grid").count(), 24);
    }
}
