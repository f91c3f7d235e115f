use maze_pathfinding::config::Settings;
use maze_pathfinding::maze::MazeMode;
use std::env;

/// Runs the doubling experiment and prints the estimated growth order of every goal-aware
/// algorithm. An optional argument names a TOML settings file; set `RUST_LOG=info` to follow
/// the progress.
fn main() -> maze_pathfinding::error::Result<()> {
    env_logger::init();
    let settings = match env::args().nth(1) {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let mut grid = settings.build_grid();
    let mut generator = settings.maze_generator();
    let mut pathfinder = settings.pathfinder();
    generator.generate(&mut grid, settings.maze.mode);

    let mut analyzer = settings.complexity_analyzer();
    analyzer.run_doubling_experiment(&mut grid, &mut generator, &mut pathfinder);
    println!("{}", analyzer.format_results());

    if settings.maze.mode == MazeMode::TrueMaze {
        println!("Live maze: {}", generator.complexity_summary());
    }
    Ok(())
}
