use maze_pathfinding::{
    config::Settings,
    maze::{default_start, MazeMode},
    solver::Algorithm,
};

// Generates a true maze and lets every algorithm plan a route from the spawn margin to the
// exit, printing the maze and the table a race panel would show.
fn main() {
    env_logger::init();
    let mut settings = Settings::default();
    settings.arena.width = 400;
    settings.arena.height = 300;
    settings.maze.complexity_level = 2;
    let mut grid = settings.build_grid();
    let mut generator = settings.maze_generator();
    let mut pathfinder = settings.pathfinder();
    let exit = generator.generate(&mut grid, MazeMode::TrueMaze);
    let start = default_start(&grid);
    println!("{}", grid);
    println!("{}, {} -> {}", generator.complexity_summary(), start, exit);

    for algorithm in Algorithm::ALL {
        let result = pathfinder.find_path(algorithm, &grid, start, exit);
        if result.path.is_empty() && result.found {
            println!("{:<18} follows its own trail", algorithm.name());
            continue;
        }
        println!(
            "{:<18} found: {:<5} cells: {:>4} length: {:>7.2} expanded: {:>5} time: {:.3} ms",
            algorithm.name(),
            result.found,
            result.path.len(),
            result.path_length,
            result.nodes_expanded,
            result.compute_time_ms
        );
    }
}
