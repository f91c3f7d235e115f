use criterion::{criterion_group, criterion_main, Criterion};
use maze_pathfinding::{
    maze::{default_start, MazeGenerator, MazeMode},
    solver::{
        astar::AstarSolver, dijkstra::DijkstraSolver, greedy::GreedySolver, jps::JpsSolver,
        theta::ThetaStarSolver, GridSolver,
    },
    GridCell, PathingGrid,
};
use std::hint::black_box;

const BENCH_LEVELS: [u8; 3] = [1, 3, 5];

/// A 1200x800 arena of 5 px cells holding the true maze of `level`.
fn true_maze(level: u8) -> (PathingGrid, GridCell, GridCell) {
    let mut grid = PathingGrid::new(1200, 800, 5);
    let mut generator = MazeGenerator::new(0, 0.5);
    let exit = generator.generate_true_maze(&mut grid, level);
    let start = default_start(&grid);
    (grid, start, exit)
}

fn maze_bench_solver<S, FS>(c: &mut Criterion, solver_name: &str, create_solver: FS)
where
    S: GridSolver,
    FS: Fn() -> S,
{
    for level in BENCH_LEVELS {
        let (grid, start, exit) = true_maze(level);
        let mut solver = create_solver();
        c.bench_function(format!("true maze {level}, {solver_name}").as_str(), |b| {
            b.iter(|| black_box(solver.find_path(&grid, start, exit)))
        });
    }
}

fn maze_bench_astar(c: &mut Criterion) {
    maze_bench_solver(c, "A*", AstarSolver::new);
}

fn maze_bench_dijkstra(c: &mut Criterion) {
    maze_bench_solver(c, "Dijkstra", || DijkstraSolver);
}

fn maze_bench_greedy(c: &mut Criterion) {
    maze_bench_solver(c, "Greedy", || GreedySolver);
}

fn maze_bench_jps(c: &mut Criterion) {
    maze_bench_solver(c, "JPS", || JpsSolver);
}

fn maze_bench_theta(c: &mut Criterion) {
    maze_bench_solver(c, "Theta*", || ThetaStarSolver);
}

/// Open arena with scattered walls, where jumping pays off the most.
fn barrier_bench(c: &mut Criterion) {
    let mut grid = PathingGrid::new(1200, 800, 5);
    let mut generator = MazeGenerator::new(0, 0.5);
    let exit = generator.generate(&mut grid, MazeMode::MultiPath);
    let start = default_start(&grid);
    let mut astar = AstarSolver::new();
    let mut jps = JpsSolver;
    c.bench_function("multi path, A*", |b| {
        b.iter(|| black_box(astar.find_path(&grid, start, exit)))
    });
    c.bench_function("multi path, JPS", |b| {
        b.iter(|| black_box(jps.find_path(&grid, start, exit)))
    });
}

criterion_group!(
    benches,
    maze_bench_astar,
    maze_bench_dijkstra,
    maze_bench_greedy,
    maze_bench_jps,
    maze_bench_theta,
    barrier_bench,
);
criterion_main!(benches);
