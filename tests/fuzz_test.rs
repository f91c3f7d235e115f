/// Fuzzes the search engine on many random grids: every solver must find a path exactly when the
/// goal lies in the start's connected component, every path must be walkable, and path lengths
/// must respect the optimality order between the algorithms. Both 4- and 8-connected movement are
/// tested.
use maze_pathfinding::{
    solver::{line_of_sight, Algorithm, Pathfinder, PathResult},
    CellExt, GridCell, PathingGrid,
};
use rand::prelude::*;

const SOLVERS: [Algorithm; 7] = [
    Algorithm::AStar,
    Algorithm::Dijkstra,
    Algorithm::Greedy,
    Algorithm::BidirectionalBfs,
    Algorithm::Dfs,
    Algorithm::Jps,
    Algorithm::ThetaStar,
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_grid(n: i32, rng: &mut StdRng, diagonal: bool) -> PathingGrid {
    let mut grid = PathingGrid::new(n, n, 1);
    grid.allow_diagonal_move = diagonal;
    for x in 0..n {
        for y in 0..n {
            grid.set_blocked(GridCell::new(x, y), rng.gen_bool(0.4));
        }
    }
    grid
}

fn visualize_grid(grid: &PathingGrid, start: &GridCell, end: &GridCell) {
    for y in 0..grid.grid_height() {
        for x in 0..grid.grid_width() {
            let p = GridCell::new(x, y);
            if *start == p {
                print!("S");
            } else if *end == p {
                print!("G");
            } else if grid.is_blocked(x, y) {
                print!("#");
            } else {
                print!(".");
            }
        }
        println!();
    }
}

fn assert_walkable(grid: &PathingGrid, algorithm: Algorithm, result: &PathResult) {
    assert!(result.path.iter().all(|c| grid.is_valid_cell(*c)));
    if algorithm == Algorithm::ThetaStar {
        assert!(result
            .path
            .windows(2)
            .all(|w| line_of_sight(grid, &w[0], &w[1])));
    } else {
        assert!(result
            .path
            .windows(2)
            .all(|w| w[0].is_adjacent(&w[1]) && grid.can_move_to(w[1], w[0])));
    }
}

#[test]
fn fuzz() {
    init_logger();
    const N: i32 = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let mut pathfinder = Pathfinder::new(0);
    let start = GridCell::new(0, 0);
    let end = GridCell::new(N - 1, N - 1);
    for diagonal in [false, true] {
        for _ in 0..N_GRIDS {
            let mut grid = random_grid(N, &mut rng, diagonal);
            grid.set_blocked(start, false);
            grid.set_blocked(end, false);
            grid.generate_components();
            let reachable = grid.reachable(&start, &end);
            for algorithm in SOLVERS {
                let result = pathfinder.find_path(algorithm, &grid, start, end);
                // Show the grid if the solver disagrees with the components
                if result.found != reachable {
                    println!("{algorithm} diagonal: {diagonal}");
                    visualize_grid(&grid, &start, &end);
                }
                assert_eq!(result.found, reachable);
                if result.found {
                    assert_eq!(result.path.first(), Some(&start));
                    assert_eq!(result.path.last(), Some(&end));
                    assert_walkable(&grid, algorithm, &result);
                } else {
                    assert!(result.path.is_empty());
                }
            }
        }
    }
}

#[test]
fn fuzz_distance() {
    init_logger();
    const N: i32 = 8;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(1);
    let mut pathfinder = Pathfinder::new(1);
    let start = GridCell::new(0, 0);
    let end = GridCell::new(N - 1, N - 1);
    for diagonal in [false, true] {
        for _ in 0..N_GRIDS {
            let mut grid = random_grid(N, &mut rng, diagonal);
            grid.set_blocked(start, false);
            grid.set_blocked(end, false);
            let mut length = |algorithm| {
                let result = pathfinder.find_path(algorithm, &grid, start, end);
                result.found.then_some(result.path_length)
            };
            let Some(astar) = length(Algorithm::AStar) else {
                continue;
            };
            let dijkstra = length(Algorithm::Dijkstra).unwrap();
            let jps = length(Algorithm::Jps).unwrap();
            let theta = length(Algorithm::ThetaStar).unwrap();
            let greedy = length(Algorithm::Greedy).unwrap();
            let dfs = length(Algorithm::Dfs).unwrap();
            let bfs = length(Algorithm::BidirectionalBfs).unwrap();

            if (jps - astar).abs() >= 1e-6 {
                println!("A* distance: {astar}; JPS distance: {jps}; diagonal: {diagonal}");
                visualize_grid(&grid, &start, &end);
            }
            assert!((jps - astar).abs() < 1e-6);
            assert!((dijkstra - astar).abs() < 1e-6);
            assert!(theta <= astar + 1e-9);
            assert!(astar <= greedy + 1e-9);
            assert!(astar <= dfs + 1e-9);
            assert!(astar <= bfs + 1e-9);
        }
    }
}

#[test]
fn open_grid_diagonal() {
    init_logger();
    let grid = PathingGrid::new(100, 100, 1);
    let mut pathfinder = Pathfinder::default();
    let start = GridCell::new(0, 0);
    let end = GridCell::new(99, 99);
    let expected = 99.0 * std::f64::consts::SQRT_2;
    for algorithm in [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::ThetaStar,
        Algorithm::Jps,
    ] {
        let result = pathfinder.find_path(algorithm, &grid, start, end);
        assert!(result.found);
        assert!(
            (result.path_length - expected).abs() < 1e-6,
            "{algorithm}: {}",
            result.path_length
        );
    }
}

#[test]
fn trivial_and_invalid_queries() {
    init_logger();
    let mut grid = PathingGrid::new(20, 20, 1);
    grid.add_obstacle(5, 5, 1, 1);
    let mut pathfinder = Pathfinder::default();
    let free = GridCell::new(2, 2);
    for algorithm in SOLVERS {
        let same = pathfinder.find_path(algorithm, &grid, free, free);
        assert!(same.found);
        assert_eq!(same.path, vec![free]);
        assert_eq!(same.path_length, 0.0);

        let blocked = pathfinder.find_path(algorithm, &grid, GridCell::new(5, 5), free);
        assert!(!blocked.found);
        assert!(blocked.path.is_empty());
        assert_eq!(blocked.nodes_expanded, 0);

        let outside = pathfinder.find_path(algorithm, &grid, free, GridCell::new(20, 3));
        assert!(!outside.found);
        assert_eq!(outside.nodes_expanded, 0);
    }
}
