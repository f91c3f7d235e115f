use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cell::GridCell;
use crate::maze::lattice::Lattice;
use crate::maze::{build_containment, MazeRegion};
use crate::pathing_grid::PathingGrid;

const NORTH: usize = 0;
const EAST: usize = 1;
const SOUTH: usize = 2;
const WEST: usize = 3;
const DIRECTIONS: [(usize, GridCell); 4] = [
    (NORTH, GridCell { x: 0, y: -1 }),
    (EAST, GridCell { x: 1, y: 0 }),
    (SOUTH, GridCell { x: 0, y: 1 }),
    (WEST, GridCell { x: -1, y: 0 }),
];

fn opposite(side: usize) -> usize {
    (side + 2) % 4
}

/// Four removable walls per lattice cell.
struct WallGrid {
    lattice: Lattice,
    walls: Vec<[bool; 4]>,
}

impl WallGrid {
    fn new(lattice: Lattice) -> WallGrid {
        WallGrid {
            lattice,
            walls: vec![[true; 4]; lattice.cell_count()],
        }
    }

    fn remove_wall(&mut self, cell: GridCell, side: usize, neighbour: GridCell) {
        let a = self.lattice.index(cell);
        let b = self.lattice.index(neighbour);
        self.walls[a][side] = false;
        self.walls[b][opposite(side)] = false;
    }

    /// Recursive backtracker with an explicit stack.
    fn carve_spanning_tree(&mut self, rng: &mut StdRng, root: GridCell) {
        let mut visited = vec![false; self.lattice.cell_count()];
        visited[self.lattice.index(root)] = true;
        let mut stack = vec![root];
        while let Some(&current) = stack.last() {
            let candidates: Vec<(usize, GridCell)> = DIRECTIONS
                .iter()
                .map(|&(side, d)| (side, current + d))
                .filter(|&(_, n)| self.lattice.contains(n) && !visited[self.lattice.index(n)])
                .collect();
            match candidates.choose(rng) {
                Some(&(side, next)) => {
                    self.remove_wall(current, side, next);
                    visited[self.lattice.index(next)] = true;
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// Knocks out up to `count` random interior walls, which adds loops.
    fn remove_random_walls(&mut self, rng: &mut StdRng, count: usize) {
        for _ in 0..count {
            let cell = GridCell::new(
                rng.gen_range(0..self.lattice.cells_x),
                rng.gen_range(0..self.lattice.cells_y),
            );
            let (side, d) = DIRECTIONS[rng.gen_range(0..4)];
            let neighbour = cell + d;
            if self.lattice.contains(neighbour) {
                self.remove_wall(cell, side, neighbour);
            }
        }
    }

    fn render(&self, grid: &mut PathingGrid) {
        for cell in self.lattice.cells() {
            self.lattice.carve_cell(grid, cell);
            let walls = &self.walls[self.lattice.index(cell)];
            if !walls[EAST] {
                self.lattice.carve_passage(grid, cell, cell + GridCell::new(1, 0));
            }
            if !walls[SOUTH] {
                self.lattice.carve_passage(grid, cell, cell + GridCell::new(0, 1));
            }
        }
    }
}

/// Corridor pitch in grid cells: narrower corridors at higher difficulty.
fn pitch(difficulty: f32) -> i32 {
    if difficulty > 0.66 {
        3
    } else if difficulty > 0.33 {
        4
    } else {
        5
    }
}

/// Classic cell-wall labyrinth filling the maze region. The outer wall is opened at one and two
/// thirds of the height on both sides. `(1 - difficulty)` scales how many extra walls are
/// removed, so easy labyrinths have many loops.
pub fn generate_labyrinth(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    difficulty: f32,
) {
    let p = pitch(difficulty);
    let width = region.width() - 1;
    let height = region.height() - 1;
    let Some(lattice) = Lattice::new(region.left, region.top, width, height, width / p, height / p)
        .filter(|l| l.cells_x >= 2 && l.cells_y >= 2)
    else {
        warn!("Region too small for a labyrinth, using the plain template");
        build_containment(grid, region);
        return;
    };
    debug!(
        "Labyrinth of {}x{} cells, pitch {}",
        lattice.cells_x, lattice.cells_y, p
    );
    let mut walls = WallGrid::new(lattice);
    walls.carve_spanning_tree(rng, GridCell::new(0, lattice.cells_y / 2));
    let extra = ((1.0 - difficulty) * 0.15 * lattice.cell_count() as f32) as usize;
    walls.remove_random_walls(rng, extra);

    grid.block_rect(region.left, region.top, region.width(), region.height());
    walls.render(grid);
    let mut rows = vec![lattice.cells_y / 3, 2 * lattice.cells_y / 3];
    rows.dedup();
    for j in rows {
        lattice.carve_west_opening(grid, j, region.left);
        lattice.carve_east_opening(grid, j);
    }
    grid.rebuild_obstacles_from_occupancy();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::flood_fill_check;
    use rand::SeedableRng;

    #[test]
    fn backtracker_opens_exactly_a_tree() {
        let lattice = Lattice::new(0, 0, 40, 30, 8, 6).unwrap();
        let mut walls = WallGrid::new(lattice);
        let mut rng = StdRng::seed_from_u64(9);
        walls.carve_spanning_tree(&mut rng, GridCell::new(0, 3));
        let open_sides: usize = walls
            .walls
            .iter()
            .map(|w| w.iter().filter(|closed| !**closed).count())
            .sum();
        // every passage is counted from both sides
        assert_eq!(open_sides, 2 * (lattice.cell_count() - 1));
    }

    #[test]
    fn every_lattice_cell_is_reachable_from_the_entrance() {
        let mut grid = PathingGrid::new(100, 60, 1);
        let region = MazeRegion::for_grid(&grid);
        let mut rng = StdRng::seed_from_u64(4);
        generate_labyrinth(&mut grid, &region, &mut rng, 1.0);
        let start = GridCell::new(region.left - 1, 20);
        let goal = GridCell::new(region.right, 20);
        assert!(flood_fill_check(&grid, start, goal));
        assert!(grid.obstacles().iter().all(|o| o.height == 1));
    }
}
