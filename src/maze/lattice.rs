use crate::{cell::GridCell, pathing_grid::PathingGrid};

/// A `cells_x` by `cells_y` lattice of logical maze cells laid over a block of grid cells.
///
/// Cell boxes are sized proportionally so the lattice fills its block exactly. Box boundaries
/// are one grid cell thick walls; the open interior of a box starts one cell in from its top
/// left corner, and the boundary right of the last column (and below the last row) stays solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice {
    pub x0: i32,
    pub y0: i32,
    pub width: i32,
    pub height: i32,
    pub cells_x: i32,
    pub cells_y: i32,
}

impl Lattice {
    /// `None` when a box would be less than two grid cells on a side, which leaves no room for
    /// both a wall and a corridor.
    pub fn new(
        x0: i32,
        y0: i32,
        width: i32,
        height: i32,
        cells_x: i32,
        cells_y: i32,
    ) -> Option<Lattice> {
        if cells_x <= 0 || cells_y <= 0 || width < 2 * cells_x || height < 2 * cells_y {
            return None;
        }
        Some(Lattice {
            x0,
            y0,
            width,
            height,
            cells_x,
            cells_y,
        })
    }

    pub fn cell_count(&self) -> usize {
        (self.cells_x * self.cells_y) as usize
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= 0 && cell.x < self.cells_x && cell.y >= 0 && cell.y < self.cells_y
    }

    /// Lattice cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.cells_y).flat_map(move |j| (0..self.cells_x).map(move |i| GridCell::new(i, j)))
    }

    pub fn index(&self, cell: GridCell) -> usize {
        (cell.y * self.cells_x + cell.x) as usize
    }

    /// Grid column of the wall left of lattice column `i`.
    fn col(&self, i: i32) -> i32 {
        self.x0 + i * self.width / self.cells_x
    }
    fn row(&self, j: i32) -> i32 {
        self.y0 + j * self.height / self.cells_y
    }

    /// Open interior of a lattice cell as `(x, y, w, h)` in grid cells.
    pub fn interior(&self, cell: GridCell) -> (i32, i32, i32, i32) {
        let x = self.col(cell.x) + 1;
        let y = self.row(cell.y) + 1;
        (x, y, self.col(cell.x + 1) - x, self.row(cell.y + 1) - y)
    }

    /// Grid cell in the middle of a lattice cell's interior.
    pub fn center(&self, cell: GridCell) -> GridCell {
        let (x, y, w, h) = self.interior(cell);
        GridCell::new(x + w / 2, y + h / 2)
    }

    pub fn carve_cell(&self, grid: &mut PathingGrid, cell: GridCell) {
        let (x, y, w, h) = self.interior(cell);
        grid.clear_rect(x, y, w, h);
    }

    /// Opens the wall shared by two adjacent lattice cells across the full corridor width.
    pub fn carve_passage(&self, grid: &mut PathingGrid, a: GridCell, b: GridCell) {
        debug_assert!(a.move_distance(&b) == 1 && (a.x == b.x || a.y == b.y));
        let (x, y, w, h) = self.interior(a);
        if a.y == b.y {
            grid.clear_rect(self.col(a.x.max(b.x)), y, 1, h);
        } else {
            grid.clear_rect(x, self.row(a.y.max(b.y)), w, 1);
        }
    }

    /// Opens the left boundary of row `j` from grid column `from_x` up to and including the
    /// lattice's own wall column.
    pub fn carve_west_opening(&self, grid: &mut PathingGrid, j: i32, from_x: i32) {
        let (_, y, _, h) = self.interior(GridCell::new(0, j));
        grid.clear_rect(from_x, y, self.x0 - from_x + 1, h);
    }

    /// Opens the right boundary of row `j` and returns the grid cell in the middle of the
    /// opening.
    pub fn carve_east_opening(&self, grid: &mut PathingGrid, j: i32) -> GridCell {
        let (_, y, _, h) = self.interior(GridCell::new(self.cells_x - 1, j));
        let x = self.x0 + self.width;
        grid.clear_rect(x, y, 1, h);
        GridCell::new(x, y + h / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_tile_the_block() {
        let lattice = Lattice::new(2, 0, 23, 17, 4, 3).unwrap();
        let (x, _, w, _) = lattice.interior(GridCell::new(3, 0));
        assert_eq!(x + w, 2 + 23);
        let (_, y, _, h) = lattice.interior(GridCell::new(0, 2));
        assert_eq!(y + h, 17);
        assert_eq!(lattice.cells().count(), 12);
    }

    #[test]
    fn carving_connects_neighbours() {
        let mut grid = PathingGrid::new(13, 9, 1);
        grid.block_rect(0, 0, 13, 9);
        let lattice = Lattice::new(0, 0, 12, 8, 3, 2).unwrap();
        let a = GridCell::new(0, 0);
        let b = GridCell::new(1, 0);
        lattice.carve_cell(&mut grid, a);
        lattice.carve_cell(&mut grid, b);
        assert!(!crate::maze::flood_fill_check(
            &grid,
            lattice.center(a),
            lattice.center(b)
        ));
        lattice.carve_passage(&mut grid, a, b);
        assert!(crate::maze::flood_fill_check(
            &grid,
            lattice.center(a),
            lattice.center(b)
        ));
    }

    #[test]
    fn too_small_block_is_rejected() {
        assert!(Lattice::new(0, 0, 15, 20, 8, 6).is_none());
        assert!(Lattice::new(0, 0, 16, 12, 8, 6).is_some());
    }
}
