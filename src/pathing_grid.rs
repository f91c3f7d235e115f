use crate::cell::{CellExt, GridCell};
use crate::N_SMALLVEC_SIZE;
use core::fmt;
use log::{debug, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Axis-aligned rectangle in cell units. Only a display record: the occupancy
/// buffer is what actually blocks movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Obstacle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Obstacle {
        Obstacle {
            x,
            y,
            width,
            height,
        }
    }
}

/// [PathingGrid] maps a pixel-sized world onto a grid of square cells and keeps a flat
/// occupancy buffer where `true` marks an impassable cell. Coordinates outside the grid are
/// always treated as blocked and are never used to index the buffer.
///
/// Connected components are kept in a [UnionFind] that is regenerated on demand, the same
/// neighbour rule as [neighbors](Self::neighbors) is used to link cells.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    width: i32,
    height: i32,
    cell_size: i32,
    grid_width: i32,
    grid_height: i32,
    blocked: Vec<bool>,
    obstacles: Vec<Obstacle>,
    pub allow_diagonal_move: bool,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for PathingGrid {
    fn default() -> PathingGrid {
        PathingGrid::new(0, 0, 1)
    }
}

fn ceil_div(value: i32, divisor: i32) -> i32 {
    if value <= 0 {
        0
    } else {
        (value + divisor - 1) / divisor
    }
}

impl PathingGrid {
    /// Creates an empty grid covering `width`×`height` pixels with square cells of
    /// `cell_size` pixels.
    pub fn new(width: i32, height: i32, cell_size: i32) -> PathingGrid {
        let mut grid = PathingGrid {
            width: 0,
            height: 0,
            cell_size: cell_size.max(1),
            grid_width: 0,
            grid_height: 0,
            blocked: Vec::new(),
            obstacles: Vec::new(),
            allow_diagonal_move: true,
            components: UnionFind::new(0),
            components_dirty: true,
        };
        grid.resize(width, height);
        grid
    }

    /// Recomputes the cell counts for new world dimensions. The occupancy buffer is
    /// reallocated all free and the obstacle records are discarded.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.grid_width = ceil_div(self.width, self.cell_size);
        self.grid_height = ceil_div(self.height, self.cell_size);
        let n = (self.grid_width * self.grid_height) as usize;
        self.blocked = vec![false; n];
        self.obstacles.clear();
        self.components = UnionFind::new(n);
        self.components_dirty = true;
        debug!(
            "Resized grid to {}x{} px ({}x{} cells of {} px)",
            self.width, self.height, self.grid_width, self.grid_height, self.cell_size
        );
    }

    /// Changes the cell granularity, which reallocates the grid like [resize](Self::resize).
    pub fn set_cell_size(&mut self, cell_size: i32) {
        if cell_size <= 0 {
            warn!("Cell size {} is not positive, using 1", cell_size);
        }
        self.cell_size = cell_size.max(1);
        self.resize(self.width, self.height);
    }

    pub fn width(&self) -> i32 {
        self.width
    }
    pub fn height(&self) -> i32 {
        self.height
    }
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }
    pub fn grid_width(&self) -> i32 {
        self.grid_width
    }
    pub fn grid_height(&self) -> i32 {
        self.grid_height
    }
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.grid_width && y < self.grid_height
    }
    pub fn cell_in_bounds(&self, cell: GridCell) -> bool {
        self.in_bounds(cell.x, cell.y)
    }
    fn ix(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y));
        (y * self.grid_width + x) as usize
    }
    pub(crate) fn get_ix_point(&self, cell: &GridCell) -> usize {
        self.ix(cell.x, cell.y)
    }

    /// Out-of-range coordinates count as blocked.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        !self.in_bounds(x, y) || self.blocked[self.ix(x, y)]
    }
    /// In range and not blocked.
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        !self.is_blocked(x, y)
    }
    pub fn is_valid_cell(&self, cell: GridCell) -> bool {
        self.is_valid(cell.x, cell.y)
    }

    pub fn set_blocked(&mut self, cell: GridCell, blocked: bool) {
        if self.cell_in_bounds(cell) {
            let ix = self.ix(cell.x, cell.y);
            if self.blocked[ix] != blocked {
                self.blocked[ix] = blocked;
                self.components_dirty = true;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, blocked: bool) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.grid_width);
        let y1 = (y + h).min(self.grid_height);
        for cy in y0..y1 {
            for cx in x0..x1 {
                let ix = self.ix(cx, cy);
                self.blocked[ix] = blocked;
            }
        }
        if x1 > x0 && y1 > y0 {
            self.components_dirty = true;
        }
    }

    /// Blocks every in-bounds cell of the rectangle and records it. Parts of the rectangle
    /// outside the grid are skipped.
    pub fn add_obstacle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, h, true);
        self.obstacles.push(Obstacle::new(x, y, w, h));
    }

    /// Blocks a rectangle without recording an obstacle, used before carving.
    pub fn block_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill_rect(x, y, w, h, true);
    }

    /// Frees every in-bounds cell of the rectangle.
    pub fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill_rect(x, y, w, h, false);
    }

    pub fn clear_obstacles(&mut self) {
        self.blocked.iter_mut().for_each(|b| *b = false);
        self.obstacles.clear();
        self.components_dirty = true;
    }

    /// Replaces the obstacle records with a per-row run-length encoding of the occupancy
    /// buffer: every contiguous blocked span becomes one rectangle of height 1.
    pub fn rebuild_obstacles_from_occupancy(&mut self) {
        let mut obstacles = Vec::new();
        for y in 0..self.grid_height {
            let mut run_start: Option<i32> = None;
            for x in 0..=self.grid_width {
                let blocked = x < self.grid_width && self.blocked[self.ix(x, y)];
                match (blocked, run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        obstacles.push(Obstacle::new(start, y, x - start, 1));
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
        self.obstacles = obstacles;
    }

    /// Pixel position to the cell containing it.
    pub fn world_to_grid(&self, px: f32, py: f32) -> GridCell {
        let cs = self.cell_size as f32;
        GridCell::new((px / cs).floor() as i32, (py / cs).floor() as i32)
    }

    /// Pixel centre of a cell.
    pub fn grid_to_world(&self, cell: GridCell) -> (f32, f32) {
        let cs = self.cell_size as f32;
        (
            cell.x as f32 * cs + cs * 0.5,
            cell.y as f32 * cs + cs * 0.5,
        )
    }

    /// Checks a single step from `from` to the adjacent `to`. Diagonal steps need both
    /// orthogonal cells next to the diagonal to be free, so corners are never cut.
    pub fn can_move_to(&self, to: GridCell, from: GridCell) -> bool {
        debug_assert!((from.x - to.x).abs() <= 1 && (from.y - to.y).abs() <= 1);
        if !self.is_valid_cell(to) {
            return false;
        }
        if to.x != from.x && to.y != from.y {
            self.is_valid(from.x, to.y) && self.is_valid(to.x, from.y)
        } else {
            true
        }
    }

    /// Valid neighbours of `cell`, at most 8. Diagonals that would cut a corner are pruned.
    pub fn neighbors(
        &self,
        cell: GridCell,
        allow_diagonal: bool,
    ) -> SmallVec<[GridCell; N_SMALLVEC_SIZE]> {
        if allow_diagonal {
            cell.moore_neighborhood()
                .into_iter()
                .filter(|n| self.can_move_to(*n, cell))
                .collect()
        } else {
            cell.neumann_neighborhood()
                .into_iter()
                .filter(|n| self.is_valid_cell(*n))
                .collect()
        }
    }

    /// Neighbours using the grid's own diagonal setting.
    pub fn neighborhood(&self, cell: GridCell) -> SmallVec<[GridCell; N_SMALLVEC_SIZE]> {
        self.neighbors(cell, self.allow_diagonal_move)
    }

    /// Retrieves the component id a given [GridCell] belongs to, `None` outside the grid.
    /// Components must be current, see [update](Self::update).
    pub fn get_component(&self, cell: &GridCell) -> Option<usize> {
        self.cell_in_bounds(*cell)
            .then(|| self.components.find(self.get_ix_point(cell)))
    }

    /// Checks if start and goal are on the same component. Components must be current, see
    /// [update](Self::update).
    pub fn reachable(&self, start: &GridCell, goal: &GridCell) -> bool {
        !self.unreachable(start, goal)
    }

    pub fn unreachable(&self, start: &GridCell, goal: &GridCell) -> bool {
        if self.is_valid_cell(*start) && self.is_valid_cell(*goal) {
            let start_ix = self.get_ix_point(start);
            let goal_ix = self.get_ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    pub fn generate_components(&mut self) {
        let n = self.cell_count();
        self.components = UnionFind::new(n);
        self.components_dirty = false;
        for y in 0..self.grid_height {
            for x in 0..self.grid_width {
                if self.is_blocked(x, y) {
                    continue;
                }
                let cell = GridCell::new(x, y);
                let parent_ix = self.ix(x, y);
                // Looking forward only (east, south and both forward diagonals) covers every pair once.
                let forward: SmallVec<[GridCell; 4]> = if self.allow_diagonal_move {
                    SmallVec::from_buf([
                        cell.offset(1, 0),
                        cell.offset(0, 1),
                        cell.offset(1, 1),
                        cell.offset(-1, 1),
                    ])
                } else {
                    SmallVec::from_slice(&[cell.offset(1, 0), cell.offset(0, 1)])
                };
                for n in forward {
                    if self.can_move_to(n, cell) {
                        let ix = self.ix(n.x, n.y);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.grid_height {
            let row: String = (0..self.grid_width)
                .map(|x| if self.is_blocked(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_uses_ceiling_division() {
        let mut grid = PathingGrid::new(101, 50, 10);
        assert_eq!((grid.grid_width(), grid.grid_height()), (11, 5));
        grid.add_obstacle(0, 0, 2, 2);
        grid.set_cell_size(25);
        assert_eq!((grid.grid_width(), grid.grid_height()), (5, 2));
        assert!(grid.obstacles().is_empty());
        assert!(!grid.is_blocked(0, 0));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let grid = PathingGrid::new(30, 30, 10);
        assert!(grid.is_blocked(-1, 0));
        assert!(grid.is_blocked(0, 3));
        assert!(!grid.is_valid(3, 3));
        assert!(grid.is_valid(2, 2));
    }

    #[test]
    fn obstacle_partially_outside_is_clipped() {
        let mut grid = PathingGrid::new(50, 50, 10);
        grid.add_obstacle(3, 3, 10, 10);
        assert!(grid.is_blocked(4, 4));
        assert!(grid.is_valid(2, 2));
        assert_eq!(grid.obstacles().len(), 1);
    }

    #[test]
    fn world_grid_conversion_uses_cell_centre() {
        let grid = PathingGrid::new(100, 100, 10);
        assert_eq!(grid.world_to_grid(25.0, 99.9), GridCell::new(2, 9));
        assert_eq!(grid.grid_to_world(GridCell::new(2, 9)), (25.0, 95.0));
    }

    /// Corresponds to
    ///  ___
    /// |.#.|
    /// |#..|
    ///  ___
    /// where the diagonal from (0,0) to (1,1) would cut the blocked corners.
    #[test]
    fn diagonal_corner_cutting_is_pruned() {
        let mut grid = PathingGrid::new(3, 2, 1);
        grid.add_obstacle(1, 0, 1, 1);
        grid.add_obstacle(0, 1, 1, 1);
        let n = grid.neighbors(GridCell::new(0, 0), true);
        assert!(n.is_empty());
        let n = grid.neighbors(GridCell::new(2, 1), true);
        assert_eq!(n.len(), 2);
        assert!(n.contains(&GridCell::new(1, 1)));
        assert!(n.contains(&GridCell::new(2, 0)));
    }

    #[test]
    fn run_length_encoding_covers_blocked_cells() {
        let mut grid = PathingGrid::new(6, 3, 1);
        grid.block_rect(1, 0, 3, 2);
        grid.block_rect(5, 2, 1, 1);
        grid.rebuild_obstacles_from_occupancy();
        assert_eq!(
            grid.obstacles(),
            &[
                Obstacle::new(1, 0, 3, 1),
                Obstacle::new(1, 1, 3, 1),
                Obstacle::new(5, 2, 1, 1)
            ]
        );
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        let mut grid = PathingGrid::new(3, 2, 1);
        grid.add_obstacle(1, 0, 1, 2);
        grid.generate_components();
        assert!(grid.reachable(&GridCell::new(0, 0), &GridCell::new(0, 1)));
        assert!(grid.unreachable(&GridCell::new(0, 0), &GridCell::new(2, 0)));
        assert!(grid.unreachable(&GridCell::new(0, 0), &GridCell::new(1, 0)));
    }

    #[test]
    fn cells_outside_the_grid_have_no_component() {
        let mut grid = PathingGrid::new(10, 10, 1);
        grid.generate_components();
        assert_eq!(grid.get_component(&GridCell::new(-1, 3)), None);
        assert_eq!(grid.get_component(&GridCell::new(12, 0)), None);
        assert_eq!(grid.get_component(&GridCell::new(3, 10)), None);
        assert_eq!(
            grid.get_component(&GridCell::new(9, 2)),
            grid.get_component(&GridCell::new(0, 0))
        );
        assert!(grid.get_component(&GridCell::new(9, 9)).is_some());
        assert!(grid.unreachable(&GridCell::new(0, 0), &GridCell::new(12, 0)));
    }

    #[test]
    fn components_follow_corner_rule() {
        // |.#|
        // |#.|
        let mut grid = PathingGrid::new(2, 2, 1);
        grid.add_obstacle(1, 0, 1, 1);
        grid.add_obstacle(0, 1, 1, 1);
        grid.update();
        assert!(grid.unreachable(&GridCell::new(0, 0), &GridCell::new(1, 1)));
    }
}
