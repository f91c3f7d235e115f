//! Grid coordinates. A cell is a [grid_util] [Point]: its derived ordering is lexicographic by
//! `x` then `y`, which gives passage edges and priority-queue payloads a deterministic total
//! order. [CellExt] adds the few steps the point type does not provide.
pub use grid_util::point::Point as GridCell;

pub trait CellExt {
    /// Cell displaced by `(dx, dy)`.
    fn offset(&self, dx: i32, dy: i32) -> GridCell;
    /// True for the eight distinct cells one king move away.
    fn is_adjacent(&self, other: &GridCell) -> bool;
}

impl CellExt for GridCell {
    fn offset(&self, dx: i32, dy: i32) -> GridCell {
        *self + GridCell::new(dx, dy)
    }

    fn is_adjacent(&self, other: &GridCell) -> bool {
        self.move_distance(other) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_x_then_y() {
        let mut cells = vec![
            GridCell::new(2, 0),
            GridCell::new(1, 5),
            GridCell::new(1, 2),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![GridCell::new(1, 2), GridCell::new(1, 5), GridCell::new(2, 0)]
        );
    }

    #[test]
    fn neighborhood_is_adjacent() {
        let c = GridCell::new(3, 3);
        for (i, n) in c.moore_neighborhood().iter().enumerate() {
            assert!(c.is_adjacent(n));
            assert_eq!(i % 2 == 1, n.x != c.x && n.y != c.y);
        }
        assert!(!c.is_adjacent(&c));
        assert_eq!(c.offset(-1, 2), GridCell::new(2, 5));
        assert_eq!(c.dir(&GridCell::new(10, -4)), GridCell::new(1, -1));
    }
}
