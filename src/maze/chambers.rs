use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::maze::{build_containment, horizontal_wall, vertical_wall, MazeRegion};
use crate::pathing_grid::PathingGrid;

/// Chambers narrower than this get merged by using fewer of them.
const MIN_CHAMBER_SIZE: i32 = 6;
const DOOR_LEN: i32 = 2;

/// Split points of `[start, end)` into `parts` equal pieces, including both ends.
fn bounds(start: i32, end: i32, parts: i32) -> Vec<i32> {
    (0..=parts).map(|k| start + k * (end - start) / parts).collect()
}

/// Gap for the wall segment between `seg_start` and `seg_end`, kept clear of the crossing walls
/// at either end. Short segments are opened completely.
fn door(rng: &mut StdRng, seg_start: i32, seg_end: i32) -> (i32, i32) {
    let lo = seg_start + 1;
    let hi = seg_end - DOOR_LEN;
    if hi <= lo {
        return (lo, (seg_end - lo).max(1));
    }
    (rng.gen_range(lo..hi), DOOR_LEN)
}

/// A rows by cols arrangement of rectangular chambers. Each wall segment between two chambers
/// gets one door, and chambers hold a few small obstacles.
pub fn generate_chambers(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    difficulty: f32,
) {
    build_containment(grid, region);
    let interior = region.interior();
    let mut cols = 2 + (difficulty * 3.0).round() as i32;
    let mut rows = 2 + (difficulty * 2.0).round() as i32;
    while cols > 1 && interior.width() / cols < MIN_CHAMBER_SIZE {
        cols -= 1;
    }
    while rows > 1 && interior.height() / rows < MIN_CHAMBER_SIZE {
        rows -= 1;
    }
    if cols * rows == 1 {
        warn!("Region too small to split into chambers");
    }
    debug!("Chambers layout {}x{}", cols, rows);
    let xs = bounds(interior.left, interior.right, cols);
    let ys = bounds(interior.top, interior.bottom, rows);

    for &x in &xs[1..xs.len() - 1] {
        let gaps: Vec<(i32, i32)> = ys.windows(2).map(|w| door(rng, w[0], w[1])).collect();
        vertical_wall(grid, x, interior.top, interior.bottom, &gaps);
    }
    for &y in &ys[1..ys.len() - 1] {
        let gaps: Vec<(i32, i32)> = xs.windows(2).map(|w| door(rng, w[0], w[1])).collect();
        horizontal_wall(grid, interior.left, interior.right, y, &gaps);
    }

    // Obstacles keep two cells away from every chamber wall, so doors stay reachable.
    for (cx, cy) in xs
        .windows(2)
        .flat_map(|c| ys.windows(2).map(move |r| (c, r)))
    {
        let (x0, x1) = (cx[0] + 3, cx[1] - 2);
        let (y0, y1) = (cy[0] + 3, cy[1] - 2);
        if x1 - x0 < 2 || y1 - y0 < 2 {
            continue;
        }
        for _ in 0..rng.gen_range(0..=2) {
            let w = rng.gen_range(1..=2);
            let h = rng.gen_range(1..=2);
            let x = rng.gen_range(x0..=x1 - w);
            let y = rng.gen_range(y0..=y1 - h);
            grid.add_obstacle(x, y, w, h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::GridCell;
    use crate::maze::flood_fill_check;
    use rand::SeedableRng;

    #[test]
    fn bounds_cover_the_range() {
        assert_eq!(bounds(1, 11, 2), vec![1, 6, 11]);
    }

    #[test]
    fn all_chambers_connected() {
        let mut grid = PathingGrid::new(150, 100, 1);
        let region = MazeRegion::for_grid(&grid);
        let mut rng = StdRng::seed_from_u64(8);
        generate_chambers(&mut grid, &region, &mut rng, 1.0);
        let interior = region.interior();
        let xs = bounds(interior.left, interior.right, 5);
        let ys = bounds(interior.top, interior.bottom, 4);
        let start = GridCell::new(1, 50);
        for c in xs.windows(2) {
            for r in ys.windows(2) {
                let centre = GridCell::new((c[0] + c[1]) / 2, (r[0] + r[1]) / 2);
                if grid.is_valid_cell(centre) {
                    assert!(flood_fill_check(&grid, start, centre));
                }
            }
        }
    }
}
