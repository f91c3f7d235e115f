//! Modes made of straight barriers inside the perimeter template.
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use crate::maze::{
    build_containment, horizontal_wall, random_gaps, safe_area, scatter_blocks, vertical_wall,
    MazeRegion,
};
use crate::pathing_grid::PathingGrid;

/// Evenly spaced rows (or columns) strictly inside `[start, end)`, at most one per two cells.
fn spaced_lines(start: i32, end: i32, count: i32) -> Vec<i32> {
    let span = end - start;
    let count = count.min((span - 1) / 2).max(0);
    (1..=count).map(|k| start + k * span / (count + 1)).collect()
}

fn scatter_count(region: &MazeRegion, per_cell: f32, difficulty: f32) -> usize {
    let area = (region.width() * region.height()) as f32;
    (area * per_cell * (0.5 + difficulty)) as usize
}

/// Horizontal barriers with a single random gap each, plus scattered blocks.
pub fn generate_simple(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    difficulty: f32,
) {
    build_containment(grid, region);
    let interior = region.interior();
    let barrier_count = 2 + (difficulty * 4.0).round() as i32;
    let gap_len = ((interior.width() as f32 * (0.25 - 0.15 * difficulty)) as i32).max(2);
    let rows = spaced_lines(interior.top, interior.bottom, barrier_count);
    debug!("Simple layout: {} barriers, gap {}", rows.len(), gap_len);
    for y in rows {
        let gaps = random_gaps(rng, interior.left, interior.right, 1, gap_len);
        horizontal_wall(grid, interior.left, interior.right, y, &gaps);
    }
    let count = scatter_count(region, 0.004, difficulty);
    scatter_blocks(grid, region, rng, count, 3);
}

/// Horizontal barriers pierced by three to five gaps each, plus short vertical bars.
pub fn generate_multi_path(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    difficulty: f32,
) {
    build_containment(grid, region);
    let interior = region.interior();
    let barrier_count = 2 + (difficulty * 3.0).round() as i32;
    for y in spaced_lines(interior.top, interior.bottom, barrier_count) {
        let gap_count = rng.gen_range(3..=5);
        let gaps = random_gaps(rng, interior.left, interior.right, gap_count, 2);
        horizontal_wall(grid, interior.left, interior.right, y, &gaps);
    }
    let Some(safe) = safe_area(region) else {
        return;
    };
    let bars = ((interior.width() / 6) as f32 * (1.0 + difficulty)) as usize;
    let max_len = 4.min(safe.height());
    for _ in 0..bars {
        let len = rng.gen_range(1..=max_len);
        let x = rng.gen_range(safe.left..safe.right);
        let y = rng.gen_range(safe.top..=safe.bottom - len);
        grid.add_obstacle(x, y, 1, len);
    }
}

/// Evenly spaced vertical walls with few gaps, fewer the higher the difficulty.
pub fn generate_bottleneck(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    difficulty: f32,
) {
    build_containment(grid, region);
    let interior = region.interior();
    let wall_count = 3 + (difficulty * 3.0) as i32;
    let gap_count = (4 - (difficulty * 3.0).round() as i32).max(1);
    let gap_len = (interior.height() / 15).max(2);
    let columns = spaced_lines(interior.left, interior.right, wall_count);
    debug!(
        "Bottleneck layout: {} walls with {} gaps of {}",
        columns.len(),
        gap_count,
        gap_len
    );
    for x in columns {
        let gaps = random_gaps(rng, interior.top, interior.bottom, gap_count, gap_len);
        vertical_wall(grid, x, interior.top, interior.bottom, &gaps);
    }
    let count = scatter_count(region, 0.002, difficulty);
    scatter_blocks(grid, region, rng, count, 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{default_start, flood_fill_check};
    use rand::SeedableRng;

    #[test]
    fn lines_stay_inside_and_apart() {
        assert_eq!(spaced_lines(0, 10, 4), vec![2, 4, 6, 8]);
        assert_eq!(spaced_lines(0, 4, 10).len(), 1);
        assert!(spaced_lines(0, 2, 3).is_empty());
    }

    #[test]
    fn simple_barrier_has_exactly_one_gap() {
        let mut grid = PathingGrid::new(60, 40, 1);
        let region = MazeRegion::new(6, 0, 54, 40);
        let mut rng = StdRng::seed_from_u64(2);
        generate_simple(&mut grid, &region, &mut rng, 0.0);
        let interior = region.interior();
        let y = spaced_lines(interior.top, interior.bottom, 2)[0];
        let open = (interior.left..interior.right)
            .filter(|&x| grid.is_valid(x, y))
            .count();
        assert!(open >= 2);
        let start = default_start(&grid);
        assert!(flood_fill_check(&grid, start, grid_center_right(&grid)));
    }

    #[test]
    fn full_difficulty_bottleneck_has_one_gap_per_wall() {
        for seed in 0..5 {
            let mut grid = PathingGrid::new(120, 80, 1);
            let region = MazeRegion::for_grid(&grid);
            let mut rng = StdRng::seed_from_u64(seed);
            generate_bottleneck(&mut grid, &region, &mut rng, 1.0);
            let interior = region.interior();
            let gap_len = interior.height() / 15;
            for x in spaced_lines(interior.left, interior.right, 6) {
                let open = (interior.top..interior.bottom)
                    .filter(|&y| grid.is_valid(x, y))
                    .count() as i32;
                assert!(open <= gap_len, "seed {} column {}", seed, x);
            }
        }
    }

    fn grid_center_right(grid: &PathingGrid) -> crate::cell::GridCell {
        crate::cell::GridCell::new(grid.grid_width() - 1, grid.grid_height() / 2)
    }
}
