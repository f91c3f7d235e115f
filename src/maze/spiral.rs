use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

use crate::maze::{build_containment, MazeRegion};
use crate::pathing_grid::PathingGrid;

/// Angle advanced per plotting step, in radians.
const ANGLE_STEP: f32 = 0.05;
/// Radius gained per plotting step, in cells.
const RADIAL_STEP: f32 = 0.1;
/// Length of the opening left in every arm, in plotting steps.
const GAP_STEPS: usize = 40;
/// The centre of the spiral stays open up to this radius.
const INNER_RADIUS: f32 = 2.0;

fn plot(grid: &mut PathingGrid, cx: f32, cy: f32, r: f32, angle: f32) {
    let x = (cx + r * angle.cos()).round() as i32;
    let y = (cy + r * angle.sin()).round() as i32;
    grid.block_rect(x, y, 1, 1);
}

/// Spiral arms wound outward from the centre of the region, each broken by one gap arc, plus
/// radial spokes between the arms. Starts from the open template and only adds walls.
pub fn generate_spiral(
    grid: &mut PathingGrid,
    region: &MazeRegion,
    rng: &mut StdRng,
    difficulty: f32,
) {
    build_containment(grid, region);
    let interior = region.interior().inset(1);
    let cx = (interior.left + interior.right) as f32 / 2.0;
    let cy = (interior.top + interior.bottom) as f32 / 2.0;
    let max_r = interior.width().min(interior.height()) as f32 / 2.0 - 1.0;
    if max_r <= INNER_RADIUS {
        return;
    }
    let num_arms = 2 + (difficulty * 3.0).round() as usize;
    let steps = ((max_r - INNER_RADIUS) / RADIAL_STEP) as usize;
    debug!("Spiral with {} arms of {} steps", num_arms, steps);

    for arm in 0..num_arms {
        let offset = TAU * arm as f32 / num_arms as f32;
        let gap_start = rng.gen_range(0..steps.saturating_sub(GAP_STEPS).max(1));
        for step in (0..steps).filter(|s| !(gap_start..gap_start + GAP_STEPS).contains(s)) {
            let r = INNER_RADIUS + step as f32 * RADIAL_STEP;
            plot(grid, cx, cy, r, offset + step as f32 * ANGLE_STEP);
        }
    }

    for spoke in 0..num_arms {
        let angle = TAU * (spoke as f32 + 0.5) / num_arms as f32;
        let mut r = max_r * 0.35;
        while r < max_r * 0.9 {
            plot(grid, cx, cy, r, angle);
            r += 0.5;
        }
    }
    grid.rebuild_obstacles_from_occupancy();
}
