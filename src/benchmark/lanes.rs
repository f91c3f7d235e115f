use crate::maze::MazeRegion;
use crate::pathing_grid::PathingGrid;

/// Share of a lane's height that agents are spread over.
const LANE_FILL: f32 = 0.8;

/// Pixel spawn position of agent `agent_index` out of `total` in the lane of
/// `algorithm_index`. The arena height is split into `lanes` horizontal lanes, one per
/// algorithm, and agents are spread evenly over the middle 80% of their lane. All spawns lie in
/// the middle of the open margin left of the maze region.
pub fn spawn_position(
    grid: &PathingGrid,
    lanes: usize,
    algorithm_index: usize,
    agent_index: usize,
    total: usize,
) -> (f32, f32) {
    let region = MazeRegion::for_grid(grid);
    let x = (region.left * grid.cell_size()) as f32 / 2.0;
    let lane_height = grid.height() as f32 / lanes.max(1) as f32;
    let lane = algorithm_index.min(lanes.saturating_sub(1)) as f32;
    let margin = lane_height * (1.0 - LANE_FILL) / 2.0;
    let slot = (agent_index as f32 + 0.5) / total.max(1) as f32;
    (x, lane * lane_height + margin + slot * lane_height * LANE_FILL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agents_stay_inside_their_lane() {
        let grid = PathingGrid::new(1200, 800, 5);
        let lane_height = 100.0;
        for lane in 0..8 {
            for agent in 0..5 {
                let (x, y) = spawn_position(&grid, 8, lane, agent, 5);
                assert_eq!(x, 60.0);
                let top = lane as f32 * lane_height;
                assert!(y >= top + 10.0 && y <= top + 90.0, "lane {} y {}", lane, y);
                assert!(grid.is_valid_cell(grid.world_to_grid(x, y)));
            }
        }
    }

    #[test]
    fn single_agent_is_centred() {
        let grid = PathingGrid::new(1200, 800, 5);
        for total in [0, 1] {
            let (x, y) = spawn_position(&grid, 4, 1, 0, total);
            assert_eq!(x, 60.0);
            assert!((y - 300.0).abs() < 1e-3);
        }
    }
}
