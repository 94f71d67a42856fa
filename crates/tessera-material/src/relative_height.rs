//! Height normalisation shared by the mesh builder and the terrain shader.

use tessera_heightfield::HeightGrid;

/// Global height extremes and the vertical scale derived from them.
///
/// World height of a raw sample is `height_multiplier * (raw - mid)`, which
/// centres the terrain vertically on the origin. The state is only refreshed
/// on regeneration or an explicit recalculation, never on individual edits,
/// so edited cells may fall outside `[min, max]` until then.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelativeHeightState {
    pub max: i32,
    pub min: i32,
    pub mid: f32,
    pub height_multiplier: f32,
}

impl Default for RelativeHeightState {
    fn default() -> Self {
        Self {
            max: 0,
            min: 0,
            mid: 0.0,
            height_multiplier: 1.0,
        }
    }
}

impl RelativeHeightState {
    /// State for known extremes.
    pub fn new(max: i32, min: i32, height_multiplier: f32) -> Self {
        let mid = ((f64::from(max) + f64::from(min)) / 2.0) as f32;
        Self {
            max,
            min,
            mid,
            height_multiplier,
        }
    }

    /// Scan the grid once for its extremes.
    pub fn from_grid(grid: &HeightGrid, height_multiplier: f32) -> Self {
        let (max, min) = grid.max_min();
        Self::new(max, min, height_multiplier)
    }

    /// World-space height of a raw sample.
    #[inline]
    pub fn world_height(&self, raw: i32) -> f32 {
        self.height_multiplier * (raw as f32 - self.mid)
    }

    /// World height of the highest sample.
    pub fn world_max(&self) -> f32 {
        self.world_height(self.max)
    }

    /// World height of the lowest sample.
    pub fn world_min(&self) -> f32 {
        self.world_height(self.min)
    }

    /// `textures.relativeHeight` value: world max, world min, mid, multiplier.
    pub fn shader_vector(&self) -> [f32; 4] {
        [self.world_max(), self.world_min(), self.mid, self.height_multiplier]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_is_exact_average() {
        let state = RelativeHeightState::new(700, 300, 2.0);
        assert_eq!(state.mid, 500.0);
        let odd = RelativeHeightState::new(5, 2, 1.0);
        assert_eq!(odd.mid, 3.5);
    }

    #[test]
    fn test_world_max_is_multiplier_times_offset() {
        let state = RelativeHeightState::new(700, 300, 0.5);
        assert_eq!(state.world_max(), 0.5 * (700.0 - 500.0));
        assert_eq!(state.world_min(), -100.0);
    }

    #[test]
    fn test_from_grid_scans_extremes() {
        let grid = HeightGrid::from_fn(9, |i, j| (i as i32 - 4) * 10 + j as i32).unwrap();
        let state = RelativeHeightState::from_grid(&grid, 1.0);
        assert_eq!(state.max, 48);
        assert_eq!(state.min, -40);
        assert_eq!(state.mid, 4.0);
    }

    #[test]
    fn test_shader_vector_layout() {
        let state = RelativeHeightState::new(10, -10, 3.0);
        assert_eq!(state.shader_vector(), [30.0, -30.0, 0.0, 3.0]);
    }
}
