//! Splitting the vertex grid into square patches.
//!
//! Level `L` gives `2^L × 2^L` patches of side `N = size / 2^L + 1`.
//! Neighbouring patches share their boundary row or column, so every patch
//! can be drawn and lit on its own.

use glam::Vec2;

use crate::error::MeshError;

/// Patch layout for one grid size, level and horizontal scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Partition {
    grid_size: usize,
    level: u32,
    per_side: usize,
    patch_side: usize,
    size_scale: f32,
}

impl Partition {
    /// Validate and compute the layout.
    ///
    /// Fails when a patch would have fewer than two vertices per side or
    /// would read past the last grid row (level 0 on any grid).
    pub fn new(grid_size: usize, level: u32, size_scale: f32) -> Result<Self, MeshError> {
        let degenerate = |patch_side| MeshError::DegeneratePartition {
            size: grid_size,
            level,
            patch_side,
        };

        let per_side = 1usize
            .checked_shl(level)
            .filter(|&p| p <= grid_size)
            .ok_or_else(|| degenerate(0))?;
        let patch_side = grid_size / per_side + 1;
        if patch_side <= 1 {
            return Err(degenerate(patch_side));
        }
        let reach = (patch_side - 1) * per_side;
        if reach >= grid_size {
            return Err(degenerate(patch_side));
        }

        Ok(Self {
            grid_size,
            level,
            per_side,
            patch_side,
            size_scale,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Patches along one axis, `2^level`.
    pub fn per_side(&self) -> usize {
        self.per_side
    }

    /// Total number of patches, `4^level`.
    pub fn count(&self) -> usize {
        self.per_side * self.per_side
    }

    /// Vertices along one patch side.
    pub fn patch_side(&self) -> usize {
        self.patch_side
    }

    /// Vertices per patch.
    pub fn patch_vertex_count(&self) -> usize {
        self.patch_side * self.patch_side
    }

    /// World width of the whole terrain.
    pub fn full_width(&self) -> f32 {
        (self.grid_size - 1) as f32 * self.size_scale
    }

    /// Half the world width of one patch.
    pub fn half_width(&self) -> f32 {
        self.full_width() / self.per_side as f32 / 2.0
    }

    /// `(m, n)` patch row and column of sub-mesh `index`.
    #[inline]
    pub fn patch_coords(&self, index: usize) -> (usize, usize) {
        (index / self.per_side, index % self.per_side)
    }

    /// Sub-mesh index of patch `(m, n)`.
    #[inline]
    pub fn patch_index(&self, m: usize, n: usize) -> usize {
        n + m * self.per_side
    }

    /// World `(x, z)` centre of sub-mesh `index`.
    pub fn center(&self, index: usize) -> Vec2 {
        let (m, n) = self.patch_coords(index);
        let fw = self.full_width();
        let dx = fw / self.per_side as f32;
        Vec2::new(
            n as f32 * dx + dx / 2.0 - fw / 2.0,
            m as f32 * dx + dx / 2.0 - fw / 2.0,
        )
    }

    /// Centres of every sub-mesh, by index.
    pub fn centers(&self) -> Vec<Vec2> {
        (0..self.count()).map(|k| self.center(k)).collect()
    }

    /// Grid cell copied into local vertex `local` of sub-mesh `index`.
    pub fn grid_cell(&self, index: usize, local: usize) -> (usize, usize) {
        let (m, n) = self.patch_coords(index);
        let step = self.patch_side - 1;
        (local / self.patch_side + step * m, local % self.patch_side + step * n)
    }

    /// Every sub-mesh holding a copy of any cell in the inclusive block
    /// `[row_lo, row_hi] × [col_lo, col_hi]`, in index order.
    pub fn patches_covering(
        &self,
        (row_lo, row_hi): (usize, usize),
        (col_lo, col_hi): (usize, usize),
    ) -> Vec<usize> {
        let rows = self.axis_span(row_lo, row_hi);
        let cols = self.axis_span(col_lo, col_hi);
        let mut out = Vec::new();
        for m in rows {
            for n in cols.clone() {
                out.push(self.patch_index(m, n));
            }
        }
        out
    }

    /// Patch rows (or columns) intersecting grid rows `[lo, hi]`.
    fn axis_span(&self, lo: usize, hi: usize) -> std::ops::RangeInclusive<usize> {
        let step = self.patch_side - 1;
        let first = lo.div_ceil(step).saturating_sub(1);
        let last = (hi / step).min(self.per_side - 1);
        first..=last
    }

    /// Triangle list for one patch: two triangles per quad, shared by every
    /// sub-mesh of the partition.
    pub fn triangle_indices(&self) -> Result<Vec<u32>, MeshError> {
        let side = self.patch_side;
        let too_large = || MeshError::TooLarge {
            size: self.grid_size,
        };
        u32::try_from(self.patch_vertex_count()).map_err(|_| too_large())?;
        let quads = (side - 1) * (side - 1);
        let mut indices = Vec::new();
        indices
            .try_reserve_exact(quads * 6)
            .map_err(|_| too_large())?;

        let side = side as u32;
        for i in 0..side - 1 {
            for j in 0..side - 1 {
                let idx1 = j + i * side;
                let idx2 = idx1 + 1;
                let idx3 = j + (i + 1) * side;
                let idx4 = idx3 + 1;
                indices.extend_from_slice(&[idx1, idx3, idx2, idx2, idx3, idx4]);
            }
        }
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_on_nine() {
        let p = Partition::new(9, 1, 1.0).unwrap();
        assert_eq!(p.count(), 4);
        assert_eq!(p.patch_side(), 5);
        assert_eq!(p.half_width(), 2.0);
        assert_eq!(p.centers(), vec![
            Vec2::new(-2.0, -2.0),
            Vec2::new(2.0, -2.0),
            Vec2::new(-2.0, 2.0),
            Vec2::new(2.0, 2.0),
        ]);
    }

    #[test]
    fn test_patches_reach_last_row_exactly() {
        for (size, level) in [(9, 1), (9, 3), (17, 2), (513, 2), (65, 6)] {
            let p = Partition::new(size, level, 1.0).unwrap();
            let last = p.count() - 1;
            let corner = p.grid_cell(last, p.patch_vertex_count() - 1);
            assert_eq!(corner, (size - 1, size - 1), "size {size} level {level}");
        }
    }

    #[test]
    fn test_level_zero_rejected() {
        assert!(matches!(
            Partition::new(9, 0, 1.0),
            Err(MeshError::DegeneratePartition { patch_side: 10, .. })
        ));
    }

    #[test]
    fn test_too_deep_rejected() {
        assert!(Partition::new(9, 4, 1.0).is_err(), "16 patches per side on a 9 grid");
        assert!(Partition::new(9, 64, 1.0).is_err(), "shift overflow");
    }

    #[test]
    fn test_triangle_indices_shape() {
        let p = Partition::new(9, 1, 1.0).unwrap();
        let indices = p.triangle_indices().unwrap();
        assert_eq!(indices.len(), 96);
        assert!(indices.iter().all(|&i| (i as usize) < 25));
        assert_eq!(&indices[..6], &[0, 5, 1, 1, 5, 6]);
    }

    #[test]
    fn test_shared_boundary_cells() {
        let p = Partition::new(9, 1, 1.0).unwrap();
        // Right column of patch 0 is the left column of patch 1.
        assert_eq!(p.grid_cell(0, 4), (0, 4));
        assert_eq!(p.grid_cell(1, 0), (0, 4));
    }

    #[test]
    fn test_patches_covering_block() {
        let p = Partition::new(9, 1, 1.0).unwrap();
        assert_eq!(p.patches_covering((1, 3), (1, 3)), vec![0]);
        assert_eq!(p.patches_covering((3, 5), (1, 3)), vec![0, 2]);
        assert_eq!(p.patches_covering((3, 5), (3, 5)), vec![0, 1, 2, 3]);
        assert_eq!(p.patches_covering((7, 8), (0, 1)), vec![2]);
        assert_eq!(p.patches_covering((0, 0), (8, 8)), vec![1]);
    }
}
