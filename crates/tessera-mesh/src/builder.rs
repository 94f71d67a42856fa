//! Height grid to sub-mesh conversion.

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use tessera_heightfield::HeightGrid;
use tessera_log::DiagnosticSink;
use tessera_material::RelativeHeightState;

use crate::error::MeshError;
use crate::normals::{vertex_normal, vertex_normals};
use crate::partition::Partition;
use crate::vertex::Vertex;

/// Meshing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshParams {
    /// Sub-mesh count is `4^subdivision_level`.
    pub subdivision_level: u32,
    /// World distance between neighbouring grid samples.
    pub size_scale: f32,
    /// Vertical scale applied after centring on the mid height.
    pub height_multiplier: f32,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            subdivision_level: 2,
            size_scale: 1.0,
            height_multiplier: 0.1,
        }
    }
}

impl MeshParams {
    pub fn new(subdivision_level: u32, size_scale: f32, height_multiplier: f32) -> Self {
        Self {
            subdivision_level,
            size_scale,
            height_multiplier,
        }
    }

    fn validate(&self) -> Result<(), MeshError> {
        if !self.size_scale.is_finite() || self.size_scale <= 0.0 {
            return Err(MeshError::InvalidScale(self.size_scale));
        }
        Ok(())
    }
}

/// One independently buffered terrain tile.
#[derive(Clone, Debug, PartialEq)]
pub struct SubMesh {
    pub vertices: Vec<Vertex>,
    /// Triangle list into `vertices`.
    pub indices: Vec<u32>,
    /// World `(x, z)` centre.
    pub center: Vec2,
}

impl SubMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }
}

/// Buffer totals for a built terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub sub_meshes: usize,
    pub vertices: usize,
    pub indices: usize,
    /// Vertex plus index buffer bytes.
    pub gpu_bytes: usize,
}

impl MeshStats {
    pub fn triangles(&self) -> usize {
        self.indices / 3
    }
}

/// Every sub-mesh of a terrain plus the state needed to rebuild or pick them.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    relative_height: RelativeHeightState,
    params: MeshParams,
    partition: Partition,
    sub_meshes: Vec<SubMesh>,
}

impl TerrainMesh {
    pub fn relative_height(&self) -> &RelativeHeightState {
        &self.relative_height
    }

    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn sub_mesh(&self, index: usize) -> Option<&SubMesh> {
        self.sub_meshes.get(index)
    }

    /// Sub-mesh centres, by index.
    pub fn centers(&self) -> Vec<Vec2> {
        self.sub_meshes.iter().map(|m| m.center).collect()
    }

    /// Half the world width of every sub-mesh.
    pub fn half_width(&self) -> f32 {
        self.partition.half_width()
    }

    /// Bounding-sphere radius used for pick culling.
    pub fn pick_radius(&self) -> f32 {
        std::f32::consts::SQRT_2 * self.half_width()
    }

    pub fn stats(&self) -> MeshStats {
        let vertices: usize = self.sub_meshes.iter().map(|m| m.vertices.len()).sum();
        let indices: usize = self.sub_meshes.iter().map(|m| m.indices.len()).sum();
        MeshStats {
            sub_meshes: self.sub_meshes.len(),
            vertices,
            indices,
            gpu_bytes: vertices * std::mem::size_of::<Vertex>()
                + indices * std::mem::size_of::<u32>(),
        }
    }

    /// Regenerate sub-mesh `index` from the current grid with the existing
    /// relative-height state.
    pub fn rebuild_sub_mesh(&mut self, grid: &HeightGrid, index: usize) -> Result<(), MeshError> {
        if grid.size() != self.partition.grid_size() {
            return Err(MeshError::GridMismatch {
                expected: self.partition.grid_size(),
                actual: grid.size(),
            });
        }
        let count = self.sub_meshes.len();
        if index >= count {
            return Err(MeshError::SubMeshOutOfRange { index, count });
        }
        let indices = self.sub_meshes[index].indices.clone();
        let rebuilt =
            build_sub_mesh(grid, &self.relative_height, &self.params, &self.partition, index, indices);
        self.sub_meshes[index] = rebuilt;
        Ok(())
    }

    /// Rebuild every sub-mesh that holds a copy of cell `(row, col)` or of
    /// one of its neighbours. Returns the rebuilt indices.
    pub fn rebuild_around(
        &mut self,
        grid: &HeightGrid,
        row: usize,
        col: usize,
    ) -> Result<Vec<usize>, MeshError> {
        let last = self.partition.grid_size() - 1;
        let affected = self.partition.patches_covering(
            (row.saturating_sub(1), (row + 1).min(last)),
            (col.saturating_sub(1), (col + 1).min(last)),
        );
        for &index in &affected {
            self.rebuild_sub_mesh(grid, index)?;
        }
        tracing::debug!(row, col, rebuilt = affected.len(), "sub-meshes rebuilt after edit");
        Ok(affected)
    }
}

/// World position of grid cell `(row, col)`.
#[inline]
fn cell_position(
    grid: &HeightGrid,
    state: &RelativeHeightState,
    scale: f32,
    row: usize,
    col: usize,
) -> Vec3 {
    let shift = scale * (grid.size() - 1) as f32 / 2.0;
    Vec3::new(
        col as f32 * scale - shift,
        state.world_height(grid.get(row, col)),
        row as f32 * scale - shift,
    )
}

/// Scan the grid for its extremes, then build every sub-mesh.
pub fn build(
    grid: &HeightGrid,
    params: &MeshParams,
    sink: &dyn DiagnosticSink,
) -> Result<TerrainMesh, MeshError> {
    sink.line("Determining Max/Min Heights...");
    let state = RelativeHeightState::from_grid(grid, params.height_multiplier);
    build_with_state(grid, state, params, sink)
}

/// Build every sub-mesh using a caller-supplied relative-height state.
pub fn build_with_state(
    grid: &HeightGrid,
    state: RelativeHeightState,
    params: &MeshParams,
    sink: &dyn DiagnosticSink,
) -> Result<TerrainMesh, MeshError> {
    params.validate()?;
    let partition = Partition::new(grid.size(), params.subdivision_level, params.size_scale)?;
    let size = grid.size();
    let _span = tracing::info_span!("build_mesh", size, level = params.subdivision_level).entered();

    sink.line("Allocating Verts Memory...");
    let cells = size.checked_mul(size).ok_or(MeshError::TooLarge { size })?;
    let mut positions = Vec::new();
    positions
        .try_reserve_exact(cells)
        .map_err(|_| MeshError::TooLarge { size })?;
    positions.resize(cells, Vec3::ZERO);

    sink.line("Calculating Verts...");
    positions
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, p) in out.iter_mut().enumerate() {
                *p = cell_position(grid, &state, params.size_scale, row, col);
            }
        });

    sink.line("Calculating Normals...");
    let normals = vertex_normals(&positions, size);

    sink.line("Calculating Indicies...");
    let indices = partition.triangle_indices()?;
    let side = partition.patch_side();
    let sub_meshes: Vec<SubMesh> = (0..partition.count())
        .into_par_iter()
        .map(|index| {
            let vertices = (0..side * side)
                .map(|local| {
                    let (row, col) = partition.grid_cell(index, local);
                    let cell = row * size + col;
                    Vertex::new(
                        positions[cell],
                        normals[cell],
                        Vec2::new(col as f32, row as f32),
                    )
                })
                .collect();
            SubMesh {
                vertices,
                indices: indices.clone(),
                center: partition.center(index),
            }
        })
        .collect();

    sink.line(&format!(" Width of Mesh: {side}"));
    let mesh = TerrainMesh {
        relative_height: state,
        params: *params,
        partition,
        sub_meshes,
    };
    tracing::debug!(stats = ?mesh.stats(), "terrain mesh built");
    Ok(mesh)
}

/// Build a single sub-mesh straight from the grid.
///
/// Produces the same vertices as the full build for that patch, including
/// normals on its shared border.
pub fn build_sub_mesh(
    grid: &HeightGrid,
    state: &RelativeHeightState,
    params: &MeshParams,
    partition: &Partition,
    index: usize,
    indices: Vec<u32>,
) -> SubMesh {
    let size = grid.size();
    let side = partition.patch_side();
    let position = |i, j| cell_position(grid, state, params.size_scale, i, j);
    let vertices = (0..side * side)
        .into_par_iter()
        .map(|local| {
            let (row, col) = partition.grid_cell(index, local);
            Vertex::new(
                position(row, col),
                vertex_normal(size, row, col, position),
                Vec2::new(col as f32, row as f32),
            )
        })
        .collect();
    SubMesh {
        vertices,
        indices,
        center: partition.center(index),
    }
}
