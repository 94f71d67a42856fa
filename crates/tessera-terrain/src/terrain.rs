//! The owned terrain: height grid, mesh, material state and worker pool.

use std::path::Path;

use glam::Vec3;
use tessera_heightfield::{GeneratorParams, HeightGrid, generate};
use tessera_log::DiagnosticSink;
use tessera_material::{MaterialHeightState, TerrainUniform};
use tessera_mesh::{MeshParams, TerrainMesh, build, build_with_state};
use tessera_pick::{GroundTriangle, PickHit, Ray, locate_triangle, pick_mesh};

use crate::error::TerrainError;
use crate::settings::TerrainSettings;
use crate::terrain_file::TerrainFile;

/// Result of a single elevation edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElevationEdit {
    pub row: usize,
    pub col: usize,
    /// Raw height after the edit.
    pub height: i32,
    /// Sub-meshes that were rebuilt.
    pub rebuilt: Vec<usize>,
}

/// A generated terrain ready for rendering, picking and editing.
///
/// Parallel phases run on the terrain's own worker pool. Every mutating
/// operation takes `&mut self`, so edits never overlap with regeneration.
pub struct Terrain {
    settings: TerrainSettings,
    pool: rayon::ThreadPool,
    grid: HeightGrid,
    mesh: TerrainMesh,
    state: MaterialHeightState,
}

impl std::fmt::Debug for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terrain")
            .field("size", &self.grid.size())
            .field("stats", &self.mesh.stats())
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

fn worker_pool(threads: usize) -> Result<rayon::ThreadPool, TerrainError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("tessera-worker-{index}"))
        .build()?;
    tracing::debug!(threads, "terrain worker pool started");
    Ok(pool)
}

impl Terrain {
    /// Generate a height grid and mesh it.
    pub fn generate(
        settings: TerrainSettings,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, TerrainError> {
        let pool = worker_pool(settings.worker_threads)?;
        let grid = pool.install(|| generate(&settings.generator, sink))?;
        Self::with_pool(settings, pool, grid, sink)
    }

    /// Mesh an existing height grid.
    pub fn from_grid(
        grid: HeightGrid,
        settings: TerrainSettings,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, TerrainError> {
        let pool = worker_pool(settings.worker_threads)?;
        Self::with_pool(settings, pool, grid, sink)
    }

    fn with_pool(
        settings: TerrainSettings,
        pool: rayon::ThreadPool,
        grid: HeightGrid,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, TerrainError> {
        let mesh = pool.install(|| build(&grid, &settings.mesh, sink))?;
        let state = MaterialHeightState::new(settings.material, *mesh.relative_height());
        sink.line(" Terrain Successfully Setup!");
        Ok(Self {
            settings,
            pool,
            grid,
            mesh,
            state,
        })
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn material_state(&self) -> &MaterialHeightState {
        &self.state
    }

    pub fn set_material(&mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) {
        self.state.set_material(ambient, diffuse, specular, shininess);
        self.settings.material = *self.state.material();
    }

    /// Uniform block for the terrain shader.
    pub fn uniform(&self) -> TerrainUniform {
        self.state.to_uniform()
    }

    /// Replace the grid with a freshly generated one and rebuild everything.
    /// On failure the current terrain is left untouched.
    pub fn regenerate(
        &mut self,
        generator: GeneratorParams,
        sink: &dyn DiagnosticSink,
    ) -> Result<(), TerrainError> {
        let grid = self.pool.install(|| generate(&generator, sink))?;
        let mesh = self.pool.install(|| build(&grid, &self.settings.mesh, sink))?;
        self.settings.generator = generator;
        self.replace_contents(grid, mesh);
        sink.line(" Terrain Successfully Setup!");
        Ok(())
    }

    /// Rebuild the mesh from the current grid with new meshing parameters.
    pub fn remesh(&mut self, params: MeshParams, sink: &dyn DiagnosticSink) -> Result<(), TerrainError> {
        let mesh = self.pool.install(|| build(&self.grid, &params, sink))?;
        self.settings.mesh = params;
        self.state.set_relative_height(*mesh.relative_height());
        self.mesh = mesh;
        Ok(())
    }

    fn replace_contents(&mut self, grid: HeightGrid, mesh: TerrainMesh) {
        self.state.set_relative_height(*mesh.relative_height());
        self.grid = grid;
        self.mesh = mesh;
    }

    /// Rescan the height extremes and rebuild every sub-mesh.
    pub fn recalculate_relative_height(&mut self, sink: &dyn DiagnosticSink) -> Result<(), TerrainError> {
        let mesh = self.pool.install(|| build(&self.grid, &self.settings.mesh, sink))?;
        self.state.set_relative_height(*mesh.relative_height());
        self.mesh = mesh;
        tracing::debug!(relative = ?self.state.relative_height(), "relative height recalculated");
        Ok(())
    }

    /// Pick the terrain with a world-space ray.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.pool.install(|| pick_mesh(ray, &self.mesh))
    }

    /// Triangle under world `(x, z)`.
    pub fn locate(&self, x: f32, z: f32) -> Option<GroundTriangle> {
        locate_triangle(&self.mesh, x, z)
    }

    /// Add `amount` to the grid cell nearest a pick hit and rebuild the
    /// sub-meshes whose vertices or normals depend on it.
    ///
    /// The relative-height state is kept, so the cell may end up outside the
    /// recorded min/max until [`Self::recalculate_relative_height`].
    pub fn raise(&mut self, hit: &PickHit, amount: i32) -> Result<ElevationEdit, TerrainError> {
        let stale = || TerrainError::StaleHit {
            sub_mesh: hit.sub_mesh,
            triangle: hit.triangle,
        };
        let local = hit.nearest_vertex(self.mesh.sub_meshes()).ok_or_else(stale)?;
        let (row, col) = self.mesh.partition().grid_cell(hit.sub_mesh, local as usize);
        let height = self.grid.add(row, col, amount)?;

        let grid = &self.grid;
        let mesh = &mut self.mesh;
        let rebuilt = self.pool.install(|| mesh.rebuild_around(grid, row, col))?;
        tracing::debug!(row, col, height, "elevation edited");

        Ok(ElevationEdit {
            row,
            col,
            height,
            rebuilt,
        })
    }

    /// Pick with `ray` and raise the hit cell. Returns `None` on a miss.
    pub fn raise_at(&mut self, ray: &Ray, amount: i32) -> Result<Option<ElevationEdit>, TerrainError> {
        match self.pick(ray) {
            Some(hit) => self.raise(&hit, amount).map(Some),
            None => Ok(None),
        }
    }

    /// Rebuild the mesh with the current relative-height state instead of
    /// rescanning the grid.
    pub fn rebuild_with_current_state(&mut self, sink: &dyn DiagnosticSink) -> Result<(), TerrainError> {
        let state = *self.state.relative_height();
        let mesh = self
            .pool
            .install(|| build_with_state(&self.grid, state, &self.settings.mesh, sink))?;
        self.mesh = mesh;
        Ok(())
    }

    /// Render-ready snapshot for export.
    pub fn to_file(&self) -> TerrainFile {
        TerrainFile::from_mesh(
            &self.mesh,
            &self.state,
            self.settings.textures.clone(),
            self.settings.shader.clone(),
        )
    }

    /// Write the terrain as a `.ter` file.
    pub fn export(&self, path: &Path) -> Result<(), TerrainError> {
        self.to_file().save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_heightfield::HeightVariation;
    use tessera_log::{MemorySink, NullSink};

    fn settings(size: usize, level: u32) -> TerrainSettings {
        TerrainSettings {
            generator: GeneratorParams::new(size, 2, HeightVariation::new(500, 200, 200)).with_seed(17),
            mesh: MeshParams::new(level, 1.0, 0.1),
            worker_threads: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_reports_setup() {
        let sink = MemorySink::new();
        let terrain = Terrain::generate(settings(17, 1), &sink).unwrap();
        assert_eq!(terrain.mesh().sub_meshes().len(), 4);
        assert_eq!(sink.tail(1), vec![" Terrain Successfully Setup!"]);
        assert_eq!(
            terrain.material_state().relative_height(),
            terrain.mesh().relative_height()
        );
    }

    #[test]
    fn test_raise_changes_only_target_cell() {
        let mut terrain = Terrain::generate(settings(33, 2), &NullSink).unwrap();
        let before = terrain.grid().clone();
        let state = *terrain.material_state().relative_height();

        // Just off the grid vertex at the centre of sub-mesh 5.
        let ray = Ray::new(Vec3::new(-4.2, 1_000.0, -3.9), Vec3::NEG_Y);
        let edit = terrain.raise_at(&ray, 25).unwrap().expect("ray over sub-mesh 5 hits");
        assert_eq!((edit.row, edit.col), (12, 12));
        assert_eq!(edit.height, before.get(12, 12) + 25);

        let changed: Vec<usize> = before
            .cells()
            .iter()
            .zip(terrain.grid().cells())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(changed, vec![12 * 33 + 12]);
        assert_eq!(*terrain.material_state().relative_height(), state);
        assert_eq!(edit.rebuilt, vec![5]);
    }

    #[test]
    fn test_edit_rebuild_matches_full_build_with_same_state() {
        let mut terrain = Terrain::generate(settings(33, 2), &NullSink).unwrap();
        let ray = Ray::new(Vec3::new(-5.1, 1_000.0, 7.3), Vec3::NEG_Y);
        terrain.raise_at(&ray, -40).unwrap().expect("hit");
        let edited = terrain.mesh().clone();
        terrain.rebuild_with_current_state(&NullSink).unwrap();
        assert_eq!(*terrain.mesh(), edited);
    }

    #[test]
    fn test_recalculate_relative_height_picks_up_edit() {
        let mut terrain = Terrain::generate(settings(17, 1), &NullSink).unwrap();
        let max = terrain.material_state().relative_height().max;
        let ray = Ray::new(Vec3::new(-2.3, 1_000.0, -2.2), Vec3::NEG_Y);
        let edit = terrain.raise_at(&ray, 10_000).unwrap().expect("hit");
        assert_eq!(terrain.material_state().relative_height().max, max);
        terrain.recalculate_relative_height(&NullSink).unwrap();
        assert_eq!(terrain.material_state().relative_height().max, edit.height);
    }

    #[test]
    fn test_stale_hit_rejected() {
        let mut terrain = Terrain::generate(settings(9, 1), &NullSink).unwrap();
        let hit = PickHit {
            sub_mesh: 9,
            triangle: 0,
            barycentric: Vec3::X,
            distance: 0.0,
        };
        assert!(matches!(
            terrain.raise(&hit, 1),
            Err(TerrainError::StaleHit { sub_mesh: 9, .. })
        ));
    }

    #[test]
    fn test_failed_regenerate_keeps_terrain() {
        let mut terrain = Terrain::generate(settings(17, 1), &NullSink).unwrap();
        let grid = terrain.grid().clone();
        let bad = GeneratorParams::new(10, 0, HeightVariation::new(0, 1, 1));
        assert!(terrain.regenerate(bad, &NullSink).is_err());
        assert_eq!(*terrain.grid(), grid);
    }

    #[test]
    fn test_remesh_changes_partition() {
        let mut terrain = Terrain::generate(settings(33, 1), &NullSink).unwrap();
        terrain.remesh(MeshParams::new(3, 1.0, 0.1), &NullSink).unwrap();
        assert_eq!(terrain.mesh().sub_meshes().len(), 64);
        assert_eq!(terrain.settings().mesh.subdivision_level, 3);
    }

    #[test]
    fn test_uniform_tracks_material() {
        let mut terrain = Terrain::generate(settings(9, 1), &NullSink).unwrap();
        terrain.set_material(Vec3::ONE, Vec3::ONE, Vec3::ZERO, 2.0);
        let u = terrain.uniform();
        assert_eq!(u.light_ambient, [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(u.light_specular_shininess, [0.0, 0.0, 0.0, 2.0]);
    }
}
