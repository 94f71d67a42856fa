//! Terrain facade: generation, meshing, picking, elevation editing and the
//! `.ter` export format behind one owned [`Terrain`] value.

mod error;
mod settings;
mod terrain;
mod terrain_file;

pub use error::{TerrainError, TerrainFileError};
pub use settings::TerrainSettings;
pub use terrain::{ElevationEdit, Terrain};
pub use terrain_file::{TERRAIN_FILE_EXTENSION, TerrainFile, TerrainFileMesh};

pub use tessera_heightfield::{GeneratorParams, HeightGrid, HeightVariation};
pub use tessera_material::{MaterialHeightState, MaterialParams, RelativeHeightState, TerrainUniform};
pub use tessera_mesh::{MeshParams, MeshStats, SubMesh, TerrainMesh, Vertex};
pub use tessera_pick::{GroundTriangle, PickHit, Ray};
