//! Terrain meshing: positions, curvature normals, and partitioning of the
//! vertex grid into equally sized sub-meshes.

pub mod builder;
pub mod error;
pub mod normals;
pub mod partition;
pub mod vertex;

pub use builder::{MeshParams, MeshStats, SubMesh, TerrainMesh, build, build_sub_mesh, build_with_state};
pub use error::MeshError;
pub use normals::vertex_normal;
pub use partition::Partition;
pub use vertex::Vertex;
