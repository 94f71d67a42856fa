//! Ray picking against partitioned terrain meshes.
//!
//! A pick culls sub-meshes with bounding spheres, then tests the triangles
//! of the first sub-mesh whose sphere the ray crosses.

pub mod locate;
pub mod picker;
pub mod ray;

pub use locate::{GroundTriangle, locate_triangle};
pub use picker::{PickHit, pick, pick_mesh};
pub use ray::{Ray, TriangleHit, ray_sphere, ray_triangle};
