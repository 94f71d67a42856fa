//! Direct lookup of the triangle under a world `(x, z)` position.

use glam::Vec3;
use tessera_mesh::TerrainMesh;

/// Triangle lying under a ground position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundTriangle {
    pub sub_mesh: usize,
    /// Triangle index within the sub-mesh index buffer.
    pub triangle: usize,
    /// Local vertex indices, in index-buffer order.
    pub vertices: [u32; 3],
    /// Horizontal interpolation weights for `vertices`.
    pub barycentric: Vec3,
}

impl GroundTriangle {
    /// Terrain height at the located position.
    pub fn height(&self, mesh: &TerrainMesh) -> Option<f32> {
        let sub = mesh.sub_mesh(self.sub_mesh)?;
        let w = self.barycentric.to_array();
        let mut y = 0.0;
        for (k, &v) in self.vertices.iter().enumerate() {
            y += sub.vertices.get(v as usize)?.position[1] * w[k];
        }
        Some(y)
    }
}

/// Find the sub-mesh and triangle under world position `(x, z)` without
/// casting a ray. Returns `None` outside the terrain.
pub fn locate_triangle(mesh: &TerrainMesh, x: f32, z: f32) -> Option<GroundTriangle> {
    let partition = mesh.partition();
    let per_side = partition.per_side();
    let half = partition.full_width() / 2.0;
    let patch_width = partition.full_width() / per_side as f32;

    // Patch-space coordinates in [0, per_side].
    let xt = (x + half) / patch_width;
    let zt = (z + half) / patch_width;
    let limit = per_side as f32;
    if !(0.0..=limit).contains(&xt) || !(0.0..=limit).contains(&zt) {
        return None;
    }

    let n = (xt.floor() as usize).min(per_side - 1);
    let m = (zt.floor() as usize).min(per_side - 1);
    let cells = (partition.patch_side() - 1) as f32;
    let local_x = (xt - n as f32) * cells;
    let local_z = (zt - m as f32) * cells;

    let last_quad = partition.patch_side() - 2;
    let col = (local_x.floor() as usize).min(last_quad);
    let row = (local_z.floor() as usize).min(last_quad);
    let u = local_x - col as f32;
    let v = local_z - row as f32;

    let side = partition.patch_side() as u32;
    let ielem = col as u32 + row as u32 * side;
    let quad = row * (partition.patch_side() - 1) + col;

    let (second, vertices, barycentric) = if u + v > 1.0 {
        (
            1,
            [ielem + 1, ielem + side, ielem + side + 1],
            Vec3::new(1.0 - v, 1.0 - u, u + v - 1.0),
        )
    } else {
        (0, [ielem, ielem + side, ielem + 1], Vec3::new(1.0 - u - v, v, u))
    };

    Some(GroundTriangle {
        sub_mesh: partition.patch_index(m, n),
        triangle: quad * 2 + second,
        vertices,
        barycentric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::pick_mesh;
    use crate::ray::Ray;
    use tessera_heightfield::HeightGrid;
    use tessera_log::NullSink;
    use tessera_mesh::{MeshParams, build};

    fn bumpy_mesh() -> TerrainMesh {
        let grid = HeightGrid::from_fn(17, |i, j| ((i * 31 + j * 17) % 11) as i32 * 3).unwrap();
        build(&grid, &MeshParams::new(2, 1.5, 0.5), &NullSink).unwrap()
    }

    #[test]
    fn test_matches_index_buffer() {
        let mesh = bumpy_mesh();
        let found = locate_triangle(&mesh, 1.3, -4.1).unwrap();
        let sub = &mesh.sub_meshes()[found.sub_mesh];
        assert_eq!(sub.triangle(found.triangle), found.vertices);
    }

    #[test]
    fn test_agrees_with_vertical_pick() {
        let mesh = bumpy_mesh();
        for &(x, z) in &[(3.3, 3.2), (-8.1, 4.1), (10.2, -3.3), (-2.4, -9.3)] {
            let found = locate_triangle(&mesh, x, z).unwrap();
            let hit = pick_mesh(&Ray::new(Vec3::new(x, 500.0, z), Vec3::NEG_Y), &mesh).unwrap();
            assert_eq!((hit.sub_mesh, hit.triangle), (found.sub_mesh, found.triangle), "at ({x}, {z})");
            let picked = hit.world_position(mesh.sub_meshes()).unwrap();
            let y = found.height(&mesh).unwrap();
            assert!((picked.y - y).abs() < 1e-3, "height {y} vs picked {}", picked.y);
        }
    }

    #[test]
    fn test_far_edge_clamped() {
        let mesh = bumpy_mesh();
        let edge = mesh.partition().full_width() / 2.0;
        let found = locate_triangle(&mesh, edge, edge).unwrap();
        assert_eq!(found.sub_mesh, mesh.partition().count() - 1);
    }

    #[test]
    fn test_outside_is_none() {
        let mesh = bumpy_mesh();
        assert!(locate_triangle(&mesh, 100.0, 0.0).is_none());
        assert!(locate_triangle(&mesh, 0.0, -12.1).is_none());
    }
}
