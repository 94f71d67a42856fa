//! Sphere-culled triangle picking.

use glam::Vec3;
use rayon::prelude::*;
use tessera_mesh::{SubMesh, TerrainMesh};

use crate::ray::{Ray, ray_sphere, ray_triangle};

/// A picked terrain triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    /// Index of the sub-mesh that was hit.
    pub sub_mesh: usize,
    /// Triangle index within that sub-mesh's index buffer.
    pub triangle: usize,
    /// Weights of the triangle's three corners, in index-buffer order.
    pub barycentric: Vec3,
    /// World distance from the ray origin.
    pub distance: f32,
}

impl PickHit {
    /// Local vertex indices of the hit triangle.
    pub fn corners(&self, sub_meshes: &[SubMesh]) -> Option<[u32; 3]> {
        let mesh = sub_meshes.get(self.sub_mesh)?;
        (self.triangle < mesh.triangle_count()).then(|| mesh.triangle(self.triangle))
    }

    /// Local vertex index of the corner with the largest weight.
    pub fn nearest_vertex(&self, sub_meshes: &[SubMesh]) -> Option<u32> {
        let corners = self.corners(sub_meshes)?;
        let w = self.barycentric.to_array();
        let mut best = 0;
        for k in 1..3 {
            if w[k] > w[best] {
                best = k;
            }
        }
        Some(corners[best])
    }

    /// Hit point interpolated from the corner positions.
    pub fn world_position(&self, sub_meshes: &[SubMesh]) -> Option<Vec3> {
        let corners = self.corners(sub_meshes)?;
        let vertices = &sub_meshes[self.sub_mesh].vertices;
        let w = self.barycentric;
        Some(
            vertices[corners[0] as usize].position() * w.x
                + vertices[corners[1] as usize].position() * w.y
                + vertices[corners[2] as usize].position() * w.z,
        )
    }
}

/// Pick against sub-meshes whose bounding spheres have `radius` and sit at
/// `(center.x, 0, center.y)`.
///
/// Only the first sub-mesh whose sphere the ray crosses is searched, even if
/// no triangle in it is hit. Triangles facing away from the ray are skipped.
/// Among several hit triangles the lowest index wins.
pub fn pick(ray: &Ray, sub_meshes: &[SubMesh], radius: f32) -> Option<PickHit> {
    let (index, mesh) = sub_meshes
        .iter()
        .enumerate()
        .find(|(_, m)| ray_sphere(ray, Vec3::new(m.center.x, 0.0, m.center.y), radius))?;

    let toward_viewer = -ray.direction.try_normalize()?;
    let ray_length = ray.direction.length();

    let hit = (0..mesh.triangle_count())
        .into_par_iter()
        .find_map_first(|t| {
            let [a, b, c] = mesh.triangle(t).map(|i| &mesh.vertices[i as usize]);
            let normal = (a.normal() + b.normal() + c.normal()).normalize_or_zero();
            if toward_viewer.dot(normal) <= 0.0 {
                return None;
            }
            ray_triangle(ray, a.position(), b.position(), c.position()).map(|h| PickHit {
                sub_mesh: index,
                triangle: t,
                barycentric: h.barycentric,
                distance: h.t * ray_length,
            })
        });

    tracing::trace!(sub_mesh = index, hit = hit.is_some(), "terrain pick");
    hit
}

/// Pick against a built terrain using its own bounding-sphere radius.
pub fn pick_mesh(ray: &Ray, mesh: &TerrainMesh) -> Option<PickHit> {
    pick(ray, mesh.sub_meshes(), mesh.pick_radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_heightfield::HeightGrid;
    use tessera_log::NullSink;
    use tessera_mesh::{MeshParams, build};

    fn ramp_mesh() -> TerrainMesh {
        // Height rises by 2 per column; multiplier 0.5 gives a slope of 1.
        let grid = HeightGrid::from_fn(17, |_, j| 2 * j as i32).unwrap();
        build(&grid, &MeshParams::new(2, 1.0, 0.5), &NullSink).unwrap()
    }

    #[test]
    fn test_straight_down_over_each_center() {
        let mesh = ramp_mesh();
        for (k, center) in mesh.centers().iter().enumerate() {
            let ray = Ray::new(Vec3::new(center.x + 0.25, 100.0, center.y + 0.4), Vec3::NEG_Y);
            let hit = pick_mesh(&ray, &mesh).expect("straight-down ray must hit");
            assert_eq!(hit.sub_mesh, k, "ray above centre {k}");
            let p = hit.world_position(mesh.sub_meshes()).unwrap();
            // y = 0.5 * (2x_grid - mid) with x_grid = x + 8 and mid = 16
            let expected_y = center.x + 0.25;
            assert!((p.y - expected_y).abs() < 1e-4, "height {} vs {expected_y}", p.y);
            assert!((hit.distance - (100.0 - expected_y)).abs() < 1e-3);
            assert!((hit.barycentric.element_sum() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_miss_outside_terrain() {
        let mesh = ramp_mesh();
        let ray = Ray::new(Vec3::new(500.0, 100.0, 500.0), Vec3::NEG_Y);
        assert_eq!(pick_mesh(&ray, &mesh), None);
    }

    #[test]
    fn test_back_faces_ignored() {
        let mesh = ramp_mesh();
        let ray = Ray::new(Vec3::new(-5.0, -100.0, -5.0), Vec3::Y);
        assert_eq!(pick_mesh(&ray, &mesh), None, "looking at the underside");
    }

    #[test]
    fn test_first_sphere_only() {
        // With a huge radius every sphere matches, so only sub-mesh 0 is searched.
        let mesh = ramp_mesh();
        let ray = Ray::new(Vec3::new(6.0, 100.0, 6.0), Vec3::NEG_Y);
        assert_eq!(pick(&ray, mesh.sub_meshes(), 1_000.0), None);
        assert_eq!(pick_mesh(&ray, &mesh).map(|h| h.sub_mesh), Some(15));
    }

    #[test]
    fn test_nearest_vertex_follows_weights() {
        let mesh = ramp_mesh();
        let c = mesh.centers()[5];
        // Just off a grid vertex, so that vertex dominates the weights.
        let ray = Ray::new(Vec3::new(c.x + 0.05, 50.0, c.y + 0.05), Vec3::NEG_Y);
        let hit = pick_mesh(&ray, &mesh).unwrap();
        let local = hit.nearest_vertex(mesh.sub_meshes()).unwrap();
        let v = mesh.sub_meshes()[5].vertices[local as usize];
        assert_eq!((v.position[0], v.position[2]), (c.x, c.y));
    }
}
