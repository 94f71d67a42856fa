//! Ray primitives: sphere and triangle intersection.

use glam::Vec3;

/// World-space ray. `direction` need not be normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Returns `true` if the ray crosses the sphere ahead of its origin, or
/// starts inside it.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> bool {
    let a = ray.direction.length_squared();
    if a == 0.0 {
        return false;
    }
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return false;
    }
    // Far root must lie in front of the origin.
    (-b + disc.sqrt()) / a >= 0.0
}

/// Ray/triangle intersection result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit; world distance when the direction is unit.
    pub t: f32,
    /// Weights of the three corners, summing to 1.
    pub barycentric: Vec3,
}

const EPSILON: f32 = 1e-7;

/// Möller–Trumbore intersection of `ray` with triangle `(v0, v1, v2)`.
///
/// Both faces count as hits here; back-face rejection is up to the caller.
/// Hits behind the origin are ignored.
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    if t < 0.0 {
        return None;
    }

    Some(TriangleHit {
        t,
        barycentric: Vec3::new(1.0 - u - v, u, v),
    })
}
