//! Terrain vertex layout.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// A terrain vertex, 32 bytes, ready for GPU upload.
///
/// Layout:
///   - `[0..12]`  position, world space
///   - `[12..24]` normal, unit length
///   - `[24..32]` texture coordinate `(column, row)` in grid cells
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

static_assertions::assert_eq_size!(Vertex, [u8; 32]);

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    #[inline]
    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from_array(self.tex_coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_offsets() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec2::new(4.0, 5.0));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 4.0, 5.0]);
    }

    #[test]
    fn test_accessors_round_trip() {
        let v = Vertex::new(Vec3::new(-1.0, 0.5, 2.0), Vec3::X, Vec2::new(3.0, 7.0));
        assert_eq!(v.position(), Vec3::new(-1.0, 0.5, 2.0));
        assert_eq!(v.normal(), Vec3::X);
        assert_eq!(v.tex_coord(), Vec2::new(3.0, 7.0));
    }
}
