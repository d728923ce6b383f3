//! Uniform data shared with the shaders.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Minimum uniform buffer offset alignment required by most GPU APIs.
pub const UNIFORM_BUFFER_MIN_ALIGN: u64 = 256;

/// Round `size` up to the uniform buffer alignment.
pub const fn padded_uniform_size(size: u64) -> u64 {
    size.div_ceil(UNIFORM_BUFFER_MIN_ALIGN) * UNIFORM_BUFFER_MIN_ALIGN
}

/// Camera matrices, shared by every style material through bind group 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ViewUniforms {
    /// World space to view space.
    pub world_to_view: Mat4,
    /// View space to normalized device coordinates.
    pub view_to_ndc: Mat4,
    /// Combined `view_to_ndc * world_to_view`.
    pub world_to_ndc: Mat4,
}

impl ViewUniforms {
    /// Unpadded struct size in bytes.
    pub const SIZE: u64 = std::mem::size_of::<ViewUniforms>() as u64;

    /// Size rounded up to the uniform buffer alignment.
    pub const PADDED_SIZE: u64 = padded_uniform_size(Self::SIZE);

    /// Build view uniforms from the two independent matrices.
    pub fn new(world_to_view: Mat4, view_to_ndc: Mat4) -> Self {
        Self {
            world_to_view,
            view_to_ndc,
            world_to_ndc: view_to_ndc * world_to_view,
        }
    }
}

impl Default for ViewUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// Per-object transform, bound through bind group 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Object space to world space.
    pub world: Mat4,
}

impl ObjectUniforms {
    /// Unpadded struct size in bytes.
    pub const SIZE: u64 = std::mem::size_of::<ObjectUniforms>() as u64;

    /// Size rounded up to the uniform buffer alignment.
    pub const PADDED_SIZE: u64 = padded_uniform_size(Self::SIZE);
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_padding() {
        assert_eq!(padded_uniform_size(1), 256);
        assert_eq!(padded_uniform_size(256), 256);
        assert_eq!(padded_uniform_size(257), 512);
        assert_eq!(ViewUniforms::SIZE, 192);
        assert_eq!(ViewUniforms::PADDED_SIZE, 256);
        assert_eq!(ObjectUniforms::PADDED_SIZE, 256);
    }

    #[test]
    fn test_combined_matrix() {
        let world_to_view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let view_to_ndc = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let uniforms = ViewUniforms::new(world_to_view, view_to_ndc);
        assert_eq!(uniforms.world_to_ndc, view_to_ndc * world_to_view);
    }
}
