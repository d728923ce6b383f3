//! Incremental cache that turns editable polygon meshes into GPU-ready
//! vertex streams.
//!
//! The crate sits between an application's editable meshes and the GPU. A
//! [`RenderManager`] owns one pipeline per [`RenderStyle`] and a pool of
//! cached meshes. Each frame the application calls [`RenderManager::update`]
//! for every mesh; the cache compares the source's per-channel content
//! hashes against what it saw last time and re-extracts packed vertex
//! records only when a watched channel actually changed. Vertex buffers grow
//! to a high-water mark and never shrink.
//!
//! # Example
//!
//! ```
//! use polymesh_render::{
//!     GraphicsInstance, RenderManager, RenderStyle, SimpleMesh, TargetFormats, TextureFormat,
//! };
//! use glam::Vec3;
//!
//! # fn main() -> Result<(), polymesh_render::RenderError> {
//! let instance = GraphicsInstance::new()?;
//! let device = instance.create_device()?;
//! let mut manager = RenderManager::new(device, TargetFormats::new(TextureFormat::Bgra8Unorm))?;
//!
//! let mut mesh = SimpleMesh::new();
//! let a = mesh.push_vertex(Vec3::ZERO, Vec3::Z);
//! let b = mesh.push_vertex(Vec3::X, Vec3::Z);
//! let c = mesh.push_vertex(Vec3::Y, Vec3::Z);
//! mesh.push_polygon(&[a, b, c]);
//!
//! let handle = manager.create_mesh(RenderStyle::Normal)?;
//! manager.update(handle, &mesh)?; // extracts
//! manager.update(handle, &mesh)?; // no-op, nothing changed
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod extract;
pub mod handle;
pub mod instance;
pub mod manager;
pub mod mesh;
pub mod renderable;
pub mod resources;
mod shaders;
pub mod types;
pub mod uniforms;
pub mod vertex;

pub use backend::dummy::{DummyBackend, DummyEncoder};
pub use backend::{GpuBackend, RenderEncoder};
pub use device::GraphicsDevice;
pub use error::RenderError;
pub use instance::GraphicsInstance;
pub use manager::{MeshHandle, RenderManager, StyleMaterial};
pub use mesh::{MeshSource, SimpleMesh, TriangleCorner, VertexChannel};
pub use renderable::{MeshStats, RenderableMesh};
pub use resources::Buffer;
pub use types::{BufferDescriptor, BufferUsage, TargetFormats, TextureFormat};
pub use uniforms::{ObjectUniforms, ViewUniforms};
pub use vertex::RenderStyle;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
