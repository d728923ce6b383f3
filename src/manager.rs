//! The render manager: style materials, mesh pool and draw recording.

use std::sync::Arc;

use glam::Mat4;

use crate::backend::{
    BindGroupDescriptor, BindGroupEntry, GpuBindGroup, GpuPipeline, PipelineDescriptor,
    RenderEncoder,
};
use crate::device::GraphicsDevice;
use crate::error::RenderError;
use crate::handle::{Handle, Pool};
use crate::mesh::MeshSource;
use crate::renderable::{MeshStats, RenderableMesh};
use crate::resources::Buffer;
use crate::shaders;
use crate::types::{BufferDescriptor, BufferUsage, TargetFormats};
use crate::uniforms::{ObjectUniforms, ViewUniforms};
use crate::vertex::RenderStyle;

/// Handle to a renderable mesh owned by a [`RenderManager`].
pub type MeshHandle = Handle<RenderableMesh>;

/// Pipeline and shared view bindings for one render style.
///
/// One material exists per style; every mesh drawn with the style shares it.
pub struct StyleMaterial {
    style: RenderStyle,
    pipeline: GpuPipeline,
    view_bind_group: GpuBindGroup,
}

impl std::fmt::Debug for StyleMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleMaterial")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl StyleMaterial {
    fn new(
        device: &GraphicsDevice,
        style: RenderStyle,
        formats: &TargetFormats,
        view_buffer: &Arc<Buffer>,
    ) -> Result<Self, RenderError> {
        let pipeline = device.create_pipeline(&PipelineDescriptor {
            label: Some(format!("{style} pipeline")),
            shader_source: shaders::source_for(style),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            vertex_layout: style.layout(),
            colour_format: formats.colour,
            depth_format: formats.depth,
        })?;

        let view_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("view bind group"),
            pipeline: &pipeline,
            group: 0,
            entries: &[BindGroupEntry {
                binding: 0,
                buffer: view_buffer.raw(),
                offset: 0,
                size: ViewUniforms::PADDED_SIZE,
            }],
        })?;

        Ok(Self {
            style,
            pipeline,
            view_bind_group,
        })
    }

    /// The style this material renders.
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    pub(crate) fn pipeline(&self) -> &GpuPipeline {
        &self.pipeline
    }
}

/// Owns the style materials, the shared view uniforms and a pool of
/// renderable meshes.
///
/// All mesh operations go through handles issued by [`Self::create_mesh`];
/// a destroyed mesh's handle is rejected even if its pool slot is reused.
pub struct RenderManager {
    device: Arc<GraphicsDevice>,
    view_buffer: Arc<Buffer>,
    materials: Vec<StyleMaterial>,
    meshes: Pool<RenderableMesh>,
}

impl std::fmt::Debug for RenderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderManager")
            .field("device", &self.device.name())
            .field("meshes", &self.meshes.len())
            .finish_non_exhaustive()
    }
}

impl RenderManager {
    /// Create a manager, compiling one material per render style.
    pub fn new(device: Arc<GraphicsDevice>, formats: TargetFormats) -> Result<Self, RenderError> {
        let view_buffer = device.create_buffer(
            BufferDescriptor::new(
                ViewUniforms::PADDED_SIZE,
                BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            )
            .with_label("view uniforms"),
        )?;
        view_buffer.write(0, bytemuck::bytes_of(&ViewUniforms::default()))?;

        let mut materials = Vec::with_capacity(RenderStyle::COUNT);
        for style in RenderStyle::ALL {
            materials.push(StyleMaterial::new(&device, style, &formats, &view_buffer)?);
        }

        log::info!(
            "Render manager ready ({} style materials, device: {})",
            materials.len(),
            device.name()
        );

        Ok(Self {
            device,
            view_buffer,
            materials,
            meshes: Pool::new(),
        })
    }

    /// Create a renderable mesh with the given initial style.
    pub fn create_mesh(&mut self, style: RenderStyle) -> Result<MeshHandle, RenderError> {
        let mut renderable = RenderableMesh::new();
        let material = &self.materials[style.index()];
        renderable.set_style(&self.device, material, style)?;
        Ok(self.meshes.insert(renderable))
    }

    /// Destroy a renderable mesh, releasing its GPU resources.
    pub fn destroy_mesh(&mut self, handle: MeshHandle) {
        let removed = self.meshes.remove(handle);
        debug_assert!(removed.is_some(), "destroy_mesh: stale mesh handle");
    }

    /// Switch a mesh to a different render style.
    ///
    /// Setting the current style is a no-op; any other style releases the
    /// mesh's cached buffers, so the next [`Self::update`] re-extracts.
    pub fn set_style(&mut self, handle: MeshHandle, style: RenderStyle) -> Result<(), RenderError> {
        let material = &self.materials[style.index()];
        let device = &self.device;
        let Some(renderable) = self.meshes.get_mut(handle) else {
            debug_assert!(false, "set_style: stale mesh handle");
            return Ok(());
        };
        renderable.set_style(device, material, style)
    }

    /// Synchronise a mesh's GPU cache with its source, re-extracting only
    /// when a watched channel changed. Safe to call every frame.
    pub fn update(&mut self, handle: MeshHandle, mesh: &dyn MeshSource) -> Result<(), RenderError> {
        let device = &self.device;
        let Some(renderable) = self.meshes.get_mut(handle) else {
            debug_assert!(false, "update: stale mesh handle");
            return Ok(());
        };
        renderable.sync_if_needed(device, mesh)
    }

    /// Set a mesh's object-to-world transform.
    pub fn set_transform(&self, handle: MeshHandle, world: Mat4) -> Result<(), RenderError> {
        let Some(renderable) = self.meshes.get(handle) else {
            debug_assert!(false, "set_transform: stale mesh handle");
            return Ok(());
        };
        if let Some(object) = renderable.object() {
            object
                .buffer
                .write(0, bytemuck::bytes_of(&ObjectUniforms { world }))?;
        }
        Ok(())
    }

    /// Update the shared camera uniforms.
    pub fn set_view(&self, view: &ViewUniforms) -> Result<(), RenderError> {
        self.view_buffer.write(0, bytemuck::bytes_of(view))
    }

    /// Record draw commands for a mesh.
    ///
    /// A mesh with no style, no vertices or no GPU buffer is skipped
    /// without recording anything.
    pub fn render(&self, handle: MeshHandle, encoder: &mut dyn RenderEncoder) {
        let Some(renderable) = self.meshes.get(handle) else {
            debug_assert!(false, "render: stale mesh handle");
            return;
        };
        let Some(style) = renderable.style() else {
            return;
        };
        if renderable.vertex_count() == 0 {
            return;
        }
        let Some(vertex_buffer) = renderable.vertex_buffer() else {
            return;
        };
        let Some(object) = renderable.object() else {
            return;
        };

        let material = &self.materials[style.index()];
        encoder.bind_bind_group(0, &material.view_bind_group);
        encoder.bind_bind_group(1, &object.bind_group);
        encoder.bind_vertex_buffer(0, vertex_buffer.raw());
        encoder.bind_pipeline(&material.pipeline);
        encoder.draw(renderable.vertex_count());
    }

    /// Cache counters for a mesh, or `None` for a stale handle.
    pub fn mesh_stats(&self, handle: MeshHandle) -> Option<MeshStats> {
        self.meshes.get(handle).map(|renderable| renderable.stats())
    }

    /// Number of live meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// The device this manager renders with.
    pub fn device(&self) -> &Arc<GraphicsDevice> {
        &self.device
    }
}

static_assertions::assert_impl_all!(RenderManager: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::{DummyBackend, DummyEncoder};
    use crate::instance::GraphicsInstance;
    use crate::types::TextureFormat;

    fn test_manager() -> RenderManager {
        let instance = GraphicsInstance::with_backend(Arc::new(DummyBackend::new()));
        let device = instance.create_device().unwrap();
        RenderManager::new(device, TargetFormats::new(TextureFormat::Bgra8Unorm)).unwrap()
    }

    #[test]
    fn test_mesh_lifecycle() {
        let mut manager = test_manager();
        let handle = manager.create_mesh(RenderStyle::Normal).unwrap();
        assert_eq!(manager.mesh_count(), 1);
        assert!(manager.mesh_stats(handle).is_some());

        manager.destroy_mesh(handle);
        assert_eq!(manager.mesh_count(), 0);
        assert!(manager.mesh_stats(handle).is_none());
    }

    #[test]
    fn test_empty_mesh_records_no_draw() {
        let mut manager = test_manager();
        let handle = manager.create_mesh(RenderStyle::FaceColour).unwrap();

        let mut encoder = DummyEncoder::new();
        manager.render(handle, &mut encoder);
        assert!(encoder.draws().is_empty());
    }

    #[test]
    fn test_set_view_and_transform() {
        let mut manager = test_manager();
        let handle = manager.create_mesh(RenderStyle::NormalColour).unwrap();

        manager.set_view(&ViewUniforms::default()).unwrap();
        manager.set_transform(handle, Mat4::IDENTITY).unwrap();
    }
}
