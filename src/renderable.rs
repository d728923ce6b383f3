//! The per-mesh render cache: stored hashes, staging bytes and GPU buffers.

use std::sync::Arc;

use crate::backend::{BindGroupDescriptor, BindGroupEntry, GpuBindGroup};
use crate::device::GraphicsDevice;
use crate::error::RenderError;
use crate::extract::extract_vertices;
use crate::manager::StyleMaterial;
use crate::mesh::{MeshSource, VertexChannel};
use crate::resources::Buffer;
use crate::types::{BufferDescriptor, BufferUsage};
use crate::uniforms::ObjectUniforms;
use crate::vertex::RenderStyle;

/// Counters describing the cached state of one renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    /// How many times vertex extraction has run for the current style.
    pub extractions: u64,
    /// Logical vertex count of the last extraction.
    pub vertex_count: u32,
    /// Capacity of the GPU vertex buffer in vertices (high-water mark).
    pub buffer_capacity: u32,
}

/// Per-object uniform buffer and its bind group.
#[derive(Debug)]
pub(crate) struct ObjectBindings {
    pub(crate) buffer: Arc<Buffer>,
    pub(crate) bind_group: GpuBindGroup,
}

/// GPU-side cache of one source mesh under one render style.
///
/// Holds the channel hashes observed at the last sync, the CPU staging
/// bytes, and a vertex buffer whose capacity only ever grows.
#[derive(Debug, Default)]
pub struct RenderableMesh {
    style: Option<RenderStyle>,
    stored_position_hash: Option<u64>,
    stored_normal_hash: Option<u64>,
    staging: Vec<u8>,
    vertex_buffer: Option<Arc<Buffer>>,
    buffer_capacity: u32,
    vertex_count: u32,
    object: Option<ObjectBindings>,
    extractions: u64,
}

impl RenderableMesh {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The active render style, if one has been assigned.
    pub fn style(&self) -> Option<RenderStyle> {
        self.style
    }

    /// Cache counters for this renderable.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            extractions: self.extractions,
            vertex_count: self.vertex_count,
            buffer_capacity: self.buffer_capacity,
        }
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub(crate) fn vertex_buffer(&self) -> Option<&Arc<Buffer>> {
        self.vertex_buffer.as_ref()
    }

    pub(crate) fn object(&self) -> Option<&ObjectBindings> {
        self.object.as_ref()
    }

    /// Switch this renderable to `style`.
    ///
    /// Assigning the current style is a no-op. Any other assignment releases
    /// every cached resource and forgets the stored hashes, so the next sync
    /// re-extracts from scratch.
    pub(crate) fn set_style(
        &mut self,
        device: &GraphicsDevice,
        material: &StyleMaterial,
        style: RenderStyle,
    ) -> Result<(), RenderError> {
        if self.style == Some(style) {
            return Ok(());
        }

        log::trace!(
            "Switching style {:?} -> {} ({} vertices cached)",
            self.style,
            style,
            self.vertex_count
        );

        // Release everything before attempting new resources, so a failed
        // creation leaves a consistent (empty) cache.
        self.style = None;
        self.stored_position_hash = None;
        self.stored_normal_hash = None;
        self.staging = Vec::new();
        self.vertex_buffer = None;
        self.buffer_capacity = 0;
        self.vertex_count = 0;
        self.object = None;
        self.extractions = 0;

        let buffer = device.create_buffer(
            BufferDescriptor::new(
                ObjectUniforms::PADDED_SIZE,
                BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            )
            .with_label("object uniforms"),
        )?;
        buffer.write(0, bytemuck::bytes_of(&ObjectUniforms::default()))?;

        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("object bind group"),
            pipeline: material.pipeline(),
            group: 1,
            entries: &[BindGroupEntry {
                binding: 0,
                buffer: buffer.raw(),
                offset: 0,
                size: ObjectUniforms::PADDED_SIZE,
            }],
        })?;

        self.object = Some(ObjectBindings { buffer, bind_group });
        self.style = Some(style);
        Ok(())
    }

    /// Bring the GPU cache up to date with `mesh` if its watched channels
    /// changed since the last sync. Idempotent; intended to be called every
    /// frame.
    pub(crate) fn sync_if_needed(
        &mut self,
        device: &GraphicsDevice,
        mesh: &dyn MeshSource,
    ) -> Result<(), RenderError> {
        let Some(style) = self.style else {
            return Ok(());
        };

        let position_hash = mesh.channel_hash(VertexChannel::Position);
        let normal_hash = style
            .needs_normals()
            .then(|| mesh.channel_hash(VertexChannel::Normal));

        if Some(position_hash) == self.stored_position_hash
            && normal_hash == self.stored_normal_hash
        {
            return Ok(());
        }

        let count = extract_vertices(mesh, style, &mut self.staging);
        self.extractions += 1;
        self.vertex_count = count;

        // Commit the observed hashes before uploading: a failed upload still
        // counts as having seen this version of the mesh, so a broken device
        // is retried at most once per mesh change rather than every frame.
        self.stored_position_hash = Some(position_hash);
        self.stored_normal_hash = normal_hash;

        log::trace!("Extracted {} vertices ({})", count, style);

        if count > self.buffer_capacity {
            // Drop the old buffer first and only ratchet capacity up once
            // the new allocation succeeded.
            self.vertex_buffer = None;
            self.buffer_capacity = 0;

            let size = count as u64 * style.vertex_stride() as u64;
            let buffer = device.create_buffer(
                BufferDescriptor::new(size, BufferUsage::VERTEX | BufferUsage::COPY_DST)
                    .with_label("mesh vertices"),
            )?;
            self.vertex_buffer = Some(buffer);
            self.buffer_capacity = count;
            log::trace!("Vertex buffer grown to {} vertices", count);
        }

        if count > 0 {
            if let Some(buffer) = &self.vertex_buffer {
                buffer.write(0, &self.staging)?;
            }
        }

        Ok(())
    }
}

static_assertions::assert_impl_all!(RenderableMesh: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_renderable_is_empty() {
        let renderable = RenderableMesh::new();
        assert_eq!(renderable.style(), None);
        assert_eq!(
            renderable.stats(),
            MeshStats {
                extractions: 0,
                vertex_count: 0,
                buffer_capacity: 0,
            }
        );
        assert!(renderable.vertex_buffer().is_none());
    }
}
