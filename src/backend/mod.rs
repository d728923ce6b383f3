//! GPU backend abstraction layer.
//!
//! This module provides a trait-based abstraction over the GPU API so the
//! mesh render cache can be driven without real hardware.
//!
//! # Available Backends
//!
//! - `dummy` (always available): no-op backend for testing and development
//! - `wgpu-backend` feature: cross-platform backend using wgpu
//!
//! # Architecture
//!
//! Each backend implements the [`GpuBackend`] trait, which provides buffer
//! creation and upload, pipeline compilation and bind-group creation. Draw
//! calls are recorded through a [`RenderEncoder`], whose concrete type is
//! also backend-provided.

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_backend;

pub mod dummy;

use std::sync::Arc;

use crate::error::RenderError;
use crate::types::{BufferDescriptor, TextureFormat};
use crate::vertex::VertexLayout;

/// Handle to a GPU buffer resource.
#[derive(Debug, Clone)]
pub enum GpuBuffer {
    /// Dummy backend (no GPU allocation)
    Dummy,
    /// wgpu backend buffer
    #[cfg(feature = "wgpu-backend")]
    Wgpu(Arc<wgpu::Buffer>),
}

/// Handle to a compiled graphics pipeline.
#[derive(Debug, Clone)]
pub enum GpuPipeline {
    /// Dummy backend (no compiled pipeline)
    Dummy,
    /// wgpu backend render pipeline
    #[cfg(feature = "wgpu-backend")]
    Wgpu(Arc<wgpu::RenderPipeline>),
}

/// Handle to a bind group (a set of shader resource bindings).
#[derive(Debug, Clone)]
pub enum GpuBindGroup {
    /// Dummy backend (no GPU bindings)
    Dummy,
    /// wgpu backend bind group
    #[cfg(feature = "wgpu-backend")]
    Wgpu(Arc<wgpu::BindGroup>),
}

/// Descriptor for compiling a graphics pipeline.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor {
    /// Debug label for the pipeline.
    pub label: Option<String>,
    /// WGSL shader source containing both entry points.
    pub shader_source: String,
    /// Vertex shader entry point name.
    pub vertex_entry: String,
    /// Fragment shader entry point name.
    pub fragment_entry: String,
    /// Layout of the single vertex buffer the pipeline reads.
    pub vertex_layout: VertexLayout,
    /// Colour render-target format.
    pub colour_format: TextureFormat,
    /// Optional depth render-target format.
    pub depth_format: Option<TextureFormat>,
}

/// A single buffer binding within a bind group.
#[derive(Debug)]
pub struct BindGroupEntry<'a> {
    /// Binding index within the group.
    pub binding: u32,
    /// The buffer to bind.
    pub buffer: &'a GpuBuffer,
    /// Byte offset into the buffer.
    pub offset: u64,
    /// Bound byte range.
    pub size: u64,
}

/// Descriptor for creating a bind group against a pipeline's group layout.
#[derive(Debug)]
pub struct BindGroupDescriptor<'a> {
    /// Debug label for the bind group.
    pub label: Option<&'a str>,
    /// Pipeline whose layout the group binds against.
    pub pipeline: &'a GpuPipeline,
    /// Bind group index (0 = shared view, 1 = per-object).
    pub group: u32,
    /// Buffer bindings in the group.
    pub entries: &'a [BindGroupEntry<'a>],
}

/// GPU backend trait for abstracting different GPU APIs.
pub trait GpuBackend: Send + Sync + 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Create a buffer resource.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, RenderError>;

    /// Write data to a buffer at a byte offset.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8])
        -> Result<(), RenderError>;

    /// Compile a graphics pipeline.
    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<GpuPipeline, RenderError>;

    /// Create a bind group against a pipeline's group layout.
    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor<'_>,
    ) -> Result<GpuBindGroup, RenderError>;
}

/// Records draw commands for one render pass.
///
/// The bind/draw sequence mirrors what the materials need: bind groups,
/// vertex buffer, pipeline, then a non-indexed draw.
pub trait RenderEncoder {
    /// Bind a graphics pipeline.
    fn bind_pipeline(&mut self, pipeline: &GpuPipeline);

    /// Bind a bind group at the given group index.
    fn bind_bind_group(&mut self, group: u32, bind_group: &GpuBindGroup);

    /// Bind a vertex buffer at the given slot.
    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &GpuBuffer);

    /// Issue a non-indexed draw of `vertex_count` vertices.
    fn draw(&mut self, vertex_count: u32);
}

/// Selects and creates the appropriate backend based on available features.
pub fn create_backend() -> Result<Arc<dyn GpuBackend>, RenderError> {
    #[cfg(feature = "wgpu-backend")]
    {
        match wgpu_backend::WgpuBackend::new() {
            Ok(backend) => {
                log::info!("Using wgpu backend");
                return Ok(Arc::new(backend));
            }
            Err(e) => {
                log::warn!("Failed to create wgpu backend: {}", e);
            }
        }
    }

    log::info!("Using dummy backend");
    Ok(Arc::new(dummy::DummyBackend::new()))
}
