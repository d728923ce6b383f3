//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations but provides a valid
//! implementation for exercising the render cache without GPU hardware. It
//! counts the operations issued against it so tests can verify allocation
//! and upload behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::RenderError;
use crate::types::BufferDescriptor;

use super::{
    BindGroupDescriptor, GpuBackend, GpuBindGroup, GpuBuffer, GpuPipeline, PipelineDescriptor,
    RenderEncoder,
};

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    buffers_created: AtomicUsize,
    writes: Mutex<Vec<(u64, u64)>>,
    pipelines_created: AtomicUsize,
    bind_groups_created: AtomicUsize,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffers created so far.
    pub fn buffers_created(&self) -> usize {
        self.buffers_created.load(Ordering::Relaxed)
    }

    /// Number of buffer writes issued so far.
    pub fn buffer_writes(&self) -> usize {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Every write issued so far, as `(offset, byte length)` pairs.
    pub fn write_log(&self) -> Vec<(u64, u64)> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of pipelines compiled so far.
    pub fn pipelines_created(&self) -> usize {
        self.pipelines_created.load(Ordering::Relaxed)
    }

    /// Number of bind groups created so far.
    pub fn bind_groups_created(&self) -> usize {
        self.bind_groups_created.load(Ordering::Relaxed)
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, RenderError> {
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {})",
            descriptor.label,
            descriptor.size
        );
        self.buffers_created.fetch_add(1, Ordering::Relaxed);
        Ok(GpuBuffer::Dummy)
    }

    fn write_buffer(
        &self,
        _buffer: &GpuBuffer,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        log::trace!(
            "DummyBackend: write_buffer offset={} len={}",
            offset,
            data.len()
        );
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((offset, data.len() as u64));
        Ok(())
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<GpuPipeline, RenderError> {
        log::trace!(
            "DummyBackend: creating pipeline {:?} (stride: {})",
            descriptor.label,
            descriptor.vertex_layout.stride
        );
        self.pipelines_created.fetch_add(1, Ordering::Relaxed);
        Ok(GpuPipeline::Dummy)
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor<'_>,
    ) -> Result<GpuBindGroup, RenderError> {
        log::trace!(
            "DummyBackend: creating bind group {:?} (group: {})",
            descriptor.label,
            descriptor.group
        );
        self.bind_groups_created.fetch_add(1, Ordering::Relaxed);
        Ok(GpuBindGroup::Dummy)
    }
}

/// A draw call recorded by a [`DummyEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    /// Vertex count the draw was issued with.
    pub vertex_count: u32,
}

/// Render encoder that records commands instead of submitting them.
#[derive(Debug, Default)]
pub struct DummyEncoder {
    draws: Vec<DrawRecord>,
    pipeline_binds: usize,
    bind_group_binds: usize,
    vertex_buffer_binds: usize,
}

impl DummyEncoder {
    /// Create a new recording encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls recorded so far.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Number of pipeline binds recorded so far.
    pub fn pipeline_binds(&self) -> usize {
        self.pipeline_binds
    }

    /// Number of bind-group binds recorded so far.
    pub fn bind_group_binds(&self) -> usize {
        self.bind_group_binds
    }

    /// Number of vertex-buffer binds recorded so far.
    pub fn vertex_buffer_binds(&self) -> usize {
        self.vertex_buffer_binds
    }
}

impl RenderEncoder for DummyEncoder {
    fn bind_pipeline(&mut self, _pipeline: &GpuPipeline) {
        self.pipeline_binds += 1;
    }

    fn bind_bind_group(&mut self, group: u32, _bind_group: &GpuBindGroup) {
        log::trace!("DummyEncoder: bind group {}", group);
        self.bind_group_binds += 1;
    }

    fn bind_vertex_buffer(&mut self, slot: u32, _buffer: &GpuBuffer) {
        log::trace!("DummyEncoder: bind vertex buffer at slot {}", slot);
        self.vertex_buffer_binds += 1;
    }

    fn draw(&mut self, vertex_count: u32) {
        log::trace!("DummyEncoder: draw {} vertices", vertex_count);
        self.draws.push(DrawRecord { vertex_count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BufferUsage;

    #[test]
    fn test_backend_counters() {
        let backend = DummyBackend::new();
        assert_eq!(backend.buffers_created(), 0);

        let buffer = backend
            .create_buffer(&BufferDescriptor::new(64, BufferUsage::VERTEX))
            .unwrap();
        backend.write_buffer(&buffer, 0, &[0u8; 64]).unwrap();
        backend.write_buffer(&buffer, 16, &[0u8; 32]).unwrap();

        assert_eq!(backend.buffers_created(), 1);
        assert_eq!(backend.buffer_writes(), 2);
        assert_eq!(backend.write_log(), vec![(0, 64), (16, 32)]);
    }

    #[test]
    fn test_encoder_records_draws() {
        let mut encoder = DummyEncoder::new();
        encoder.bind_pipeline(&GpuPipeline::Dummy);
        encoder.bind_vertex_buffer(0, &GpuBuffer::Dummy);
        encoder.draw(9);

        assert_eq!(encoder.draws(), &[DrawRecord { vertex_count: 9 }]);
        assert_eq!(encoder.pipeline_binds(), 1);
        assert_eq!(encoder.vertex_buffer_binds(), 1);
    }
}
