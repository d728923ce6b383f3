//! GPU resource wrappers.

use std::sync::Arc;

use crate::backend::{GpuBackend, GpuBuffer};
use crate::error::RenderError;
use crate::types::BufferDescriptor;

/// A GPU buffer.
///
/// Holds the raw backend handle together with the descriptor it was created
/// from. Writes go through the owning backend.
pub struct Buffer {
    backend: Arc<dyn GpuBackend>,
    raw: GpuBuffer,
    descriptor: BufferDescriptor,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("label", &self.descriptor.label)
            .field("size", &self.descriptor.size)
            .field("usage", &self.descriptor.usage)
            .finish()
    }
}

impl Buffer {
    pub(crate) fn new(
        backend: Arc<dyn GpuBackend>,
        descriptor: BufferDescriptor,
    ) -> Result<Arc<Self>, RenderError> {
        let raw = backend.create_buffer(&descriptor)?;
        Ok(Arc::new(Self {
            backend,
            raw,
            descriptor,
        }))
    }

    /// Write `data` into the buffer at `offset` bytes.
    pub fn write(&self, offset: u64, data: &[u8]) -> Result<(), RenderError> {
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or_else(|| RenderError::InvalidParameter("buffer write overflows".to_string()))?;
        if end > self.descriptor.size {
            return Err(RenderError::InvalidParameter(format!(
                "write of {} bytes at offset {} exceeds buffer size {}",
                data.len(),
                offset,
                self.descriptor.size
            )));
        }
        self.backend.write_buffer(&self.raw, offset, data)
    }

    /// Raw backend handle.
    pub fn raw(&self) -> &GpuBuffer {
        &self.raw
    }

    /// Buffer size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    /// Debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

static_assertions::assert_impl_all!(Buffer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;
    use crate::types::BufferUsage;

    #[test]
    fn test_buffer_write_bounds() {
        let backend = Arc::new(DummyBackend::new());
        let buffer = Buffer::new(
            backend.clone(),
            BufferDescriptor::new(16, BufferUsage::VERTEX | BufferUsage::COPY_DST),
        )
        .unwrap();

        buffer.write(0, &[0u8; 16]).unwrap();
        buffer.write(8, &[0u8; 8]).unwrap();
        assert!(buffer.write(8, &[0u8; 9]).is_err());
        assert_eq!(backend.buffer_writes(), 2);
    }

    #[test]
    fn test_buffer_metadata() {
        let backend = Arc::new(DummyBackend::new());
        let buffer = Buffer::new(
            backend,
            BufferDescriptor::new(64, BufferUsage::UNIFORM).with_label("view uniforms"),
        )
        .unwrap();
        assert_eq!(buffer.size(), 64);
        assert_eq!(buffer.label(), Some("view uniforms"));
    }
}
