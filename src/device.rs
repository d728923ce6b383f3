//! Graphics device: resource creation and tracking.

use std::sync::{Arc, RwLock, Weak};

use crate::backend::{BindGroupDescriptor, GpuBackend, GpuBindGroup, GpuPipeline, PipelineDescriptor};
use crate::error::RenderError;
use crate::instance::GraphicsInstance;
use crate::resources::Buffer;
use crate::types::BufferDescriptor;

/// Device capabilities and limits.
#[derive(Debug, Clone, Copy)]
pub struct DeviceCapabilities {
    /// Maximum size of a single buffer in bytes.
    pub max_buffer_size: u64,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_buffer_size: 256 * 1024 * 1024,
        }
    }
}

/// Graphics device that creates buffers, pipelines and bind groups.
///
/// Created buffers are tracked with weak references so the device can report
/// how many are still alive without keeping them alive itself.
pub struct GraphicsDevice {
    instance: Arc<GraphicsInstance>,
    backend: Arc<dyn GpuBackend>,
    name: String,
    capabilities: DeviceCapabilities,
    buffers: RwLock<Vec<Weak<Buffer>>>,
}

impl std::fmt::Debug for GraphicsDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsDevice")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl GraphicsDevice {
    pub(crate) fn new(instance: Arc<GraphicsInstance>, backend: Arc<dyn GpuBackend>) -> Arc<Self> {
        let name = format!("{} Device", backend.name());
        Arc::new(Self {
            instance,
            backend,
            name,
            capabilities: DeviceCapabilities::default(),
            buffers: RwLock::new(Vec::new()),
        })
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instance this device was created from.
    pub fn instance(&self) -> &Arc<GraphicsInstance> {
        &self.instance
    }

    /// Device capabilities.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Create a buffer.
    pub fn create_buffer(&self, descriptor: BufferDescriptor) -> Result<Arc<Buffer>, RenderError> {
        if descriptor.size == 0 {
            return Err(RenderError::InvalidParameter(
                "buffer size cannot be zero".to_string(),
            ));
        }
        if descriptor.size > self.capabilities.max_buffer_size {
            return Err(RenderError::InvalidParameter(format!(
                "buffer size {} exceeds device limit {}",
                descriptor.size, self.capabilities.max_buffer_size
            )));
        }

        log::trace!(
            "Creating buffer {:?} (size: {}, usage: {:?})",
            descriptor.label,
            descriptor.size,
            descriptor.usage
        );

        let buffer = Buffer::new(self.backend.clone(), descriptor)?;

        self.buffers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::downgrade(&buffer));

        Ok(buffer)
    }

    /// Compile a graphics pipeline.
    pub fn create_pipeline(
        &self,
        descriptor: &PipelineDescriptor,
    ) -> Result<GpuPipeline, RenderError> {
        log::trace!("Creating pipeline {:?}", descriptor.label);
        self.backend.create_pipeline(descriptor)
    }

    /// Create a bind group against a pipeline's group layout.
    pub fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor<'_>,
    ) -> Result<GpuBindGroup, RenderError> {
        self.backend.create_bind_group(descriptor)
    }

    /// Number of buffers still alive.
    pub fn buffer_count(&self) -> usize {
        self.buffers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Drop tracking entries for buffers that are no longer alive.
    pub fn cleanup_dead_resources(&self) {
        self.buffers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|weak| weak.strong_count() > 0);
    }
}

static_assertions::assert_impl_all!(GraphicsDevice: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;
    use crate::types::BufferUsage;

    fn test_device() -> Arc<GraphicsDevice> {
        let instance = GraphicsInstance::with_backend(Arc::new(DummyBackend::new()));
        instance.create_device().unwrap()
    }

    #[test]
    fn test_buffer_creation_and_tracking() {
        let device = test_device();
        let buffer = device
            .create_buffer(BufferDescriptor::new(256, BufferUsage::VERTEX))
            .unwrap();
        assert_eq!(buffer.size(), 256);
        assert_eq!(device.buffer_count(), 1);

        drop(buffer);
        assert_eq!(device.buffer_count(), 0);

        device.cleanup_dead_resources();
    }

    #[test]
    fn test_zero_size_buffer_rejected() {
        let device = test_device();
        let result = device.create_buffer(BufferDescriptor::new(0, BufferUsage::VERTEX));
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_buffer_rejected() {
        let device = test_device();
        let size = device.capabilities().max_buffer_size + 1;
        let result = device.create_buffer(BufferDescriptor::new(size, BufferUsage::VERTEX));
        assert!(result.is_err());
    }
}
