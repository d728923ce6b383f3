//! Graphics instance management.

use std::sync::{Arc, RwLock, Weak};

use crate::backend::{create_backend, GpuBackend};
use crate::device::GraphicsDevice;
use crate::error::RenderError;

/// Graphics instance that owns the backend and created devices.
///
/// This is the entry point for the rendering layer. Create an instance,
/// then create one or more devices from it.
pub struct GraphicsInstance {
    /// Self-reference for creating devices that point back at the instance.
    self_ref: RwLock<Weak<GraphicsInstance>>,
    /// Devices created by this instance.
    devices: RwLock<Vec<Arc<GraphicsDevice>>>,
    /// The active GPU backend.
    backend: Arc<dyn GpuBackend>,
}

impl std::fmt::Debug for GraphicsInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsInstance")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

impl GraphicsInstance {
    /// Create a new graphics instance with the best available backend.
    pub fn new() -> Result<Arc<Self>, RenderError> {
        let backend = create_backend()?;
        Ok(Self::with_backend(backend))
    }

    /// Create a graphics instance with an explicit backend.
    pub fn with_backend(backend: Arc<dyn GpuBackend>) -> Arc<Self> {
        log::info!("Creating graphics instance ({})", backend.name());
        let instance = Arc::new(Self {
            self_ref: RwLock::new(Weak::new()),
            devices: RwLock::new(Vec::new()),
            backend,
        });
        *instance.self_ref.write().unwrap_or_else(|e| e.into_inner()) =
            Arc::downgrade(&instance);
        instance
    }

    /// Create a new graphics device.
    pub fn create_device(&self) -> Result<Arc<GraphicsDevice>, RenderError> {
        let instance = self
            .self_ref
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .upgrade()
            .ok_or_else(|| {
                RenderError::InitializationFailed("graphics instance dropped".to_string())
            })?;

        let device = GraphicsDevice::new(instance, self.backend.clone());

        self.devices
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(device.clone());

        log::info!("Created graphics device: {}", device.name());
        Ok(device)
    }

    /// Number of devices created by this instance.
    pub fn device_count(&self) -> usize {
        self.devices.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

static_assertions::assert_impl_all!(GraphicsInstance: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;

    #[test]
    fn test_instance_creation() {
        let instance = GraphicsInstance::with_backend(Arc::new(DummyBackend::new()));
        assert_eq!(instance.device_count(), 0);
    }

    #[test]
    fn test_device_creation() {
        let instance = GraphicsInstance::with_backend(Arc::new(DummyBackend::new()));
        let device = instance.create_device().unwrap();
        assert_eq!(instance.device_count(), 1);
        assert_eq!(device.name(), "Dummy Backend Device");
        assert!(Arc::ptr_eq(device.instance(), &instance));
    }
}
