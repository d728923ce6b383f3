//! Shared helpers for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use glam::Vec3;
use polymesh_render::backend::{
    BindGroupDescriptor, GpuBindGroup, GpuBuffer, GpuPipeline, PipelineDescriptor,
};
use polymesh_render::{
    BufferDescriptor, DummyBackend, GpuBackend, GraphicsInstance, RenderError, RenderManager,
    SimpleMesh, TargetFormats, TextureFormat,
};

/// Build a render manager on a dummy backend, returning the backend so tests
/// can inspect its operation counters.
pub fn test_manager() -> (Arc<DummyBackend>, RenderManager) {
    let _ = env_logger::builder().is_test(true).try_init();

    let backend = Arc::new(DummyBackend::new());
    let instance = GraphicsInstance::with_backend(backend.clone());
    let device = instance.create_device().expect("device creation");
    let manager = RenderManager::new(
        device,
        TargetFormats::new(TextureFormat::Bgra8Unorm).with_depth(TextureFormat::Depth32Float),
    )
    .expect("manager creation");
    (backend, manager)
}

/// Backend whose buffer writes can be made to fail on demand, for testing
/// how the cache behaves when an upload goes wrong.
#[derive(Debug, Default)]
pub struct FlakyWriteBackend {
    inner: DummyBackend,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl FlakyWriteBackend {
    /// Make every subsequent `write_buffer` call fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of writes attempted, successful or not.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::Relaxed)
    }
}

impl GpuBackend for FlakyWriteBackend {
    fn name(&self) -> &'static str {
        "Flaky Write Backend"
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, RenderError> {
        self.inner.create_buffer(descriptor)
    }

    fn write_buffer(
        &self,
        buffer: &GpuBuffer,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        self.write_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(RenderError::ResourceCreationFailed(
                "injected write failure".to_string(),
            ));
        }
        self.inner.write_buffer(buffer, offset, data)
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<GpuPipeline, RenderError> {
        self.inner.create_pipeline(descriptor)
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor<'_>,
    ) -> Result<GpuBindGroup, RenderError> {
        self.inner.create_bind_group(descriptor)
    }
}

/// Like [`test_manager`], but on a backend with failure injection.
pub fn flaky_manager() -> (Arc<FlakyWriteBackend>, RenderManager) {
    let _ = env_logger::builder().is_test(true).try_init();

    let backend = Arc::new(FlakyWriteBackend::default());
    let instance = GraphicsInstance::with_backend(backend.clone());
    let device = instance.create_device().expect("device creation");
    let manager = RenderManager::new(device, TargetFormats::new(TextureFormat::Bgra8Unorm))
        .expect("manager creation");
    (backend, manager)
}

/// A mesh of `count` disjoint triangles with distinct positions.
pub fn tri_mesh(count: u32) -> SimpleMesh {
    let mut mesh = SimpleMesh::new();
    for i in 0..count {
        let x = i as f32 * 2.0;
        let a = mesh.push_vertex(Vec3::new(x, 0.0, 0.0), Vec3::Z);
        let b = mesh.push_vertex(Vec3::new(x + 1.0, 0.0, 0.0), Vec3::Z);
        let c = mesh.push_vertex(Vec3::new(x, 1.0, 0.0), Vec3::Z);
        mesh.push_polygon(&[a, b, c]);
    }
    mesh
}

/// A single-quad mesh (four corners, one polygon).
pub fn quad_mesh() -> SimpleMesh {
    let mut mesh = SimpleMesh::new();
    let n = Vec3::Z;
    let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 0.0), n);
    let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), n);
    let c = mesh.push_vertex(Vec3::new(1.0, 1.0, 0.0), n);
    let d = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), n);
    mesh.push_polygon(&[a, b, c, d]);
    mesh
}
