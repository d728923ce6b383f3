//! wgpu-based GPU backend.

use std::sync::Arc;

use crate::error::RenderError;
use crate::types::{BufferDescriptor, BufferUsage, TextureFormat};
use crate::vertex::{VertexAttributeFormat, VertexLayout};

use super::{
    BindGroupDescriptor, GpuBackend, GpuBindGroup, GpuBuffer, GpuPipeline, PipelineDescriptor,
    RenderEncoder,
};

/// GPU backend implemented on top of wgpu.
#[derive(Debug)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuBackend {
    /// Create a backend on the first available adapter.
    pub fn new() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .ok_or_else(|| {
            RenderError::InitializationFailed("no compatible wgpu adapter found".to_string())
        })?;

        log::info!("wgpu adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("polymesh-render device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::InitializationFailed(e.to_string()))?;

        Ok(Self { device, queue })
    }

    /// Wrap an existing device and queue.
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

fn map_buffer_usage(usage: BufferUsage) -> wgpu::BufferUsages {
    let mut result = wgpu::BufferUsages::empty();
    if usage.contains(BufferUsage::VERTEX) {
        result |= wgpu::BufferUsages::VERTEX;
    }
    if usage.contains(BufferUsage::INDEX) {
        result |= wgpu::BufferUsages::INDEX;
    }
    if usage.contains(BufferUsage::UNIFORM) {
        result |= wgpu::BufferUsages::UNIFORM;
    }
    if usage.contains(BufferUsage::COPY_SRC) {
        result |= wgpu::BufferUsages::COPY_SRC;
    }
    if usage.contains(BufferUsage::COPY_DST) {
        result |= wgpu::BufferUsages::COPY_DST;
    }
    result
}

fn map_texture_format(format: TextureFormat) -> wgpu::TextureFormat {
    match format {
        TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
        TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
        TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
        TextureFormat::Depth24Plus => wgpu::TextureFormat::Depth24Plus,
    }
}

fn map_vertex_format(format: VertexAttributeFormat) -> wgpu::VertexFormat {
    match format {
        VertexAttributeFormat::Float3 => wgpu::VertexFormat::Float32x3,
        VertexAttributeFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
    }
}

fn map_vertex_layout(layout: &VertexLayout) -> (Vec<wgpu::VertexAttribute>, u64) {
    let attributes = layout
        .attributes
        .iter()
        .map(|attr| wgpu::VertexAttribute {
            format: map_vertex_format(attr.format),
            offset: attr.offset as u64,
            shader_location: attr.shader_location,
        })
        .collect();
    (attributes, layout.stride as u64)
}

impl GpuBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu Backend"
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, RenderError> {
        log::trace!(
            "WgpuBackend: creating buffer {:?} (size: {})",
            descriptor.label,
            descriptor.size
        );

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: descriptor.label.as_deref(),
            size: descriptor.size,
            usage: map_buffer_usage(descriptor.usage),
            mapped_at_creation: false,
        });

        Ok(GpuBuffer::Wgpu(Arc::new(buffer)))
    }

    fn write_buffer(
        &self,
        buffer: &GpuBuffer,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        match buffer {
            GpuBuffer::Wgpu(raw) => {
                self.queue.write_buffer(raw, offset, data);
                Ok(())
            }
            GpuBuffer::Dummy => Err(RenderError::InvalidParameter(
                "buffer was not created by the wgpu backend".to_string(),
            )),
        }
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<GpuPipeline, RenderError> {
        log::trace!("WgpuBackend: creating pipeline {:?}", descriptor.label);

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: descriptor.label.as_deref(),
                source: wgpu::ShaderSource::Wgsl(descriptor.shader_source.as_str().into()),
            });

        let (attributes, stride) = map_vertex_layout(&descriptor.vertex_layout);
        let vertex_buffer_layout = wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        };

        let depth_stencil = descriptor.depth_format.map(|format| wgpu::DepthStencilState {
            format: map_texture_format(format),
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: descriptor.label.as_deref(),
                layout: None,
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: &descriptor.vertex_entry,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[vertex_buffer_layout],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: &descriptor.fragment_entry,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: map_texture_format(descriptor.colour_format),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(GpuPipeline::Wgpu(Arc::new(pipeline)))
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor<'_>,
    ) -> Result<GpuBindGroup, RenderError> {
        let pipeline = match descriptor.pipeline {
            GpuPipeline::Wgpu(raw) => raw,
            GpuPipeline::Dummy => {
                return Err(RenderError::InvalidParameter(
                    "pipeline was not created by the wgpu backend".to_string(),
                ))
            }
        };

        let mut entries = Vec::with_capacity(descriptor.entries.len());
        for entry in descriptor.entries {
            let buffer = match entry.buffer {
                GpuBuffer::Wgpu(raw) => raw,
                GpuBuffer::Dummy => {
                    return Err(RenderError::InvalidParameter(
                        "buffer was not created by the wgpu backend".to_string(),
                    ))
                }
            };
            entries.push(wgpu::BindGroupEntry {
                binding: entry.binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: entry.offset,
                    size: wgpu::BufferSize::new(entry.size),
                }),
            });
        }

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: descriptor.label,
            layout: &pipeline.get_bind_group_layout(descriptor.group),
            entries: &entries,
        });

        Ok(GpuBindGroup::Wgpu(Arc::new(bind_group)))
    }
}

/// Render encoder wrapping a wgpu render pass.
pub struct WgpuEncoder {
    pass: wgpu::RenderPass<'static>,
}

impl WgpuEncoder {
    /// Wrap a render pass. The pass must have been detached from its encoder
    /// lifetime with [`wgpu::RenderPass::forget_lifetime`].
    pub fn new(pass: wgpu::RenderPass<'static>) -> Self {
        Self { pass }
    }
}

impl RenderEncoder for WgpuEncoder {
    fn bind_pipeline(&mut self, pipeline: &GpuPipeline) {
        if let GpuPipeline::Wgpu(raw) = pipeline {
            self.pass.set_pipeline(raw);
        }
    }

    fn bind_bind_group(&mut self, group: u32, bind_group: &GpuBindGroup) {
        if let GpuBindGroup::Wgpu(raw) = bind_group {
            self.pass.set_bind_group(group, raw, &[]);
        }
    }

    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &GpuBuffer) {
        if let GpuBuffer::Wgpu(raw) = buffer {
            self.pass.set_vertex_buffer(slot, raw.slice(..));
        }
    }

    fn draw(&mut self, vertex_count: u32) {
        self.pass.draw(0..vertex_count, 0..1);
    }
}
