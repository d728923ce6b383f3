//! Buffer and render-target types shared by all backends.

use bitflags::bitflags;

bitflags! {
    /// Usage flags for buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be used as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be used as an index buffer.
        const INDEX = 1 << 1;
        /// Buffer can be used as a uniform buffer.
        const UNIFORM = 1 << 2;
        /// Buffer can be copied from.
        const COPY_SRC = 1 << 3;
        /// Buffer can be copied to.
        const COPY_DST = 1 << 4;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Descriptor for creating a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BufferDescriptor {
    /// Debug label for the buffer.
    pub label: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Usage flags.
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// Create a new buffer descriptor.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            label: None,
            size,
            usage,
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Texture formats a pipeline can render into.
///
/// Only the formats used as colour/depth destinations by the mesh materials
/// are listed; this is a render-target description, not a texture system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA, unsigned normalized.
    Rgba8Unorm,
    /// 8-bit RGBA, unsigned normalized, sRGB encoded.
    Rgba8UnormSrgb,
    /// 8-bit BGRA, unsigned normalized (common swapchain format).
    Bgra8Unorm,
    /// 8-bit BGRA, unsigned normalized, sRGB encoded.
    Bgra8UnormSrgb,
    /// 32-bit float depth.
    Depth32Float,
    /// 24-bit depth.
    Depth24Plus,
}

impl TextureFormat {
    /// Check if this is a depth format.
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::Depth32Float | Self::Depth24Plus)
    }
}

/// Colour and depth destination formats the style materials render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetFormats {
    /// Colour render-target format.
    pub colour: TextureFormat,
    /// Optional depth render-target format. `None` disables depth testing.
    pub depth: Option<TextureFormat>,
}

impl TargetFormats {
    /// Create target formats without a depth buffer.
    pub fn new(colour: TextureFormat) -> Self {
        Self {
            colour,
            depth: None,
        }
    }

    /// Set the depth format.
    pub fn with_depth(mut self, depth: TextureFormat) -> Self {
        debug_assert!(depth.is_depth(), "depth target must use a depth format");
        self.depth = Some(depth);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_descriptor() {
        let desc = BufferDescriptor::new(1024, BufferUsage::VERTEX | BufferUsage::COPY_DST)
            .with_label("test");
        assert_eq!(desc.size, 1024);
        assert!(desc.usage.contains(BufferUsage::VERTEX));
        assert_eq!(desc.label.as_deref(), Some("test"));
    }

    #[test]
    fn test_depth_formats() {
        assert!(TextureFormat::Depth32Float.is_depth());
        assert!(!TextureFormat::Rgba8Unorm.is_depth());
    }

    #[test]
    fn test_target_formats() {
        let formats =
            TargetFormats::new(TextureFormat::Bgra8Unorm).with_depth(TextureFormat::Depth32Float);
        assert_eq!(formats.colour, TextureFormat::Bgra8Unorm);
        assert_eq!(formats.depth, Some(TextureFormat::Depth32Float));
    }
}
