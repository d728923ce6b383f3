//! Render styles, their vertex records and vertex buffer layouts.

use bytemuck::{Pod, Zeroable};

/// How a mesh is shaded.
///
/// Each style has its own pipeline, vertex record and extraction rule. The
/// style decides which mesh channels the cache watches for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStyle {
    /// Flat palette colour per triangle, no lighting.
    FaceColour,
    /// Same extraction as [`Self::FaceColour`]; a separate style so it can
    /// bind its own material.
    TriangleColour,
    /// Normal visualised as colour.
    Normal,
    /// Palette colour per triangle with simple directional shading.
    NormalColour,
}

impl RenderStyle {
    /// All styles, in pipeline-table order.
    pub const ALL: [RenderStyle; 4] = [
        RenderStyle::FaceColour,
        RenderStyle::TriangleColour,
        RenderStyle::Normal,
        RenderStyle::NormalColour,
    ];

    /// Number of styles.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of this style, usable as a table index.
    pub fn index(self) -> usize {
        match self {
            RenderStyle::FaceColour => 0,
            RenderStyle::TriangleColour => 1,
            RenderStyle::Normal => 2,
            RenderStyle::NormalColour => 3,
        }
    }

    /// Size in bytes of one vertex record for this style.
    pub fn vertex_stride(self) -> u32 {
        match self {
            RenderStyle::FaceColour | RenderStyle::TriangleColour => {
                std::mem::size_of::<VertexPosColour>() as u32
            }
            RenderStyle::Normal => std::mem::size_of::<VertexPosNormal>() as u32,
            RenderStyle::NormalColour => std::mem::size_of::<VertexPosNormalColour>() as u32,
        }
    }

    /// Whether vertex records of this style carry the normal channel.
    pub fn needs_normals(self) -> bool {
        matches!(self, RenderStyle::Normal | RenderStyle::NormalColour)
    }

    /// Vertex buffer layout for this style's pipeline.
    pub fn layout(self) -> VertexLayout {
        match self {
            RenderStyle::FaceColour | RenderStyle::TriangleColour => {
                VertexLayout::new(self.vertex_stride())
                    .with_attribute(VertexAttributeFormat::Float3, 0, 0)
                    .with_attribute(VertexAttributeFormat::Unorm8x4, 12, 1)
            }
            RenderStyle::Normal => VertexLayout::new(self.vertex_stride())
                .with_attribute(VertexAttributeFormat::Float3, 0, 0)
                .with_attribute(VertexAttributeFormat::Float3, 12, 1),
            RenderStyle::NormalColour => VertexLayout::new(self.vertex_stride())
                .with_attribute(VertexAttributeFormat::Float3, 0, 0)
                .with_attribute(VertexAttributeFormat::Float3, 12, 1)
                .with_attribute(VertexAttributeFormat::Unorm8x4, 24, 2),
        }
    }
}

impl std::fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RenderStyle::FaceColour => "face-colour",
            RenderStyle::TriangleColour => "triangle-colour",
            RenderStyle::Normal => "normal",
            RenderStyle::NormalColour => "normal-colour",
        };
        f.write_str(name)
    }
}

/// Vertex record: position and normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPosNormal {
    /// Position.
    pub position: [f32; 3],
    /// Normal.
    pub normal: [f32; 3],
}

/// Vertex record: position and packed RGBA colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPosColour {
    /// Position.
    pub position: [f32; 3],
    /// Colour, packed as `r | g << 8 | b << 16 | a << 24`.
    pub colour: u32,
}

/// Vertex record: position, normal and packed RGBA colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPosNormalColour {
    /// Position.
    pub position: [f32; 3],
    /// Normal.
    pub normal: [f32; 3],
    /// Colour, packed as `r | g << 8 | b << 16 | a << 24`.
    pub colour: u32,
}

/// Format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Three 32-bit floats.
    Float3,
    /// Four unsigned-normalized bytes.
    Unorm8x4,
}

impl VertexAttributeFormat {
    /// Size of the attribute in bytes.
    pub fn size(self) -> u32 {
        match self {
            VertexAttributeFormat::Float3 => 12,
            VertexAttributeFormat::Unorm8x4 => 4,
        }
    }
}

/// One attribute within a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Attribute format.
    pub format: VertexAttributeFormat,
    /// Byte offset within the record.
    pub offset: u32,
    /// Shader location the attribute binds to.
    pub shader_location: u32,
}

/// Layout of a vertex buffer: record stride plus the attributes within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Byte stride between vertex records.
    pub stride: u32,
    /// Attributes in the record.
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Create an empty layout with the given stride.
    pub fn new(stride: u32) -> Self {
        Self {
            stride,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn with_attribute(
        mut self,
        format: VertexAttributeFormat,
        offset: u32,
        shader_location: u32,
    ) -> Self {
        debug_assert!(
            offset + format.size() <= self.stride,
            "attribute extends past vertex stride"
        );
        self.attributes.push(VertexAttribute {
            format,
            offset,
            shader_location,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_match_records() {
        assert_eq!(RenderStyle::FaceColour.vertex_stride(), 16);
        assert_eq!(RenderStyle::TriangleColour.vertex_stride(), 16);
        assert_eq!(RenderStyle::Normal.vertex_stride(), 24);
        assert_eq!(RenderStyle::NormalColour.vertex_stride(), 28);
    }

    #[test]
    fn test_layout_covers_stride() {
        for style in RenderStyle::ALL {
            let layout = style.layout();
            assert_eq!(layout.stride, style.vertex_stride());
            let covered: u32 = layout.attributes.iter().map(|a| a.format.size()).sum();
            assert_eq!(covered, layout.stride);
        }
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, style) in RenderStyle::ALL.iter().enumerate() {
            assert_eq!(style.index(), i);
        }
    }

    #[test]
    fn test_normal_channel_usage() {
        assert!(!RenderStyle::FaceColour.needs_normals());
        assert!(!RenderStyle::TriangleColour.needs_normals());
        assert!(RenderStyle::Normal.needs_normals());
        assert!(RenderStyle::NormalColour.needs_normals());
    }
}
