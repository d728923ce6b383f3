//! Vertex extraction: polygon mesh in, packed vertex records out.

use crate::mesh::{MeshSource, TriangleCorner};
use crate::vertex::{RenderStyle, VertexPosColour, VertexPosNormal, VertexPosNormalColour};

/// Pack an RGBA colour into a little-endian `u32`.
pub const fn pack_colour(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
}

/// Fixed 8-entry colour palette, cycled per triangle.
pub const PALETTE: [u32; 8] = [
    pack_colour(0xe6, 0x26, 0x1f, 0xff),
    pack_colour(0xeb, 0x75, 0x32, 0xff),
    pack_colour(0xf7, 0xd0, 0x38, 0xff),
    pack_colour(0xa2, 0xe0, 0x48, 0xff),
    pack_colour(0x49, 0xda, 0x9a, 0xff),
    pack_colour(0x34, 0xbb, 0xe6, 0xff),
    pack_colour(0x43, 0x55, 0xdb, 0xff),
    pack_colour(0xd2, 0x3b, 0xe7, 0xff),
];

/// Palette colour for triangle `index`.
pub fn palette_colour(index: u32) -> u32 {
    PALETTE[index as usize % PALETTE.len()]
}

/// Extract packed vertex records for `style` into `staging`.
///
/// Non-triangle meshes are cloned and the clone triangulated; the source is
/// never mutated. Returns the number of vertices written. `staging` is
/// cleared first, so the result always covers exactly the current mesh.
pub fn extract_vertices(mesh: &dyn MeshSource, style: RenderStyle, staging: &mut Vec<u8>) -> u32 {
    staging.clear();

    if mesh.is_triangle_only() {
        extract_triangles(mesh, style, staging)
    } else {
        log::trace!("Mesh has non-triangle polygons, triangulating a copy");
        let mut clone = mesh.clone_mesh();
        clone.triangulate();
        extract_triangles(clone.as_ref(), style, staging)
    }
}

fn extract_triangles(mesh: &dyn MeshSource, style: RenderStyle, staging: &mut Vec<u8>) -> u32 {
    let mut triangle_index = 0u32;

    mesh.for_each_triangle(&mut |triangle| {
        let colour = palette_colour(triangle_index);
        for corner in triangle {
            push_corner(style, corner, colour, staging);
        }
        triangle_index += 1;
    });

    debug_assert_eq!(staging.len() % style.vertex_stride() as usize, 0);
    (staging.len() / style.vertex_stride() as usize) as u32
}

fn push_corner(style: RenderStyle, corner: &TriangleCorner, colour: u32, staging: &mut Vec<u8>) {
    match style {
        RenderStyle::FaceColour | RenderStyle::TriangleColour => {
            let record = VertexPosColour {
                position: corner.position.to_array(),
                colour,
            };
            staging.extend_from_slice(bytemuck::bytes_of(&record));
        }
        RenderStyle::Normal => {
            let record = VertexPosNormal {
                position: corner.position.to_array(),
                normal: corner.normal.to_array(),
            };
            staging.extend_from_slice(bytemuck::bytes_of(&record));
        }
        RenderStyle::NormalColour => {
            let record = VertexPosNormalColour {
                position: corner.position.to_array(),
                normal: corner.normal.to_array(),
                colour,
            };
            staging.extend_from_slice(bytemuck::bytes_of(&record));
        }
    }
}
