//! The interface an editable mesh exposes to the render cache.

use glam::Vec3;

/// Vertex data channels a mesh carries.
///
/// Each channel has an independent content hash so the cache can tell which
/// kinds of edits happened since the last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexChannel {
    /// Vertex positions.
    Position,
    /// Vertex normals.
    Normal,
}

/// One corner of a triangle as visited by [`MeshSource::for_each_triangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleCorner {
    /// Position of the corner.
    pub position: Vec3,
    /// Normal at the corner.
    pub normal: Vec3,
}

/// An editable polygon mesh the render cache can read.
///
/// Implementations own their topology and are free to carry polygons with
/// more than three sides. The cache never mutates a source mesh: when it
/// needs triangles and the mesh has larger polygons, it clones the mesh
/// first and triangulates the clone.
pub trait MeshSource {
    /// Content hash of a vertex channel.
    ///
    /// The hash must change whenever the channel's data changes and must be
    /// stable across calls while the data is unchanged. Implementations are
    /// expected to cache the hash and invalidate it on edit.
    fn channel_hash(&self, channel: VertexChannel) -> u64;

    /// Whether every polygon in the mesh is a triangle.
    fn is_triangle_only(&self) -> bool;

    /// Clone the mesh into a new boxed source.
    fn clone_mesh(&self) -> Box<dyn MeshSource>;

    /// Split every polygon into triangles in place.
    fn triangulate(&mut self);

    /// Visit each triangle of the mesh in order.
    ///
    /// Polygons that are not triangles are skipped; callers that need full
    /// coverage triangulate first.
    fn for_each_triangle(&self, visit: &mut dyn FnMut(&[TriangleCorner; 3]));
}
