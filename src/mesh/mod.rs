//! Editable polygon meshes and the interface the render cache reads them
//! through.

pub mod simple;
pub mod source;

pub use simple::SimpleMesh;
pub use source::{MeshSource, TriangleCorner, VertexChannel};
