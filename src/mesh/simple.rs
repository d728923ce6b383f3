//! A straightforward indexed polygon mesh with cached channel hashes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use glam::Vec3;

use super::source::{MeshSource, TriangleCorner, VertexChannel};

#[derive(Debug, Default, Clone, Copy)]
struct ChannelHashes {
    position: Option<u64>,
    normal: Option<u64>,
}

/// Indexed polygon mesh backed by flat vertex arrays.
///
/// Positions and normals are per-vertex; polygons index into them. Channel
/// hashes are computed lazily and cached until the channel is edited.
#[derive(Debug)]
pub struct SimpleMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    polygons: Vec<Vec<u32>>,
    hashes: Mutex<ChannelHashes>,
}

impl Default for SimpleMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SimpleMesh {
    fn clone(&self) -> Self {
        let hashes = *self.hashes.lock().unwrap_or_else(|e| e.into_inner());
        Self {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            polygons: self.polygons.clone(),
            hashes: Mutex::new(hashes),
        }
    }
}

fn hash_vectors(vectors: &[Vec3]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for v in vectors {
        v.x.to_bits().hash(&mut hasher);
        v.y.to_bits().hash(&mut hasher);
        v.z.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

impl SimpleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            polygons: Vec::new(),
            hashes: Mutex::new(ChannelHashes::default()),
        }
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        let mut hashes = self.hashes.lock().unwrap_or_else(|e| e.into_inner());
        hashes.position = None;
        hashes.normal = None;
        index
    }

    /// Append a polygon from vertex indices. Polygons need at least three
    /// corners; anything smaller is ignored.
    pub fn push_polygon(&mut self, indices: &[u32]) {
        if indices.len() < 3 {
            log::warn!("Ignoring degenerate polygon with {} corners", indices.len());
            return;
        }
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < self.positions.len()),
            "polygon indexes out-of-range vertex"
        );
        self.polygons.push(indices.to_vec());
    }

    /// Move a vertex, invalidating the position hash.
    pub fn set_position(&mut self, index: u32, position: Vec3) {
        self.positions[index as usize] = position;
        self.hashes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .position = None;
    }

    /// Change a vertex normal, invalidating the normal hash.
    pub fn set_normal(&mut self, index: u32, normal: Vec3) {
        self.normals[index as usize] = normal;
        self.hashes.lock().unwrap_or_else(|e| e.into_inner()).normal = None;
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of polygons.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Corner indices of polygon `index`.
    pub fn polygon(&self, index: usize) -> &[u32] {
        &self.polygons[index]
    }

    fn corner(&self, index: u32) -> TriangleCorner {
        TriangleCorner {
            position: self.positions[index as usize],
            normal: self.normals[index as usize],
        }
    }
}

impl MeshSource for SimpleMesh {
    fn channel_hash(&self, channel: VertexChannel) -> u64 {
        let mut hashes = self.hashes.lock().unwrap_or_else(|e| e.into_inner());
        match channel {
            VertexChannel::Position => *hashes
                .position
                .get_or_insert_with(|| hash_vectors(&self.positions)),
            VertexChannel::Normal => *hashes
                .normal
                .get_or_insert_with(|| hash_vectors(&self.normals)),
        }
    }

    fn is_triangle_only(&self) -> bool {
        self.polygons.iter().all(|poly| poly.len() == 3)
    }

    fn clone_mesh(&self) -> Box<dyn MeshSource> {
        Box::new(self.clone())
    }

    fn triangulate(&mut self) {
        if self.is_triangle_only() {
            return;
        }
        let polygons = std::mem::take(&mut self.polygons);
        for poly in polygons {
            // Fan triangulation around the first corner.
            for i in 1..poly.len() - 1 {
                self.polygons.push(vec![poly[0], poly[i], poly[i + 1]]);
            }
        }
    }

    fn for_each_triangle(&self, visit: &mut dyn FnMut(&[TriangleCorner; 3])) {
        for poly in &self.polygons {
            if poly.len() != 3 {
                continue;
            }
            let triangle = [
                self.corner(poly[0]),
                self.corner(poly[1]),
                self.corner(poly[2]),
            ];
            visit(&triangle);
        }
    }
}

static_assertions::assert_impl_all!(SimpleMesh: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SimpleMesh {
        let mut mesh = SimpleMesh::new();
        let n = Vec3::Z;
        let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 0.0), n);
        let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), n);
        let c = mesh.push_vertex(Vec3::new(1.0, 1.0, 0.0), n);
        let d = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), n);
        mesh.push_polygon(&[a, b, c, d]);
        mesh
    }

    #[test]
    fn test_hash_stable_until_edit() {
        let mut mesh = quad();
        let h1 = mesh.channel_hash(VertexChannel::Position);
        let h2 = mesh.channel_hash(VertexChannel::Position);
        assert_eq!(h1, h2);

        mesh.set_position(0, Vec3::new(0.5, 0.0, 0.0));
        let h3 = mesh.channel_hash(VertexChannel::Position);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_channel_hashes_independent() {
        let mut mesh = quad();
        let pos = mesh.channel_hash(VertexChannel::Position);
        let norm = mesh.channel_hash(VertexChannel::Normal);

        mesh.set_normal(0, Vec3::X);
        assert_eq!(mesh.channel_hash(VertexChannel::Position), pos);
        assert_ne!(mesh.channel_hash(VertexChannel::Normal), norm);
    }

    #[test]
    fn test_fan_triangulation() {
        let mut mesh = quad();
        assert!(!mesh.is_triangle_only());
        mesh.triangulate();
        assert!(mesh.is_triangle_only());
        assert_eq!(mesh.polygon_count(), 2);
        assert_eq!(mesh.polygon(0), &[0, 1, 2]);
        assert_eq!(mesh.polygon(1), &[0, 2, 3]);
    }

    #[test]
    fn test_for_each_triangle_skips_quads() {
        let mesh = quad();
        let mut count = 0;
        mesh.for_each_triangle(&mut |_| count += 1);
        assert_eq!(count, 0);

        let mut triangulated = mesh.clone();
        triangulated.triangulate();
        triangulated.for_each_triangle(&mut |_| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_degenerate_polygon_ignored() {
        let mut mesh = SimpleMesh::new();
        mesh.push_vertex(Vec3::ZERO, Vec3::Z);
        mesh.push_vertex(Vec3::X, Vec3::Z);
        mesh.push_polygon(&[0, 1]);
        assert_eq!(mesh.polygon_count(), 0);
    }

    #[test]
    fn test_identical_meshes_same_hash() {
        let a = quad();
        let b = quad();
        assert_eq!(
            a.channel_hash(VertexChannel::Position),
            b.channel_hash(VertexChannel::Position)
        );
    }
}
