use glam::Vec3;

/// Floats per mesh vertex: position(3) + normal(3) + uv(2)
pub const MESH_STRIDE: usize = 8;

/// Floats per line vertex: position(3) + color(4)
pub const LINE_STRIDE: usize = 7;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, u, v]
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 8 floats per vertex: position(3) + normal(3) + uv(2)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.vertex_count() as u32;
        push_vert(&mut self.vertices, position, normal, uv);
        index
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * MESH_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        let base = index * MESH_STRIDE;
        Vec3::new(
            self.vertices[base + 3],
            self.vertices[base + 4],
            self.vertices[base + 5],
        )
    }

    pub fn uv(&self, index: usize) -> [f32; 2] {
        let base = index * MESH_STRIDE;
        [self.vertices[base + 6], self.vertices[base + 7]]
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Debug, Clone, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / LINE_STRIDE
    }

    pub fn segment_count(&self) -> usize {
        self.vertex_count() / 2
    }

    pub fn push_segment(&mut self, start: Vec3, end: Vec3, color: [f32; 4]) {
        push_line_vert(&mut self.vertices, start, color);
        push_line_vert(&mut self.vertices, end, color);
    }

    pub fn segment(&self, index: usize) -> (Vec3, Vec3) {
        let a = index * 2 * LINE_STRIDE;
        let b = a + LINE_STRIDE;
        (
            Vec3::new(self.vertices[a], self.vertices[a + 1], self.vertices[a + 2]),
            Vec3::new(self.vertices[b], self.vertices[b + 1], self.vertices[b + 2]),
        )
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        (0..self.segment_count()).map(move |i| self.segment(i))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn from_mesh(mesh: &MeshData) -> Option<Self> {
        Self::from_points((0..mesh.vertex_count()).map(|i| mesh.position(i)))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, p: Vec3, n: Vec3, uv: [f32; 2]) {
    v.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, uv[0], uv[1]]);
}

fn push_line_vert(v: &mut Vec<f32>, p: Vec3, c: [f32; 4]) {
    v.extend_from_slice(&[p.x, p.y, p.z, c[0], c[1], c[2], c[3]]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_vertex_layout() {
        let mut mesh = MeshData::default();
        let i0 = mesh.push_vertex(Vec3::new(1.0, 2.0, 3.0), Vec3::Z, [0.25, 0.75]);
        let i1 = mesh.push_vertex(Vec3::ZERO, Vec3::X, [1.0, 0.0]);
        assert_eq!((i0, i1), (0, 1));
        assert_eq!(mesh.vertices.len(), 2 * MESH_STRIDE);
        assert_eq!(mesh.position(0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.normal(1), Vec3::X);
        assert_eq!(mesh.uv(0), [0.25, 0.75]);
    }

    #[test]
    fn test_line_segments() {
        let mut lines = LineMeshData::default();
        lines.push_segment(Vec3::ZERO, Vec3::X, [1.0; 4]);
        lines.push_segment(Vec3::Y, Vec3::Z, [1.0; 4]);
        assert_eq!(lines.segment_count(), 2);
        assert_eq!(lines.segment(1), (Vec3::Y, Vec3::Z));
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -2.0, 1.0)]).unwrap();
        assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 1.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 0.0, 0.5));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }
}
