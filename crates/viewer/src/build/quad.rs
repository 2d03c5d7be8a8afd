//! Quad construction: the eight canonical corners of the solid and the
//! triangulated, UV-mapped quads built from them.

use glam::Vec3;
use shared::{SolidParams, UvRotation};

use crate::viewport::mesh::MeshData;

/// Corner order of a quad's two triangles: `[v1, v2, v3, v1, v3, v4]`.
pub const QUAD_SPLIT: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Ring corners as (x, y) signs, counter-clockwise seen from +Z
const RING: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

const UV_DEG_0: [[f32; 2]; 6] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const UV_DEG_90: [[f32; 2]; 6] = [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
const UV_DEG_180: [[f32; 2]; 6] = [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];
const UV_DEG_270: [[f32; 2]; 6] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

/// UV pairs for the six triangle corners of a quad
pub fn uv_table(rotation: UvRotation) -> &'static [[f32; 2]; 6] {
    match rotation {
        UvRotation::Deg0 => &UV_DEG_0,
        UvRotation::Deg90 => &UV_DEG_90,
        UvRotation::Deg180 => &UV_DEG_180,
        UvRotation::Deg270 => &UV_DEG_270,
    }
}

/// The eight corners of the solid.
///
/// Indices 0..4 are the bottom ring at `z = -height/2` with half-extent
/// `bottom_edge/2`, indices 4..8 the top ring at `z = +height/2` with
/// half-extent `top_edge/2`. Both rings run (-,-), (+,-), (+,+), (-,+).
pub fn canonical_vertices(params: &SolidParams) -> [Vec3; 8] {
    let half_height = params.height * 0.5;
    let bottom = params.bottom_edge * 0.5;
    let top = params.top_edge * 0.5;

    let mut vertices = [Vec3::ZERO; 8];
    for (i, (sx, sy)) in RING.iter().enumerate() {
        vertices[i] = Vec3::new(sx * bottom, sy * bottom, -half_height);
        vertices[i + 4] = Vec3::new(sx * top, sy * top, half_height);
    }
    vertices
}

/// Positions and texture coordinates of one triangulated quad
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    /// 6 vertices × xyz
    pub positions: [f32; 18],
    /// 6 vertices × uv
    pub uvs: [f32; 12],
}

impl QuadGeometry {
    pub fn vertex(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    pub fn uv(&self, index: usize) -> [f32; 2] {
        [self.uvs[index * 2], self.uvs[index * 2 + 1]]
    }

    /// Flat normal of the quad: the normalized sum of both triangle normals.
    /// Zero for a fully degenerate quad.
    pub fn face_normal(&self) -> Vec3 {
        let tri_normal = |a: usize| {
            let (v0, v1, v2) = (self.vertex(a), self.vertex(a + 1), self.vertex(a + 2));
            (v1 - v0).cross(v2 - v0).normalize_or_zero()
        };
        (tri_normal(0) + tri_normal(3)).normalize_or_zero()
    }

    /// Flat-shaded, non-indexed mesh with the face normal on every vertex
    pub fn to_mesh_data(&self) -> MeshData {
        let normal = self.face_normal();
        let mut mesh = MeshData::default();
        for i in 0..6 {
            let index = mesh.push_vertex(self.vertex(i), normal, self.uv(i));
            mesh.indices.push(index);
        }
        mesh
    }
}

/// Triangulate the quad `p1 p2 p3 p4` along the `p1-p3` diagonal and assign
/// UVs from the table for `uv_rotation`.
pub fn build_face_quad(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3, uv_rotation: UvRotation) -> QuadGeometry {
    let corners = [p1, p2, p3, p4];
    let table = uv_table(uv_rotation);

    let mut positions = [0.0; 18];
    let mut uvs = [0.0; 12];
    for (i, &corner) in QUAD_SPLIT.iter().enumerate() {
        positions[i * 3..i * 3 + 3].copy_from_slice(&corners[corner].to_array());
        uvs[i * 2..i * 2 + 2].copy_from_slice(&table[i]);
    }

    QuadGeometry { positions, uvs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> [Vec3; 4] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_default_uv_table() {
        let [a, b, c, d] = unit_square();
        let quad = build_face_quad(a, b, c, d, UvRotation::Deg0);
        assert_eq!(
            quad.uvs,
            [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_diagonal_split_positions() {
        let [a, b, c, d] = unit_square();
        let quad = build_face_quad(a, b, c, d, UvRotation::Deg0);
        let expected = [a, b, c, a, c, d];
        for (i, v) in expected.iter().enumerate() {
            assert_eq!(quad.vertex(i), *v);
        }
    }

    #[test]
    fn test_180_table() {
        let [a, b, c, d] = unit_square();
        let quad = build_face_quad(a, b, c, d, UvRotation::Deg180);
        assert_eq!(quad.uv(0), [1.0, 1.0]);
        assert_eq!(quad.uv(2), [0.0, 0.0]);
        assert_eq!(quad.uv(5), [1.0, 0.0]);
    }

    #[test]
    fn test_tables_match_rotated_default() {
        for &rotation in UvRotation::all() {
            let rotated: Vec<[f32; 2]> = UV_DEG_0.iter().map(|uv| rotation.rotate_uv(*uv)).collect();
            assert_eq!(rotated.as_slice(), uv_table(rotation).as_slice(), "{rotation:?}");
        }
    }

    #[test]
    fn test_unknown_rotation_uses_default_table() {
        let [a, b, c, d] = unit_square();
        let fallback = build_face_quad(a, b, c, d, UvRotation::from_degrees(45));
        let default = build_face_quad(a, b, c, d, UvRotation::Deg0);
        assert_eq!(fallback, default);
    }

    #[test]
    fn test_face_normal_counter_clockwise() {
        let [a, b, c, d] = unit_square();
        let quad = build_face_quad(a, b, c, d, UvRotation::Deg0);
        assert_eq!(quad.face_normal(), Vec3::Z);

        let mesh = quad.to_mesh_data();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.normal(4), Vec3::Z);
    }

    #[test]
    fn test_canonical_vertices() {
        let v = canonical_vertices(&SolidParams::new(0.6, 6.0, 4.0));
        assert_eq!(v[0], Vec3::new(-3.0, -3.0, -2.0));
        assert_eq!(v[2], Vec3::new(3.0, 3.0, -2.0));
        assert_eq!(v[5], Vec3::new(0.3, -0.3, 2.0));
        assert_eq!(v[7], Vec3::new(-0.3, 0.3, 2.0));
    }
}
