//! Mesh validation utilities.
//!
//! `MeshValidator` checks face mesh buffers: stride, index range, unit
//! normals, UVs inside the unit square and the bounding box.
//! `OutlineValidator` checks that an outline only connects known corners.

use glam::Vec3;

use crate::viewport::mesh::{Aabb, LineMeshData, MeshData, LINE_STRIDE, MESH_STRIDE};

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Vertex buffer length is a multiple of the stride.
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % MESH_STRIDE == 0
    }

    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| (self.mesh.normal(i).length() - 1.0).abs() <= epsilon)
    }

    /// Every UV lies in `[0, 1]²`.
    pub fn are_uvs_in_unit_square(&self) -> bool {
        (0..self.vertex_count()).all(|i| {
            let [u, v] = self.mesh.uv(i);
            (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)
        })
    }

    /// Triangles wound so that their normal agrees with the stored vertex normal.
    pub fn is_winding_consistent(&self) -> bool {
        self.mesh.indices.chunks_exact(3).all(|tri| {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (pa, pb, pc) = (self.mesh.position(a), self.mesh.position(b), self.mesh.position(c));
            let geometric = (pb - pa).cross(pc - pa);
            geometric.dot(self.mesh.normal(a)) >= 0.0
        })
    }

    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_mesh(self.mesh)
    }

    /// Bounding box extent (width, depth, height); zero for an empty mesh.
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().map_or([0.0; 3], |aabb| aabb.size().to_array())
    }

    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected.iter())
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of {}",
                self.mesh.vertices.len(),
                MESH_STRIDE
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
            return errors;
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        if !self.are_uvs_in_unit_square() {
            errors.push("Some UVs lie outside the unit square".to_string());
        }

        if !self.is_winding_consistent() {
            errors.push("Triangle winding disagrees with vertex normals".to_string());
        }

        errors
    }
}

/// Validator for outline line buffers.
pub struct OutlineValidator<'a> {
    lines: &'a LineMeshData,
}

impl<'a> OutlineValidator<'a> {
    pub fn new(lines: &'a LineMeshData) -> Self {
        Self { lines }
    }

    pub fn is_stride_valid(&self) -> bool {
        self.lines.vertices.len() % (LINE_STRIDE * 2) == 0
    }

    /// Every segment endpoint coincides with one of `corners`.
    pub fn endpoints_within(&self, corners: &[Vec3], epsilon: f32) -> bool {
        let known = |p: Vec3| corners.iter().any(|c| c.abs_diff_eq(p, epsilon));
        self.lines.segments().all(|(a, b)| known(a) && known(b))
    }

    /// No segment appears twice (in either direction).
    pub fn is_deduplicated(&self, epsilon: f32) -> bool {
        let segments: Vec<_> = self.lines.segments().collect();
        segments.iter().enumerate().all(|(i, (a, b))| {
            segments[i + 1..].iter().all(|(c, d)| {
                let same = a.abs_diff_eq(*c, epsilon) && b.abs_diff_eq(*d, epsilon);
                let flipped = a.abs_diff_eq(*d, epsilon) && b.abs_diff_eq(*c, epsilon);
                !(same || flipped)
            })
        })
    }

    pub fn has_degenerate_segment(&self, epsilon: f32) -> bool {
        self.lines.segments().any(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_triangle() -> MeshData {
        MeshData {
            vertices: vec![
                // pos(0,0,0) normal(0,0,1) uv(0,0)
                0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
                // pos(1,0,0) normal(0,0,1) uv(1,0)
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0,
                // pos(0,1,0) normal(0,0,1) uv(0,1)
                0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0,
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_counts() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.vertex_count(), 3);
        assert_eq!(v.triangle_count(), 1);
        assert!(v.is_stride_valid());
    }

    #[test]
    fn test_stride_invalid() {
        let bad = MeshData {
            vertices: vec![0.0; 10],
            indices: vec![],
        };
        assert!(!MeshValidator::new(&bad).is_stride_valid());
    }

    #[test]
    fn test_indices_out_of_range() {
        let bad = MeshData {
            vertices: vec![0.0; 8],
            indices: vec![0, 1, 2],
        };
        assert!(!MeshValidator::new(&bad).are_indices_in_range());
    }

    #[test]
    fn test_normals_not_normalized() {
        let bad = MeshData {
            vertices: vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.5, 0.5],
            indices: vec![0],
        };
        assert!(!MeshValidator::new(&bad).are_normals_normalized(0.01));
    }

    #[test]
    fn test_uv_out_of_square() {
        let mut mesh = simple_triangle();
        mesh.vertices[6] = 1.5;
        let errors = MeshValidator::new(&mesh).validate_all();
        assert!(errors.iter().any(|e| e.contains("unit square")));
    }

    #[test]
    fn test_reversed_winding_detected() {
        let mut mesh = simple_triangle();
        mesh.indices = vec![0, 2, 1];
        assert!(!MeshValidator::new(&mesh).is_winding_consistent());
    }

    #[test]
    fn test_dimensions() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert!(v.assert_dimensions_approx([1.0, 1.0, 0.0], 0.01));
        assert!(!v.assert_dimensions_approx([2.0, 1.0, 0.0], 0.01));
        assert_eq!(MeshValidator::new(&MeshData::default()).dimensions(), [0.0; 3]);
    }

    #[test]
    fn test_validate_all_ok() {
        let mesh = simple_triangle();
        let errors = MeshValidator::new(&mesh).validate_all();
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn test_validate_all_catches_bad_indices() {
        let bad = MeshData {
            vertices: vec![0.0; 8],
            indices: vec![0, 5, 2],
        };
        let errors = MeshValidator::new(&bad).validate_all();
        assert!(errors.iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_outline_checks() {
        let mut lines = LineMeshData::default();
        lines.push_segment(Vec3::ZERO, Vec3::X, [1.0; 4]);
        lines.push_segment(Vec3::X, Vec3::ZERO, [1.0; 4]);
        let v = OutlineValidator::new(&lines);
        assert!(v.is_stride_valid());
        assert!(v.endpoints_within(&[Vec3::ZERO, Vec3::X], 1e-6));
        assert!(!v.endpoints_within(&[Vec3::ZERO], 1e-6));
        assert!(!v.is_deduplicated(1e-6));
        assert!(!v.has_degenerate_segment(1e-6));
    }
}
