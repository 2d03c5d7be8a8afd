//! Face assembly: six textured quads plus the merged, untextured geometry
//! the outline overlay is derived from.

use glam::Vec3;
use shared::{FaceSlot, SolidParams, UvRotation, FACE_COUNT};

use super::quad::{build_face_quad, canonical_vertices, QuadGeometry, QUAD_SPLIT};
use crate::viewport::edge::{extract_outline_edges, outline_lines, DEFAULT_THRESHOLD_DEGREES};
use crate::viewport::mesh::{LineMeshData, MeshData};

/// Corner indices of each face in slot order, wound so the normal points outward.
/// The bottom ring is traversed backwards so its normal faces -Z.
pub const FACE_CORNERS: [[usize; 4]; FACE_COUNT] = [
    [0, 3, 2, 1], // bottom
    [4, 5, 6, 7], // top
    [0, 1, 5, 4], // front (lower)
    [1, 2, 6, 5], // right
    [2, 3, 7, 6], // back (upper)
    [3, 0, 4, 7], // left
];

/// One face of the solid with its texture slot
#[derive(Debug, Clone)]
pub struct FaceQuad {
    pub slot: FaceSlot,
    /// Indices into the canonical vertices
    pub corners: [usize; 4],
    pub uv_rotation: UvRotation,
    pub geometry: QuadGeometry,
}

impl FaceQuad {
    pub fn texture_slot(&self) -> usize {
        self.slot.index()
    }

    pub fn mesh(&self) -> MeshData {
        self.geometry.to_mesh_data()
    }
}

/// Indexed geometry of the whole solid, without texture coordinates
#[derive(Debug, Clone)]
pub struct MergedGeometry {
    pub positions: Vec<Vec3>,
    /// Smooth per-vertex normals (area-weighted average of adjacent triangles)
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MergedGeometry {
    fn from_corners(vertices: &[Vec3; 8]) -> Self {
        let indices: Vec<u32> = FACE_CORNERS
            .iter()
            .flat_map(|corners| QUAD_SPLIT.iter().map(move |&k| corners[k] as u32))
            .collect();
        let positions = vertices.to_vec();
        let normals = vertex_normals(&positions, &indices);
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Outline segments: crease and boundary edges of the merged geometry
    pub fn outline(&self, threshold_degrees: f32, color: [f32; 4]) -> LineMeshData {
        let edges = extract_outline_edges(&self.positions, &self.indices, threshold_degrees);
        outline_lines(&edges, color)
    }
}

/// The assembled solid, built once at startup
#[derive(Debug, Clone)]
pub struct AssembledSolid {
    pub params: SolidParams,
    pub vertices: [Vec3; 8],
    pub faces: [FaceQuad; FACE_COUNT],
    pub merged: MergedGeometry,
    /// Edge highlight, drawn as a child of the solid
    pub outline: LineMeshData,
}

impl AssembledSolid {
    pub fn face(&self, slot: FaceSlot) -> &FaceQuad {
        &self.faces[slot.index()]
    }
}

/// Build the six faces and the outline of a solid
pub fn assemble_solid(
    params: &SolidParams,
    uv_rotations: &[UvRotation; FACE_COUNT],
    outline_color: [f32; 4],
) -> AssembledSolid {
    if !params.is_tapered() {
        tracing::debug!(
            "Top edge {} is not smaller than bottom edge {}; the solid will not taper",
            params.top_edge,
            params.bottom_edge
        );
    }

    let vertices = canonical_vertices(params);

    let faces = std::array::from_fn(|i| {
        let corners = FACE_CORNERS[i];
        let uv_rotation = uv_rotations[i];
        let [a, b, c, d] = corners.map(|k| vertices[k]);
        FaceQuad {
            slot: FaceSlot::ALL[i],
            corners,
            uv_rotation,
            geometry: build_face_quad(a, b, c, d, uv_rotation),
        }
    });

    let merged = MergedGeometry::from_corners(&vertices);
    let outline = merged.outline(DEFAULT_THRESHOLD_DEGREES, outline_color);

    tracing::info!(
        "Assembled solid: {} faces, {} triangles, {} outline edges",
        FACE_COUNT,
        merged.triangle_count(),
        outline.segment_count()
    );

    AssembledSolid {
        params: *params,
        vertices,
        faces,
        merged,
        outline,
    }
}

fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> AssembledSolid {
        assemble_solid(&SolidParams::default(), &[UvRotation::Deg0; FACE_COUNT], [1.0; 4])
    }

    #[test]
    fn test_face_slots_in_order() {
        let solid = demo();
        for (i, face) in solid.faces.iter().enumerate() {
            assert_eq!(face.texture_slot(), i);
        }
        assert_eq!(solid.face(FaceSlot::Top).corners, [4, 5, 6, 7]);
    }

    #[test]
    fn test_faces_point_outward() {
        let solid = demo();
        for face in &solid.faces {
            let center = face.corners.iter().map(|&k| solid.vertices[k]).sum::<Vec3>() / 4.0;
            let normal = face.geometry.face_normal();
            assert!(normal.dot(center) > 0.0, "{:?} faces inward", face.slot);
        }
        let bottom = solid.face(FaceSlot::Bottom).geometry.face_normal();
        let top = solid.face(FaceSlot::Top).geometry.face_normal();
        assert!(bottom.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(top.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_merged_indices_reproduce_reference_triangles() {
        let solid = demo();
        assert_eq!(
            solid.merged.indices,
            vec![
                0, 3, 2, 0, 2, 1, // bottom
                4, 5, 6, 4, 6, 7, // top
                0, 1, 5, 0, 5, 4, // front
                1, 2, 6, 1, 6, 5, // right
                2, 3, 7, 2, 7, 6, // back
                3, 0, 4, 3, 4, 7, // left
            ]
        );
    }

    #[test]
    fn test_outline_has_twelve_edges() {
        let solid = demo();
        assert_eq!(solid.outline.segment_count(), 12);
    }

    #[test]
    fn test_per_face_uv_rotation_applied() {
        let mut rotations = [UvRotation::Deg0; FACE_COUNT];
        rotations[FaceSlot::Right.index()] = UvRotation::Deg90;
        let solid = assemble_solid(&SolidParams::default(), &rotations, [1.0; 4]);
        assert_eq!(solid.face(FaceSlot::Right).uv_rotation, UvRotation::Deg90);
        assert_eq!(solid.face(FaceSlot::Right).geometry.uv(0), [1.0, 0.0]);
        assert_eq!(solid.face(FaceSlot::Left).geometry.uv(0), [0.0, 0.0]);
    }

    #[test]
    fn test_smooth_normals_unit_length() {
        let solid = demo();
        for n in &solid.merged.normals {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }
}
