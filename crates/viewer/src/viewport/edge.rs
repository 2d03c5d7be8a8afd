//! Edge extraction for outline overlays
//!
//! Collects the unique edges of an indexed triangle mesh and keeps the ones
//! that lie on a crease or on an open boundary. Edges between coplanar
//! triangles (quad diagonals) are dropped.

use std::collections::HashMap;

use glam::Vec3;

use super::mesh::LineMeshData;

/// Crease angle above which an edge is drawn
pub const DEFAULT_THRESHOLD_DEGREES: f32 = 1.0;

/// Represents an edge in a mesh
#[derive(Debug, Clone)]
pub struct MeshEdge {
    pub start: Vec3,
    pub end: Vec3,
    pub normal1: Vec3,
    pub normal2: Option<Vec3>,
}

impl MeshEdge {
    /// Angle between the normals of the two adjacent triangles (in radians)
    pub fn dihedral_angle(&self) -> f32 {
        if let Some(n2) = self.normal2 {
            let dot = self.normal1.dot(n2).clamp(-1.0, 1.0);
            dot.acos()
        } else {
            0.0
        }
    }

    /// Edge used by a single triangle
    pub fn is_boundary(&self) -> bool {
        self.normal2.is_none()
    }

    /// Check if this is a "sharp" edge (faces meet at angle)
    pub fn is_sharp(&self, threshold_degrees: f32) -> bool {
        self.dihedral_angle().to_degrees() > threshold_degrees
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

type QuantizedPos = (i64, i64, i64);

fn quantize_position(pos: Vec3) -> QuantizedPos {
    let scale = 10000.0;
    (
        (pos.x * scale).round() as i64,
        (pos.y * scale).round() as i64,
        (pos.z * scale).round() as i64,
    )
}

fn edge_key(p1: QuantizedPos, p2: QuantizedPos) -> (QuantizedPos, QuantizedPos) {
    if p1 < p2 { (p1, p2) } else { (p2, p1) }
}

/// Extract all unique edges of an indexed triangle list, in first-seen order
pub fn extract_edges(positions: &[Vec3], indices: &[u32]) -> Vec<MeshEdge> {
    let mut edges: Vec<MeshEdge> = Vec::new();
    let mut lookup: HashMap<(QuantizedPos, QuantizedPos), usize> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let (Some(&v0), Some(&v1), Some(&v2)) = (
            positions.get(tri[0] as usize),
            positions.get(tri[1] as usize),
            positions.get(tri[2] as usize),
        ) else {
            tracing::warn!("Skipping triangle with out-of-range index: {tri:?}");
            continue;
        };

        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        let q0 = quantize_position(v0);
        let q1 = quantize_position(v1);
        let q2 = quantize_position(v2);

        for (qa, qb, va, vb) in [(q0, q1, v0, v1), (q1, q2, v1, v2), (q2, q0, v2, v0)] {
            if qa == qb {
                continue;
            }
            let key = edge_key(qa, qb);
            match lookup.get(&key).copied() {
                Some(idx) => {
                    let edge = &mut edges[idx];
                    if edge.normal2.is_none() {
                        edge.normal2 = Some(normal);
                    }
                }
                None => {
                    lookup.insert(key, edges.len());
                    edges.push(MeshEdge {
                        start: va,
                        end: vb,
                        normal1: normal,
                        normal2: None,
                    });
                }
            }
        }
    }

    edges
}

/// Extract only the edges worth outlining: open boundaries and creases
pub fn extract_outline_edges(
    positions: &[Vec3],
    indices: &[u32],
    threshold_degrees: f32,
) -> Vec<MeshEdge> {
    extract_edges(positions, indices)
        .into_iter()
        .filter(|e| e.is_boundary() || e.is_sharp(threshold_degrees))
        .collect()
}

/// Build a line mesh from outline edges
pub fn outline_lines(edges: &[MeshEdge], color: [f32; 4]) -> LineMeshData {
    let mut lines = LineMeshData::default();
    for edge in edges {
        lines.push_segment(edge.start, edge.end, color);
    }
    lines
}
