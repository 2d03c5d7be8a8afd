//! Procedural geometry of the frustum solid.
//!
//! `quad` turns four corners into a triangulated, UV-mapped quad;
//! `solid` assembles the six faces and the outline overlay.

mod quad;
mod solid;

pub use quad::{build_face_quad, canonical_vertices, uv_table, QuadGeometry, QUAD_SPLIT};
pub use solid::{assemble_solid, AssembledSolid, FaceQuad, MergedGeometry, FACE_CORNERS};
