//! The 2D coupling path: polygon model, clipping and cell triangulation.

mod clip;
mod triangulate;
mod vertex;

pub use clip::{ClipOutcome, NoOverlapReason, PolygonClipper};
pub use triangulate::{
    Triangulation, TriangulationFailure, TriangulationStrategy, center_fan, delaunay, triangulate,
};
pub use vertex::{PolygonRing, Vertex, VertexKind};
