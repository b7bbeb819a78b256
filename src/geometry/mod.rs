//! Geometric primitives shared by the 2D and 3D coupling paths.
//!
//! This module provides:
//! - `Point3` with the vector algebra used everywhere else
//! - Axis-aligned bounding boxes for the search prefilter
//! - Integration cells (triangles and tetrahedra)
//! - Convex polyhedra with plane splitting, used by the reference cut engine

mod bounding_box;
mod cell;
mod point;
mod polyhedron;

pub use bounding_box::BoundingBox;
pub use cell::{Cell, CellShape};
pub use point::{Point3, polygon_area_vector, tetrahedron_signed_volume};
pub use polyhedron::{Plane, PlaneSide, Polyhedron};
