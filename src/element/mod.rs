//! Linear Lagrange elements: shapes, shape functions and isoparametric maps.

mod mapping;
mod shape;

pub use mapping::ElementGeometry;
pub use shape::{Hex8, Quad4, Shape, ShapeFunctions, Tet4, Tri3};
