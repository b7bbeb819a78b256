//! Mesh representation.
//!
//! Provides the discretization contract used by the coupling and one
//! concrete implementation:
//! - [`Discretization`]: row/column elements, node coordinates, dof maps
//! - [`Mesh`]: unstructured linear-element mesh with structured builders

mod discretization;
mod unstructured;

pub use discretization::{Discretization, DofMap, DofSet, Element};
pub use unstructured::Mesh;
