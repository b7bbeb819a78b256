//! Numerical quadrature.
//!
//! This module provides:
//! - 1D Gauss-Legendre nodes and weights
//! - Tensor-product rules for quadrilaterals and hexahedra
//! - Collapsed-coordinate rules for triangles and tetrahedra

mod gauss;
mod rules;

pub use gauss::{gauss_legendre, legendre_and_derivative};
pub use rules::QuadratureRule;
