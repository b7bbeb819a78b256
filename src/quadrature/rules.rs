//! Quadrature rules on the reference domains.
//!
//! - Quadrilateral and hexahedron: tensor products on [-1, 1]^d
//! - Triangle and tetrahedron: collapsed (Duffy) coordinates on the unit
//!   simplex, built from the same 1D Gauss-Legendre rule
//!
//! With `n` points per direction the tensor rules are exact for degree
//! 2n-1 per coordinate. The collapsed rules use one extra point in each
//! collapsed direction to absorb the Duffy Jacobian, which keeps the same
//! exactness on the simplex.

use super::gauss::gauss_legendre;
use crate::element::Shape;
use crate::geometry::CellShape;

/// Points and weights of a quadrature rule in reference coordinates.
///
/// Unused trailing coordinates of 2D rules are zero.
#[derive(Clone, Debug)]
pub struct QuadratureRule {
    pub points: Vec<[f64; 3]>,
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Number of quadrature points.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over (point, weight) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64; 3], f64)> {
        self.points.iter().zip(self.weights.iter().copied())
    }

    /// Gauss-Legendre rule on [-1, 1].
    pub fn line(n: usize) -> Self {
        let (nodes, weights) = gauss_legendre(n);
        Self {
            points: nodes.iter().map(|&x| [x, 0.0, 0.0]).collect(),
            weights,
        }
    }

    /// Tensor-product rule on [-1, 1]^2.
    pub fn quadrilateral(n: usize) -> Self {
        let (nodes, w) = gauss_legendre(n);
        let mut points = Vec::with_capacity(n * n);
        let mut weights = Vec::with_capacity(n * n);
        for j in 0..n {
            for i in 0..n {
                points.push([nodes[i], nodes[j], 0.0]);
                weights.push(w[i] * w[j]);
            }
        }
        Self { points, weights }
    }

    /// Tensor-product rule on [-1, 1]^3.
    pub fn hexahedron(n: usize) -> Self {
        let (nodes, w) = gauss_legendre(n);
        let mut points = Vec::with_capacity(n * n * n);
        let mut weights = Vec::with_capacity(n * n * n);
        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    points.push([nodes[i], nodes[j], nodes[k]]);
                    weights.push(w[i] * w[j] * w[k]);
                }
            }
        }
        Self { points, weights }
    }

    /// Collapsed rule on the unit triangle {xi, eta >= 0, xi + eta <= 1}.
    pub fn triangle(n: usize) -> Self {
        let (a, wa) = unit_interval(n + 1);
        let (b, wb) = unit_interval(n);
        let mut points = Vec::with_capacity(a.len() * b.len());
        let mut weights = Vec::with_capacity(a.len() * b.len());
        for (&u, &wu) in a.iter().zip(&wa) {
            for (&v, &wv) in b.iter().zip(&wb) {
                points.push([u, v * (1.0 - u), 0.0]);
                weights.push(wu * wv * (1.0 - u));
            }
        }
        Self { points, weights }
    }

    /// Collapsed rule on the unit tetrahedron {xi, eta, zeta >= 0, sum <= 1}.
    pub fn tetrahedron(n: usize) -> Self {
        let (a, wa) = unit_interval(n + 2);
        let (b, wb) = unit_interval(n + 1);
        let (c, wc) = unit_interval(n);
        let mut points = Vec::with_capacity(a.len() * b.len() * c.len());
        let mut weights = Vec::with_capacity(a.len() * b.len() * c.len());
        for (&u, &wu) in a.iter().zip(&wa) {
            for (&v, &wv) in b.iter().zip(&wb) {
                for (&w, &ww) in c.iter().zip(&wc) {
                    points.push([u, v * (1.0 - u), w * (1.0 - u) * (1.0 - v)]);
                    weights.push(wu * wv * ww * (1.0 - u) * (1.0 - u) * (1.0 - v));
                }
            }
        }
        Self { points, weights }
    }

    /// Rule on the reference domain of an element shape.
    pub fn for_shape(shape: Shape, n: usize) -> Self {
        match shape {
            Shape::Tri3 => Self::triangle(n),
            Shape::Quad4 => Self::quadrilateral(n),
            Shape::Tet4 => Self::tetrahedron(n),
            Shape::Hex8 => Self::hexahedron(n),
        }
    }

    /// Rule on the reference simplex of an integration cell.
    pub fn for_cell(shape: CellShape, n: usize) -> Self {
        match shape {
            CellShape::Triangle => Self::triangle(n),
            CellShape::Tetrahedron => Self::tetrahedron(n),
        }
    }
}

/// Gauss-Legendre rule mapped to [0, 1].
fn unit_interval(n: usize) -> (Vec<f64>, Vec<f64>) {
    let (nodes, weights) = gauss_legendre(n);
    (
        nodes.iter().map(|&x| 0.5 * (x + 1.0)).collect(),
        weights.iter().map(|&w| 0.5 * w).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrate(rule: &QuadratureRule, f: impl Fn(&[f64; 3]) -> f64) -> f64 {
        rule.iter().map(|(p, w)| w * f(p)).sum()
    }

    #[test]
    fn test_reference_measures() {
        for n in 1..=5 {
            assert!((integrate(&QuadratureRule::quadrilateral(n), |_| 1.0) - 4.0).abs() < 1e-13);
            assert!((integrate(&QuadratureRule::hexahedron(n), |_| 1.0) - 8.0).abs() < 1e-13);
            assert!((integrate(&QuadratureRule::triangle(n), |_| 1.0) - 0.5).abs() < 1e-14);
            assert!((integrate(&QuadratureRule::tetrahedron(n), |_| 1.0) - 1.0 / 6.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_triangle_monomials() {
        // ∫ x^a y^b over the unit triangle = a! b! / (a + b + 2)!
        let rule = QuadratureRule::triangle(3);
        assert!((integrate(&rule, |p| p[0]) - 1.0 / 6.0).abs() < 1e-14);
        assert!((integrate(&rule, |p| p[0] * p[1]) - 1.0 / 24.0).abs() < 1e-14);
        assert!((integrate(&rule, |p| p[1] * p[1] * p[1]) - 6.0 / 120.0).abs() < 1e-14);
    }

    #[test]
    fn test_tetrahedron_monomials() {
        // ∫ x^a y^b z^c over the unit tet = a! b! c! / (a + b + c + 3)!
        let rule = QuadratureRule::tetrahedron(3);
        assert!((integrate(&rule, |p| p[2]) - 1.0 / 24.0).abs() < 1e-14);
        assert!((integrate(&rule, |p| p[0] * p[1] * p[2]) - 1.0 / 720.0).abs() < 1e-14);
        assert!((integrate(&rule, |p| p[0] * p[0]) - 2.0 / 120.0).abs() < 1e-14);
    }

    #[test]
    fn test_points_inside_simplex() {
        let rule = QuadratureRule::tetrahedron(4);
        for p in &rule.points {
            assert!(p.iter().all(|&c| c > 0.0));
            assert!(p[0] + p[1] + p[2] < 1.0);
        }
    }

    #[test]
    fn test_for_shape_dispatch() {
        assert_eq!(QuadratureRule::for_shape(Shape::Hex8, 2).len(), 8);
        assert_eq!(QuadratureRule::for_shape(Shape::Quad4, 3).len(), 9);
        assert_eq!(QuadratureRule::for_cell(CellShape::Triangle, 2).len(), 6);
    }
}
