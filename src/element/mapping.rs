//! Isoparametric geometry of a single element.
//!
//! x(ξ) = Σ_i N_i(ξ) x_i, with the Jacobian J_ak = ∂x_a/∂ξ_k. The inverse
//! map ξ(x) is found by Newton iteration, solving J Δξ = x - x(ξ) with a
//! full-pivoting LU factorization.

use faer::{Mat, linalg::solvers::Solve};

use super::shape::Shape;
use crate::geometry::{BoundingBox, Point3};
use crate::quadrature::QuadratureRule;

/// Shape plus physical node coordinates of one element.
#[derive(Clone, Debug)]
pub struct ElementGeometry {
    shape: Shape,
    nodes: Vec<Point3>,
}

impl ElementGeometry {
    /// # Panics
    ///
    /// Panics if the number of nodes does not match the shape.
    pub fn new(shape: Shape, nodes: Vec<Point3>) -> Self {
        assert_eq!(
            nodes.len(),
            shape.num_nodes(),
            "{:?} needs {} nodes",
            shape,
            shape.num_nodes()
        );
        Self { shape, nodes }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Physical coordinates of a reference point.
    pub fn to_physical(&self, xi: &[f64; 3]) -> Point3 {
        let mut n = [0.0; 8];
        self.shape.values(xi, &mut n);
        self.nodes
            .iter()
            .zip(&n)
            .fold(Point3::ORIGIN, |acc, (p, &w)| acc + *p * w)
    }

    /// Jacobian J_ak = ∂x_a/∂ξ_k. Rows and columns beyond `dim` are identity.
    pub fn jacobian(&self, xi: &[f64; 3]) -> [[f64; 3]; 3] {
        let dim = self.shape.dim();
        let mut dn = [[0.0; 3]; 8];
        self.shape.derivatives(xi, &mut dn);
        let mut j = [[0.0; 3]; 3];
        for (p, d) in self.nodes.iter().zip(&dn) {
            let x = p.to_array();
            for a in 0..dim {
                for k in 0..dim {
                    j[a][k] += x[a] * d[k];
                }
            }
        }
        for (a, row) in j.iter_mut().enumerate().skip(dim) {
            row[a] = 1.0;
        }
        j
    }

    /// Jacobian determinant at a reference point.
    pub fn det_jacobian(&self, xi: &[f64; 3]) -> f64 {
        det3(&self.jacobian(xi))
    }

    /// Reference coordinates of a physical point, or `None` if Newton fails.
    ///
    /// Converges when the largest update component drops below `tol`; a
    /// Jacobian with |det J| ≤ tol·h^dim counts as singular. The
    /// returned point may lie outside the reference domain; use
    /// [`contains`](Self::contains) for a membership test.
    pub fn to_local(&self, x: Point3, tol: f64, max_iterations: usize) -> Option<[f64; 3]> {
        let dim = self.shape.dim();
        let h = self.characteristic_length();
        let mut xi = self.shape.reference_centroid();

        for _ in 0..max_iterations.max(1) {
            let r = (x - self.to_physical(&xi)).to_array();
            let jac = self.jacobian(&xi);
            if det3(&jac).abs() <= tol * h.powi(dim as i32) {
                return None;
            }

            let mut a = Mat::<f64>::zeros(dim, dim);
            let mut rhs = Mat::<f64>::zeros(dim, 1);
            for row in 0..dim {
                rhs[(row, 0)] = r[row];
                for col in 0..dim {
                    a[(row, col)] = jac[row][col];
                }
            }
            let lu = a.as_ref().full_piv_lu();
            let delta = lu.solve(&rhs);

            let mut step: f64 = 0.0;
            for k in 0..dim {
                let d = delta[(k, 0)];
                if !d.is_finite() {
                    return None;
                }
                xi[k] += d;
                step = step.max(d.abs());
            }
            if step <= tol {
                return Some(xi);
            }
            // Points far outside can send a non-affine map off to infinity.
            if xi.iter().any(|c| c.abs() > 1e6) {
                return None;
            }
        }
        None
    }

    /// Reference coordinates of `x` if it lies in the element (domain expanded by `eps`).
    pub fn contains(&self, x: Point3, eps: f64, tol: f64, max_iterations: usize) -> Option<[f64; 3]> {
        self.to_local(x, tol, max_iterations)
            .filter(|xi| self.shape.is_inside(xi, eps))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.nodes)
    }

    /// Length scale used to make tolerances relative (bounding box diagonal).
    pub fn characteristic_length(&self) -> f64 {
        self.bounding_box().diagonal()
    }

    pub fn centroid(&self) -> Point3 {
        Point3::centroid(&self.nodes)
    }

    /// Area (2D) or volume (3D), by Gauss quadrature of |det J|.
    pub fn volume(&self) -> f64 {
        QuadratureRule::for_shape(self.shape, 2)
            .iter()
            .map(|(xi, w)| w * self.det_jacobian(xi).abs())
            .sum()
    }

    /// Physical corner points of a boundary face (or edge in 2D).
    pub fn face_points(&self, face: usize) -> Vec<Point3> {
        self.shape.faces()[face]
            .iter()
            .map(|&i| self.nodes[i])
            .collect()
    }
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
