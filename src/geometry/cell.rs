//! Integration cells.
//!
//! A cell is a simplex used only as a quadrature domain. It carries no mesh
//! topology, just the coordinates of its corners.

use super::point::{Point3, tetrahedron_signed_volume};

/// Shape tag of an integration cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellShape {
    Triangle,
    Tetrahedron,
}

impl CellShape {
    /// Number of corner points.
    pub const fn num_vertices(self) -> usize {
        match self {
            CellShape::Triangle => 3,
            CellShape::Tetrahedron => 4,
        }
    }

    /// Measure of the reference simplex (1/2 or 1/6).
    pub const fn reference_measure(self) -> f64 {
        match self {
            CellShape::Triangle => 0.5,
            CellShape::Tetrahedron => 1.0 / 6.0,
        }
    }
}

/// A triangle (2D path) or tetrahedron (3D path) integration cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Triangle([Point3; 3]),
    Tetrahedron([Point3; 4]),
}

impl Cell {
    pub fn shape(&self) -> CellShape {
        match self {
            Cell::Triangle(_) => CellShape::Triangle,
            Cell::Tetrahedron(_) => CellShape::Tetrahedron,
        }
    }

    pub fn vertices(&self) -> &[Point3] {
        match self {
            Cell::Triangle(v) => v,
            Cell::Tetrahedron(v) => v,
        }
    }

    /// Jacobian determinant of the affine map from the reference simplex.
    ///
    /// Always non-negative: the orientation of a cell is irrelevant for
    /// quadrature.
    pub fn det_jacobian(&self) -> f64 {
        match self {
            Cell::Triangle([a, b, c]) => (*b - *a).cross(*c - *a).norm(),
            Cell::Tetrahedron([a, b, c, d]) => 6.0 * tetrahedron_signed_volume(*a, *b, *c, *d).abs(),
        }
    }

    /// Area (triangle) or volume (tetrahedron).
    pub fn measure(&self) -> f64 {
        self.det_jacobian() * self.shape().reference_measure()
    }

    /// Map a point of the unit reference simplex to physical space.
    pub fn to_physical(&self, xi: [f64; 3]) -> Point3 {
        match self {
            Cell::Triangle([a, b, c]) => *a + (*b - *a) * xi[0] + (*c - *a) * xi[1],
            Cell::Tetrahedron([a, b, c, d]) => {
                *a + (*b - *a) * xi[0] + (*c - *a) * xi[1] + (*d - *a) * xi[2]
            }
        }
    }

    pub fn centroid(&self) -> Point3 {
        Point3::centroid(self.vertices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_measure() {
        let cell = Cell::Triangle([
            Point3::planar(0.0, 0.0),
            Point3::planar(2.0, 0.0),
            Point3::planar(0.0, 1.0),
        ]);
        assert!((cell.measure() - 1.0).abs() < 1e-15);
        assert_eq!(cell.to_physical([1.0, 0.0, 0.0]), Point3::planar(2.0, 0.0));
    }

    #[test]
    fn test_tetrahedron_measure_ignores_orientation() {
        let a = Point3::ORIGIN;
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let d = Point3::new(0.0, 0.0, 1.0);
        let pos = Cell::Tetrahedron([a, b, c, d]);
        let neg = Cell::Tetrahedron([a, c, b, d]);
        assert!((pos.measure() - 1.0 / 6.0).abs() < 1e-15);
        assert!((neg.measure() - pos.measure()).abs() < 1e-15);
    }
}
