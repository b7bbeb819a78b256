//! Axis-aligned bounding boxes.

use super::Point3;

/// Axis-aligned bounding box in 3D.
///
/// Used as the search prefilter for candidate master elements and as the
/// conservative overlap test of the 3D classifier.
///
/// # Example
///
/// ```
/// use volmortar::geometry::{BoundingBox, Point3};
///
/// let a = BoundingBox::from_points(&[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)]);
/// let b = BoundingBox::from_points(&[Point3::new(0.5, 0.0, 0.0), Point3::new(1.5, 1.0, 1.0)]);
///
/// assert!(a.intersects(&b, 0.0));
/// assert!((a.overlap_volume(&b) - 0.5).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    /// Tight box around a set of points.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    pub fn from_points(points: &[Point3]) -> Self {
        assert!(!points.is_empty(), "Need at least one point for a bounding box");
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Self { min, max }
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.min.distance(self.max)
    }

    pub fn center(&self) -> Point3 {
        Point3::lerp(self.min, self.max, 0.5)
    }

    /// Copy grown by `margin` in every direction.
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Point3::new(margin, margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Returns true if the boxes touch or overlap within `tol`.
    pub fn intersects(&self, other: &Self, tol: f64) -> bool {
        (0..3).all(|axis| {
            self.min.coord(axis) <= other.max.coord(axis) + tol
                && other.min.coord(axis) <= self.max.coord(axis) + tol
        })
    }

    /// Extent of the overlap along one axis (zero if disjoint).
    fn overlap_extent(&self, other: &Self, axis: usize) -> f64 {
        let lo = self.min.coord(axis).max(other.min.coord(axis));
        let hi = self.max.coord(axis).min(other.max.coord(axis));
        (hi - lo).max(0.0)
    }

    /// Volume of the intersection box (zero if disjoint).
    pub fn overlap_volume(&self, other: &Self) -> f64 {
        (0..3).map(|axis| self.overlap_extent(other, axis)).product()
    }

    /// Returns true if the point is inside the box expanded by `tol`.
    pub fn contains(&self, p: Point3, tol: f64) -> bool {
        (0..3).all(|axis| {
            p.coord(axis) >= self.min.coord(axis) - tol && p.coord(axis) <= self.max.coord(axis) + tol
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::from_points(&[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)])
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = unit_box();
        let b = BoundingBox::from_points(&[Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)]);
        assert!(a.intersects(&b, 0.0));
        assert_eq!(a.overlap_volume(&b), 0.0);
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = unit_box();
        let b = BoundingBox::from_points(&[Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)]);
        assert!(!a.intersects(&b, 1e-12));
        assert!(a.intersects(&b, 0.6));
    }

    #[test]
    fn test_contains_and_expand() {
        let a = unit_box();
        assert!(a.contains(Point3::new(0.5, 0.5, 0.5), 0.0));
        assert!(!a.contains(Point3::new(1.1, 0.5, 0.5), 0.0));
        assert!(a.expanded(0.2).contains(Point3::new(1.1, 0.5, 0.5), 0.0));
        assert!((a.diagonal() - 3f64.sqrt()).abs() < 1e-15);
    }
}
