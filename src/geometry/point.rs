//! Points and vectors in 3D.
//!
//! 2D meshes are embedded in the z = 0 plane, so one coordinate type serves
//! both coupling paths. The same type is used for positions and directions.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A point (or direction) in 3D space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector along z, the normal of the 2D auxiliary plane.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point in the z = 0 plane.
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Build from a coordinate slice of length 2 or 3.
    pub fn from_slice(coords: &[f64]) -> Self {
        match coords.len() {
            0 => Self::ORIGIN,
            1 => Self::new(coords[0], 0.0, 0.0),
            2 => Self::planar(coords[0], coords[1]),
            _ => Self::new(coords[0], coords[1], coords[2]),
        }
    }

    /// Coordinate by axis (0 = x, 1 = y, otherwise z).
    #[inline]
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).norm()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalize(self) -> Option<Self> {
        let len = self.norm();
        if len <= f64::MIN_POSITIVE {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    /// Returns true if both points lie within `tol` of each other.
    pub fn is_close(&self, other: &Self, tol: f64) -> bool {
        self.distance(*other) <= tol
    }

    /// Arithmetic mean of a set of points.
    pub fn centroid(points: &[Self]) -> Self {
        if points.is_empty() {
            return Self::ORIGIN;
        }
        let sum = points.iter().fold(Self::ORIGIN, |acc, &p| acc + p);
        sum * (1.0 / points.len() as f64)
    }

    /// Point on segment `a -> b` at parameter `t`.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(4);
        write!(
            f,
            "({:.prec$}, {:.prec$}, {:.prec$})",
            self.x,
            self.y,
            self.z,
            prec = prec
        )
    }
}

impl Add for Point3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Point3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Point3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Point3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Area vector of a planar polygon (Newell's method).
///
/// Its length is the polygon area and its direction the normal of the
/// counter-clockwise side.
pub fn polygon_area_vector(points: &[Point3]) -> Point3 {
    let n = points.len();
    let mut acc = Point3::ORIGIN;
    for i in 0..n {
        acc += points[i].cross(points[(i + 1) % n]);
    }
    acc * 0.5
}

/// Signed volume of the tetrahedron (a, b, c, d).
pub fn tetrahedron_signed_volume(a: Point3, b: Point3, c: Point3, d: Point3) -> f64 {
    (b - a).cross(c - a).dot(d - a) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross() {
        let vx = Point3::new(1.0, 0.0, 0.0);
        let vy = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(vx.cross(vy), Point3::UNIT_Z);
        assert_eq!(vy.cross(vx), -Point3::UNIT_Z);
    }

    #[test]
    fn test_normalize() {
        let v = Point3::new(9.0, 0.0, 0.0);
        assert_eq!(v.normalize(), Some(Point3::new(1.0, 0.0, 0.0)));
        assert!(Point3::ORIGIN.normalize().is_none());
    }

    #[test]
    fn test_area_vector_of_unit_square() {
        let square = [
            Point3::planar(0.0, 0.0),
            Point3::planar(1.0, 0.0),
            Point3::planar(1.0, 1.0),
            Point3::planar(0.0, 1.0),
        ];
        let a = polygon_area_vector(&square);
        assert!((a.z - 1.0).abs() < 1e-15);
        assert!(a.x.abs() < 1e-15 && a.y.abs() < 1e-15);
    }

    #[test]
    fn test_tetrahedron_volume() {
        let v = tetrahedron_signed_volume(
            Point3::ORIGIN,
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        );
        assert!((v - 1.0 / 6.0).abs() < 1e-15);
    }

    #[test]
    fn test_centroid_and_lerp() {
        let pts = [Point3::ORIGIN, Point3::new(2.0, 4.0, 6.0)];
        assert_eq!(Point3::centroid(&pts), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(Point3::lerp(pts[0], pts[1], 0.25), Point3::new(0.5, 1.0, 1.5));
    }
}
