//! Convex polyhedra: plane splitting and tetrahedralization.
//!
//! Faces are stored as planar polygons ordered counter-clockwise when seen
//! from outside. Splitting follows the Sutherland-Hodgman idea applied to
//! every face, with the cut closed by a cap face built from the on-plane
//! points.

use super::cell::Cell;
use super::point::{Point3, polygon_area_vector, tetrahedron_signed_volume};

/// Which side of a plane a point lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneSide {
    /// Against the normal (negative signed distance).
    Back,
    /// Within tolerance of the plane.
    OnPlane,
    /// Along the normal (positive signed distance).
    Front,
}

/// An oriented plane through `origin` with unit `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Point3,
}

impl Plane {
    /// Plane through a planar polygon, normal along its counter-clockwise side.
    ///
    /// Returns `None` for a degenerate (zero area) polygon.
    pub fn from_polygon(points: &[Point3]) -> Option<Self> {
        let normal = polygon_area_vector(points).normalize()?;
        Some(Self {
            origin: Point3::centroid(points),
            normal,
        })
    }

    #[inline]
    pub fn signed_distance(&self, p: Point3) -> f64 {
        (p - self.origin).dot(self.normal)
    }

    pub fn classify(&self, p: Point3, tol: f64) -> PlaneSide {
        let d = self.signed_distance(p);
        if d > tol {
            PlaneSide::Front
        } else if d < -tol {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }
}

/// A convex polyhedron given by its outward oriented faces.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    faces: Vec<Vec<Point3>>,
}

impl Polyhedron {
    /// Build from face polygons, flipping all faces if they point inwards.
    pub fn from_faces(faces: Vec<Vec<Point3>>) -> Self {
        let mut poly = Self { faces };
        if poly.signed_volume() < 0.0 {
            for face in &mut poly.faces {
                face.reverse();
            }
        }
        poly
    }

    pub fn faces(&self) -> &[Vec<Point3>] {
        &self.faces
    }

    /// Distinct corner points (coincident points merged within `tol`).
    pub fn vertices(&self, tol: f64) -> Vec<Point3> {
        let mut unique: Vec<Point3> = Vec::new();
        for p in self.faces.iter().flatten() {
            if !unique.iter().any(|q| q.is_close(p, tol)) {
                unique.push(*p);
            }
        }
        unique
    }

    /// Signed volume by the divergence theorem (positive for outward faces).
    pub fn signed_volume(&self) -> f64 {
        let Some(reference) = self.faces.first().and_then(|f| f.first()).copied() else {
            return 0.0;
        };
        let mut volume = 0.0;
        for face in &self.faces {
            for i in 1..face.len().saturating_sub(1) {
                volume += tetrahedron_signed_volume(reference, face[0], face[i], face[i + 1]);
            }
        }
        volume
    }

    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Split by a plane into the part behind it and the part in front of it.
    ///
    /// Either side is `None` when the polyhedron does not reach across the
    /// plane (or only a sliver thinner than `tol` does).
    pub fn split(&self, plane: &Plane, tol: f64) -> (Option<Polyhedron>, Option<Polyhedron>) {
        let distances: Vec<Vec<f64>> = self
            .faces
            .iter()
            .map(|face| {
                face.iter()
                    .map(|p| {
                        let d = plane.signed_distance(*p);
                        if d.abs() <= tol { 0.0 } else { d }
                    })
                    .collect()
            })
            .collect();
        let max_d = distances.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_d = distances.iter().flatten().copied().fold(f64::INFINITY, f64::min);
        if max_d <= 0.0 {
            return (Some(self.clone()), None);
        }
        if min_d >= 0.0 {
            return (None, Some(self.clone()));
        }

        let mut back_faces = Vec::with_capacity(self.faces.len() + 1);
        let mut front_faces = Vec::with_capacity(self.faces.len() + 1);
        let mut cap_points: Vec<Point3> = Vec::new();

        for (face, dist) in self.faces.iter().zip(&distances) {
            let n = face.len();
            let mut back = Vec::with_capacity(n + 1);
            let mut front = Vec::with_capacity(n + 1);
            for i in 0..n {
                let j = (i + 1) % n;
                let (p, dp) = (face[i], dist[i]);
                let (q, dq) = (face[j], dist[j]);
                if dp == 0.0 {
                    back.push(p);
                    front.push(p);
                    cap_points.push(p);
                } else if dp < 0.0 {
                    back.push(p);
                } else {
                    front.push(p);
                }
                if (dp < 0.0 && dq > 0.0) || (dp > 0.0 && dq < 0.0) {
                    let x = Point3::lerp(p, q, dp / (dp - dq));
                    back.push(x);
                    front.push(x);
                    cap_points.push(x);
                }
            }
            if let Some(f) = clean_face(back, tol) {
                back_faces.push(f);
            }
            if let Some(f) = clean_face(front, tol) {
                front_faces.push(f);
            }
        }

        if let Some(cap) = cap_face(&cap_points, plane.normal, tol) {
            let mut reversed = cap.clone();
            reversed.reverse();
            back_faces.push(cap);
            front_faces.push(reversed);
        }

        let scale = self.vertices(tol).len().max(1) as f64;
        let min_volume = tol * tol * tol * scale;
        let back = Polyhedron { faces: back_faces };
        let front = Polyhedron { faces: front_faces };
        match (back.volume() > min_volume, front.volume() > min_volume) {
            (true, true) => (Some(back), Some(front)),
            (true, false) => (Some(self.clone()), None),
            (false, true) => (None, Some(self.clone())),
            (false, false) => (None, None),
        }
    }

    /// Decompose into tetrahedral cells fanned from the vertex centroid.
    pub fn tetrahedralize(&self, tol: f64) -> Vec<Cell> {
        let center = Point3::centroid(&self.vertices(tol));
        let mut cells = Vec::new();
        for face in &self.faces {
            for i in 1..face.len().saturating_sub(1) {
                let (a, b, c) = (face[0], face[i], face[i + 1]);
                if tetrahedron_signed_volume(center, a, b, c).abs() > 0.0 {
                    cells.push(Cell::Tetrahedron([center, a, b, c]));
                }
            }
        }
        cells
    }
}

/// Drop consecutive duplicates and reject faces without area.
fn clean_face(points: Vec<Point3>, tol: f64) -> Option<Vec<Point3>> {
    let mut cleaned: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned.last().is_none_or(|q| !q.is_close(&p, tol)) {
            cleaned.push(p);
        }
    }
    while cleaned.len() > 1 && cleaned[0].is_close(&cleaned[cleaned.len() - 1], tol) {
        cleaned.pop();
    }
    if cleaned.len() < 3 {
        return None;
    }
    let perimeter: f64 = (0..cleaned.len())
        .map(|i| cleaned[i].distance(cleaned[(i + 1) % cleaned.len()]))
        .sum();
    if polygon_area_vector(&cleaned).norm() <= tol * perimeter {
        return None;
    }
    Some(cleaned)
}

/// Order the on-plane points counter-clockwise about `normal`.
fn cap_face(points: &[Point3], normal: Point3, tol: f64) -> Option<Vec<Point3>> {
    let mut unique: Vec<Point3> = Vec::new();
    for p in points {
        if !unique.iter().any(|q| q.is_close(p, tol)) {
            unique.push(*p);
        }
    }
    if unique.len() < 3 {
        return None;
    }
    let center = Point3::centroid(&unique);
    let u = unique
        .iter()
        .map(|p| *p - center)
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))
        .and_then(Point3::normalize)?;
    let v = normal.cross(u);
    let mut keyed: Vec<(f64, Point3)> = unique
        .into_iter()
        .map(|p| {
            let r = p - center;
            (r.dot(v).atan2(r.dot(u)), p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    clean_face(keyed.into_iter().map(|(_, p)| p).collect(), tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis-aligned box with outward faces.
    fn cuboid(min: Point3, max: Point3) -> Polyhedron {
        let c = |i: usize| {
            Point3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };
        let faces = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        Polyhedron::from_faces(faces.iter().map(|f| f.iter().map(|&i| c(i)).collect()).collect())
    }

    #[test]
    fn test_cuboid_volume() {
        let p = cuboid(Point3::ORIGIN, Point3::new(2.0, 1.0, 3.0));
        assert!((p.signed_volume() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_inward_faces_are_flipped() {
        let mut faces = cuboid(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0)).faces().to_vec();
        for f in &mut faces {
            f.reverse();
        }
        let p = Polyhedron::from_faces(faces);
        assert!(p.signed_volume() > 0.0);
    }

    #[test]
    fn test_split_halves() {
        let p = cuboid(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        let plane = Plane {
            origin: Point3::new(0.25, 0.0, 0.0),
            normal: Point3::new(1.0, 0.0, 0.0),
        };
        let (back, front) = p.split(&plane, 1e-12);
        let back = back.expect("back part");
        let front = front.expect("front part");
        assert!((back.volume() - 0.25).abs() < 1e-12);
        assert!((front.volume() - 0.75).abs() < 1e-12);
        assert_eq!(back.faces().len(), 6);
    }

    #[test]
    fn test_split_oblique_conserves_volume() {
        let p = cuboid(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        let plane = Plane {
            origin: Point3::new(0.5, 0.5, 0.5),
            normal: Point3::new(1.0, 1.0, 1.0).normalize().unwrap(),
        };
        let (back, front) = p.split(&plane, 1e-12);
        let total = back.unwrap().volume() + front.unwrap().volume();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_on_face_plane_keeps_whole() {
        let p = cuboid(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        let plane = Plane {
            origin: Point3::new(1.0, 0.0, 0.0),
            normal: Point3::new(1.0, 0.0, 0.0),
        };
        let (back, front) = p.split(&plane, 1e-12);
        assert!(front.is_none());
        assert!((back.unwrap().volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tetrahedralize_conserves_volume() {
        let p = cuboid(Point3::new(-1.0, 0.0, 2.0), Point3::new(0.5, 2.0, 2.5));
        let cells = p.tetrahedralize(1e-12);
        assert_eq!(cells.len(), 12);
        let total: f64 = cells.iter().map(Cell::measure).sum();
        assert!((total - p.volume()).abs() < 1e-12);
    }
}
