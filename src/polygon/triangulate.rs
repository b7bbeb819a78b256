//! Triangulation of convex clip polygons into integration cells.
//!
//! The Delaunay construction is incremental: starting from (0, 1, 2), each
//! further vertex c is attached through the fan triangle (c-1, c, 0) and the
//! triangles whose circumcircle strictly contains c are re-connected to c.
//! For a convex polygon vertex c only sees the closing edge (0, c-1), so the
//! cavity is the union of the offending triangles and that fan triangle.

use std::collections::HashMap;

use tracing::warn;

use crate::geometry::{Cell, Point3};

/// Triangulation strategy for clip polygons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriangulationStrategy {
    /// Delaunay, falling back to a center fan on numerical failure.
    #[default]
    Delaunay,
    /// Always fan from the vertex centroid.
    CenterFan,
}

/// Why the Delaunay triangulation was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangulationFailure {
    /// Fewer than three points.
    TooFewPoints(usize),
    /// A circumcircle is numerically undefined or inconsistent.
    DegenerateCircumcircle,
    /// The cavity of a new vertex does not border the visible hull edge.
    BrokenCavity { vertex: usize },
    /// The final triangle count is not N - 2.
    TriangleCount { expected: usize, found: usize },
}

/// Triangles plus whether the Delaunay construction was abandoned.
#[derive(Clone, Debug)]
pub struct Triangulation {
    pub cells: Vec<Cell>,
    pub fell_back: bool,
}

/// Triangulate a convex polygon given in ring order.
pub fn triangulate(
    points: &[Point3],
    normal: Point3,
    tol: f64,
    strategy: TriangulationStrategy,
) -> Triangulation {
    if strategy == TriangulationStrategy::CenterFan {
        return Triangulation {
            cells: center_fan(points),
            fell_back: false,
        };
    }
    match delaunay(points, normal, tol) {
        Ok(cells) => Triangulation {
            cells,
            fell_back: false,
        },
        Err(failure) => {
            warn!(?failure, n = points.len(), "Delaunay failed, using center fan");
            Triangulation {
                cells: center_fan(points),
                fell_back: true,
            }
        }
    }
}

/// Delaunay triangulation of a convex polygon, exactly N - 2 triangles.
pub fn delaunay(
    points: &[Point3],
    normal: Point3,
    tol: f64,
) -> Result<Vec<Cell>, TriangulationFailure> {
    let n = points.len();
    if n < 3 {
        return Err(TriangulationFailure::TooFewPoints(n));
    }
    if n == 3 {
        return Ok(vec![Cell::Triangle([points[0], points[1], points[2]])]);
    }

    let local = project(points, normal).ok_or(TriangulationFailure::DegenerateCircumcircle)?;
    let mut triangles: Vec<[usize; 3]> = vec![[0, 1, 2]];

    for c in 3..n {
        let p = local[c];
        let mut bad = Vec::new();
        for (t, tri) in triangles.iter().enumerate() {
            let circle = Circumcircle::new(tri.map(|i| local[i]), tol)?;
            if circle.strictly_contains(p) {
                bad.push(t);
            }
        }

        if bad.is_empty() {
            triangles.push([c - 1, c, 0]);
            continue;
        }

        // Edges bordering exactly one offending triangle.
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for &t in &bad {
            let [a, b, d] = triangles[t];
            for (u, v) in [(a, b), (b, d), (d, a)] {
                *edge_count.entry((u.min(v), u.max(v))).or_default() += 1;
            }
        }
        let closing = (0, c - 1);
        if edge_count.get(&closing) != Some(&1) {
            return Err(TriangulationFailure::BrokenCavity { vertex: c });
        }
        let mut boundary: Vec<(usize, usize)> = edge_count
            .into_iter()
            .filter(|&(e, count)| count == 1 && e != closing)
            .map(|(e, _)| e)
            .collect();
        boundary.sort_unstable();

        let mut kept: Vec<[usize; 3]> = triangles
            .iter()
            .enumerate()
            .filter(|(t, _)| !bad.contains(t))
            .map(|(_, tri)| *tri)
            .collect();
        kept.extend(boundary.into_iter().map(|(u, v)| [u, v, c]));
        triangles = kept;
    }

    if triangles.len() != n - 2 {
        return Err(TriangulationFailure::TriangleCount {
            expected: n - 2,
            found: triangles.len(),
        });
    }
    Ok(triangles
        .into_iter()
        .map(|[a, b, c]| Cell::Triangle([points[a], points[b], points[c]]))
        .collect())
}

/// Fan of N triangles around the vertex centroid.
pub fn center_fan(points: &[Point3]) -> Vec<Cell> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let center = Point3::centroid(points);
    (0..n)
        .map(|i| Cell::Triangle([center, points[i], points[(i + 1) % n]]))
        .collect()
}

/// Points expressed in an orthonormal frame of the plane.
fn project(points: &[Point3], normal: Point3) -> Option<Vec<[f64; 2]>> {
    let origin = points[0];
    let x_axis = (points[1] - origin).normalize()?;
    let y_axis = normal.normalize()?.cross(x_axis);
    Some(
        points
            .iter()
            .map(|p| {
                let d = *p - origin;
                [d.dot(x_axis), d.dot(y_axis)]
            })
            .collect(),
    )
}

struct Circumcircle {
    center: [f64; 2],
    radius: f64,
    /// Distance below which a point counts as on the circle.
    slack: f64,
}

impl Circumcircle {
    fn new([a, b, c]: [[f64; 2]; 3], tol: f64) -> Result<Self, TriangulationFailure> {
        let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
        let scale = dist(a, b).max(dist(b, c)).max(dist(c, a));
        if d.abs() <= tol * scale {
            return Err(TriangulationFailure::DegenerateCircumcircle);
        }
        let a2 = a[0] * a[0] + a[1] * a[1];
        let b2 = b[0] * b[0] + b[1] * b[1];
        let c2 = c[0] * c[0] + c[1] * c[1];
        let center = [
            (a2 * (b[1] - c[1]) + b2 * (c[1] - a[1]) + c2 * (a[1] - b[1])) / d,
            (a2 * (c[0] - b[0]) + b2 * (a[0] - c[0]) + c2 * (b[0] - a[0])) / d,
        ];
        let radius = dist(center, a);
        // Round-off in the center grows with radius / edge length.
        let slack = tol * (radius / scale).max(1.0);
        // All three corners must agree on the radius.
        let spread = (dist(center, b) - radius).abs().max((dist(center, c) - radius).abs());
        if !radius.is_finite() || spread > slack {
            return Err(TriangulationFailure::DegenerateCircumcircle);
        }
        Ok(Self { center, radius, slack })
    }

    fn strictly_contains(&self, p: [f64; 2]) -> bool {
        dist(self.center, p) < self.radius - self.slack
    }
}

fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(n: usize, r: f64) -> Vec<Point3> {
        (0..n)
            .map(|i| {
                let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                Point3::planar(r * t.cos(), r * t.sin())
            })
            .collect()
    }

    fn total_area(cells: &[Cell]) -> f64 {
        cells.iter().map(Cell::measure).sum()
    }

    #[test]
    fn test_regular_octagon() {
        let pts = regular(8, 1.0);
        let cells = delaunay(&pts, Point3::UNIT_Z, 1e-12).unwrap();
        assert_eq!(cells.len(), 6);
        let exact = 0.5 * 8.0 * (2.0 * std::f64::consts::PI / 8.0).sin();
        assert!((total_area(&cells) - exact).abs() < 1e-12);
    }

    #[test]
    fn test_flat_pentagon_is_delaunay() {
        // Long thin polygon: the naive fan from vertex 0 is not Delaunay.
        let pts = vec![
            Point3::planar(0.0, 0.0),
            Point3::planar(4.0, 0.0),
            Point3::planar(5.0, 0.5),
            Point3::planar(4.0, 1.0),
            Point3::planar(0.0, 1.0),
        ];
        let cells = delaunay(&pts, Point3::UNIT_Z, 1e-12).unwrap();
        assert_eq!(cells.len(), 3);
        assert!((total_area(&cells) - 4.5).abs() < 1e-12);
        let all_from_origin = cells
            .iter()
            .all(|c| c.vertices().contains(&Point3::planar(0.0, 0.0)));
        assert!(!all_from_origin);
    }

    #[test]
    fn test_center_fan() {
        let pts = regular(5, 2.0);
        let cells = center_fan(&pts);
        assert_eq!(cells.len(), 5);
        let t = delaunay(&pts, Point3::UNIT_Z, 1e-12).unwrap();
        assert!((total_area(&cells) - total_area(&t)).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_input_falls_back() {
        let pts = vec![
            Point3::planar(0.0, 0.0),
            Point3::planar(1.0, 0.0),
            Point3::planar(2.0, 0.0),
            Point3::planar(1.0, 1.0),
        ];
        let result = triangulate(&pts, Point3::UNIT_Z, 1e-12, TriangulationStrategy::Delaunay);
        assert!(result.fell_back);
        assert_eq!(result.cells.len(), 4);
    }

    #[test]
    fn test_circle_slack_follows_tolerance() {
        let tri = [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]];
        let p = [0.0, -1.0 + 1e-9];
        assert!(Circumcircle::new(tri, 1e-12).unwrap().strictly_contains(p));
        assert!(!Circumcircle::new(tri, 1e-6).unwrap().strictly_contains(p));
    }
}
