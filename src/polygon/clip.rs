//! Convex polygon clipping.
//!
//! Intersects a convex slave polygon with a convex master polygon lying in
//! a common plane:
//!
//! 1. Orientation and convexity checks (master reversed if clockwise)
//! 2. Edge-edge intersections with the weighted edge coordinate (wec) test
//! 3. Intersections coinciding with an input vertex are collapsed
//! 4. Hull extraction: points on the inner side of every edge of both polygons
//! 5. Duplicate hull points collapsed, slave points always kept
//! 6. Angular ordering around the centroid in a local 2D frame
//!
//! Every coincidence and on-edge test uses the same absolute tolerance.

use tracing::{debug, warn};

use super::vertex::{PolygonRing, Vertex, VertexKind};
use crate::error::{MortarError, Result};
use crate::geometry::Point3;
use crate::types::ElementIndex;

/// Why a pair produced no clip polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoOverlapReason {
    /// Fewer than three hull points survive.
    Disjoint,
    /// The hull has no area (polygons only touch).
    Degenerate,
    /// The master polygon is non-convex but the elements are far apart.
    FarApart,
}

/// Result of clipping one polygon pair.
#[derive(Clone, Debug)]
pub enum ClipOutcome {
    Overlap(PolygonRing),
    NoOverlap(NoOverlapReason),
}

impl ClipOutcome {
    pub fn polygon(&self) -> Option<&PolygonRing> {
        match self {
            ClipOutcome::Overlap(ring) => Some(ring),
            ClipOutcome::NoOverlap(_) => None,
        }
    }
}

/// Clipper for polygons in the plane with the given normal.
#[derive(Clone, Copy, Debug)]
pub struct PolygonClipper {
    normal: Point3,
    tol: f64,
}

impl PolygonClipper {
    /// `tol` is an absolute length; callers scale it by the element size.
    pub fn new(normal: Point3, tol: f64) -> Self {
        Self { normal, tol }
    }

    pub fn tolerance(&self) -> f64 {
        self.tol
    }

    /// Clip `slave` against `master`. `pair` only labels errors.
    pub fn clip(
        &self,
        slave: Vec<Vertex>,
        master: Vec<Vertex>,
        pair: (ElementIndex, ElementIndex),
    ) -> Result<ClipOutcome> {
        let (slave_id, master_id) = pair;
        for (role, poly) in [("slave", &slave), ("master", &master)] {
            if poly.len() < 3 {
                return Err(MortarError::MalformedPolygon {
                    slave: slave_id,
                    master: master_id,
                    role,
                    found: poly.len(),
                });
            }
        }

        let slave = PolygonRing::new(slave);
        let signed_area = slave.signed_area(self.normal);
        if signed_area <= 0.0 {
            return Err(MortarError::SlaveOrientation {
                slave: slave_id,
                master: master_id,
                signed_area,
            });
        }
        let mut master = PolygonRing::new(master);
        if master.signed_area(self.normal) < 0.0 {
            master = master.reversed();
        }

        if let Some(vertex) = slave.convexity_violation(self.normal, self.tol) {
            return Err(MortarError::NonConvexPolygon {
                slave: slave_id,
                master: master_id,
                role: "slave",
                vertex,
            });
        }
        if let Some(vertex) = master.convexity_violation(self.normal, self.tol) {
            let gap = Point3::centroid(&slave.points()).distance(Point3::centroid(&master.points()));
            if gap > slave.radius() + master.radius() {
                warn!(
                    slave = %slave_id,
                    master = %master_id,
                    vertex,
                    "Non-convex master polygon for distant elements, skipping pair"
                );
                return Ok(ClipOutcome::NoOverlap(NoOverlapReason::FarApart));
            }
            return Err(MortarError::NonConvexPolygon {
                slave: slave_id,
                master: master_id,
                role: "master",
                vertex,
            });
        }

        let intersections = self.line_intersections(&slave, &master);
        let intersections: Vec<Vertex> = intersections
            .into_iter()
            .filter(|p| {
                !slave
                    .vertices()
                    .iter()
                    .chain(master.vertices())
                    .any(|v| v.coord.is_close(&p.coord, self.tol))
            })
            .collect();

        let hull: Vec<Vertex> = slave
            .vertices()
            .iter()
            .chain(master.vertices())
            .chain(&intersections)
            .filter(|v| self.inside(&slave, v.coord) && self.inside(&master, v.coord))
            .cloned()
            .collect();

        let points = self.collapse(hull);
        if points.len() < 3 {
            return Ok(ClipOutcome::NoOverlap(NoOverlapReason::Disjoint));
        }
        let ordered = if points.len() == 3 {
            points
        } else {
            self.sort_by_angle(points)
        };
        let ring = PolygonRing::new(ordered);
        if ring.signed_area(self.normal).abs() <= self.tol * ring.perimeter() {
            debug!(slave = %slave_id, master = %master_id, "Clip polygon has no area");
            return Ok(ClipOutcome::NoOverlap(NoOverlapReason::Degenerate));
        }
        Ok(ClipOutcome::Overlap(ring))
    }

    /// Intersections of every slave edge with every master edge.
    fn line_intersections(&self, slave: &PolygonRing, master: &PolygonRing) -> Vec<Vertex> {
        let mut out = Vec::new();
        for i in 0..slave.len() {
            let s0 = slave.vertex(i);
            let s1 = slave.vertex(slave.next(i));
            let e1 = s1.coord - s0.coord;
            for j in 0..master.len() {
                let m0 = master.vertex(j);
                let m1 = master.vertex(master.next(j));
                let e2 = m1.coord - m0.coord;

                if e1.cross(e2).dot(self.normal).abs() <= self.tol * (e1.norm() + e2.norm()) {
                    continue;
                }

                // Signed distances of each edge's ends to the other edge's line.
                let n2 = e2.cross(self.normal);
                let wec_s0 = (s0.coord - m0.coord).dot(n2);
                let wec_s1 = (s1.coord - m0.coord).dot(n2);
                let n1 = e1.cross(self.normal);
                let wec_m0 = (m0.coord - s0.coord).dot(n1);
                let wec_m1 = (m1.coord - s0.coord).dot(n1);

                let alpha = wec_s0 / (wec_s0 - wec_s1);
                let beta = wec_m0 / (wec_m0 - wec_m1);
                if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
                    continue;
                }

                let mut ids = s0.node_ids.clone();
                ids.extend(&s1.node_ids);
                ids.extend(&m0.node_ids);
                ids.extend(&m1.node_ids);
                out.push(Vertex::new(
                    Point3::lerp(s0.coord, s1.coord, alpha),
                    VertexKind::LineIntersection,
                    ids,
                ));
            }
        }
        out
    }

    /// Point on the non-outside side of every edge of a counter-clockwise ring.
    fn inside(&self, ring: &PolygonRing, p: Point3) -> bool {
        (0..ring.len()).all(|i| {
            let a = ring.vertex(i).coord;
            let b = ring.vertex(ring.next(i)).coord;
            match (b - a).cross(self.normal).normalize() {
                Some(outward) => (p - a).dot(outward) <= self.tol,
                None => true,
            }
        })
    }

    /// Drop coincident hull points, keeping slave points first, then master points.
    fn collapse(&self, hull: Vec<Vertex>) -> Vec<Vertex> {
        let mut kept: Vec<Vertex> = Vec::with_capacity(hull.len());
        for kind in [
            VertexKind::Slave,
            VertexKind::ProjectedMaster,
            VertexKind::LineIntersection,
        ] {
            for v in hull.iter().filter(|v| v.kind == kind) {
                let duplicate = kind != VertexKind::Slave
                    && kept.iter().any(|k| k.coord.is_close(&v.coord, self.tol));
                if !duplicate {
                    kept.push(v.clone());
                }
            }
        }
        kept
    }

    /// Order points counter-clockwise by angle, then radius, about the centroid.
    fn sort_by_angle(&self, points: Vec<Vertex>) -> Vec<Vertex> {
        let origin = points[0].coord;
        let Some(x_axis) = (points[1].coord - origin).normalize() else {
            return points;
        };
        let y_axis = self.normal.cross(x_axis);
        let local: Vec<(f64, f64)> = points
            .iter()
            .map(|v| {
                let d = v.coord - origin;
                (d.dot(x_axis), d.dot(y_axis))
            })
            .collect();
        let n = local.len() as f64;
        let cx = local.iter().map(|p| p.0).sum::<f64>() / n;
        let cy = local.iter().map(|p| p.1).sum::<f64>() / n;

        let mut keyed: Vec<(f64, f64, Vertex)> = local
            .iter()
            .zip(points)
            .map(|(&(x, y), v)| {
                let (dx, dy) = (x - cx, y - cy);
                (dy.atan2(dx), dx.hypot(dy), v)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        keyed.into_iter().map(|(_, _, v)| v).collect()
    }
}
