//! Typed polygon vertices and index-linked polygon rings.

use crate::geometry::{Point3, polygon_area_vector};

/// Origin of a polygon vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexKind {
    /// Node of the slave element.
    Slave,
    /// Node of the master element, projected into the auxiliary plane.
    ProjectedMaster,
    /// Intersection of a slave edge with a master edge.
    LineIntersection,
}

/// A polygon vertex with the node ids it was derived from.
///
/// Slave and master vertices carry their own node id; line intersections
/// carry the end nodes of both edges (slave edge first).
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub coord: Point3,
    pub kind: VertexKind,
    pub node_ids: Vec<usize>,
}

impl Vertex {
    pub fn new(coord: Point3, kind: VertexKind, node_ids: Vec<usize>) -> Self {
        Self {
            coord,
            kind,
            node_ids,
        }
    }

    pub fn slave(coord: Point3, node: usize) -> Self {
        Self::new(coord, VertexKind::Slave, vec![node])
    }

    pub fn master(coord: Point3, node: usize) -> Self {
        Self::new(coord, VertexKind::ProjectedMaster, vec![node])
    }
}

/// An ordered cyclic polygon.
///
/// Vertices live in one arena; `next`/`prev` are indices into it and are
/// rebuilt whenever the vertex set changes, so a ring never refers to a
/// vertex list it does not own.
#[derive(Clone, Debug)]
pub struct PolygonRing {
    vertices: Vec<Vertex>,
    next: Vec<usize>,
    prev: Vec<usize>,
}

impl PolygonRing {
    /// Link the vertices in the given order.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let n = vertices.len();
        let next = (0..n).map(|i| (i + 1) % n).collect();
        let prev = (0..n).map(|i| (i + n - 1) % n).collect();
        Self {
            vertices,
            next,
            prev,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, i: usize) -> &Vertex {
        &self.vertices[i]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn next(&self, i: usize) -> usize {
        self.next[i]
    }

    #[inline]
    pub fn prev(&self, i: usize) -> usize {
        self.prev[i]
    }

    /// Vertex indices in ring order starting at `start`.
    pub fn walk(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        let mut current = Some(start);
        let mut remaining = self.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let i = current?;
            current = Some(self.next[i]);
            Some(i)
        })
    }

    /// Coordinates in ring order.
    pub fn points(&self) -> Vec<Point3> {
        if self.is_empty() {
            return Vec::new();
        }
        self.walk(0).map(|i| self.vertices[i].coord).collect()
    }

    /// Area, positive when the ring is counter-clockwise about `normal`.
    pub fn signed_area(&self, normal: Point3) -> f64 {
        0.5 * polygon_area_vector(&self.points()).dot(normal)
    }

    /// Reverse the traversal direction.
    pub fn reversed(self) -> Self {
        let mut vertices = self.vertices;
        vertices.reverse();
        Self::new(vertices)
    }

    /// First vertex at which the ring turns outward, if any.
    ///
    /// For a counter-clockwise ring the outward normal of edge i is
    /// e_i × normal; a convex ring has n_i · e_{i+1} <= 0 everywhere.
    pub fn convexity_violation(&self, normal: Point3, tol: f64) -> Option<usize> {
        let n = self.len();
        (0..n).find(|&i| {
            let a = self.vertices[i].coord;
            let b = self.vertices[self.next[i]].coord;
            let c = self.vertices[self.next[self.next[i]]].coord;
            let edge = b - a;
            let next_edge = c - b;
            edge.cross(normal).dot(next_edge) > tol * (edge.norm() + next_edge.norm())
        })
        .map(|i| self.next[i])
    }

    /// Perimeter length.
    pub fn perimeter(&self) -> f64 {
        (0..self.len())
            .map(|i| self.vertices[i].coord.distance(self.vertices[self.next[i]].coord))
            .sum()
    }

    /// Largest distance from the vertex centroid to a vertex.
    pub fn radius(&self) -> f64 {
        let center = Point3::centroid(&self.points());
        self.vertices
            .iter()
            .map(|v| v.coord.distance(center))
            .fold(0.0, f64::max)
    }
}
