//! Cached element geometry and candidate master search.

use crate::config::SearchStrategy;
use crate::element::ElementGeometry;
use crate::geometry::{BoundingBox, Point3};
use crate::mesh::Discretization;

/// One discretization with its element geometries and column bounding boxes.
pub(crate) struct MeshSide<'d> {
    pub disc: &'d dyn Discretization,
    pub row_geometry: Vec<ElementGeometry>,
    pub col_geometry: Vec<ElementGeometry>,
    col_boxes: Vec<BoundingBox>,
}

impl<'d> MeshSide<'d> {
    pub fn new(disc: &'d dyn Discretization) -> Self {
        let row_geometry: Vec<ElementGeometry> = (0..disc.num_row_elements())
            .map(|i| disc.element_geometry(disc.row_element(i)))
            .collect();
        let col_geometry: Vec<ElementGeometry> = (0..disc.num_col_elements())
            .map(|j| disc.element_geometry(disc.col_element(j)))
            .collect();
        let col_boxes = col_geometry.iter().map(ElementGeometry::bounding_box).collect();
        Self {
            disc,
            row_geometry,
            col_geometry,
            col_boxes,
        }
    }

    /// Column elements that may overlap `slave`, and how many were rejected.
    ///
    /// With `ghosts_only` owned column elements are skipped without counting.
    pub fn candidates(
        &self,
        slave: &BoundingBox,
        margin: f64,
        strategy: SearchStrategy,
        ghosts_only: bool,
    ) -> (Vec<usize>, usize) {
        let mut found = Vec::new();
        let mut rejected = 0;
        for (j, bb) in self.col_boxes.iter().enumerate() {
            if ghosts_only && self.disc.col_element(j).owned {
                continue;
            }
            match strategy {
                SearchStrategy::BruteForce => found.push(j),
                SearchStrategy::BoundingBox if bb.intersects(slave, margin) => found.push(j),
                SearchStrategy::BoundingBox => rejected += 1,
            }
        }
        (found, rejected)
    }

    /// Column elements whose (expanded) bounding box contains `x`.
    pub fn candidates_at(&self, x: Point3, margin: f64, strategy: SearchStrategy) -> Vec<usize> {
        match strategy {
            SearchStrategy::BruteForce => (0..self.col_boxes.len()).collect(),
            SearchStrategy::BoundingBox => self
                .col_boxes
                .iter()
                .enumerate()
                .filter(|(_, bb)| bb.contains(x, margin))
                .map(|(j, _)| j)
                .collect(),
        }
    }
}
