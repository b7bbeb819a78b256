//! Reference cut engine for convex elements with planar faces.
//!
//! The background element becomes a convex polyhedron that is split by the
//! plane of every cutter face in turn. Whatever lies in front of a face
//! plane is outside the cutter; the final remainder is the inside cell.

use tracing::debug;

use super::cut::{
    BoundaryQuadrature, CutElement, CutEngine, CutInput, CutOptions, CutResult, Position, VolumeCell,
    VolumeQuadrature,
};
use crate::error::{MortarError, Result};
use crate::geometry::{Plane, Polyhedron};

/// Plane-splitting cut engine.
///
/// Only tessellated volume and boundary quadrature are supported; other
/// choices are rejected. Each cut runs on the calling thread, so
/// `CutOptions::parallel` has no effect here.
#[derive(Clone, Copy, Debug)]
pub struct ConvexCutEngine {
    /// Geometric tolerance relative to the background element size.
    pub tolerance: f64,
}

impl Default for ConvexCutEngine {
    fn default() -> Self {
        Self { tolerance: 1e-12 }
    }
}

impl ConvexCutEngine {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl CutEngine for ConvexCutEngine {
    fn cut(&self, input: &CutInput, options: &CutOptions) -> Result<CutResult> {
        let slave = input.cutter.element;
        let master = input.background.element;
        if options.volume_quadrature != VolumeQuadrature::Tessellation {
            return Err(MortarError::cut_engine(
                slave,
                master,
                format!("{:?} volume quadrature is not supported", options.volume_quadrature),
            ));
        }
        if options.boundary_quadrature != BoundaryQuadrature::Tessellation {
            return Err(MortarError::cut_engine(
                slave,
                master,
                format!("{:?} boundary quadrature is not supported", options.boundary_quadrature),
            ));
        }

        let geometry = &input.background.geometry;
        let tol = self.tolerance * geometry.characteristic_length();
        let background = Polyhedron::from_faces(
            (0..geometry.shape().faces().len())
                .map(|f| geometry.face_points(f))
                .collect(),
        );

        let cutter_nodes = input.displaced_cutter_nodes();
        let cutter = Polyhedron::from_faces(
            input
                .cutter
                .faces
                .iter()
                .map(|f| f.iter().map(|&i| cutter_nodes[i]).collect())
                .collect(),
        );
        if cutter.volume() <= tol * tol * tol {
            return Err(MortarError::cut_engine(slave, master, "cutter surface encloses no volume"));
        }

        let position = |p: Position| {
            if options.classify_positions { p } else { Position::Undecided }
        };

        let mut volume_cells = Vec::new();
        let mut remainder = Some(background);
        for face in cutter.faces() {
            let Some(plane) = Plane::from_polygon(face) else {
                continue;
            };
            let Some(current) = remainder.take() else {
                break;
            };
            let (back, front) = current.split(&plane, tol);
            if let Some(outside) = front {
                volume_cells.push(VolumeCell {
                    position: position(Position::Outside),
                    integration_cells: outside.tetrahedralize(tol),
                });
            }
            remainder = back;
        }

        if options.include_inner {
            if let Some(inside) = remainder {
                volume_cells.push(VolumeCell {
                    position: position(Position::Inside),
                    integration_cells: inside.tetrahedralize(tol),
                });
            }
        }

        if options.debug_output {
            for (k, vc) in volume_cells.iter().enumerate() {
                debug!(
                    slave = %slave,
                    master = %master,
                    cell = k,
                    position = ?vc.position,
                    tets = vc.integration_cells.len(),
                    volume = vc.volume(),
                    "Volume cell"
                );
            }
        }

        let mut result = CutResult::default();
        if !volume_cells.is_empty() {
            result.insert(master, CutElement { volume_cells });
        }
        Ok(result)
    }
}
