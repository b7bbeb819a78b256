//! Overlap classification of 3D element pairs.

use crate::element::ElementGeometry;

/// Integration strategy for one (slave, master) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairClass {
    /// Slave lies inside the master: integrate over the slave element.
    SlaveInMaster,
    /// Master lies inside the slave: integrate over the master element.
    MasterInSlave,
    /// Elements overlap partially: integrate over cut cells.
    Partial,
    Disjoint,
}

/// Decides containment by inverse isoparametric mapping of element nodes.
#[derive(Clone, Copy, Debug)]
pub struct OverlapClassifier {
    /// Reference-coordinate tolerance ε of the containment tests.
    pub local_tolerance: f64,
    /// Newton increment tolerance.
    pub newton_tolerance: f64,
    pub newton_max_iterations: usize,
    /// Relative geometric tolerance for the bounding box fallback.
    pub tolerance: f64,
    /// Run the two containment checks; otherwise any overlap is `Partial`.
    pub element_based: bool,
}

impl OverlapClassifier {
    pub fn classify(&self, slave: &ElementGeometry, master: &ElementGeometry) -> PairClass {
        if self.element_based {
            if self.all_nodes_inside(slave, master) {
                return PairClass::SlaveInMaster;
            }
            if self.all_nodes_inside(master, slave) {
                return PairClass::MasterInSlave;
            }
        }

        if self.any_node_strictly_inside(slave, master) || self.any_node_strictly_inside(master, slave) {
            return PairClass::Partial;
        }

        // Overlaps without any node in the other element's interior (shared
        // faces, crossing edges) are left to the cut.
        let h = slave.characteristic_length().max(master.characteristic_length());
        let overlap = slave.bounding_box().overlap_volume(&master.bounding_box());
        if overlap > self.tolerance * h * h * h {
            PairClass::Partial
        } else {
            PairClass::Disjoint
        }
    }

    fn all_nodes_inside(&self, inner: &ElementGeometry, outer: &ElementGeometry) -> bool {
        inner.nodes().iter().all(|&x| {
            outer
                .contains(x, self.local_tolerance, self.newton_tolerance, self.newton_max_iterations)
                .is_some()
        })
    }

    fn any_node_strictly_inside(&self, inner: &ElementGeometry, outer: &ElementGeometry) -> bool {
        inner.nodes().iter().any(|&x| {
            outer
                .to_local(x, self.newton_tolerance, self.newton_max_iterations)
                .is_some_and(|xi| outer.shape().is_strictly_inside(&xi, self.local_tolerance))
        })
    }
}
