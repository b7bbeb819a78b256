//! Consistent interpolation: P(i, j) = N^master_j(ξ(x_i)).
//!
//! Each slave node is located in the first master column element that
//! contains it; nodes outside every master element get a zero row.

use std::collections::BTreeSet;

use tracing::debug;

use super::search::MeshSide;
use crate::config::MortarConfig;
use crate::error::{MortarError, Result};
use crate::mesh::DofSet;
use crate::sparse::SparseMatrix;

/// Interpolation operator from `master` field values to `slave` dofs.
///
/// Returns the completed operator and the number of unmapped slave nodes.
pub(crate) fn interpolation_operator(
    slave: &MeshSide<'_>,
    master: &MeshSide<'_>,
    config: &MortarConfig,
    label: &str,
) -> Result<(SparseMatrix, usize)> {
    let mut p = SparseMatrix::new(
        label,
        slave.disc.dof_row_map(DofSet::Coupling).clone(),
        master.disc.dof_col_map(DofSet::Coupling).clone(),
    );
    let newton_tol = config.newton_tolerance();
    let mut visited = BTreeSet::new();
    let mut unmapped = 0;
    let mut values = [0.0; 8];

    for (i, geometry) in slave.row_geometry.iter().enumerate() {
        let element = slave.disc.row_element(i);
        let margin = config.scaled_tolerance(geometry.characteristic_length());
        for (&node, &x) in element.nodes().iter().zip(geometry.nodes()) {
            if !visited.insert(node) {
                continue;
            }
            let found = master
                .candidates_at(x, margin, config.search)
                .into_iter()
                .find_map(|j| {
                    master.col_geometry[j]
                        .contains(x, config.local_tolerance, newton_tol, config.newton_max_iterations)
                        .map(|xi| (j, xi))
                });
            let Some((j, xi)) = found else {
                debug!(slave = %element.id(), node = %node, "Slave node outside all master elements");
                unmapped += 1;
                continue;
            };

            let master_element = master.disc.col_element(j);
            master_element.shape().values(&xi, &mut values);
            let row_dofs = slave.disc.node_dofs(node, DofSet::Coupling);
            for (&m, &n_j) in master_element.nodes().iter().zip(&values) {
                let col_dofs = master.disc.node_dofs(m, DofSet::Coupling);
                if col_dofs.len() != row_dofs.len() {
                    return Err(MortarError::DofMismatch {
                        role: "master",
                        node: m.get(),
                        dofs: col_dofs.len(),
                        reference_node: node.get(),
                        expected: row_dofs.len(),
                    });
                }
                for (&r, &c) in row_dofs.iter().zip(col_dofs) {
                    p.assemble(r, c, n_j)?;
                }
            }
        }
    }
    p.complete()?;
    Ok((p, unmapped))
}
