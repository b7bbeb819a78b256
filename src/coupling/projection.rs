//! Projection operator P = D⁻¹ M with a lumped D.

use tracing::debug;

use crate::config::Lumping;
use crate::error::Result;
use crate::sparse::SparseMatrix;

/// Lumped diagonal of D with tiny entries replaced by one.
///
/// Entries with |d| <= `tol * max|d|` belong to dofs that no master element
/// overlaps; their M rows are empty as well, so the placeholder leaves a
/// zero row in P. Returns the inverted diagonal and the substitution count.
pub fn lumped_inverse(d: &SparseMatrix, lumping: Lumping, tol: f64) -> Result<(Vec<f64>, usize)> {
    let lumped = match lumping {
        Lumping::RowSum => d.row_sums()?,
        Lumping::Diagonal => d.diagonal()?,
    };
    let scale = lumped.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let threshold = tol * scale;

    let mut substitutions = 0;
    let inverse = lumped
        .into_iter()
        .map(|v| {
            if v.abs() <= threshold {
                substitutions += 1;
                1.0
            } else {
                1.0 / v
            }
        })
        .collect();
    Ok((inverse, substitutions))
}

/// P = lumped(D)⁻¹ M. Returns the operator and the substitution count.
pub fn build_projection(
    d: &SparseMatrix,
    m: &SparseMatrix,
    lumping: Lumping,
    tol: f64,
    label: &str,
) -> Result<(SparseMatrix, usize)> {
    let (inverse, substitutions) = lumped_inverse(d, lumping, tol)?;
    if substitutions > 0 {
        debug!(operator = label, substitutions, "Uncoupled rows in projection");
    }
    Ok((m.left_scaled(&inverse, label)?, substitutions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::DofMap;

    fn completed(label: &str, entries: &[(usize, usize, f64)], cols: &[usize]) -> SparseMatrix {
        let mut a = SparseMatrix::new(label, DofMap::new([0, 1, 2]), DofMap::new(cols.iter().copied()));
        for &(r, c, v) in entries {
            a.assemble(r, c, v).unwrap();
        }
        a.complete().unwrap();
        a
    }

    #[test]
    fn test_row_sum_lumping_reproduces_constants() {
        let d = completed("D", &[(0, 0, 2.0), (0, 1, 1.0), (1, 1, 3.0), (1, 0, 1.0)], &[0, 1, 2]);
        let m = completed("M", &[(0, 10, 1.5), (0, 11, 1.5), (1, 11, 4.0)], &[10, 11]);
        let (p, substitutions) = build_projection(&d, &m, Lumping::RowSum, 1e-12, "P").unwrap();
        assert_eq!(substitutions, 1);
        let y = p.matvec(&[2.0, 2.0]).unwrap();
        assert!((y[0] - 2.0).abs() < 1e-15);
        assert!((y[1] - 2.0).abs() < 1e-15);
        assert_eq!(y[2], 0.0);
    }

    #[test]
    fn test_diagonal_lumping() {
        let d = completed("D", &[(0, 0, 2.0), (0, 1, 1.0), (1, 1, 4.0), (2, 2, 1.0)], &[0, 1, 2]);
        let (inverse, substitutions) = lumped_inverse(&d, Lumping::Diagonal, 1e-12).unwrap();
        assert_eq!(substitutions, 0);
        assert_eq!(inverse, vec![0.5, 0.25, 1.0]);
    }
}
