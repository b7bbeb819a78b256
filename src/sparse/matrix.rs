//! Row-distributed sparse matrix with assemble/complete semantics.
//!
//! Assembly appends triplets in local row/column indices after the global
//! ids have been checked against the maps. `complete()` compresses them into
//! a faer `SparseRowMat`, summing duplicates; from then on the matrix is
//! read-only.

use faer::sparse::{SparseRowMat, Triplet};
use faer::{ColRef, Mat};

use crate::error::{MortarError, Result};
use crate::mesh::DofMap;

#[derive(Clone, Debug)]
enum Storage {
    Assembling(Vec<Triplet<usize, usize, f64>>),
    Completed(SparseRowMat<usize, f64>),
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Storage::Assembling(a), Storage::Assembling(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| (x.row, x.col, x.val) == (y.row, y.col, y.val))
            }
            (Storage::Completed(a), Storage::Completed(b)) => {
                let (sa, sb) = (a.symbolic(), b.symbolic());
                sa.nrows() == sb.nrows()
                    && sa.ncols() == sb.ncols()
                    && sa.row_ptr() == sb.row_ptr()
                    && sa.col_idx() == sb.col_idx()
                    && a.val() == b.val()
            }
            _ => false,
        }
    }
}

/// Sparse matrix indexed by global dof ids.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    label: String,
    row_map: DofMap,
    col_map: DofMap,
    storage: Storage,
}

impl SparseMatrix {
    pub fn new(label: impl Into<String>, row_map: DofMap, col_map: DofMap) -> Self {
        Self {
            label: label.into(),
            row_map,
            col_map,
            storage: Storage::Assembling(Vec::new()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn row_map(&self) -> &DofMap {
        &self.row_map
    }

    pub fn col_map(&self) -> &DofMap {
        &self.col_map
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.storage, Storage::Completed(_))
    }

    /// Add `value` to entry (row, col), both given as global ids.
    pub fn assemble(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let Storage::Assembling(triplets) = &mut self.storage else {
            return Err(MortarError::MatrixCompleted(self.label.clone()));
        };
        let row_lid = self.row_map.lid(row).ok_or_else(|| MortarError::RowNotOwned {
            matrix: self.label.clone(),
            gid: row,
        })?;
        let col_lid = self.col_map.lid(col).ok_or_else(|| MortarError::UnknownColumn {
            matrix: self.label.clone(),
            gid: col,
        })?;
        triplets.push(Triplet::new(row_lid, col_lid, value));
        Ok(())
    }

    /// Add a dense local block: `block[(i, j)]` goes to (`rows[i]`, `cols[j]`).
    pub fn assemble_block(&mut self, rows: &[usize], cols: &[usize], block: &Mat<f64>) -> Result<()> {
        for (i, &r) in rows.iter().enumerate() {
            for (j, &c) in cols.iter().enumerate() {
                self.assemble(r, c, block[(i, j)])?;
            }
        }
        Ok(())
    }

    /// Compress the assembled triplets. Calling it again is a no-op.
    pub fn complete(&mut self) -> Result<()> {
        let Storage::Assembling(triplets) = &self.storage else {
            return Ok(());
        };
        let (nrows, ncols) = (self.row_map.len(), self.col_map.len());
        let csr = SparseRowMat::<usize, f64>::try_new_from_triplets(nrows, ncols, triplets).map_err(|source| {
            MortarError::SparseStorage {
                matrix: self.label.clone(),
                source,
            }
        })?;
        self.storage = Storage::Completed(csr);
        Ok(())
    }

    fn csr(&self) -> Result<&SparseRowMat<usize, f64>> {
        match &self.storage {
            Storage::Completed(csr) => Ok(csr),
            Storage::Assembling(_) => Err(MortarError::MatrixNotCompleted(self.label.clone())),
        }
    }

    fn row_lid(&self, gid: usize) -> Result<usize> {
        self.row_map.lid(gid).ok_or_else(|| MortarError::RowNotOwned {
            matrix: self.label.clone(),
            gid,
        })
    }

    /// Stored (column gid, value) pairs of a row, in column map order.
    pub fn row(&self, gid: usize) -> Result<Vec<(usize, f64)>> {
        let csr = self.csr()?;
        let lid = self.row_lid(gid)?;
        Ok(csr
            .symbolic()
            .col_idx_of_row_raw(lid)
            .iter()
            .zip(csr.val_of_row(lid))
            .map(|(&c, &v)| (self.col_map.gid(c), v))
            .collect())
    }

    /// Entry (row, col); zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let csr = self.csr()?;
        let lid = self.row_lid(row)?;
        let Some(col_lid) = self.col_map.lid(col) else {
            return Ok(0.0);
        };
        let cols = csr.symbolic().col_idx_of_row_raw(lid);
        Ok(cols
            .binary_search(&col_lid)
            .map(|k| csr.val_of_row(lid)[k])
            .unwrap_or(0.0))
    }

    pub fn nnz(&self) -> Result<usize> {
        Ok(self.csr()?.val().len())
    }

    /// Diagonal entries in row map order.
    pub fn diagonal(&self) -> Result<Vec<f64>> {
        self.row_map.gids().iter().map(|&g| self.get(g, g)).collect()
    }

    /// Row sums in row map order.
    pub fn row_sums(&self) -> Result<Vec<f64>> {
        let csr = self.csr()?;
        Ok((0..self.row_map.len())
            .map(|lid| csr.val_of_row(lid).iter().sum())
            .collect())
    }

    /// diag(scale) * self as a new completed matrix.
    pub fn left_scaled(&self, scale: &[f64], label: impl Into<String>) -> Result<SparseMatrix> {
        let mut csr = self.csr()?.clone();
        if scale.len() != self.row_map.len() {
            return Err(MortarError::VectorLength {
                expected: self.row_map.len(),
                actual: scale.len(),
            });
        }
        for (lid, &s) in scale.iter().enumerate() {
            for v in csr.val_of_row_mut(lid) {
                *v *= s;
            }
        }
        Ok(SparseMatrix {
            label: label.into(),
            row_map: self.row_map.clone(),
            col_map: self.col_map.clone(),
            storage: Storage::Completed(csr),
        })
    }

    /// y = A x, with `x` in column map order and `y` in row map order.
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>> {
        let csr = self.csr()?;
        if x.len() != self.col_map.len() {
            return Err(MortarError::VectorLength {
                expected: self.col_map.len(),
                actual: x.len(),
            });
        }
        let y = csr.as_ref() * ColRef::from_slice(x);
        Ok(y.iter().copied().collect())
    }

    /// Dense copy, rows and columns in map order.
    pub fn to_dense(&self) -> Result<Mat<f64>> {
        Ok(self.csr()?.to_dense())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> SparseMatrix {
        SparseMatrix::new("A", DofMap::new([0, 1, 2]), DofMap::new([0, 1, 2, 3]))
    }

    #[test]
    fn test_assemble_sums_duplicates() {
        let mut a = matrix();
        a.assemble(1, 3, 0.5).unwrap();
        a.assemble(1, 3, 0.25).unwrap();
        a.assemble(1, 0, 1.0).unwrap();
        a.complete().unwrap();
        assert_eq!(a.get(1, 3).unwrap(), 0.75);
        assert_eq!(a.get(1, 2).unwrap(), 0.0);
        assert_eq!(a.nnz().unwrap(), 2);
        assert_eq!(a.row(1).unwrap(), vec![(0, 1.0), (3, 0.75)]);
    }

    #[test]
    fn test_row_reports_global_column_ids() {
        let mut a = SparseMatrix::new("A", DofMap::new([10, 20]), DofMap::new([30, 5, 12]));
        a.assemble(20, 12, 2.0).unwrap();
        a.assemble(20, 30, 1.0).unwrap();
        a.complete().unwrap();
        assert_eq!(a.row(20).unwrap(), vec![(30, 1.0), (12, 2.0)]);
        assert_eq!(a.get(20, 5).unwrap(), 0.0);
        assert_eq!(a.get(20, 99).unwrap(), 0.0);
        assert!(a.row(10).unwrap().is_empty());
        assert!(matches!(a.row(11), Err(MortarError::RowNotOwned { gid: 11, .. })));
    }

    #[test]
    fn test_ownership_and_state_errors() {
        let mut a = matrix();
        assert!(matches!(a.assemble(7, 0, 1.0), Err(MortarError::RowNotOwned { gid: 7, .. })));
        assert!(matches!(a.assemble(0, 9, 1.0), Err(MortarError::UnknownColumn { gid: 9, .. })));
        assert!(matches!(a.diagonal(), Err(MortarError::MatrixNotCompleted(_))));
        a.complete().unwrap();
        assert!(matches!(a.assemble(0, 0, 1.0), Err(MortarError::MatrixCompleted(_))));
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut a = matrix();
        a.assemble(2, 1, 3.0).unwrap();
        a.complete().unwrap();
        let first = a.clone();
        a.complete().unwrap();
        assert_eq!(a, first);
        assert_ne!(a, matrix());
    }

    #[test]
    fn test_scaling_and_products() {
        let mut a = matrix();
        let mut block = Mat::<f64>::zeros(2, 2);
        block[(0, 0)] = 2.0;
        block[(0, 1)] = 1.0;
        block[(1, 1)] = 4.0;
        a.assemble_block(&[0, 2], &[0, 2], &block).unwrap();
        a.complete().unwrap();
        assert_eq!(a.diagonal().unwrap(), vec![2.0, 0.0, 4.0]);
        assert_eq!(a.row_sums().unwrap(), vec![3.0, 0.0, 4.0]);

        let p = a.left_scaled(&[0.5, 1.0, 0.25], "P").unwrap();
        assert_eq!(p.label(), "P");
        assert_eq!(p.row_sums().unwrap(), vec![1.5, 0.0, 1.0]);
        assert_eq!(p.matvec(&[1.0, 1.0, 1.0, 1.0]).unwrap(), vec![1.5, 0.0, 1.0]);
        assert!(matches!(p.matvec(&[1.0]), Err(MortarError::VectorLength { .. })));
        assert!(matches!(a.left_scaled(&[1.0], "Q"), Err(MortarError::VectorLength { .. })));

        let dense = p.to_dense().unwrap();
        assert_eq!(dense[(0, 2)], 0.5);
        assert_eq!(dense.ncols(), 4);
    }

    #[test]
    fn test_empty_matrix_completes() {
        let mut a = SparseMatrix::new("E", DofMap::new([0, 1]), DofMap::new([]));
        a.complete().unwrap();
        assert_eq!(a.nnz().unwrap(), 0);
        assert_eq!(a.row_sums().unwrap(), vec![0.0, 0.0]);
        assert_eq!(a.matvec(&[]).unwrap(), vec![0.0, 0.0]);
    }
}
