//! Sparse matrices for the mortar and projection operators.

mod matrix;

pub use matrix::SparseMatrix;
