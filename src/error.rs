//! Error type for the coupling engine.
//!
//! Only unrecoverable conditions live here. Expected geometric outcomes
//! (no overlap between a pair, Delaunay breakdown on a near-degenerate
//! polygon) are reported through plain enums at the call site instead.

use crate::element::Shape;
use crate::types::ElementIndex;
use thiserror::Error;

/// Fatal errors of the mortar coupling.
#[derive(Debug, Error)]
pub enum MortarError {
    /// A polygon passed to the clipper has fewer than three vertices.
    #[error("Malformed polygon for pair (slave {slave}, master {master}): {role} has {found} vertices, need at least 3")]
    MalformedPolygon {
        slave: ElementIndex,
        master: ElementIndex,
        role: &'static str,
        found: usize,
    },

    /// The slave polygon is not counter-clockwise about the auxiliary plane normal.
    #[error("Slave polygon of pair (slave {slave}, master {master}) is clockwise (signed area {signed_area:e})")]
    SlaveOrientation {
        slave: ElementIndex,
        master: ElementIndex,
        signed_area: f64,
    },

    /// A polygon violates convexity beyond tolerance while the elements are close.
    #[error("Non-convex {role} polygon for pair (slave {slave}, master {master}) at vertex {vertex}")]
    NonConvexPolygon {
        slave: ElementIndex,
        master: ElementIndex,
        role: &'static str,
        vertex: usize,
    },

    /// The integrator has no rule for this combination of element shapes.
    #[error("Unsupported shape combination: slave {slave:?}, master {master:?}")]
    UnsupportedShapePair { slave: Shape, master: Shape },

    /// A quadrature point inside a detected overlap could not be mapped into an element.
    #[error("Inverse mapping failed in element {element} for pair (slave {slave}, master {master}) at point ({x:.6e}, {y:.6e}, {z:.6e})")]
    InverseMapping {
        element: ElementIndex,
        slave: ElementIndex,
        master: ElementIndex,
        x: f64,
        y: f64,
        z: f64,
    },

    /// An element has a vanishing or inverted Jacobian.
    #[error("Degenerate element {element}: Jacobian determinant {det_j:e}")]
    DegenerateElement { element: ElementIndex, det_j: f64 },

    /// The two discretizations live in different spatial dimensions.
    #[error("Dimension mismatch: {a} is {dim_a}D, {b} is {dim_b}D")]
    DimensionMismatch {
        a: String,
        b: String,
        dim_a: usize,
        dim_b: usize,
    },

    /// Both sides must expose the same number of coupling dofs per node.
    #[error("Coupling dof mismatch: {role} node {node} has {dofs} dofs, slave node {reference_node} has {expected}")]
    DofMismatch {
        role: &'static str,
        node: usize,
        dofs: usize,
        reference_node: usize,
        expected: usize,
    },

    /// A row was assembled that the matrix row map does not own.
    #[error("Row {gid} is not owned by the row map of {matrix}")]
    RowNotOwned { matrix: String, gid: usize },

    /// A column id is unknown to the matrix column map.
    #[error("Column {gid} is not in the column map of {matrix}")]
    UnknownColumn { matrix: String, gid: usize },

    /// The matrix was read before `complete()` was called.
    #[error("Matrix {0} has not been completed")]
    MatrixNotCompleted(String),

    /// Assembly into a completed matrix.
    #[error("Matrix {0} is already completed and read-only")]
    MatrixCompleted(String),

    /// The assembled triplets could not be compressed.
    #[error("Failed to compress {matrix}: {source}")]
    SparseStorage {
        matrix: String,
        #[source]
        source: faer::sparse::CreationError,
    },

    /// Vector length does not match the map it is applied with.
    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    VectorLength { expected: usize, actual: usize },

    /// The requested operator is not produced by the configured coupling type.
    #[error("Operator {0} is not available for this coupling type or before evaluate()")]
    OperatorUnavailable(&'static str),

    /// The external cut engine reported an error.
    #[error("Cut engine failed for pair (slave {slave}, master {master}): {message}")]
    CutEngine {
        slave: ElementIndex,
        master: ElementIndex,
        message: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Inconsistent mesh input.
    #[error("Invalid mesh {mesh}: {message}")]
    InvalidMesh { mesh: String, message: String },
}

impl MortarError {
    /// Create a cut engine error.
    pub fn cut_engine(slave: ElementIndex, master: ElementIndex, message: impl Into<String>) -> Self {
        MortarError::CutEngine {
            slave,
            master,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MortarError::InvalidConfig(message.into())
    }

    /// Create an invalid mesh error.
    pub fn invalid_mesh(mesh: impl Into<String>, message: impl Into<String>) -> Self {
        MortarError::InvalidMesh {
            mesh: mesh.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MortarError>;
