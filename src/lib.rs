//! # volmortar
//!
//! Volumetric mortar coupling of two non-matching finite element meshes.
//!
//! Given discretizations A and B covering overlapping volumes, this crate
//! builds the mortar matrices and the transfer operators between them:
//! - D_A, M_A and P_A = D_A⁻¹ M_A, mapping B-fields onto A
//! - D_B, M_B and P_B = D_B⁻¹ M_B, mapping A-fields onto B
//!
//! The building blocks are:
//! - Polygon clipping and Delaunay triangulation of overlap regions (2D)
//! - Overlap classification and polyhedral cutting of element pairs (3D)
//! - Gauss and collapsed-coordinate quadrature on integration cells
//! - Linear Lagrange elements with Newton-based inverse mapping
//!
//! ```
//! use volmortar::{Mesh, MortarConfig, VolMortarCoupling};
//!
//! let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 2, 2);
//! let b = Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 3, 3);
//! let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default())?;
//! let report = coupling.evaluate()?;
//! println!("{report}");
//! # Ok::<(), volmortar::MortarError>(())
//! ```

pub mod config;
pub mod coupling;
pub mod element;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod polygon;
pub mod quadrature;
pub mod sparse;
pub mod types;

pub use config::{CouplingType, IntegrationType, Lumping, MortarConfig, SearchStrategy};
pub use coupling::{
    ConvexCutEngine, CouplingReport, CutEngine, CutOptions, OverlapClassifier, PairClass,
    VolMortarCoupling,
};
pub use element::{ElementGeometry, Shape};
pub use error::{MortarError, Result};
pub use geometry::{BoundingBox, Cell, Point3};
pub use mesh::{Discretization, DofMap, DofSet, Element, Mesh};
pub use polygon::{ClipOutcome, PolygonClipper, TriangulationStrategy, Vertex, triangulate};
pub use sparse::SparseMatrix;
pub use types::{ElementIndex, NodeIndex};
