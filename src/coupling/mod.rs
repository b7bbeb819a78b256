//! Volumetric coupling of two non-matching discretizations.
//!
//! This module provides:
//! - The overlap classifier for 3D element pairs
//! - The cut engine interface with a convex reference engine
//! - Pair integrators for the mortar matrices D and M
//! - Projection operators P = D⁻¹ M and consistent interpolation
//! - [`VolMortarCoupling`], which drives the element-pair loop

mod classify;
mod convex_cut;
mod cut;
mod engine;
mod integrator;
mod interpolation;
mod projection;
mod report;
mod search;

pub use classify::{OverlapClassifier, PairClass};
pub use convex_cut::ConvexCutEngine;
pub use cut::{
    BackgroundVolume, BoundaryQuadrature, CutAdapter, CutElement, CutEngine, CutInput, CutOptions,
    CutResult, CutterSurface, Position, VolumeCell, VolumeQuadrature,
};
pub use engine::VolMortarCoupling;
pub use integrator::{
    LocalMortar, MappingOptions, PairGeometry, PairIntegrator, PhysicalPoint, PhysicalQuadrature,
    integrator_for,
};
pub use projection::{build_projection, lumped_inverse};
pub use report::CouplingReport;
