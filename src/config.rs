//! Coupling configuration.

use crate::coupling::CutOptions;
use crate::error::{MortarError, Result};
use crate::polygon::TriangulationStrategy;

/// Lower bound of the Newton step tolerance.
const NEWTON_TOLERANCE_FLOOR: f64 = 1e-14;

/// How overlap regions are integrated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegrationType {
    /// Clip (2D) or cut (3D) every overlapping pair into integration cells.
    #[default]
    Segments,
    /// Integrate each slave element with its own Gauss points, each point
    /// assigned to the master element containing it.
    Elements,
}

/// Which transfer operator is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CouplingType {
    /// P = D⁻¹ M from mortar mass matrices.
    #[default]
    Mortar,
    /// P holds master shape function values at the slave nodes.
    ConsistentInterpolation,
}

/// Candidate master search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Column elements whose bounding boxes intersect the slave's.
    #[default]
    BoundingBox,
    /// Every column element.
    BruteForce,
}

/// Diagonal approximation of D used for D⁻¹.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lumping {
    /// Row sums of D (exact partition of unity).
    #[default]
    RowSum,
    /// Diagonal entries of D.
    Diagonal,
}

/// Configuration for [`VolMortarCoupling`](crate::VolMortarCoupling).
///
/// # Example
/// ```
/// use volmortar::{IntegrationType, MortarConfig};
///
/// let config = MortarConfig::default()
///     .with_quadrature_order(3)
///     .with_integration_type(IntegrationType::Elements);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MortarConfig {
    /// Relative geometric tolerance, scaled by the element pair size.
    pub tolerance: f64,
    /// Reference-coordinate ε for containment tests.
    pub local_tolerance: f64,
    /// Newton iteration limit of the inverse isoparametric map.
    pub newton_max_iterations: usize,
    /// Gauss points per direction.
    pub quadrature_order: usize,
    pub integration_type: IntegrationType,
    pub coupling_type: CouplingType,
    pub triangulation: TriangulationStrategy,
    pub search: SearchStrategy,
    pub lumping: Lumping,
    /// Use element-based integration for contained 3D pairs.
    pub element_based_containment: bool,
    pub cut_options: CutOptions,
}

impl Default for MortarConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            local_tolerance: 1e-8,
            newton_max_iterations: 20,
            quadrature_order: 4,
            integration_type: IntegrationType::Segments,
            coupling_type: CouplingType::Mortar,
            triangulation: TriangulationStrategy::Delaunay,
            search: SearchStrategy::BoundingBox,
            lumping: Lumping::RowSum,
            element_based_containment: true,
            cut_options: CutOptions::default(),
        }
    }
}

impl MortarConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_local_tolerance(mut self, eps: f64) -> Self {
        self.local_tolerance = eps;
        self
    }

    pub fn with_newton_max_iterations(mut self, n: usize) -> Self {
        self.newton_max_iterations = n;
        self
    }

    pub fn with_quadrature_order(mut self, order: usize) -> Self {
        self.quadrature_order = order;
        self
    }

    pub fn with_integration_type(mut self, integration_type: IntegrationType) -> Self {
        self.integration_type = integration_type;
        self
    }

    pub fn with_coupling_type(mut self, coupling_type: CouplingType) -> Self {
        self.coupling_type = coupling_type;
        self
    }

    pub fn with_triangulation(mut self, triangulation: TriangulationStrategy) -> Self {
        self.triangulation = triangulation;
        self
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    pub fn with_lumping(mut self, lumping: Lumping) -> Self {
        self.lumping = lumping;
        self
    }

    pub fn with_element_based_containment(mut self, enabled: bool) -> Self {
        self.element_based_containment = enabled;
        self
    }

    pub fn with_cut_options(mut self, options: CutOptions) -> Self {
        self.cut_options = options;
        self
    }

    /// Check value ranges.
    ///
    /// Cut options must keep inside cells and classify them, since only
    /// classified inside cells become integration cells.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(MortarError::invalid_config(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !(self.local_tolerance >= 0.0 && self.local_tolerance < 1.0) {
            return Err(MortarError::invalid_config(format!(
                "local_tolerance must be in [0, 1), got {}",
                self.local_tolerance
            )));
        }
        if self.newton_max_iterations == 0 {
            return Err(MortarError::invalid_config("newton_max_iterations must be positive"));
        }
        if self.quadrature_order == 0 {
            return Err(MortarError::invalid_config("quadrature_order must be positive"));
        }
        if !self.cut_options.include_inner || !self.cut_options.classify_positions {
            return Err(MortarError::invalid_config(
                "cut options must include and classify inner cells",
            ));
        }
        Ok(())
    }

    /// Absolute tolerance for a pair of length scale `h`.
    pub(crate) fn scaled_tolerance(&self, h: f64) -> f64 {
        self.tolerance * h
    }

    /// Step tolerance of the inverse isoparametric map, never below round-off.
    pub fn newton_tolerance(&self) -> f64 {
        self.tolerance.max(NEWTON_TOLERANCE_FLOOR)
    }
}
