//! Mortar mass integration over cells and elements.
//!
//! For quadrature points x_q with physical weights w_q (reference weight
//! times |det J| of the integration domain):
//!
//! D_ij += N^s_i(ξ_s(x_q)) N^s_j(ξ_s(x_q)) w_q
//! M_ij += N^s_i(ξ_s(x_q)) N^m_j(ξ_m(x_q)) w_q
//!
//! where ξ_s and ξ_m are the inverse isoparametric maps of the slave and
//! master element. The pair integrator is selected once per shape pair and
//! monomorphized over both shape function types.

use faer::Mat;

use crate::element::{ElementGeometry, Hex8, Quad4, Shape, ShapeFunctions, Tet4, Tri3};
use crate::error::{MortarError, Result};
use crate::geometry::{Cell, Point3};
use crate::quadrature::QuadratureRule;
use crate::types::ElementIndex;

/// A quadrature point in physical space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalPoint {
    pub x: Point3,
    pub weight: f64,
}

/// Quadrature points of an integration domain in physical space.
#[derive(Clone, Debug, Default)]
pub struct PhysicalQuadrature {
    points: Vec<PhysicalPoint>,
}

impl PhysicalQuadrature {
    pub fn from_points(points: Vec<PhysicalPoint>) -> Self {
        Self { points }
    }

    /// Gauss points of simplicial integration cells.
    pub fn from_cells(cells: &[Cell], order: usize) -> Self {
        let mut points = Vec::new();
        for cell in cells {
            let rule = QuadratureRule::for_cell(cell.shape(), order);
            let det = cell.det_jacobian();
            points.extend(rule.iter().map(|(xi, w)| PhysicalPoint {
                x: cell.to_physical(*xi),
                weight: w * det,
            }));
        }
        Self { points }
    }

    /// Gauss points of a whole element.
    pub fn from_element(geometry: &ElementGeometry, order: usize) -> Self {
        let rule = QuadratureRule::for_shape(geometry.shape(), order);
        Self {
            points: rule
                .iter()
                .map(|(xi, w)| PhysicalPoint {
                    x: geometry.to_physical(xi),
                    weight: w * geometry.det_jacobian(xi).abs(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PhysicalPoint] {
        &self.points
    }

    /// Measure of the integration domain.
    pub fn total_weight(&self) -> f64 {
        self.points.iter().map(|p| p.weight).sum()
    }
}

/// Newton parameters of the inverse isoparametric map.
#[derive(Clone, Copy, Debug)]
pub struct MappingOptions {
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// The two elements of a directed pair.
#[derive(Clone, Copy, Debug)]
pub struct PairGeometry<'a> {
    pub slave_id: ElementIndex,
    pub slave: &'a ElementGeometry,
    pub master_id: ElementIndex,
    pub master: &'a ElementGeometry,
}

/// Element-local mortar blocks (per field component).
#[derive(Clone, Debug)]
pub struct LocalMortar {
    /// Slave × slave.
    pub d: Mat<f64>,
    /// Slave × master.
    pub m: Mat<f64>,
}

/// Integrator of one (slave shape, master shape) combination.
pub type PairIntegrator = fn(&PairGeometry<'_>, &PhysicalQuadrature, &MappingOptions) -> Result<LocalMortar>;

/// Select the integrator for a shape pair.
pub fn integrator_for(slave: Shape, master: Shape) -> Result<PairIntegrator> {
    let f: PairIntegrator = match (slave, master) {
        (Shape::Tri3, Shape::Tri3) => integrate::<Tri3, Tri3>,
        (Shape::Tri3, Shape::Quad4) => integrate::<Tri3, Quad4>,
        (Shape::Quad4, Shape::Tri3) => integrate::<Quad4, Tri3>,
        (Shape::Quad4, Shape::Quad4) => integrate::<Quad4, Quad4>,
        (Shape::Tet4, Shape::Tet4) => integrate::<Tet4, Tet4>,
        (Shape::Tet4, Shape::Hex8) => integrate::<Tet4, Hex8>,
        (Shape::Hex8, Shape::Tet4) => integrate::<Hex8, Tet4>,
        (Shape::Hex8, Shape::Hex8) => integrate::<Hex8, Hex8>,
        _ => return Err(MortarError::UnsupportedShapePair { slave, master }),
    };
    Ok(f)
}

fn integrate<S: ShapeFunctions, T: ShapeFunctions>(
    pair: &PairGeometry<'_>,
    quadrature: &PhysicalQuadrature,
    mapping: &MappingOptions,
) -> Result<LocalMortar> {
    let mut d = Mat::<f64>::zeros(S::NUM_NODES, S::NUM_NODES);
    let mut m = Mat::<f64>::zeros(S::NUM_NODES, T::NUM_NODES);
    let mut ns = [0.0; 8];
    let mut nm = [0.0; 8];

    for p in quadrature.points() {
        let xi_s = local_coordinates(pair.slave, pair.slave_id, pair, p.x, mapping)?;
        let xi_m = local_coordinates(pair.master, pair.master_id, pair, p.x, mapping)?;
        S::values(&xi_s, &mut ns);
        T::values(&xi_m, &mut nm);

        for i in 0..S::NUM_NODES {
            let wi = ns[i] * p.weight;
            for j in 0..S::NUM_NODES {
                d[(i, j)] += wi * ns[j];
            }
            for j in 0..T::NUM_NODES {
                m[(i, j)] += wi * nm[j];
            }
        }
    }
    Ok(LocalMortar { d, m })
}

fn local_coordinates(
    geometry: &ElementGeometry,
    element: ElementIndex,
    pair: &PairGeometry<'_>,
    x: Point3,
    mapping: &MappingOptions,
) -> Result<[f64; 3]> {
    geometry
        .to_local(x, mapping.tolerance, mapping.max_iterations)
        .ok_or(MortarError::InverseMapping {
            element,
            slave: pair.slave_id,
            master: pair.master_id,
            x: x.x,
            y: x.y,
            z: x.z,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING: MappingOptions = MappingOptions {
        tolerance: 1e-13,
        max_iterations: 20,
    };

    fn unit_square() -> ElementGeometry {
        ElementGeometry::new(
            Shape::Quad4,
            vec![
                Point3::planar(0.0, 0.0),
                Point3::planar(1.0, 0.0),
                Point3::planar(1.0, 1.0),
                Point3::planar(0.0, 1.0),
            ],
        )
    }

    #[test]
    fn test_self_pair_gives_consistent_mass() {
        let g = unit_square();
        let pair = PairGeometry {
            slave_id: ElementIndex::new(0),
            slave: &g,
            master_id: ElementIndex::new(1),
            master: &g,
        };
        let quad = PhysicalQuadrature::from_element(&g, 3);
        let local = integrator_for(Shape::Quad4, Shape::Quad4).unwrap()(&pair, &quad, &MAPPING).unwrap();
        // Bilinear mass matrix on the unit square: h²/36 [4 2 1 2; ...].
        assert!((local.d[(0, 0)] - 4.0 / 36.0).abs() < 1e-14);
        assert!((local.d[(0, 1)] - 2.0 / 36.0).abs() < 1e-14);
        assert!((local.d[(0, 2)] - 1.0 / 36.0).abs() < 1e-14);
        for i in 0..4 {
            for j in 0..4 {
                assert!((local.d[(i, j)] - local.m[(i, j)]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_cells_and_element_agree() {
        let g = unit_square();
        let cells = vec![
            Cell::Triangle([Point3::planar(0.0, 0.0), Point3::planar(1.0, 0.0), Point3::planar(1.0, 1.0)]),
            Cell::Triangle([Point3::planar(0.0, 0.0), Point3::planar(1.0, 1.0), Point3::planar(0.0, 1.0)]),
        ];
        let from_cells = PhysicalQuadrature::from_cells(&cells, 4);
        assert!((from_cells.total_weight() - 1.0).abs() < 1e-14);
        let pair = PairGeometry {
            slave_id: ElementIndex::new(0),
            slave: &g,
            master_id: ElementIndex::new(0),
            master: &g,
        };
        let f = integrator_for(Shape::Quad4, Shape::Quad4).unwrap();
        let a = f(&pair, &from_cells, &MAPPING).unwrap();
        let b = f(&pair, &PhysicalQuadrature::from_element(&g, 4), &MAPPING).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert!((a.d[(i, j)] - b.d[(i, j)]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_mixed_dimension_pair_is_unsupported() {
        let err = integrator_for(Shape::Quad4, Shape::Hex8).unwrap_err();
        assert!(matches!(err, MortarError::UnsupportedShapePair { .. }));
    }
}
