//! Planar coupling scenarios.
//!
//! Verifies the clip/triangulate path on rotated and non-matching meshes,
//! partition of unity of the projections, idempotence of `evaluate()`,
//! ghost handling and the alternative integration/coupling types.

use approx::assert_relative_eq;
use std::f64::consts::FRAC_PI_4;
use volmortar::{
    CouplingType, IntegrationType, Mesh, MortarConfig, MortarError, Point3, SparseMatrix,
    TriangulationStrategy, VolMortarCoupling,
};

fn total(matrix: &SparseMatrix) -> f64 {
    matrix.row_sums().unwrap().iter().sum()
}

fn constant_field(matrix: &SparseMatrix, value: f64) -> Vec<f64> {
    vec![value; matrix.col_map().len()]
}

#[test]
fn test_rotated_unit_squares_give_octagon() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let b = a.clone().rotated_z(FRAC_PI_4, Point3::planar(0.5, 0.5));
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    let report = coupling.evaluate().unwrap();

    assert_eq!(report.pairs_considered, 1);
    assert_eq!(report.clip_polygons, 1);
    assert_eq!(report.integration_cells, 6);
    assert_eq!(report.delaunay_fallbacks, 0);

    let octagon = 2.0 * (2.0_f64.sqrt() - 1.0);
    assert!(octagon > FRAC_PI_4 && octagon < 1.0);
    assert_relative_eq!(total(coupling.d_a().unwrap()), octagon, epsilon = 1e-12);
    assert_relative_eq!(total(coupling.m_a().unwrap()), octagon, epsilon = 1e-12);
    assert_relative_eq!(total(coupling.d_b().unwrap()), octagon, epsilon = 1e-12);
    assert_relative_eq!(total(coupling.m_b().unwrap()), octagon, epsilon = 1e-12);
}

#[test]
fn test_center_fan_matches_delaunay_totals() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let b = a.clone().rotated_z(FRAC_PI_4, Point3::planar(0.5, 0.5));
    let config = MortarConfig::default().with_triangulation(TriangulationStrategy::CenterFan);
    let mut coupling = VolMortarCoupling::new(&a, &b, config).unwrap();
    let report = coupling.evaluate().unwrap();

    assert_eq!(report.integration_cells, 8);
    assert_relative_eq!(total(coupling.d_a().unwrap()), 2.0 * (2.0_f64.sqrt() - 1.0), epsilon = 1e-12);
}

#[test]
fn test_partition_of_unity_on_non_matching_meshes() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 3, 3);
    let b = Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 4, 5);
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    let report = coupling.evaluate().unwrap();
    assert_eq!(report.projection_substitutions_a, 0);
    assert_eq!(report.projection_substitutions_b, 0);

    let on_a = coupling
        .apply_b_to_a(&constant_field(coupling.p_a().unwrap(), 2.5))
        .unwrap();
    assert_eq!(on_a.len(), 16);
    for v in on_a {
        assert_relative_eq!(v, 2.5, epsilon = 1e-12);
    }
    let on_b = coupling
        .apply_a_to_b(&constant_field(coupling.p_b().unwrap(), -1.0))
        .unwrap();
    assert_eq!(on_b.len(), 30);
    for v in on_b {
        assert_relative_eq!(v, -1.0, epsilon = 1e-12);
    }

    assert_relative_eq!(total(coupling.d_a().unwrap()), 1.0, epsilon = 1e-12);
    assert_relative_eq!(total(coupling.m_b().unwrap()), 1.0, epsilon = 1e-12);
}

#[test]
fn test_evaluate_is_idempotent() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 3, 2);
    let b = Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 2, 3).rotated_z(0.1, Point3::planar(0.5, 0.5));
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();

    let first_report = coupling.evaluate().unwrap();
    let d_a = coupling.d_a().unwrap().clone();
    let m_b = coupling.m_b().unwrap().clone();
    let p_a = coupling.p_a().unwrap().clone();

    let second_report = coupling.evaluate().unwrap();
    assert_eq!(first_report, second_report);
    assert_eq!(&d_a, coupling.d_a().unwrap());
    assert_eq!(&m_b, coupling.m_b().unwrap());
    assert_eq!(&p_a, coupling.p_a().unwrap());
}

#[test]
fn test_operators_unavailable_before_evaluate() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let coupling = VolMortarCoupling::new(&a, &a, MortarConfig::default()).unwrap();
    assert!(matches!(coupling.d_a(), Err(MortarError::OperatorUnavailable("D_A"))));
    assert!(matches!(coupling.apply_b_to_a(&[1.0; 4]), Err(MortarError::OperatorUnavailable(_))));
}

#[test]
fn test_dimension_mismatch() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let b = Mesh::uniform_box(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0), [1, 1, 1]);
    let result = VolMortarCoupling::new(&a, &b, MortarConfig::default());
    assert!(matches!(
        result,
        Err(MortarError::DimensionMismatch { dim_a: 2, dim_b: 3, .. })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let result = VolMortarCoupling::new(&a, &a, MortarConfig::default().with_quadrature_order(0));
    assert!(matches!(result, Err(MortarError::InvalidConfig(_))));
}

#[test]
fn test_disjoint_meshes_give_zero_projection() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let b = Mesh::uniform_rectangle(5.0, 6.0, 0.0, 1.0, 1, 1);
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    let report = coupling.evaluate().unwrap();

    assert_eq!(report.pairs_considered, 0);
    assert_eq!(report.pairs_rejected_by_search, 1);
    assert_eq!(report.projection_substitutions_a, 4);
    assert_eq!(report.projection_substitutions_b, 4);
    let on_a = coupling.apply_b_to_a(&[1.0; 4]).unwrap();
    assert!(on_a.iter().all(|&v| v == 0.0));
}

#[test]
fn test_brute_force_search_matches_bounding_box() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 2, 2);
    let b = Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 3, 2);

    let mut boxed = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    boxed.evaluate().unwrap();
    let brute_config = MortarConfig::default().with_search(volmortar::SearchStrategy::BruteForce);
    let mut brute = VolMortarCoupling::new(&a, &b, brute_config).unwrap();
    let report = brute.evaluate().unwrap();

    assert_eq!(report.pairs_rejected_by_search, 0);
    assert_eq!(report.pairs_considered, 4 * 12);
    let (x, y) = (boxed.m_a().unwrap(), brute.m_a().unwrap());
    for &row in x.row_map().gids() {
        for &col in x.col_map().gids() {
            assert_relative_eq!(x.get(row, col).unwrap(), y.get(row, col).unwrap(), epsilon = 1e-14);
        }
    }
}

#[test]
fn test_ghost_elements_couple_through_second_pass() {
    let a = Mesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 2, 1).with_ghost_elements(&[1]);
    let b = Mesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 3, 1);
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    coupling.evaluate().unwrap();

    // Only the owned element of A contributes A rows.
    assert_eq!(coupling.d_a().unwrap().row_map().len(), 4);
    assert_relative_eq!(total(coupling.d_a().unwrap()), 1.0, epsilon = 1e-12);

    // B rows see both the owned and the ghost element of A.
    assert_relative_eq!(total(coupling.d_b().unwrap()), 2.0, epsilon = 1e-12);
    assert_eq!(coupling.p_b().unwrap().col_map().len(), 6);
    let on_b = coupling.apply_a_to_b(&[3.0; 6]).unwrap();
    for v in on_b {
        assert_relative_eq!(v, 3.0, epsilon = 1e-12);
    }
}

#[test]
fn test_element_based_integration() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 2, 2);
    let b = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 4, 4);
    let config = MortarConfig::default().with_integration_type(IntegrationType::Elements);
    let mut coupling = VolMortarCoupling::new(&a, &b, config).unwrap();
    let report = coupling.evaluate().unwrap();

    assert_eq!(report.unmapped_gauss_points, 0);
    assert_eq!(report.clip_polygons, 0);
    assert_relative_eq!(total(coupling.d_a().unwrap()), 1.0, epsilon = 1e-12);
    assert_relative_eq!(total(coupling.d_b().unwrap()), 1.0, epsilon = 1e-12);

    let on_a = coupling.apply_b_to_a(&[1.0; 25]).unwrap();
    for v in on_a {
        assert_relative_eq!(v, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_consistent_interpolation_reproduces_linear_fields() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 2, 2);
    let b = Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 3, 3);
    let config = MortarConfig::default().with_coupling_type(CouplingType::ConsistentInterpolation);
    let mut coupling = VolMortarCoupling::new(&a, &b, config).unwrap();
    let report = coupling.evaluate().unwrap();
    assert_eq!(report.unmapped_nodes, 0);

    let f = |p: Point3| 1.0 + 2.0 * p.x - 3.0 * p.y;
    let p_a = coupling.p_a().unwrap();
    let field_b: Vec<f64> = p_a.col_map().gids().iter().map(|&g| f(b.nodes()[g])).collect();
    let on_a = coupling.apply_b_to_a(&field_b).unwrap();
    for (&g, v) in p_a.row_map().gids().iter().zip(on_a) {
        assert_relative_eq!(v, f(a.nodes()[g]), epsilon = 1e-12);
    }

    assert!(matches!(coupling.d_a(), Err(MortarError::OperatorUnavailable("D_A"))));
    assert!(matches!(coupling.m_b(), Err(MortarError::OperatorUnavailable("M_B"))));
}

#[test]
fn test_multi_component_coupling_is_block_diagonal() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 2, 2).with_coupling_dofs(2);
    let b = Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 3, 2).with_coupling_dofs(2);
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    coupling.evaluate().unwrap();

    let p_a = coupling.p_a().unwrap();
    let field: Vec<f64> = p_a
        .col_map()
        .gids()
        .iter()
        .map(|&g| if g % 2 == 0 { 1.0 } else { 3.0 })
        .collect();
    let on_a = coupling.apply_b_to_a(&field).unwrap();
    for (&g, v) in p_a.row_map().gids().iter().zip(on_a) {
        let expected = if g % 2 == 0 { 1.0 } else { 3.0 };
        assert_relative_eq!(v, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_dof_count_mismatch_is_fatal() {
    let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1).with_coupling_dofs(2);
    let b = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
    let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
    let err = coupling.evaluate().unwrap_err();
    assert!(
        matches!(err, MortarError::DofMismatch { role: "master", dofs: 1, expected: 2, .. }),
        "{err}"
    );
    assert!(coupling.p_a().is_err());
}
