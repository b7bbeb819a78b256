//! The volume mortar coupling engine.
//!
//! `evaluate()` runs the element-pair double loop, assembles the mortar
//! matrices of both directions and forms the projection operators:
//!
//! - Pass 1: every row element of A against its candidate column elements of B
//! - Pass 2: every row element of B against candidate ghost elements of A
//!
//! Each pair yields one integration domain (clip cells in 2D; the contained
//! element or cut cells in 3D) that is integrated for every direction whose
//! slave element is owned. Pass 2 is empty unless A has ghosts.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::classify::{OverlapClassifier, PairClass};
use super::convex_cut::ConvexCutEngine;
use super::cut::{CutAdapter, CutEngine};
use super::integrator::{
    LocalMortar, MappingOptions, PairGeometry, PhysicalPoint, PhysicalQuadrature, integrator_for,
};
use super::interpolation::interpolation_operator;
use super::projection::build_projection;
use super::report::CouplingReport;
use super::search::MeshSide;
use crate::config::{CouplingType, IntegrationType, MortarConfig};
use crate::element::ElementGeometry;
use crate::error::{MortarError, Result};
use crate::geometry::Point3;
use crate::mesh::{Discretization, DofSet, Element};
use crate::polygon::{ClipOutcome, NoOverlapReason, PolygonClipper, Vertex, triangulate};
use crate::sparse::SparseMatrix;
use crate::types::NodeIndex;

/// Which discretization plays the slave in a contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slave {
    A,
    B,
}

/// Outer loop item.
#[derive(Clone, Copy, Debug)]
enum Task {
    /// Row element of A.
    RowA(usize),
    /// Row element of B.
    RowB(usize),
}

/// Element-local blocks of one directed pair.
struct Contribution {
    slave: Slave,
    slave_nodes: Vec<NodeIndex>,
    master_nodes: Vec<NodeIndex>,
    local: LocalMortar,
}

#[derive(Default)]
struct TaskOutput {
    contributions: Vec<Contribution>,
    report: CouplingReport,
}

/// Final operators of one evaluation.
#[derive(Debug, PartialEq)]
struct Operators {
    d_a: Option<SparseMatrix>,
    m_a: Option<SparseMatrix>,
    d_b: Option<SparseMatrix>,
    m_b: Option<SparseMatrix>,
    p_a: SparseMatrix,
    p_b: SparseMatrix,
}

/// Volumetric coupling of two non-matching discretizations A and B.
///
/// Produces D_A, M_A (A as slave), D_B, M_B (B as slave) and the transfer
/// operators P_A = D_A⁻¹ M_A (B-field to A) and P_B = D_B⁻¹ M_B (A-field to B).
///
/// # Example
/// ```
/// use volmortar::{Mesh, MortarConfig, VolMortarCoupling};
///
/// let a = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 2, 2);
/// let b = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 3, 3);
/// let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
/// let report = coupling.evaluate().unwrap();
/// assert!(report.clip_polygons > 0);
///
/// let ones = vec![1.0; coupling.p_a().unwrap().col_map().len()];
/// let on_a = coupling.apply_b_to_a(&ones).unwrap();
/// assert!(on_a.iter().all(|v| (v - 1.0).abs() < 1e-12));
/// ```
pub struct VolMortarCoupling<'a> {
    a: &'a dyn Discretization,
    b: &'a dyn Discretization,
    config: MortarConfig,
    default_cut_engine: ConvexCutEngine,
    cut_engine: Option<&'a dyn CutEngine>,
    operators: Option<Operators>,
}

impl<'a> VolMortarCoupling<'a> {
    /// Couple `a` and `b`; both must have the same spatial dimension.
    pub fn new(a: &'a dyn Discretization, b: &'a dyn Discretization, config: MortarConfig) -> Result<Self> {
        config.validate()?;
        if a.dim() != b.dim() || !(2..=3).contains(&a.dim()) {
            return Err(MortarError::DimensionMismatch {
                a: a.name().to_string(),
                b: b.name().to_string(),
                dim_a: a.dim(),
                dim_b: b.dim(),
            });
        }
        Ok(Self {
            a,
            b,
            config,
            default_cut_engine: ConvexCutEngine::new(config.tolerance),
            cut_engine: None,
            operators: None,
        })
    }

    /// Replace the built-in convex cut engine.
    pub fn with_cut_engine(mut self, engine: &'a dyn CutEngine) -> Self {
        self.cut_engine = Some(engine);
        self
    }

    /// Engine used for partial overlaps in 3D.
    pub fn cut_engine(&self) -> &dyn CutEngine {
        match self.cut_engine {
            Some(engine) => engine,
            None => &self.default_cut_engine,
        }
    }

    pub fn config(&self) -> &MortarConfig {
        &self.config
    }

    /// Build all operators from scratch.
    ///
    /// On error no operators are available afterwards.
    pub fn evaluate(&mut self) -> Result<CouplingReport> {
        self.operators = None;
        let a = MeshSide::new(self.a);
        let b = MeshSide::new(self.b);

        let (operators, report) = match self.config.coupling_type {
            CouplingType::Mortar => self.evaluate_mortar(&a, &b)?,
            CouplingType::ConsistentInterpolation => {
                let (p_a, unmapped_a) = interpolation_operator(&a, &b, &self.config, "P_A")?;
                let (p_b, unmapped_b) = interpolation_operator(&b, &a, &self.config, "P_B")?;
                let report = CouplingReport {
                    unmapped_nodes: unmapped_a + unmapped_b,
                    ..Default::default()
                };
                let operators = Operators {
                    d_a: None,
                    m_a: None,
                    d_b: None,
                    m_b: None,
                    p_a,
                    p_b,
                };
                (operators, report)
            }
        };

        info!(
            a = self.a.name(),
            b = self.b.name(),
            pairs = report.pairs_considered,
            cells = report.integration_cells,
            cut_pairs = report.cut_pairs,
            fallbacks = report.delaunay_fallbacks,
            "Volume coupling evaluated"
        );
        self.operators = Some(operators);
        Ok(report)
    }

    fn evaluate_mortar(&self, a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<(Operators, CouplingReport)> {
        let tasks = self.mortar_tasks(a, b);
        let outputs = self.run_tasks(&tasks, a, b)?;
        self.mortar_operators(&outputs)
    }

    /// Outer loop items: all rows of A, then the rows of B that need a pass.
    fn mortar_tasks(&self, a: &MeshSide<'_>, b: &MeshSide<'_>) -> Vec<Task> {
        let mut tasks: Vec<Task> = (0..a.row_geometry.len()).map(Task::RowA).collect();
        match self.config.integration_type {
            IntegrationType::Segments => {
                if (0..self.a.num_col_elements()).any(|j| !self.a.col_element(j).owned) {
                    tasks.extend((0..b.row_geometry.len()).map(Task::RowB));
                }
            }
            IntegrationType::Elements => tasks.extend((0..b.row_geometry.len()).map(Task::RowB)),
        }
        tasks
    }

    /// Assemble task outputs in task order and form both projections.
    fn mortar_operators(&self, outputs: &[TaskOutput]) -> Result<(Operators, CouplingReport)> {
        let coupling_map = |d: &dyn Discretization, row: bool| {
            if row {
                d.dof_row_map(DofSet::Coupling).clone()
            } else {
                d.dof_col_map(DofSet::Coupling).clone()
            }
        };
        let mut d_a = SparseMatrix::new("D_A", coupling_map(self.a, true), coupling_map(self.a, false));
        let mut m_a = SparseMatrix::new("M_A", coupling_map(self.a, true), coupling_map(self.b, false));
        let mut d_b = SparseMatrix::new("D_B", coupling_map(self.b, true), coupling_map(self.b, false));
        let mut m_b = SparseMatrix::new("M_B", coupling_map(self.b, true), coupling_map(self.a, false));

        let mut report = CouplingReport::default();
        for output in outputs {
            report.merge(&output.report);
            for c in &output.contributions {
                match c.slave {
                    Slave::A => assemble(c, &mut d_a, &mut m_a, self.a, self.b)?,
                    Slave::B => assemble(c, &mut d_b, &mut m_b, self.b, self.a)?,
                }
            }
        }
        for matrix in [&mut d_a, &mut m_a, &mut d_b, &mut m_b] {
            matrix.complete()?;
        }

        let tol = self.config.tolerance;
        let (p_a, subs_a) = build_projection(&d_a, &m_a, self.config.lumping, tol, "P_A")?;
        let (p_b, subs_b) = build_projection(&d_b, &m_b, self.config.lumping, tol, "P_B")?;
        report.projection_substitutions_a = subs_a;
        report.projection_substitutions_b = subs_b;

        let operators = Operators {
            d_a: Some(d_a),
            m_a: Some(m_a),
            d_b: Some(d_b),
            m_b: Some(m_b),
            p_a,
            p_b,
        };
        Ok((operators, report))
    }

    fn run_tasks_serial(&self, tasks: &[Task], a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<Vec<TaskOutput>> {
        tasks.iter().map(|&t| self.run_task(t, a, b)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_tasks(&self, tasks: &[Task], a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<Vec<TaskOutput>> {
        self.run_tasks_serial(tasks, a, b)
    }

    /// Tasks run on the rayon pool; outputs keep task order.
    #[cfg(feature = "parallel")]
    fn run_tasks(&self, tasks: &[Task], a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<Vec<TaskOutput>> {
        use rayon::prelude::*;

        if tasks.len() < 2 {
            return self.run_tasks_serial(tasks, a, b);
        }
        let results: Vec<Result<TaskOutput>> = tasks.par_iter().map(|&t| self.run_task(t, a, b)).collect();
        results.into_iter().collect()
    }

    fn run_task(&self, task: Task, a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<TaskOutput> {
        match (self.config.integration_type, task) {
            (IntegrationType::Segments, Task::RowA(i)) => self.segments_row_a(i, a, b),
            (IntegrationType::Segments, Task::RowB(i)) => self.segments_row_b(i, a, b),
            (IntegrationType::Elements, Task::RowA(i)) => self.elements_row(Slave::A, i, a, b),
            (IntegrationType::Elements, Task::RowB(i)) => self.elements_row(Slave::B, i, b, a),
        }
    }

    fn mapping(&self) -> MappingOptions {
        MappingOptions {
            tolerance: self.config.newton_tolerance(),
            max_iterations: self.config.newton_max_iterations,
        }
    }

    /// Row element `i` of A against candidate column elements of B.
    fn segments_row_a(&self, i: usize, a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<TaskOutput> {
        let ea = self.a.row_element(i);
        let ga = &a.row_geometry[i];
        let margin = self.config.scaled_tolerance(ga.characteristic_length());
        let (candidates, rejected) = b.candidates(&ga.bounding_box(), margin, self.config.search, false);

        let mut out = TaskOutput::default();
        out.report.pairs_rejected_by_search = rejected;
        for j in candidates {
            let eb = self.b.col_element(j);
            let gb = &b.col_geometry[j];
            out.report.pairs_considered += 1;
            let Some(quadrature) = self.pair_quadrature(ea, ga, eb, gb, &mut out.report)? else {
                continue;
            };
            out.contributions.push(self.directed(Slave::A, ea, ga, eb, gb, &quadrature)?);
            if eb.owned {
                out.contributions.push(self.directed(Slave::B, eb, gb, ea, ga, &quadrature)?);
            }
        }
        Ok(out)
    }

    /// Row element `i` of B against ghost elements of A.
    fn segments_row_b(&self, i: usize, a: &MeshSide<'_>, b: &MeshSide<'_>) -> Result<TaskOutput> {
        let eb = self.b.row_element(i);
        let gb = &b.row_geometry[i];
        let margin = self.config.scaled_tolerance(gb.characteristic_length());
        let (candidates, rejected) = a.candidates(&gb.bounding_box(), margin, self.config.search, true);

        let mut out = TaskOutput::default();
        out.report.pairs_rejected_by_search = rejected;
        for j in candidates {
            let ea = self.a.col_element(j);
            let ga = &a.col_geometry[j];
            out.report.pairs_considered += 1;
            // Same slave/master roles as on the process owning `ea`.
            let Some(quadrature) = self.pair_quadrature(ea, ga, eb, gb, &mut out.report)? else {
                continue;
            };
            out.contributions.push(self.directed(Slave::B, eb, gb, ea, ga, &quadrature)?);
        }
        Ok(out)
    }

    /// Integration domain of the pair (A element as slave), if they overlap.
    fn pair_quadrature(
        &self,
        ea: &Element,
        ga: &ElementGeometry,
        eb: &Element,
        gb: &ElementGeometry,
        report: &mut CouplingReport,
    ) -> Result<Option<PhysicalQuadrature>> {
        let order = self.config.quadrature_order;
        let h = ga.characteristic_length().max(gb.characteristic_length());
        let tol = self.config.scaled_tolerance(h);

        if self.a.dim() == 2 {
            let slave = ea
                .nodes()
                .iter()
                .zip(ga.nodes())
                .map(|(n, &x)| Vertex::slave(x, n.get()))
                .collect();
            let master = eb
                .nodes()
                .iter()
                .zip(gb.nodes())
                .map(|(n, &x)| Vertex::master(x, n.get()))
                .collect();
            let clipper = PolygonClipper::new(Point3::UNIT_Z, tol);
            return match clipper.clip(slave, master, (ea.id(), eb.id()))? {
                ClipOutcome::Overlap(polygon) => {
                    let t = triangulate(&polygon.points(), Point3::UNIT_Z, tol, self.config.triangulation);
                    report.clip_polygons += 1;
                    report.delaunay_fallbacks += usize::from(t.fell_back);
                    report.integration_cells += t.cells.len();
                    Ok(Some(PhysicalQuadrature::from_cells(&t.cells, order)))
                }
                ClipOutcome::NoOverlap(NoOverlapReason::FarApart) => {
                    report.distant_nonconvex_skips += 1;
                    Ok(None)
                }
                ClipOutcome::NoOverlap(_) => {
                    report.no_overlap_pairs += 1;
                    Ok(None)
                }
            };
        }

        let mapping = self.mapping();
        let classifier = OverlapClassifier {
            local_tolerance: self.config.local_tolerance,
            newton_tolerance: mapping.tolerance,
            newton_max_iterations: mapping.max_iterations,
            tolerance: self.config.tolerance,
            element_based: self.config.element_based_containment,
        };
        let class = classifier.classify(ga, gb);
        debug!(slave = %ea.id(), master = %eb.id(), ?class, "Classified element pair");
        match class {
            PairClass::SlaveInMaster => {
                report.element_based_slave += 1;
                Ok(Some(PhysicalQuadrature::from_element(ga, order)))
            }
            PairClass::MasterInSlave => {
                report.element_based_master += 1;
                Ok(Some(PhysicalQuadrature::from_element(gb, order)))
            }
            PairClass::Partial => {
                let adapter = CutAdapter::new(self.cut_engine(), self.config.cut_options);
                let cells = adapter.integration_cells(ea.id(), ga, eb.id(), gb)?;
                if cells.is_empty() {
                    // Boxes overlap but the elements do not.
                    report.disjoint_pairs += 1;
                    return Ok(None);
                }
                report.cut_pairs += 1;
                report.integration_cells += cells.len();
                Ok(Some(PhysicalQuadrature::from_cells(&cells, order)))
            }
            PairClass::Disjoint => {
                report.disjoint_pairs += 1;
                Ok(None)
            }
        }
    }

    /// Element-based integration of one slave row element.
    ///
    /// Every Gauss point of the slave goes to the first candidate master
    /// element containing it.
    fn elements_row(
        &self,
        role: Slave,
        i: usize,
        slave: &MeshSide<'_>,
        master: &MeshSide<'_>,
    ) -> Result<TaskOutput> {
        let es = slave.disc.row_element(i);
        let gs = &slave.row_geometry[i];
        let margin = self.config.scaled_tolerance(gs.characteristic_length());
        let (candidates, rejected) = master.candidates(&gs.bounding_box(), margin, self.config.search, false);
        let mapping = self.mapping();

        let mut out = TaskOutput::default();
        out.report.pairs_rejected_by_search = rejected;
        out.report.pairs_considered = candidates.len();

        let mut groups: BTreeMap<usize, Vec<PhysicalPoint>> = BTreeMap::new();
        for p in PhysicalQuadrature::from_element(gs, self.config.quadrature_order).points() {
            let host = candidates.iter().copied().find(|&j| {
                master.col_geometry[j]
                    .contains(p.x, self.config.local_tolerance, mapping.tolerance, mapping.max_iterations)
                    .is_some()
            });
            match host {
                Some(j) => groups.entry(j).or_default().push(*p),
                None => out.report.unmapped_gauss_points += 1,
            }
        }

        for (j, points) in groups {
            let em = master.disc.col_element(j);
            let gm = &master.col_geometry[j];
            let quadrature = PhysicalQuadrature::from_points(points);
            out.contributions.push(self.directed(role, es, gs, em, gm, &quadrature)?);
        }
        Ok(out)
    }

    fn directed(
        &self,
        role: Slave,
        slave: &Element,
        slave_geometry: &ElementGeometry,
        master: &Element,
        master_geometry: &ElementGeometry,
        quadrature: &PhysicalQuadrature,
    ) -> Result<Contribution> {
        let integrate = integrator_for(slave.shape(), master.shape())?;
        let pair = PairGeometry {
            slave_id: slave.id(),
            slave: slave_geometry,
            master_id: master.id(),
            master: master_geometry,
        };
        Ok(Contribution {
            slave: role,
            slave_nodes: slave.nodes().to_vec(),
            master_nodes: master.nodes().to_vec(),
            local: integrate(&pair, quadrature, &self.mapping())?,
        })
    }

    fn operators(&self, name: &'static str) -> Result<&Operators> {
        self.operators.as_ref().ok_or(MortarError::OperatorUnavailable(name))
    }

    /// Self mass matrix of A (A as slave).
    pub fn d_a(&self) -> Result<&SparseMatrix> {
        self.operators("D_A")?
            .d_a
            .as_ref()
            .ok_or(MortarError::OperatorUnavailable("D_A"))
    }

    /// Cross mass matrix of A (rows A, columns B).
    pub fn m_a(&self) -> Result<&SparseMatrix> {
        self.operators("M_A")?
            .m_a
            .as_ref()
            .ok_or(MortarError::OperatorUnavailable("M_A"))
    }

    pub fn d_b(&self) -> Result<&SparseMatrix> {
        self.operators("D_B")?
            .d_b
            .as_ref()
            .ok_or(MortarError::OperatorUnavailable("D_B"))
    }

    pub fn m_b(&self) -> Result<&SparseMatrix> {
        self.operators("M_B")?
            .m_b
            .as_ref()
            .ok_or(MortarError::OperatorUnavailable("M_B"))
    }

    /// Transfer operator mapping B-fields to A.
    pub fn p_a(&self) -> Result<&SparseMatrix> {
        Ok(&self.operators("P_A")?.p_a)
    }

    /// Transfer operator mapping A-fields to B.
    pub fn p_b(&self) -> Result<&SparseMatrix> {
        Ok(&self.operators("P_B")?.p_b)
    }

    /// Transfer a B-field (in B column dof order) to A row dofs.
    pub fn apply_b_to_a(&self, field_b: &[f64]) -> Result<Vec<f64>> {
        self.p_a()?.matvec(field_b)
    }

    /// Transfer an A-field (in A column dof order) to B row dofs.
    pub fn apply_a_to_b(&self, field_a: &[f64]) -> Result<Vec<f64>> {
        self.p_b()?.matvec(field_a)
    }
}

/// Scatter element blocks into D and M, once per field component.
fn assemble(
    c: &Contribution,
    d: &mut SparseMatrix,
    m: &mut SparseMatrix,
    slave: &dyn Discretization,
    master: &dyn Discretization,
) -> Result<()> {
    let Some(&first) = c.slave_nodes.first() else {
        return Ok(());
    };
    let k = slave.node_dofs(first, DofSet::Coupling).len();
    let slave_counts = c
        .slave_nodes
        .iter()
        .map(|&n| ("slave", n, slave.node_dofs(n, DofSet::Coupling).len()));
    let master_counts = c
        .master_nodes
        .iter()
        .map(|&n| ("master", n, master.node_dofs(n, DofSet::Coupling).len()));
    if let Some((role, node, dofs)) = slave_counts.chain(master_counts).find(|&(_, _, len)| len != k) {
        return Err(MortarError::DofMismatch {
            role,
            node: node.get(),
            dofs,
            reference_node: first.get(),
            expected: k,
        });
    }

    for comp in 0..k {
        let rows: Vec<usize> = c
            .slave_nodes
            .iter()
            .map(|&n| slave.node_dofs(n, DofSet::Coupling)[comp])
            .collect();
        let cols: Vec<usize> = c
            .master_nodes
            .iter()
            .map(|&n| master.node_dofs(n, DofSet::Coupling)[comp])
            .collect();
        d.assemble_block(&rows, &rows, &c.local.d)?;
        m.assemble_block(&rows, &cols, &c.local.m)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{DofMap, Mesh};

    /// Mesh whose `node` exposes one extra coupling dof.
    struct ExtraDof {
        mesh: Mesh,
        node: NodeIndex,
        dofs: Vec<usize>,
    }

    impl ExtraDof {
        fn new(mesh: Mesh, node: NodeIndex) -> Self {
            let mut dofs = mesh.node_dofs(node, DofSet::Coupling).to_vec();
            dofs.push(usize::MAX);
            Self { mesh, node, dofs }
        }
    }

    impl Discretization for ExtraDof {
        fn name(&self) -> &str {
            self.mesh.name()
        }

        fn dim(&self) -> usize {
            self.mesh.dim()
        }

        fn num_row_elements(&self) -> usize {
            self.mesh.num_row_elements()
        }

        fn row_element(&self, i: usize) -> &Element {
            self.mesh.row_element(i)
        }

        fn num_col_elements(&self) -> usize {
            self.mesh.num_col_elements()
        }

        fn col_element(&self, j: usize) -> &Element {
            self.mesh.col_element(j)
        }

        fn node_coords(&self, node: NodeIndex) -> Point3 {
            self.mesh.node_coords(node)
        }

        fn node_dofs(&self, node: NodeIndex, set: DofSet) -> &[usize] {
            if node == self.node && set == DofSet::Coupling {
                &self.dofs
            } else {
                self.mesh.node_dofs(node, set)
            }
        }

        fn dof_row_map(&self, set: DofSet) -> &DofMap {
            self.mesh.dof_row_map(set)
        }

        fn dof_col_map(&self, set: DofSet) -> &DofMap {
            self.mesh.dof_col_map(set)
        }
    }

    #[test]
    fn test_default_cut_engine_uses_config_tolerance() {
        let a = Mesh::uniform_box(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0), [1, 1, 1]);
        let config = MortarConfig::default().with_tolerance(1e-8);
        let coupling = VolMortarCoupling::new(&a, &a, config).unwrap();
        assert_eq!(coupling.default_cut_engine.tolerance, 1e-8);
        assert_eq!(coupling.mapping().tolerance, 1e-8);
    }

    #[test]
    fn test_dof_mismatch_names_offending_slave_node() {
        let mesh = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);
        let first = mesh.row_element(0).nodes()[0];
        let odd = mesh.row_element(0).nodes()[2];
        let a = ExtraDof::new(mesh, odd);
        let b = Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1);

        let mut coupling = VolMortarCoupling::new(&a, &b, MortarConfig::default()).unwrap();
        match coupling.evaluate() {
            Err(MortarError::DofMismatch {
                role,
                node,
                dofs,
                reference_node,
                expected,
            }) => {
                assert_eq!(role, "slave");
                assert_eq!(node, odd.get());
                assert_eq!(dofs, 2);
                assert_eq!(reference_node, first.get());
                assert_eq!(expected, 1);
            }
            other => panic!("expected a dof mismatch, got {other:?}"),
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let pairs = [
            (
                Mesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 3, 3),
                Mesh::uniform_triangles(0.0, 1.0, 0.0, 1.0, 4, 5).rotated_z(0.3, Point3::planar(0.5, 0.5)),
            ),
            (
                Mesh::uniform_box(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0), [2, 2, 2]),
                Mesh::uniform_box(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0), [3, 3, 3]),
            ),
        ];
        for (a, b) in &pairs {
            let coupling = VolMortarCoupling::new(a, b, MortarConfig::default()).unwrap();
            let (side_a, side_b) = (MeshSide::new(a), MeshSide::new(b));
            let tasks = coupling.mortar_tasks(&side_a, &side_b);
            assert!(tasks.len() > 1);

            let serial = coupling.run_tasks_serial(&tasks, &side_a, &side_b).unwrap();
            let parallel = coupling.run_tasks(&tasks, &side_a, &side_b).unwrap();
            let (serial_ops, serial_report) = coupling.mortar_operators(&serial).unwrap();
            let (parallel_ops, parallel_report) = coupling.mortar_operators(&parallel).unwrap();
            assert_eq!(serial_report, parallel_report);
            assert_eq!(serial_ops, parallel_ops);
        }
    }
}
