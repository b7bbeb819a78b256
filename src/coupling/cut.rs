//! Boundary-cut engine interface and the adapter used for partial overlaps.
//!
//! A cut engine receives two single-element auxiliary discretizations: the
//! slave element as a closed cutting surface and the master element as the
//! background volume. It returns, per background element, volume cells made
//! of simplicial integration cells and classified inside/outside the cutter.

use std::collections::BTreeMap;

use tracing::debug;

use crate::element::ElementGeometry;
use crate::error::Result;
use crate::geometry::{Cell, Point3};
use crate::types::ElementIndex;

/// Position of a volume cell relative to the cutting surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Inside,
    Outside,
    /// Positions were not classified.
    Undecided,
}

/// How volume cells are integrated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VolumeQuadrature {
    /// Split volume cells into simplices.
    #[default]
    Tessellation,
    /// Integrate by the divergence theorem over the cell faces.
    DirectDivergence,
}

/// How boundary cells are integrated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryQuadrature {
    #[default]
    Tessellation,
    MomentFitting,
}

/// Options forwarded to [`CutEngine::cut`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutOptions {
    /// Also produce cells inside the cutter.
    pub include_inner: bool,
    pub volume_quadrature: VolumeQuadrature,
    pub boundary_quadrature: BoundaryQuadrature,
    /// Allow the engine to parallelize internally. Engines without internal
    /// threading ignore it.
    pub parallel: bool,
    /// Emit per-cell diagnostics.
    pub debug_output: bool,
    /// Classify cells as inside/outside; otherwise all are `Undecided`.
    pub classify_positions: bool,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            include_inner: true,
            volume_quadrature: VolumeQuadrature::Tessellation,
            boundary_quadrature: BoundaryQuadrature::Tessellation,
            parallel: false,
            debug_output: false,
            classify_positions: true,
        }
    }
}

/// Single-element discretization of the cutting surface.
#[derive(Clone, Debug)]
pub struct CutterSurface {
    pub element: ElementIndex,
    pub nodes: Vec<Point3>,
    /// Boundary faces as local node lists.
    pub faces: Vec<Vec<usize>>,
}

impl CutterSurface {
    /// Boundary faces of a volume element.
    pub fn from_element(element: ElementIndex, geometry: &ElementGeometry) -> Self {
        Self {
            element,
            nodes: geometry.nodes().to_vec(),
            faces: geometry.shape().faces().iter().map(|f| f.to_vec()).collect(),
        }
    }
}

/// Single-element background discretization.
#[derive(Clone, Debug)]
pub struct BackgroundVolume {
    pub element: ElementIndex,
    pub geometry: ElementGeometry,
}

/// Everything the cut engine needs for one element pair.
#[derive(Clone, Debug)]
pub struct CutInput {
    pub cutter: CutterSurface,
    pub background: BackgroundVolume,
    /// Displacement of each cutter node.
    pub displacement: Vec<Point3>,
}

impl CutInput {
    /// Cutter nodes in the displaced configuration.
    pub fn displaced_cutter_nodes(&self) -> Vec<Point3> {
        self.cutter
            .nodes
            .iter()
            .zip(self.displacement.iter().chain(std::iter::repeat(&Point3::ORIGIN)))
            .map(|(p, u)| *p + *u)
            .collect()
    }
}

/// A connected region of a background element with one position.
#[derive(Clone, Debug)]
pub struct VolumeCell {
    pub position: Position,
    pub integration_cells: Vec<Cell>,
}

impl VolumeCell {
    pub fn volume(&self) -> f64 {
        self.integration_cells.iter().map(Cell::measure).sum()
    }
}

/// Cut information of one background element.
#[derive(Clone, Debug, Default)]
pub struct CutElement {
    pub volume_cells: Vec<VolumeCell>,
}

impl CutElement {
    /// Volume cells with the given position.
    pub fn collect_volume_cells(&self, position: Position) -> impl Iterator<Item = &VolumeCell> {
        self.volume_cells
            .iter()
            .filter(move |vc| vc.position == position)
    }
}

/// Output of a cut: handles per background element.
#[derive(Clone, Debug, Default)]
pub struct CutResult {
    elements: BTreeMap<ElementIndex, CutElement>,
}

impl CutResult {
    pub fn insert(&mut self, element: ElementIndex, cut: CutElement) {
        self.elements.insert(element, cut);
    }

    /// Handle of a background element, `None` if the engine produced nothing for it.
    pub fn element(&self, element: ElementIndex) -> Option<&CutElement> {
        self.elements.get(&element)
    }
}

/// External boolean-cut engine.
pub trait CutEngine: Sync {
    fn cut(&self, input: &CutInput, options: &CutOptions) -> Result<CutResult>;
}

/// Turns a cut engine into integration cells for one element pair.
pub struct CutAdapter<'a> {
    engine: &'a dyn CutEngine,
    options: CutOptions,
}

impl<'a> CutAdapter<'a> {
    pub fn new(engine: &'a dyn CutEngine, options: CutOptions) -> Self {
        Self { engine, options }
    }

    /// Integration cells of master ∩ slave, cut in the reference configuration.
    pub fn integration_cells(
        &self,
        slave_id: ElementIndex,
        slave: &ElementGeometry,
        master_id: ElementIndex,
        master: &ElementGeometry,
    ) -> Result<Vec<Cell>> {
        let input = CutInput {
            cutter: CutterSurface::from_element(slave_id, slave),
            background: BackgroundVolume {
                element: master_id,
                geometry: master.clone(),
            },
            displacement: vec![Point3::ORIGIN; slave.nodes().len()],
        };
        let result = self.engine.cut(&input, &self.options)?;

        let Some(handle) = result.element(master_id) else {
            debug!(slave = %slave_id, master = %master_id, "Cut produced no element handle");
            return Ok(Vec::new());
        };
        Ok(handle
            .collect_volume_cells(Position::Inside)
            .flat_map(|vc| vc.integration_cells.iter().cloned())
            .collect())
    }
}
