//! The discretization contract consumed by the coupling engine.
//!
//! A discretization exposes row elements (owned by this process) and
//! column elements (owned plus ghosts), node coordinates, and two
//! independent dof sets: one for geometry queries and one for the coupled
//! field.

use std::collections::HashMap;

use crate::element::{ElementGeometry, Shape};
use crate::geometry::Point3;
use crate::types::{ElementIndex, NodeIndex};

/// Which dof set of a discretization is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DofSet {
    /// Position dofs, one per spatial direction and node.
    Geometry,
    /// Dofs of the field transferred by the coupling.
    Coupling,
}

/// A mesh element: shape plus node connectivity.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElementIndex,
    pub shape: Shape,
    pub nodes: Vec<NodeIndex>,
    /// False for ghost copies (column elements only).
    pub owned: bool,
}

impl Element {
    pub fn id(&self) -> ElementIndex {
        self.id
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn num_node(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }
}

/// Ordered set of global dof ids with local lookup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DofMap {
    gids: Vec<usize>,
    lids: HashMap<usize, usize>,
}

impl DofMap {
    /// Build from global ids; duplicates keep their first position.
    pub fn new(gids: impl IntoIterator<Item = usize>) -> Self {
        let mut map = Self::default();
        for gid in gids {
            if !map.lids.contains_key(&gid) {
                map.lids.insert(gid, map.gids.len());
                map.gids.push(gid);
            }
        }
        map
    }

    pub fn len(&self) -> usize {
        self.gids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gids.is_empty()
    }

    /// Global id of a local index.
    pub fn gid(&self, lid: usize) -> usize {
        self.gids[lid]
    }

    /// Local index of a global id.
    pub fn lid(&self, gid: usize) -> Option<usize> {
        self.lids.get(&gid).copied()
    }

    pub fn contains(&self, gid: usize) -> bool {
        self.lids.contains_key(&gid)
    }

    pub fn gids(&self) -> &[usize] {
        &self.gids
    }
}

/// A finite element discretization as seen by the coupling.
pub trait Discretization: Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Spatial dimension (2 or 3).
    fn dim(&self) -> usize;

    fn num_row_elements(&self) -> usize;

    fn row_element(&self, i: usize) -> &Element;

    fn num_col_elements(&self) -> usize;

    fn col_element(&self, j: usize) -> &Element;

    fn node_coords(&self, node: NodeIndex) -> Point3;

    /// Global dof ids of a node in the given set.
    fn node_dofs(&self, node: NodeIndex, set: DofSet) -> &[usize];

    /// Dofs owned by this discretization.
    fn dof_row_map(&self, set: DofSet) -> &DofMap;

    /// Dofs reachable from column elements (row dofs plus ghosts).
    fn dof_col_map(&self, set: DofSet) -> &DofMap;

    /// Physical geometry of an element.
    fn element_geometry(&self, element: &Element) -> ElementGeometry {
        ElementGeometry::new(
            element.shape,
            element.nodes.iter().map(|&n| self.node_coords(n)).collect(),
        )
    }
}
