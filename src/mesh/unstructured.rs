//! Unstructured linear-element mesh implementing [`Discretization`].

use super::discretization::{Discretization, DofMap, DofSet, Element};
use crate::element::{ElementGeometry, Shape};
use crate::error::{MortarError, Result};
use crate::geometry::Point3;
use crate::types::{ElementIndex, NodeIndex};

/// Mesh of tri3/quad4 (2D) or tet4/hex8 (3D) elements.
///
/// Dof numbering:
/// - Geometry: `dim * node + d`
/// - Coupling: `dof_offset + k * node + c` for `k` coupling dofs per node
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    dim: usize,
    nodes: Vec<Point3>,
    elements: Vec<Element>,
    /// Positions of owned elements in `elements`.
    row_elements: Vec<usize>,
    coupling_dofs: usize,
    dof_offset: usize,
    geometry_dofs: Vec<Vec<usize>>,
    field_dofs: Vec<Vec<usize>>,
    row_maps: [DofMap; 2],
    col_maps: [DofMap; 2],
}

impl Mesh {
    /// Build from node coordinates and (shape, node list) connectivity.
    ///
    /// 2D elements must be ordered counter-clockwise.
    pub fn from_parts(
        name: impl Into<String>,
        dim: usize,
        nodes: Vec<Point3>,
        elements: Vec<(Shape, Vec<usize>)>,
    ) -> Result<Self> {
        let name = name.into();
        if dim != 2 && dim != 3 {
            return Err(MortarError::invalid_mesh(name, format!("dimension {dim} not supported")));
        }
        let mut built = Vec::with_capacity(elements.len());
        for (k, (shape, conn)) in elements.into_iter().enumerate() {
            if shape.dim() != dim {
                return Err(MortarError::invalid_mesh(
                    name,
                    format!("element {k} is {shape:?} in a {dim}D mesh"),
                ));
            }
            if conn.len() != shape.num_nodes() {
                return Err(MortarError::invalid_mesh(
                    name,
                    format!("element {k} has {} nodes, {shape:?} needs {}", conn.len(), shape.num_nodes()),
                ));
            }
            if let Some(&bad) = conn.iter().find(|&&n| n >= nodes.len()) {
                return Err(MortarError::invalid_mesh(
                    name,
                    format!("element {k} references node {bad} of {}", nodes.len()),
                ));
            }
            let geometry = ElementGeometry::new(shape, conn.iter().map(|&n| nodes[n]).collect());
            let det_j = geometry.det_jacobian(&shape.reference_centroid());
            if det_j <= 0.0 {
                return Err(MortarError::DegenerateElement {
                    element: ElementIndex::new(k),
                    det_j,
                });
            }
            built.push(Element {
                id: ElementIndex::new(k),
                shape,
                nodes: conn.into_iter().map(NodeIndex::new).collect(),
                owned: true,
            });
        }

        let mut mesh = Self {
            name,
            dim,
            nodes,
            elements: built,
            row_elements: Vec::new(),
            coupling_dofs: 1,
            dof_offset: 0,
            geometry_dofs: Vec::new(),
            field_dofs: Vec::new(),
            row_maps: Default::default(),
            col_maps: Default::default(),
        };
        mesh.rebuild();
        Ok(mesh)
    }

    /// Uniform quad4 mesh of [x0, x1] × [y0, y1].
    ///
    /// # Panics
    ///
    /// Panics for zero element counts or inverted bounds.
    pub fn uniform_rectangle(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> Self {
        let (nodes, quads) = grid_2d(x0, x1, y0, y1, nx, ny);
        let elements = quads.into_iter().map(|q| (Shape::Quad4, q.to_vec())).collect();
        Self::assemble("quad4 rectangle", 2, nodes, elements)
    }

    /// Uniform tri3 mesh of [x0, x1] × [y0, y1], two triangles per grid cell.
    pub fn uniform_triangles(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> Self {
        let (nodes, quads) = grid_2d(x0, x1, y0, y1, nx, ny);
        let elements = quads
            .into_iter()
            .flat_map(|[v0, v1, v2, v3]| {
                [(Shape::Tri3, vec![v0, v1, v2]), (Shape::Tri3, vec![v0, v2, v3])]
            })
            .collect();
        Self::assemble("tri3 rectangle", 2, nodes, elements)
    }

    /// Uniform hex8 mesh of the box [min, max] with `n = [nx, ny, nz]` elements.
    ///
    /// # Panics
    ///
    /// Panics for zero element counts or inverted bounds.
    pub fn uniform_box(min: Point3, max: Point3, n: [usize; 3]) -> Self {
        let [nx, ny, nz] = n;
        assert!(nx > 0 && ny > 0 && nz > 0, "Need at least one element in each direction");
        assert!(
            max.x > min.x && max.y > min.y && max.z > min.z,
            "Invalid domain bounds"
        );

        let dx = (max.x - min.x) / nx as f64;
        let dy = (max.y - min.y) / ny as f64;
        let dz = (max.z - min.z) / nz as f64;

        let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    nodes.push(Point3::new(
                        min.x + i as f64 * dx,
                        min.y + j as f64 * dy,
                        min.z + k as f64 * dz,
                    ));
                }
            }
        }

        let id = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;
        let mut elements = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    elements.push((
                        Shape::Hex8,
                        vec![
                            id(i, j, k),
                            id(i + 1, j, k),
                            id(i + 1, j + 1, k),
                            id(i, j + 1, k),
                            id(i, j, k + 1),
                            id(i + 1, j, k + 1),
                            id(i + 1, j + 1, k + 1),
                            id(i, j + 1, k + 1),
                        ],
                    ));
                }
            }
        }
        Self::assemble("hex8 box", 3, nodes, elements)
    }

    fn assemble(name: &str, dim: usize, nodes: Vec<Point3>, elements: Vec<(Shape, Vec<usize>)>) -> Self {
        match Self::from_parts(name, dim, nodes, elements) {
            Ok(mesh) => mesh,
            Err(e) => unreachable!("structured builder produced an invalid mesh: {e}"),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of coupling dofs per node (field components).
    ///
    /// # Panics
    ///
    /// Panics if `k == 0`.
    pub fn with_coupling_dofs(mut self, k: usize) -> Self {
        assert!(k > 0, "Need at least one coupling dof per node");
        self.coupling_dofs = k;
        self.rebuild();
        self
    }

    /// Shift all coupling dof ids by `offset`.
    pub fn with_dof_offset(mut self, offset: usize) -> Self {
        self.dof_offset = offset;
        self.rebuild();
        self
    }

    /// Mark elements as ghosts: column elements not owned by this mesh.
    pub fn with_ghost_elements(mut self, ghosts: &[usize]) -> Self {
        for &g in ghosts {
            if let Some(e) = self.elements.get_mut(g) {
                e.owned = false;
            }
        }
        self.rebuild();
        self
    }

    /// Rigid translation of all nodes.
    pub fn translated(mut self, offset: Point3) -> Self {
        for p in &mut self.nodes {
            *p += offset;
        }
        self
    }

    /// Rotation by `angle` (radians) about the z-axis through `center`.
    pub fn rotated_z(mut self, angle: f64, center: Point3) -> Self {
        let (s, c) = angle.sin_cos();
        for p in &mut self.nodes {
            let d = *p - center;
            *p = center + Point3::new(c * d.x - s * d.y, s * d.x + c * d.y, d.z);
        }
        self
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn coupling_dofs_per_node(&self) -> usize {
        self.coupling_dofs
    }

    /// Recompute row elements and dof maps after a change.
    fn rebuild(&mut self) {
        self.row_elements = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.owned)
            .map(|(k, _)| k)
            .collect();

        let (dim, k, offset) = (self.dim, self.coupling_dofs, self.dof_offset);
        self.geometry_dofs = (0..self.nodes.len())
            .map(|n| (0..dim).map(|d| dim * n + d).collect())
            .collect();
        self.field_dofs = (0..self.nodes.len())
            .map(|n| (0..k).map(|c| offset + k * n + c).collect())
            .collect();

        let nodes_of = |owned_only: bool| {
            let mut seen = vec![false; self.nodes.len()];
            let mut order = Vec::new();
            for e in self.elements.iter().filter(|e| e.owned || !owned_only) {
                for n in &e.nodes {
                    if !seen[n.get()] {
                        seen[n.get()] = true;
                        order.push(n.get());
                    }
                }
            }
            order.sort_unstable();
            order
        };
        let row_nodes = nodes_of(true);
        let col_nodes = nodes_of(false);

        let map = |nodes: &[usize], dofs: &[Vec<usize>]| {
            DofMap::new(nodes.iter().flat_map(|&n| dofs[n].iter().copied()))
        };
        self.row_maps = [
            map(&row_nodes, &self.geometry_dofs),
            map(&row_nodes, &self.field_dofs),
        ];
        self.col_maps = [
            map(&col_nodes, &self.geometry_dofs),
            map(&col_nodes, &self.field_dofs),
        ];
    }
}

fn set_index(set: DofSet) -> usize {
    match set {
        DofSet::Geometry => 0,
        DofSet::Coupling => 1,
    }
}

/// Grid nodes and counter-clockwise quads of a rectangle.
fn grid_2d(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> (Vec<Point3>, Vec<[usize; 4]>) {
    assert!(nx > 0 && ny > 0, "Need at least one element in each direction");
    assert!(x1 > x0 && y1 > y0, "Invalid domain bounds");

    let dx = (x1 - x0) / nx as f64;
    let dy = (y1 - y0) / ny as f64;

    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            nodes.push(Point3::planar(x0 + i as f64 * dx, y0 + j as f64 * dy));
        }
    }

    let mut quads = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * (nx + 1) + i; // bottom-left
            let v1 = v0 + 1; // bottom-right
            let v2 = v1 + (nx + 1); // top-right
            let v3 = v0 + (nx + 1); // top-left
            quads.push([v0, v1, v2, v3]);
        }
    }
    (nodes, quads)
}

impl Discretization for Mesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn num_row_elements(&self) -> usize {
        self.row_elements.len()
    }

    fn row_element(&self, i: usize) -> &Element {
        &self.elements[self.row_elements[i]]
    }

    fn num_col_elements(&self) -> usize {
        self.elements.len()
    }

    fn col_element(&self, j: usize) -> &Element {
        &self.elements[j]
    }

    fn node_coords(&self, node: NodeIndex) -> Point3 {
        self.nodes[node]
    }

    fn node_dofs(&self, node: NodeIndex, set: DofSet) -> &[usize] {
        match set {
            DofSet::Geometry => &self.geometry_dofs[node],
            DofSet::Coupling => &self.field_dofs[node],
        }
    }

    fn dof_row_map(&self, set: DofSet) -> &DofMap {
        &self.row_maps[set_index(set)]
    }

    fn dof_col_map(&self, set: DofSet) -> &DofMap {
        &self.col_maps[set_index(set)]
    }
}
