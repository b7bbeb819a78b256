//! Element shapes and their Lagrange shape functions.
//!
//! Reference domains:
//! - `Quad4`, `Hex8`: [-1, 1]^d, tensor-product (bi/tri-)linear functions
//! - `Tri3`, `Tet4`: unit simplex, barycentric linear functions
//!
//! Node ordering (counter-clockwise bottom layer first):
//! - Quad4: (-1,-1), (1,-1), (1,1), (-1,1)
//! - Hex8:  Quad4 layer at ζ = -1, then the same layer at ζ = +1
//! - Tri3:  (0,0), (1,0), (0,1)
//! - Tet4:  (0,0,0), (1,0,0), (0,1,0), (0,0,1)

/// Supported element shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Tri3,
    Quad4,
    Tet4,
    Hex8,
}

/// Shape functions of one element kind.
///
/// Implemented by zero-sized types so integrators can be monomorphized per
/// (slave, master) shape pair.
pub trait ShapeFunctions {
    const SHAPE: Shape;
    const NUM_NODES: usize;

    /// Write N_i(xi) for all nodes into `out`.
    fn values(xi: &[f64; 3], out: &mut [f64]);

    /// Write dN_i/dxi_k(xi) for all nodes into `out`.
    fn derivatives(xi: &[f64; 3], out: &mut [[f64; 3]]);
}

/// Linear triangle.
pub struct Tri3;
/// Bilinear quadrilateral.
pub struct Quad4;
/// Linear tetrahedron.
pub struct Tet4;
/// Trilinear hexahedron.
pub struct Hex8;

const QUAD4_NODES: [[f64; 3]; 4] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
];

const HEX8_NODES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const TRI3_NODES: [[f64; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

const TET4_NODES: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

const TRI3_FACES: [&[usize]; 3] = [&[0, 1], &[1, 2], &[2, 0]];
const QUAD4_FACES: [&[usize]; 4] = [&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const TET4_FACES: [&[usize]; 4] = [&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[1, 2, 3]];
const HEX8_FACES: [&[usize]; 6] = [
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];

impl ShapeFunctions for Tri3 {
    const SHAPE: Shape = Shape::Tri3;
    const NUM_NODES: usize = 3;

    fn values(xi: &[f64; 3], out: &mut [f64]) {
        out[0] = 1.0 - xi[0] - xi[1];
        out[1] = xi[0];
        out[2] = xi[1];
    }

    fn derivatives(_xi: &[f64; 3], out: &mut [[f64; 3]]) {
        out[0] = [-1.0, -1.0, 0.0];
        out[1] = [1.0, 0.0, 0.0];
        out[2] = [0.0, 1.0, 0.0];
    }
}

impl ShapeFunctions for Quad4 {
    const SHAPE: Shape = Shape::Quad4;
    const NUM_NODES: usize = 4;

    fn values(xi: &[f64; 3], out: &mut [f64]) {
        for (i, node) in QUAD4_NODES.iter().enumerate() {
            out[i] = 0.25 * (1.0 + xi[0] * node[0]) * (1.0 + xi[1] * node[1]);
        }
    }

    fn derivatives(xi: &[f64; 3], out: &mut [[f64; 3]]) {
        for (i, node) in QUAD4_NODES.iter().enumerate() {
            out[i] = [
                0.25 * node[0] * (1.0 + xi[1] * node[1]),
                0.25 * node[1] * (1.0 + xi[0] * node[0]),
                0.0,
            ];
        }
    }
}

impl ShapeFunctions for Tet4 {
    const SHAPE: Shape = Shape::Tet4;
    const NUM_NODES: usize = 4;

    fn values(xi: &[f64; 3], out: &mut [f64]) {
        out[0] = 1.0 - xi[0] - xi[1] - xi[2];
        out[1] = xi[0];
        out[2] = xi[1];
        out[3] = xi[2];
    }

    fn derivatives(_xi: &[f64; 3], out: &mut [[f64; 3]]) {
        out[0] = [-1.0, -1.0, -1.0];
        out[1] = [1.0, 0.0, 0.0];
        out[2] = [0.0, 1.0, 0.0];
        out[3] = [0.0, 0.0, 1.0];
    }
}

impl ShapeFunctions for Hex8 {
    const SHAPE: Shape = Shape::Hex8;
    const NUM_NODES: usize = 8;

    fn values(xi: &[f64; 3], out: &mut [f64]) {
        for (i, node) in HEX8_NODES.iter().enumerate() {
            out[i] = 0.125
                * (1.0 + xi[0] * node[0])
                * (1.0 + xi[1] * node[1])
                * (1.0 + xi[2] * node[2]);
        }
    }

    fn derivatives(xi: &[f64; 3], out: &mut [[f64; 3]]) {
        for (i, node) in HEX8_NODES.iter().enumerate() {
            let a = 1.0 + xi[0] * node[0];
            let b = 1.0 + xi[1] * node[1];
            let c = 1.0 + xi[2] * node[2];
            out[i] = [
                0.125 * node[0] * b * c,
                0.125 * node[1] * a * c,
                0.125 * node[2] * a * b,
            ];
        }
    }
}

impl Shape {
    pub const fn num_nodes(self) -> usize {
        match self {
            Shape::Tri3 => Tri3::NUM_NODES,
            Shape::Quad4 => Quad4::NUM_NODES,
            Shape::Tet4 => Tet4::NUM_NODES,
            Shape::Hex8 => Hex8::NUM_NODES,
        }
    }

    /// Reference (and spatial) dimension.
    pub const fn dim(self) -> usize {
        match self {
            Shape::Tri3 | Shape::Quad4 => 2,
            Shape::Tet4 | Shape::Hex8 => 3,
        }
    }

    /// Simplex shapes use barycentric reference coordinates.
    pub const fn is_simplex(self) -> bool {
        matches!(self, Shape::Tri3 | Shape::Tet4)
    }

    /// Reference coordinates of the nodes.
    pub fn reference_nodes(self) -> &'static [[f64; 3]] {
        match self {
            Shape::Tri3 => &TRI3_NODES,
            Shape::Quad4 => &QUAD4_NODES,
            Shape::Tet4 => &TET4_NODES,
            Shape::Hex8 => &HEX8_NODES,
        }
    }

    /// Boundary entities as local node lists, counter-clockwise seen from outside.
    ///
    /// Edges for 2D shapes, faces for 3D shapes.
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            Shape::Tri3 => &TRI3_FACES,
            Shape::Quad4 => &QUAD4_FACES,
            Shape::Tet4 => &TET4_FACES,
            Shape::Hex8 => &HEX8_FACES,
        }
    }

    /// Reference coordinates of the element centroid.
    pub fn reference_centroid(self) -> [f64; 3] {
        match self {
            Shape::Tri3 => [1.0 / 3.0, 1.0 / 3.0, 0.0],
            Shape::Tet4 => [0.25, 0.25, 0.25],
            Shape::Quad4 | Shape::Hex8 => [0.0, 0.0, 0.0],
        }
    }

    /// Reference point inside the domain expanded by `eps`.
    pub fn is_inside(self, xi: &[f64; 3], eps: f64) -> bool {
        let d = self.dim();
        if self.is_simplex() {
            xi[..d].iter().all(|&c| c >= -eps) && xi[..d].iter().sum::<f64>() <= 1.0 + eps
        } else {
            xi[..d].iter().all(|&c| c.abs() <= 1.0 + eps)
        }
    }

    /// Reference point inside the domain shrunk by `eps`.
    pub fn is_strictly_inside(self, xi: &[f64; 3], eps: f64) -> bool {
        let d = self.dim();
        if self.is_simplex() {
            xi[..d].iter().all(|&c| c > eps) && xi[..d].iter().sum::<f64>() < 1.0 - eps
        } else {
            xi[..d].iter().all(|&c| c.abs() < 1.0 - eps)
        }
    }

    /// Write shape function values at `xi` into `out` (length `num_nodes`).
    pub fn values(self, xi: &[f64; 3], out: &mut [f64]) {
        match self {
            Shape::Tri3 => Tri3::values(xi, out),
            Shape::Quad4 => Quad4::values(xi, out),
            Shape::Tet4 => Tet4::values(xi, out),
            Shape::Hex8 => Hex8::values(xi, out),
        }
    }

    /// Write shape function derivatives at `xi` into `out` (length `num_nodes`).
    pub fn derivatives(self, xi: &[f64; 3], out: &mut [[f64; 3]]) {
        match self {
            Shape::Tri3 => Tri3::derivatives(xi, out),
            Shape::Quad4 => Quad4::derivatives(xi, out),
            Shape::Tet4 => Tet4::derivatives(xi, out),
            Shape::Hex8 => Hex8::derivatives(xi, out),
        }
    }
}
