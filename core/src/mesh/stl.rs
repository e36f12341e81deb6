//! Grid triangulation and STL serialization.
//!
//! The coordinate grids describe a quadrilateral mesh; every grid cell is
//! split into two triangles, so an R x C grid yields 2 * (R-1) * (C-1)
//! facets. Encoding is delegated to `stl_io` (binary STL: 80-byte header,
//! u32 facet count, 50 bytes per facet).

use std::io::Write;

use ndarray::ArrayView2;
use stl_io::{Normal, Triangle, Vertex};

use crate::prelude::{PatternError, PatternResult};

/// Splits the quadrilateral mesh implied by three equal-shape coordinate
/// grids into triangular facets with unit normals.
pub fn triangulate_grid(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    z: ArrayView2<f64>,
) -> PatternResult<Vec<Triangle>> {
    let (rows, cols) = x.dim();
    if y.dim() != (rows, cols) || z.dim() != (rows, cols) {
        return Err(PatternError::InvalidSlice(format!(
            "coordinate grid shapes differ: x {:?}, y {:?}, z {:?}",
            x.dim(),
            y.dim(),
            z.dim()
        )));
    }
    if rows < 2 || cols < 2 {
        return Err(PatternError::InvalidSlice(format!(
            "grid {rows} x {cols} has no cells to triangulate"
        )));
    }

    let vertex = |i: usize, j: usize| -> [f32; 3] {
        [x[(i, j)] as f32, y[(i, j)] as f32, z[(i, j)] as f32]
    };

    let mut triangles = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let v00 = vertex(i, j);
            let v01 = vertex(i, j + 1);
            let v10 = vertex(i + 1, j);
            let v11 = vertex(i + 1, j + 1);
            triangles.push(facet(v00, v10, v11));
            triangles.push(facet(v00, v11, v01));
        }
    }
    Ok(triangles)
}

/// Serializes the facets as binary STL.
pub fn write_stl<W: Write>(writer: &mut W, triangles: &[Triangle]) -> PatternResult<()> {
    stl_io::write_stl(writer, triangles.iter()).map_err(PatternError::Io)
}

fn facet(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    // Zero-area facets (coincident grid points, e.g. at the poles) get a
    // placeholder normal.
    let normal = if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    };
    Triangle {
        normal: Normal::new(normal),
        vertices: [Vertex::new(a), Vertex::new(b), Vertex::new(c)],
    }
}
