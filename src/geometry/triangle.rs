// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle soup value types

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A mesh vertex. STL stores coordinates as 32-bit floats.
pub type Vertex = Point3<f32>;

/// One decoded facet: an advisory normal plus three vertices.
///
/// Triangles never share vertex storage and the normal is kept exactly as
/// read; it is not recomputed or checked against the winding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub normal: Vector3<f32>,
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Build a triangle from raw coordinate arrays, normal first.
    pub fn from_arrays(normal: [f32; 3], vertices: [[f32; 3]; 3]) -> Self {
        Self {
            normal: Vector3::from(normal),
            vertices: vertices.map(Point3::from),
        }
    }

    /// Signed volume of the tetrahedron spanned by the origin and this
    /// triangle, `v1 · (v2 × v3) / 6`, evaluated in double precision.
    pub fn signed_volume(&self) -> f64 {
        let [a, b, c] = self.vertices.map(|v| v.coords.cast::<f64>());
        a.dot(&b.cross(&c)) / 6.0
    }

    /// Triangle area, evaluated in double precision.
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.vertices.map(|v| v.coords.cast::<f64>());
        (b - a).cross(&(c - a)).norm() / 2.0
    }
}
