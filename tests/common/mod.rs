// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared STL fixtures for integration tests

#![allow(dead_code)]

use std::fmt::Write as _;

/// Normal and three vertices of one facet
pub type Facet = ([f32; 3], [[f32; 3]; 3]);

/// Corner sign patterns for the two outward-wound triangles of each face
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    (
        [0.0, 0.0, -1.0],
        [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
    ),
    (
        [0.0, 0.0, 1.0],
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    ),
    (
        [0.0, -1.0, 0.0],
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    ),
    (
        [0.0, 1.0, 0.0],
        [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
    ),
    (
        [-1.0, 0.0, 0.0],
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    ),
    (
        [1.0, 0.0, 0.0],
        [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
    ),
];

/// Closed, outward-wound cube of edge `size` centred on the origin
pub fn cube(size: f32) -> Vec<Facet> {
    cube_at(size, [0.0; 3])
}

/// Closed, outward-wound cube of edge `size` centred on `center`
pub fn cube_at(size: f32, center: [f32; 3]) -> Vec<Facet> {
    let half = size / 2.0;
    let corner = |signs: [f32; 3]| {
        [
            center[0] + signs[0] * half,
            center[1] + signs[1] * half,
            center[2] + signs[2] * half,
        ]
    };

    CUBE_FACES
        .iter()
        .flat_map(|(normal, quad)| {
            [
                (*normal, [corner(quad[0]), corner(quad[1]), corner(quad[2])]),
                (*normal, [corner(quad[0]), corner(quad[2]), corner(quad[3])]),
            ]
        })
        .collect()
}

/// Binary STL with the given header text and the facet count in the header
pub fn binary_stl(header: &str, facets: &[Facet]) -> Vec<u8> {
    binary_stl_declaring(header, facets.len() as u32, facets)
}

/// Binary STL whose header declares `declared` facets regardless of the
/// records actually written
pub fn binary_stl_declaring(header: &str, declared: u32, facets: &[Facet]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes[..header.len()].copy_from_slice(header.as_bytes());
    bytes.extend_from_slice(&declared.to_le_bytes());
    for (normal, vertices) in facets {
        for value in normal.iter().chain(vertices.iter().flatten()) {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&[0, 0]);
    }
    bytes
}

/// Binary STL written by `stl_io`
pub fn stl_io_binary(facets: &[Facet]) -> Vec<u8> {
    use stl_io::{Normal, Triangle, Vertex};

    let triangles: Vec<Triangle> = facets
        .iter()
        .map(|(normal, v)| Triangle {
            normal: Normal::new(*normal),
            vertices: [Vertex::new(v[0]), Vertex::new(v[1]), Vertex::new(v[2])],
        })
        .collect();

    let mut bytes = Vec::new();
    stl_io::write_stl(&mut std::io::Cursor::new(&mut bytes), triangles.iter())
        .expect("stl_io write");
    bytes
}

/// ASCII STL with conventional indentation
pub fn ascii_stl(name: &str, facets: &[Facet]) -> String {
    let mut text = format!("solid {}\n", name);
    for (n, vertices) in facets {
        writeln!(text, "  facet normal {:e} {:e} {:e}", n[0], n[1], n[2]).unwrap();
        text.push_str("    outer loop\n");
        for v in vertices {
            writeln!(text, "      vertex {:e} {:e} {:e}", v[0], v[1], v[2]).unwrap();
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    writeln!(text, "endsolid {}", name).unwrap();
    text
}
