// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL Dimensions
//!
//! Streams binary and ASCII STL meshes and measures their bounding box,
//! enclosed volume and triangle count in a single pass. The `batch` module
//! drives the measurement over a folder of files and writes CSV and log
//! reports.

pub mod batch;
pub mod cli;
pub mod geometry;
pub mod io;
pub mod measure;

pub use geometry::{BoundingBox, GeometryAccumulator, Triangle, Vertex};
pub use io::{detect_format, open_stl_file, StlError, StlFormat, StlResult, TriangleSource};
pub use measure::{
    measure_bytes, measure_file, measure_reader, try_measure, try_measure_bytes,
    try_measure_file, try_measure_reader, Dimensions, Measurement, MeasurementStatus, UNIT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_measurement() {
        let result = measure_reader(&b"solid a\nendsolid a\n"[..]);
        assert!(result.status.is_empty());
    }
}
