// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Measurement assembly: from a finished reduction (or a failure) to the
//! per-file result record

use crate::geometry::{BoundingBox, GeometryAccumulator};
use crate::io::{open_stl_file, StlError, StlFormat, StlResult, TriangleSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Unit reported alongside every measurement. Coordinates are never
/// converted.
pub const UNIT: &str = "mm";

/// Bounding-box extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub depth: f64,
    /// Extent along z
    pub height: f64,
}

impl Dimensions {
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        let size = bounds.size();
        Self {
            width: size.x,
            depth: size.y,
            height: size.z,
        }
    }
}

/// Outcome of measuring one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum MeasurementStatus {
    Ok,
    /// Stream decoded cleanly but held no triangles
    Empty,
    /// Detection or decoding failed; carries the error text
    Error(String),
}

impl MeasurementStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, MeasurementStatus::Ok)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MeasurementStatus::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MeasurementStatus::Error(_))
    }
}

impl fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementStatus::Ok => f.write_str("OK"),
            MeasurementStatus::Empty => f.write_str("empty"),
            MeasurementStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Measurement of one STL stream.
///
/// Geometric fields are `Some` only when the status is `Ok`. An empty stream
/// reports `triangle_count == 0` and no dimensions, which keeps it apart
/// from a flat mesh whose height is a measured `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub dimensions: Option<Dimensions>,
    pub bounds: Option<BoundingBox>,
    /// Absolute value of the signed volume sum
    pub volume: Option<f64>,
    /// Raw signed sum; negative for inside-out meshes
    pub signed_volume: Option<f64>,
    pub surface_area: Option<f64>,
    pub triangle_count: u64,
    pub format: Option<StlFormat>,
    pub status: MeasurementStatus,
}

impl Measurement {
    /// Build the result from a fully consumed stream.
    pub fn assemble(acc: &GeometryAccumulator, format: Option<StlFormat>) -> Self {
        let Some(bounds) = acc.bounds() else {
            return Self {
                dimensions: None,
                bounds: None,
                volume: None,
                signed_volume: None,
                surface_area: None,
                triangle_count: 0,
                format,
                status: MeasurementStatus::Empty,
            };
        };

        Self {
            dimensions: Some(Dimensions::from_bounds(&bounds)),
            bounds: Some(bounds),
            volume: Some(acc.signed_volume().abs()),
            signed_volume: Some(acc.signed_volume()),
            surface_area: Some(acc.surface_area()),
            triangle_count: acc.triangle_count(),
            format,
            status: MeasurementStatus::Ok,
        }
    }

    /// Result for a stream that could not be measured. No partial geometry
    /// is kept.
    pub fn failed(err: &StlError) -> Self {
        Self {
            dimensions: None,
            bounds: None,
            volume: None,
            signed_volume: None,
            surface_area: None,
            triangle_count: 0,
            format: None,
            status: MeasurementStatus::Error(err.to_string()),
        }
    }

    /// Fold a typed result into a record, turning errors into status text.
    pub fn from_result(result: StlResult<Measurement>) -> Self {
        match result {
            Ok(measurement) => measurement,
            Err(err) => Self::failed(&err),
        }
    }

    /// Reject an empty measurement with [`StlError::EmptyMesh`]. Any other
    /// status is passed through.
    pub fn require_solid(self) -> StlResult<Self> {
        if self.status.is_empty() {
            Err(StlError::EmptyMesh)
        } else {
            Ok(self)
        }
    }

    /// True if the signed volume is negative, i.e. the facets wind inward
    pub fn is_inverted(&self) -> bool {
        self.signed_volume.map(|v| v < 0.0).unwrap_or(false)
    }
}

/// Drain a triangle source into a measurement. The first decoding error
/// aborts the pass.
pub fn try_measure<R: Read>(source: TriangleSource<R>) -> StlResult<Measurement> {
    let format = source.format();
    let mut acc = GeometryAccumulator::new();
    for triangle in source {
        acc.push(&triangle?);
    }
    Ok(Measurement::assemble(&acc, Some(format)))
}

/// Measure a stream of unknown length.
pub fn try_measure_reader<R: Read>(reader: R) -> StlResult<Measurement> {
    try_measure(TriangleSource::new(reader)?)
}

/// Measure an in-memory STL image.
pub fn try_measure_bytes(bytes: &[u8]) -> StlResult<Measurement> {
    try_measure(TriangleSource::with_len(bytes, bytes.len() as u64)?)
}

/// Measure the STL file at `path`.
pub fn try_measure_file(path: impl AsRef<Path>) -> StlResult<Measurement> {
    try_measure(open_stl_file(path)?)
}

/// Like [`try_measure_reader`], with failures captured in the status.
pub fn measure_reader<R: Read>(reader: R) -> Measurement {
    Measurement::from_result(try_measure_reader(reader))
}

/// Like [`try_measure_bytes`], with failures captured in the status.
pub fn measure_bytes(bytes: &[u8]) -> Measurement {
    Measurement::from_result(try_measure_bytes(bytes))
}

/// Like [`try_measure_file`], with failures captured in the status.
pub fn measure_file(path: impl AsRef<Path>) -> Measurement {
    let path = path.as_ref();
    let measurement = Measurement::from_result(try_measure_file(path));
    match &measurement.status {
        MeasurementStatus::Error(message) => {
            tracing::warn!(path = %path.display(), error = %message, "measurement failed")
        }
        status => tracing::debug!(
            path = %path.display(),
            %status,
            triangles = measurement.triangle_count,
            "measured"
        ),
    }
    measurement
}
