// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flat per-file record written to the CSV report

use super::discovery::DiscoveredFile;
use crate::measure::{Measurement, MeasurementStatus, UNIT};
use serde::{Deserialize, Serialize};

/// CSV column order. Field names of [`MeasurementRecord`] must match.
pub const CSV_HEADER: [&str; 9] = [
    "folder",
    "file",
    "width_x",
    "depth_y",
    "height_z",
    "volume",
    "triangle_count",
    "unit",
    "status",
];

/// One CSV row. Absent values serialize as empty fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub folder: String,
    pub file: String,
    pub width_x: Option<f64>,
    pub depth_y: Option<f64>,
    pub height_z: Option<f64>,
    pub volume: Option<f64>,
    pub triangle_count: Option<u64>,
    pub unit: String,
    pub status: String,
}

impl MeasurementRecord {
    /// Flatten a measurement, rounding values to `precision` decimals
    pub fn new(file: &DiscoveredFile, measurement: &Measurement, precision: usize) -> Self {
        let dims = measurement.dimensions;
        let triangle_count = match measurement.status {
            MeasurementStatus::Error(_) => None,
            _ => Some(measurement.triangle_count),
        };

        Self {
            folder: file.folder.clone(),
            file: file.file.clone(),
            width_x: dims.map(|d| round_to(d.width, precision)),
            depth_y: dims.map(|d| round_to(d.depth, precision)),
            height_z: dims.map(|d| round_to(d.height, precision)),
            volume: measurement.volume.map(|v| round_to(v, precision)),
            triangle_count,
            unit: UNIT.to_string(),
            status: measurement.status.to_string(),
        }
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: usize) -> f64 {
    let factor = 10f64.powi(places.min(15) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StlError;
    use std::path::PathBuf;

    fn discovered() -> DiscoveredFile {
        DiscoveredFile {
            path: PathBuf::from("/scan/parts/gear.stl"),
            folder: "parts".to_string(),
            file: "gear.stl".to_string(),
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(10.0, 3), 10.0);
    }

    #[test]
    fn test_error_record_has_no_values() {
        let m = Measurement::failed(&StlError::TruncatedFile {
            declared: 10,
            decoded: 9,
        });
        let record = MeasurementRecord::new(&discovered(), &m, 3);
        assert_eq!(record.folder, "parts");
        assert!(record.width_x.is_none());
        assert!(record.triangle_count.is_none());
        assert_eq!(record.unit, "mm");
        assert!(record.status.starts_with("Error: truncated file"));
    }

    #[test]
    fn test_empty_record_keeps_zero_count() {
        let m = crate::measure_reader(&b"solid e\nendsolid e\n"[..]);
        let record = MeasurementRecord::new(&discovered(), &m, 3);
        assert_eq!(record.triangle_count, Some(0));
        assert!(record.height_z.is_none());
        assert_eq!(record.status, "empty");
    }
}
