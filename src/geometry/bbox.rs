// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use super::Vertex;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// A box always contains at least one point; "no points yet" is modelled as
/// `Option<BoundingBox>` by callers rather than with infinite sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Degenerate box around a single point
    pub fn from_point(point: &Vertex) -> Self {
        Self {
            min: *point,
            max: *point,
        }
    }

    pub fn expand_to_include(&mut self, point: &Vertex) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow this box to also cover `other`
    pub fn merge(&mut self, other: &BoundingBox) {
        self.expand_to_include(&other.min);
        self.expand_to_include(&other.max);
    }

    /// Extents along x, y and z. Differences are taken in double precision
    /// so that large offsets do not eat the size.
    pub fn size(&self) -> Vector3<f64> {
        Vector3::new(
            self.max.x as f64 - self.min.x as f64,
            self.max.y as f64 - self.min.y as f64,
            self.max.z as f64 - self.min.z as f64,
        )
    }
}
