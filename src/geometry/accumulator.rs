// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Single-pass geometry reduction over a triangle stream

use super::{BoundingBox, Triangle};

/// Running bounding box, signed volume, surface area and triangle tally.
///
/// Memory use is constant in the number of triangles. The reduction is
/// commutative, so triangle order only affects floating-point rounding of
/// the volume and area sums.
#[derive(Debug, Clone, Default)]
pub struct GeometryAccumulator {
    bounds: Option<BoundingBox>,
    signed_volume: f64,
    surface_area: f64,
    triangle_count: u64,
}

impl GeometryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one triangle into the running state. Degenerate triangles are
    /// counted like any other.
    pub fn push(&mut self, triangle: &Triangle) {
        let [v0, v1, v2] = &triangle.vertices;
        let bounds = self
            .bounds
            .get_or_insert_with(|| BoundingBox::from_point(v0));
        bounds.expand_to_include(v0);
        bounds.expand_to_include(v1);
        bounds.expand_to_include(v2);

        self.signed_volume += triangle.signed_volume();
        self.surface_area += triangle.area();
        self.triangle_count += 1;
    }

    /// Combine two partial reductions, e.g. from chunks folded on different
    /// threads.
    pub fn merge(&mut self, other: &GeometryAccumulator) {
        match (&mut self.bounds, &other.bounds) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.bounds = Some(*theirs),
            _ => {}
        }
        self.signed_volume += other.signed_volume;
        self.surface_area += other.surface_area;
        self.triangle_count += other.triangle_count;
    }

    /// Extents seen so far, `None` until the first triangle arrives
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn signed_volume(&self) -> f64 {
        self.signed_volume
    }

    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    pub fn triangle_count(&self) -> u64 {
        self.triangle_count
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count == 0
    }
}

impl<'a> Extend<&'a Triangle> for GeometryAccumulator {
    fn extend<I: IntoIterator<Item = &'a Triangle>>(&mut self, iter: I) {
        for triangle in iter {
            self.push(triangle);
        }
    }
}

impl Extend<Triangle> for GeometryAccumulator {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        for triangle in iter {
            self.push(&triangle);
        }
    }
}

impl<'a> FromIterator<&'a Triangle> for GeometryAccumulator {
    fn from_iter<I: IntoIterator<Item = &'a Triangle>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}
