// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - triangle types and measurement reductions

mod accumulator;
mod bbox;
mod triangle;

pub use accumulator::GeometryAccumulator;
pub use bbox::BoundingBox;
pub use triangle::{Triangle, Vertex};
