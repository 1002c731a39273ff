// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - STL detection and decoding

mod ascii;
mod binary;
mod detect;
mod error;
mod importer;
mod source;

pub use ascii::{AsciiTriangles, MAX_LINE_LEN};
pub use binary::BinaryTriangles;
pub use detect::{
    declared_count, detect_format, StlFormat, DETECT_WINDOW, HEADER_SIZE, PREAMBLE_SIZE,
    RECORD_SIZE,
};
pub use error::{StlError, StlResult};
pub use importer::open_stl_file;
pub use source::{PeekedReader, TriangleSource};
