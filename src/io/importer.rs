// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL file importer

use super::error::StlResult;
use super::source::TriangleSource;
use std::fs::File;
use std::path::Path;

/// Open an STL file as a triangle source. The file size is passed on to
/// format detection.
pub fn open_stl_file(path: impl AsRef<Path>) -> StlResult<TriangleSource<File>> {
    let file = File::open(path.as_ref())?;
    let len = file.metadata()?.len();
    TriangleSource::with_len(file, len)
}
