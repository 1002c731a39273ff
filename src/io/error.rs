// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error taxonomy for STL decoding

use thiserror::Error;

/// Result alias for STL decoding
pub type StlResult<T> = Result<T, StlError>;

/// Failure while reading or measuring one STL stream.
///
/// Every variant is scoped to a single stream; none of them is fatal to a
/// batch run.
#[derive(Debug, Error)]
pub enum StlError {
    /// Stream too short or not recognisable as either STL encoding
    #[error("format error: {0}")]
    Format(String),

    /// Binary stream ended before the declared number of records
    #[error("truncated file: header declares {declared} triangles but only {decoded} complete records are present")]
    TruncatedFile { declared: u32, decoded: u32 },

    /// ASCII grammar violation
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Well-formed stream without a single triangle
    #[error("empty mesh: no triangles found")]
    EmptyMesh,

    /// Underlying reader failed or was closed mid-decode
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StlError {
    pub fn format(message: impl Into<String>) -> Self {
        StlError::Format(message.into())
    }

    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        StlError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Position of an ASCII parse failure as `(line, column)`, both 1-based
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            StlError::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}
