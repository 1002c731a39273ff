// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Format-agnostic triangle source

use super::ascii::AsciiTriangles;
use super::binary::BinaryTriangles;
use super::detect::{detect_format, StlFormat, DETECT_WINDOW};
use super::error::StlResult;
use crate::geometry::Triangle;
use std::io::{BufReader, Chain, Cursor, Read};

/// Reader with the detection window put back in front of it
pub type PeekedReader<R> = BufReader<Chain<Cursor<Vec<u8>>, R>>;

/// Triangles from one STL stream, whichever encoding it uses.
///
/// The encoding is decided once when the source is opened; consumers only
/// see `Result<Triangle, StlError>` items. The sequence is single-pass and
/// ends after the first error.
pub enum TriangleSource<R> {
    Binary(BinaryTriangles<PeekedReader<R>>),
    Ascii(AsciiTriangles<PeekedReader<R>>),
}

impl<R: Read> TriangleSource<R> {
    /// Detect the encoding of `reader` and position the matching decoder at
    /// the first triangle.
    pub fn new(reader: R) -> StlResult<Self> {
        Self::open(reader, None)
    }

    /// Like [`TriangleSource::new`], with the total stream length available
    /// to disambiguate binary files whose header starts with `solid`.
    pub fn with_len(reader: R, total_len: u64) -> StlResult<Self> {
        Self::open(reader, Some(total_len))
    }

    fn open(mut reader: R, total_len: Option<u64>) -> StlResult<Self> {
        let mut prefix = Vec::with_capacity(DETECT_WINDOW);
        reader
            .by_ref()
            .take(DETECT_WINDOW as u64)
            .read_to_end(&mut prefix)?;

        let format = detect_format(&prefix, total_len)?;
        let peeked = prefix.len();

        let stream = BufReader::new(Cursor::new(prefix).chain(reader));
        match format {
            StlFormat::Binary => {
                let decoder = BinaryTriangles::new(stream)?;
                tracing::debug!(
                    %format,
                    peeked,
                    declared = decoder.declared_count(),
                    header = %decoder.header_text(),
                    "STL format detected"
                );
                Ok(TriangleSource::Binary(decoder))
            }
            StlFormat::Ascii => {
                let decoder = AsciiTriangles::new(stream)?;
                tracing::debug!(%format, peeked, name = decoder.name(), "STL format detected");
                Ok(TriangleSource::Ascii(decoder))
            }
        }
    }

    pub fn format(&self) -> StlFormat {
        match self {
            TriangleSource::Binary(_) => StlFormat::Binary,
            TriangleSource::Ascii(_) => StlFormat::Ascii,
        }
    }

    /// Header triangle count, binary streams only
    pub fn declared_count(&self) -> Option<u32> {
        match self {
            TriangleSource::Binary(decoder) => Some(decoder.declared_count()),
            TriangleSource::Ascii(_) => None,
        }
    }

    /// Name of the first solid, ASCII streams only
    pub fn solid_name(&self) -> Option<&str> {
        match self {
            TriangleSource::Binary(_) => None,
            TriangleSource::Ascii(decoder) => Some(decoder.name()),
        }
    }
}

impl<R: Read> Iterator for TriangleSource<R> {
    type Item = StlResult<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            TriangleSource::Binary(decoder) => decoder.next(),
            TriangleSource::Ascii(decoder) => decoder.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            TriangleSource::Binary(decoder) => decoder.size_hint(),
            TriangleSource::Ascii(decoder) => decoder.size_hint(),
        }
    }
}
