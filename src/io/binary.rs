// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Streaming binary STL decoder
//!
//! ```text
//! UINT8[80]    header (free-form)
//! UINT32       triangle count N
//! N records of
//!     REAL32[3]  normal
//!     REAL32[9]  three vertices
//!     UINT16     attribute byte count (ignored)
//! ```

use super::detect::{HEADER_SIZE, RECORD_SIZE};
use super::error::{StlError, StlResult};
use crate::geometry::Triangle;
use std::io::{ErrorKind, Read};

/// Lazy sequence of the records declared in a binary STL header.
///
/// Exactly one 50-byte record is buffered at a time. Running out of data
/// before the declared count yields [`StlError::TruncatedFile`]; bytes after
/// the last declared record are never read.
pub struct BinaryTriangles<R> {
    reader: R,
    header: [u8; HEADER_SIZE],
    declared: u32,
    decoded: u32,
    finished: bool,
}

impl<R: Read> BinaryTriangles<R> {
    /// Read the 80-byte header and the triangle count from the start of
    /// `reader`.
    pub fn new(mut reader: R) -> StlResult<Self> {
        let mut header = [0u8; HEADER_SIZE];
        let mut count = [0u8; 4];
        read_preamble(&mut reader, &mut header)?;
        read_preamble(&mut reader, &mut count)?;

        let declared = u32::from_le_bytes(count);
        tracing::trace!(declared, "binary STL preamble read");

        Ok(Self {
            reader,
            header,
            declared,
            decoded: 0,
            finished: false,
        })
    }

    /// Triangle count from the header
    pub fn declared_count(&self) -> u32 {
        self.declared
    }

    /// Records successfully decoded so far
    pub fn decoded_count(&self) -> u32 {
        self.decoded
    }

    /// Header comment with trailing NULs and whitespace removed
    pub fn header_text(&self) -> String {
        let end = self
            .header
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(HEADER_SIZE);
        String::from_utf8_lossy(&self.header[..end]).trim().to_string()
    }

    fn next_record(&mut self) -> StlResult<Triangle> {
        let mut record = [0u8; RECORD_SIZE];
        if let Err(err) = self.reader.read_exact(&mut record) {
            return Err(match err.kind() {
                ErrorKind::UnexpectedEof => StlError::TruncatedFile {
                    declared: self.declared_count(),
                    decoded: self.decoded_count(),
                },
                _ => StlError::Io(err),
            });
        }

        let triangle = decode_record(&record);
        // The normal is advisory and never measured; only vertices must be finite.
        let finite = triangle
            .vertices
            .iter()
            .all(|v| v.coords.iter().all(|c| c.is_finite()));
        if !finite {
            return Err(StlError::format(format!(
                "record {} of {} has a non-finite vertex coordinate",
                self.decoded_count() + 1,
                self.declared_count()
            )));
        }
        Ok(triangle)
    }
}

impl<R: Read> Iterator for BinaryTriangles<R> {
    type Item = StlResult<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.decoded >= self.declared {
            return None;
        }

        match self.next_record() {
            Ok(triangle) => {
                self.decoded += 1;
                Some(Ok(triangle))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let remaining = (self.declared - self.decoded) as usize;
        (0, Some(remaining))
    }
}

fn read_preamble<R: Read>(reader: &mut R, buf: &mut [u8]) -> StlResult<()> {
    reader.read_exact(buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            StlError::format("stream ends inside the 84-byte binary STL header")
        } else {
            StlError::Io(err)
        }
    })
}

fn read_f32(bytes: &[u8], index: usize) -> f32 {
    let offset = index * 4;
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn decode_record(record: &[u8; RECORD_SIZE]) -> Triangle {
    let normal = [read_f32(record, 0), read_f32(record, 1), read_f32(record, 2)];
    let vertex = |i: usize| {
        [
            read_f32(record, 3 + i * 3),
            read_f32(record, 4 + i * 3),
            read_f32(record, 5 + i * 3),
        ]
    };
    Triangle::from_arrays(normal, [vertex(0), vertex(1), vertex(2)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(values: [f32; 12]) -> Vec<u8> {
        let mut bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        bytes.extend_from_slice(&[0xAB, 0xCD]);
        bytes
    }

    fn stream(header: &[u8], declared: u32, records: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..header.len()].copy_from_slice(header);
        bytes.extend_from_slice(&declared.to_le_bytes());
        for i in 0..records {
            let f = i as f32;
            bytes.extend(record([
                0.0, 0.0, 1.0, f, 0.0, 0.0, 0.0, f, 0.0, 0.0, 0.0, f,
            ]));
        }
        bytes
    }

    #[test]
    fn test_decodes_declared_records() {
        let bytes = stream(b"test part", 3, 3);
        let decoder = BinaryTriangles::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.declared_count(), 3);
        assert_eq!(decoder.header_text(), "test part");

        let triangles: Vec<_> = decoder.collect::<StlResult<_>>().unwrap();
        assert_eq!(triangles.len(), 3);
        assert_eq!(triangles[2].vertices[0].x, 2.0);
        assert_eq!(triangles[2].vertices[1].y, 2.0);
        assert_eq!(triangles[2].normal.z, 1.0);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = stream(b"", 2, 2);
        bytes.extend_from_slice(b"trailing garbage");
        let count = BinaryTriangles::new(Cursor::new(bytes))
            .unwrap()
            .filter(|t| t.is_ok())
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_truncated_mid_record() {
        let mut bytes = stream(b"", 10, 9);
        bytes.extend_from_slice(&[0u8; 20]);

        let mut decoder = BinaryTriangles::new(Cursor::new(bytes)).unwrap();
        for _ in 0..9 {
            assert!(decoder.next().unwrap().is_ok());
        }
        match decoder.next() {
            Some(Err(StlError::TruncatedFile { declared, decoded })) => {
                assert_eq!(declared, 10);
                assert_eq!(decoded, 9);
            }
            other => panic!("expected truncation, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(decoder.next().is_none());
    }

    #[test]
    fn test_short_preamble() {
        let result = BinaryTriangles::new(Cursor::new(vec![0u8; 82]));
        assert!(matches!(result, Err(StlError::Format(_))));
    }

    #[test]
    fn test_non_finite_vertex_rejected() {
        let mut bytes = stream(b"", 3, 1);
        bytes.extend(record([
            0.0, 0.0, 1.0, f32::NAN, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
        ]));
        bytes.extend(record([
            0.0, 0.0, 1.0, 0.0, 0.0, 0.0, f32::INFINITY, 1.0, 0.0, 0.0, 0.0, 1.0,
        ]));

        let mut decoder = BinaryTriangles::new(Cursor::new(bytes)).unwrap();
        assert!(decoder.next().unwrap().is_ok());
        match decoder.next() {
            Some(Err(StlError::Format(message))) => {
                assert!(message.contains("record 2 of 3"), "{}", message)
            }
            other => panic!("expected format error, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(decoder.next().is_none());
        assert_eq!(decoder.decoded_count(), 1);
    }

    #[test]
    fn test_nan_normal_is_tolerated() {
        let mut bytes = stream(b"", 1, 0);
        bytes.extend(record([
            f32::NAN, f32::NAN, f32::NAN, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ]));
        let decoder = BinaryTriangles::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.filter(|t| t.is_ok()).count(), 1);
    }

    #[test]
    fn test_zero_declared() {
        let decoder = BinaryTriangles::new(Cursor::new(stream(b"", 0, 0))).unwrap();
        assert_eq!(decoder.count(), 0);
    }
}
