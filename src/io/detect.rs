// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASCII / binary STL format detection
//!
//! Binary files start with an 80-byte free-form header and a little-endian
//! `u32` triangle count. ASCII files start with `solid`. Plenty of binary
//! exporters also write `solid` at the start of the header, so a `solid`
//! prefix alone is not trusted. The name line must be free of control bytes,
//! the rest of the peeked window must read as text, and the first token after
//! the name line must open a facet or close the solid. The name itself may
//! be in any 8-bit encoding.

use super::error::{StlError, StlResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the free-form binary header
pub const HEADER_SIZE: usize = 80;

/// Header plus the triangle count
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Normal, three vertices and the attribute word
pub const RECORD_SIZE: usize = 50;

/// Number of leading bytes inspected by [`detect_format`]
pub const DETECT_WINDOW: usize = 1024;

/// STL encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    Ascii,
    Binary,
}

impl StlFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StlFormat::Ascii => "ascii",
            StlFormat::Binary => "binary",
        }
    }
}

impl fmt::Display for StlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide which decoder to run from the first bytes of a stream.
///
/// `prefix` should hold the first [`DETECT_WINDOW`] bytes, or the whole
/// stream if it is shorter. When the total stream length is known, a binary
/// file whose size matches its declared count exactly wins over a `solid`
/// prefix.
pub fn detect_format(prefix: &[u8], total_len: Option<u64>) -> StlResult<StlFormat> {
    if looks_like_ascii(prefix) {
        if let Some(len) = total_len {
            if declared_size_matches(prefix, len) {
                return Ok(StlFormat::Binary);
            }
        }
        return Ok(StlFormat::Ascii);
    }

    if prefix.len() < PREAMBLE_SIZE {
        return Err(StlError::format(format!(
            "stream is {} bytes, shorter than the {}-byte binary header, and is not ASCII STL",
            prefix.len(),
            PREAMBLE_SIZE
        )));
    }

    Ok(StlFormat::Binary)
}

/// Triangle count stored after the binary header, if the prefix reaches it
pub fn declared_count(prefix: &[u8]) -> Option<u32> {
    let bytes = prefix.get(HEADER_SIZE..PREAMBLE_SIZE)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn declared_size_matches(prefix: &[u8], total_len: u64) -> bool {
    declared_count(prefix)
        .map(|count| PREAMBLE_SIZE as u64 + RECORD_SIZE as u64 * count as u64 == total_len)
        .unwrap_or(false)
}

fn looks_like_ascii(prefix: &[u8]) -> bool {
    let body = trim_leading_whitespace(prefix);
    if body.len() < 5 || !body[..5].eq_ignore_ascii_case(b"solid") {
        return false;
    }
    if body.get(5).map(|b| !b.is_ascii_whitespace()).unwrap_or(false) {
        return false;
    }

    let after_solid = &body[5..];
    let (name_line, rest) = match after_solid.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(end) => after_solid.split_at(end),
        None => (after_solid, &[][..]),
    };
    // The name may use any 8-bit encoding but never control bytes.
    if name_line.iter().any(|&b| is_control_byte(b)) || !is_text(rest) {
        return false;
    }

    match first_body_token(rest, prefix.len() >= DETECT_WINDOW) {
        Some(token) => {
            token.eq_ignore_ascii_case(b"facet") || token.eq_ignore_ascii_case(b"endsolid")
        }
        // Nothing after the name line in view: let the ASCII decoder report it.
        None => true,
    }
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// UTF-8 without control characters other than whitespace. A multi-byte
/// character cut off by the end of the window is accepted.
fn is_text(bytes: &[u8]) -> bool {
    let valid = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) if err.error_len().is_none() => {
            match std::str::from_utf8(&bytes[..err.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };
    valid
        .chars()
        .all(|c| !c.is_control() || c.is_ascii_whitespace())
}

fn is_control_byte(b: u8) -> bool {
    (b < 0x20 && !b.is_ascii_whitespace()) || b == 0x7f
}

/// First whitespace-delimited token of the lines after the `solid` line.
/// A token touching the end of a full window may be cut short and is
/// reported as missing.
fn first_body_token(rest: &[u8], window_full: bool) -> Option<&[u8]> {
    let rest = trim_leading_whitespace(rest);
    match rest.iter().position(|b| b.is_ascii_whitespace()) {
        Some(end) => Some(&rest[..end]),
        None if window_full || rest.is_empty() => None,
        None => Some(rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_with_header(header: &[u8], count: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..header.len()].copy_from_slice(header);
        bytes.extend_from_slice(&count.to_le_bytes());
        bytes.extend(std::iter::repeat(0u8).take(RECORD_SIZE * count as usize));
        bytes
    }

    #[test]
    fn test_ascii_detected() {
        let text = b"solid cube\n  facet normal 0 0 1\n    outer loop\n";
        assert_eq!(detect_format(text, None).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn test_ascii_with_leading_whitespace_and_empty_name() {
        let text = b"\n\t  solid\nendsolid\n";
        assert_eq!(detect_format(text, None).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn test_uppercase_keywords() {
        let text = b"SOLID part\r\nFACET NORMAL 0 0 1\r\n";
        assert_eq!(detect_format(text, None).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn test_binary_with_solid_header() {
        let bytes = binary_with_header(b"solid exported by some CAD tool", 2);
        assert_eq!(
            detect_format(&bytes[..DETECT_WINDOW.min(bytes.len())], None).unwrap(),
            StlFormat::Binary
        );
    }

    #[test]
    fn test_exact_binary_size_beats_solid_prefix() {
        // A header that reads as ASCII STL, with a count made of newline bytes.
        let mut prefix = [b' '; HEADER_SIZE].to_vec();
        prefix[..18].copy_from_slice(b"solid x\nfacet norm");
        prefix.extend_from_slice(b"\n\n\n\n");
        let count = u32::from_le_bytes(*b"\n\n\n\n") as u64;
        let exact = (PREAMBLE_SIZE as u64) + (RECORD_SIZE as u64) * count;

        assert_eq!(detect_format(&prefix, None).unwrap(), StlFormat::Ascii);
        assert_eq!(detect_format(&prefix, Some(exact + 1)).unwrap(), StlFormat::Ascii);
        assert_eq!(detect_format(&prefix, Some(exact)).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn test_endsolid_at_end_of_stream() {
        assert_eq!(
            detect_format(b"solid x\nendsolid", None).unwrap(),
            StlFormat::Ascii
        );
    }

    #[test]
    fn test_solidworks_prefix_is_not_ascii() {
        let bytes = binary_with_header(b"solidworks export", 0);
        assert_eq!(detect_format(&bytes, None).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn test_too_short() {
        let err = detect_format(b"abc", None).unwrap_err();
        assert!(matches!(err, StlError::Format(_)));

        let err = detect_format(b"", None).unwrap_err();
        assert!(matches!(err, StlError::Format(_)));
    }

    #[test]
    fn test_short_solid_stream_goes_to_ascii() {
        assert_eq!(detect_format(b"solid x", None).unwrap(), StlFormat::Ascii);
        assert_eq!(detect_format(b"solid x\n", None).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn test_legacy_encoded_name_is_ascii() {
        let text = b"solid Pi\xE8ce\nfacet normal 0 0 1\n";
        assert_eq!(detect_format(text, None).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn test_control_bytes_after_name_line_mean_binary() {
        let bytes = binary_with_header(b"solid Pi\xE8ce\nfacet\x01", 1);
        assert_eq!(detect_format(&bytes, None).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn test_wrong_first_token_means_binary() {
        let bytes = binary_with_header(b"solid part\nexported by tool     ", 2);
        assert_eq!(detect_format(&bytes, None).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn test_declared_count() {
        let bytes = binary_with_header(b"", 7);
        assert_eq!(declared_count(&bytes), Some(7));
        assert_eq!(declared_count(&bytes[..40]), None);
    }
}
