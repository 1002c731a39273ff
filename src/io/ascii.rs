// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Streaming ASCII STL decoder
//!
//! ```text
//! solid <name>
//!   facet normal nx ny nz
//!     outer loop
//!       vertex x y z
//!       vertex x y z
//!       vertex x y z
//!     endloop
//!   endfacet
//! endsolid <name>
//! ```
//!
//! Keywords are case-insensitive and whitespace between tokens is free-form.
//! The solid name is whatever follows `solid` on the same line. Several
//! `solid ... endsolid` blocks in one stream are decoded back to back.

use super::error::{StlError, StlResult};
use crate::geometry::Triangle;
use std::io::{BufRead, Read};

/// Lazy sequence of facets from an ASCII STL stream.
///
/// Only the current line is held in memory, and lines longer than
/// [`MAX_LINE_LEN`] are rejected. The first grammar violation is
/// yielded as [`StlError::Parse`] and ends the sequence.
pub struct AsciiTriangles<R> {
    lexer: Lexer<R>,
    name: String,
    solids: usize,
    finished: bool,
}

impl<R: BufRead> AsciiTriangles<R> {
    /// Consume the opening `solid <name>` line.
    pub fn new(reader: R) -> StlResult<Self> {
        let mut lexer = Lexer::new(reader);
        let name = match lexer.next_token()? {
            Some(token) if token.is("solid") => lexer.rest_of_line(),
            Some(token) => return Err(token.unexpected("'solid'")),
            None => return Err(lexer.eof_error("'solid'")),
        };
        tracing::trace!(name = %name, "ascii STL solid opened");

        Ok(Self {
            lexer,
            name,
            solids: 1,
            finished: false,
        })
    }

    /// Name given on the first `solid` line, possibly empty
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of `solid` blocks opened so far
    pub fn solid_count(&self) -> usize {
        self.solids
    }

    fn next_facet(&mut self) -> StlResult<Option<Triangle>> {
        loop {
            let token = match self.lexer.next_token()? {
                Some(token) => token,
                None => return Err(self.lexer.eof_error("'facet' or 'endsolid'")),
            };

            if token.is("facet") {
                return self.facet_body().map(Some);
            }
            if !token.is("endsolid") {
                return Err(token.unexpected("'facet' or 'endsolid'"));
            }

            self.lexer.rest_of_line();
            let another_solid = match self.lexer.peek_token()? {
                Some(next) if next.is("solid") => true,
                Some(next) => {
                    tracing::debug!(line = next.line, "ignoring content after final endsolid");
                    false
                }
                None => false,
            };
            if !another_solid {
                return Ok(None);
            }

            self.lexer.next_token()?;
            let name = self.lexer.rest_of_line();
            self.solids += 1;
            tracing::trace!(name = %name, "ascii STL solid opened");
        }
    }

    /// Everything after the `facet` keyword up to and including `endfacet`
    fn facet_body(&mut self) -> StlResult<Triangle> {
        self.expect_keyword("normal")?;
        let normal = self.expect_triple()?;
        self.expect_keyword("outer")?;
        self.expect_keyword("loop")?;

        let mut vertices = [[0.0f32; 3]; 3];
        let mut count = 0usize;
        loop {
            let token = match self.lexer.next_token()? {
                Some(token) => token,
                None => return Err(self.lexer.eof_error("'vertex' or 'endloop'")),
            };
            if token.is("vertex") {
                if count == 3 {
                    return Err(StlError::parse(
                        token.line,
                        token.column,
                        "facet has more than 3 vertices",
                    ));
                }
                vertices[count] = self.expect_triple()?;
                count += 1;
            } else if token.is("endloop") {
                if count != 3 {
                    return Err(StlError::parse(
                        token.line,
                        token.column,
                        format!("facet has {} vertices, expected 3", count),
                    ));
                }
                break;
            } else {
                return Err(token.unexpected("'vertex' or 'endloop'"));
            }
        }

        self.expect_keyword("endfacet")?;
        Ok(Triangle::from_arrays(normal, vertices))
    }

    fn expect_keyword(&mut self, keyword: &str) -> StlResult<()> {
        match self.lexer.next_token()? {
            Some(token) if token.is(keyword) => Ok(()),
            Some(token) => Err(token.unexpected(&format!("'{}'", keyword))),
            None => Err(self.lexer.eof_error(&format!("'{}'", keyword))),
        }
    }

    fn expect_number(&mut self) -> StlResult<f32> {
        let token = match self.lexer.next_token()? {
            Some(token) => token,
            None => return Err(self.lexer.eof_error("a number")),
        };
        let value = parse_number(&token.text).ok_or_else(|| token.unexpected("a number"))?;
        if !value.is_finite() {
            return Err(StlError::parse(
                token.line,
                token.column,
                format!("'{}' is out of range for a 32-bit float", token.text),
            ));
        }
        Ok(value)
    }

    fn expect_triple(&mut self) -> StlResult<[f32; 3]> {
        Ok([
            self.expect_number()?,
            self.expect_number()?,
            self.expect_number()?,
        ])
    }
}

impl<R: BufRead> Iterator for AsciiTriangles<R> {
    type Item = StlResult<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_facet() {
            Ok(Some(triangle)) => Some(Ok(triangle)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Decimal or scientific float. Rejects the `inf`/`nan` spellings that
/// `str::parse` would otherwise accept.
fn parse_number(text: &str) -> Option<f32> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let first = unsigned.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    text.parse().ok()
}

/// True for a `solid <name>` or `endsolid <name>` line
fn is_name_line(line: &[u8]) -> bool {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let body = &line[start..];
    ["solid", "endsolid"].iter().any(|keyword| {
        body.len() > keyword.len()
            && body[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
            && body[keyword.len()].is_ascii_whitespace()
    })
}

struct Token {
    text: String,
    line: usize,
    column: usize,
}

impl Token {
    fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }

    fn unexpected(&self, expected: &str) -> StlError {
        StlError::parse(
            self.line,
            self.column,
            format!("expected {}, found '{}'", expected, self.text),
        )
    }
}

/// Longest accepted line, newline included
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Whitespace tokenizer over a line-buffered reader. Lines and columns are
/// 1-based; columns count bytes.
struct Lexer<R> {
    reader: R,
    line: String,
    line_no: usize,
    pos: usize,
    peeked: Option<Token>,
}

impl<R: BufRead> Lexer<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            pos: 0,
            peeked: None,
        }
    }

    fn next_token(&mut self) -> StlResult<Option<Token>> {
        if let Some(token) = self.peeked.take() {
            return Ok(Some(token));
        }

        loop {
            let rest = &self.line[self.pos..];
            if let Some(offset) = rest.find(|c: char| !c.is_whitespace()) {
                let start = self.pos + offset;
                let len = self.line[start..]
                    .find(char::is_whitespace)
                    .unwrap_or(self.line.len() - start);
                self.pos = start + len;
                return Ok(Some(Token {
                    text: self.line[start..start + len].to_string(),
                    line: self.line_no,
                    column: start + 1,
                }));
            }
            if !self.read_line()? {
                return Ok(None);
            }
        }
    }

    fn peek_token(&mut self) -> StlResult<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Remainder of the current line, trimmed. Only valid with nothing peeked.
    fn rest_of_line(&mut self) -> String {
        let rest = self.line[self.pos..].trim().to_string();
        self.pos = self.line.len();
        rest
    }

    fn read_line(&mut self) -> StlResult<bool> {
        let mut buf = std::mem::take(&mut self.line).into_bytes();
        buf.clear();
        self.pos = 0;

        let read = (&mut self.reader)
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        let cut_short = buf.len() == MAX_LINE_LEN && buf.last() != Some(&b'\n');
        if cut_short && !self.reader.fill_buf()?.is_empty() {
            return Err(StlError::parse(
                self.line_no,
                MAX_LINE_LEN + 1,
                format!("line is longer than {} bytes", MAX_LINE_LEN),
            ));
        }

        self.line = match String::from_utf8(buf) {
            Ok(line) => line,
            // Solid names are free text in whatever encoding the exporter used.
            Err(err) if is_name_line(err.as_bytes()) => {
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
            Err(err) => {
                return Err(StlError::parse(
                    self.line_no,
                    err.utf8_error().valid_up_to() + 1,
                    "invalid UTF-8 in ASCII STL",
                ))
            }
        };
        Ok(true)
    }

    fn eof_error(&self, expected: &str) -> StlError {
        StlError::parse(
            self.line_no.max(1),
            self.line.len() + 1,
            format!("unexpected end of input, expected {}", expected),
        )
    }
}
