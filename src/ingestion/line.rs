//! Per-line field parser.
//!
//! Each field of a [`Schema`] declares its own left quote, right quote and separator, so one
//! line can mix formats (e.g. pipe-separated columns with one quoted free-text column). Fields
//! are consumed in schema order by a single forward cursor:
//!
//! 1. leading spaces/tabs are skipped;
//! 2. a non-empty left quote must match literally;
//! 3. with a right quote, bytes up to its first byte are the value, then the full right quote
//!    must match; a separator, if declared, is then searched for and matched (optional after the
//!    last field);
//! 4. otherwise, with a separator, bytes up to its first byte are the value, then the full
//!    separator must match;
//! 5. otherwise the rest of the line is the value.
//!
//! Matching uses first-byte lookahead only. A separator that is a prefix of a right quote (or
//! similar overlap) is not disambiguated.
//!
//! Any failure rejects the whole line.

use crate::error::{LineError, LineErrorKind};
use crate::types::{Metadata, Record, Row, Schema};

/// Parses lines according to a [`Schema`].
#[derive(Debug, Clone)]
pub struct LineParser {
    schema: Schema,
    trim_space: bool,
}

impl LineParser {
    /// Create a parser that trims surrounding whitespace from every captured value.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            trim_space: true,
        }
    }

    /// Whether captured values are trimmed before type conversion (default: true).
    pub fn trim_space(mut self, trim: bool) -> Self {
        self.trim_space = trim;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Parse one line (without its terminator) into a row.
    ///
    /// The row holds one record per non-skip field. Skip fields are consumed but never
    /// converted. A non-skip field that is not valid UTF-8 rejects the line. Bytes after the last
    /// field are ignored.
    pub fn parse(&self, line: &[u8]) -> Result<Row, LineError> {
        let mut cur = Cursor { line, pos: 0, field: 0 };
        let last = self.schema.fields.len().saturating_sub(1);
        let mut row = Row::with_capacity(self.schema.column_count());

        for (i, md) in self.schema.fields.iter().enumerate() {
            cur.field = i;
            let raw = cur.extract(md, i == last)?;
            if md.skip {
                continue;
            }

            let text = std::str::from_utf8(raw).map_err(|e| {
                cur.fail(
                    LineErrorKind::TypeConversion {
                        message: format!("invalid utf-8: {e}"),
                    },
                    "convert_field",
                )
            })?;
            let text = if self.trim_space { text.trim() } else { text };
            let record = Record::parse(md.data_type, text)
                .map_err(|message| cur.fail(LineErrorKind::TypeConversion { message }, "convert_field"))?;
            row.push(record);
        }
        Ok(row)
    }
}

/// Parse `line` with whitespace trimming enabled.
pub fn parse_line(line: &[u8], schema: &Schema) -> Result<Row, LineError> {
    LineParser::new(schema.clone()).parse(line)
}

/// `line` without a trailing `\n` or `\r\n`.
pub fn strip_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

struct Cursor<'a> {
    line: &'a [u8],
    pos: usize,
    field: usize,
}

impl<'a> Cursor<'a> {
    fn extract(&mut self, md: &Metadata, is_last: bool) -> Result<&'a [u8], LineError> {
        self.skip_blanks();

        let left = md.left_quote.as_bytes();
        if !left.is_empty() {
            self.expect(left, LineErrorKind::InvalidLeftQuote, "parse_left_quote")?;
        }

        let right = md.right_quote.as_bytes();
        let sep = md.separator.as_bytes();

        if !right.is_empty() {
            let value = self.take_until(right[0], LineErrorKind::MissingRightQuote, "parse_right_quote")?;
            self.expect(right, LineErrorKind::InvalidRightQuote, "parse_right_quote")?;

            if !sep.is_empty() {
                let found = self.scan_to(sep[0]);
                if !found && !is_last {
                    return Err(self.fail(LineErrorKind::MissingSeparator, "parse_separator"));
                }
                if found {
                    self.expect(sep, LineErrorKind::InvalidSeparator, "parse_separator")?;
                }
            }
            return Ok(value);
        }

        if !sep.is_empty() {
            let value = self.take_until(sep[0], LineErrorKind::MissingSeparator, "parse_separator")?;
            self.expect(sep, LineErrorKind::InvalidSeparator, "parse_separator")?;
            return Ok(value);
        }

        let value = &self.line[self.pos..];
        self.pos = self.line.len();
        Ok(value)
    }

    fn skip_blanks(&mut self) {
        while matches!(self.line.get(self.pos), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Advance to the next `byte`; returns whether it was found (cursor at end otherwise).
    fn scan_to(&mut self, byte: u8) -> bool {
        match self.line[self.pos..].iter().position(|&b| b == byte) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => {
                self.pos = self.line.len();
                false
            }
        }
    }

    fn take_until(&mut self, byte: u8, missing: LineErrorKind, operation: &'static str) -> Result<&'a [u8], LineError> {
        let start = self.pos;
        if !self.scan_to(byte) {
            return Err(self.fail(missing, operation));
        }
        Ok(&self.line[start..self.pos])
    }

    /// Match `token` literally at the cursor and step past it.
    fn expect(&mut self, token: &[u8], mismatch: LineErrorKind, operation: &'static str) -> Result<(), LineError> {
        for &want in token {
            match self.line.get(self.pos) {
                None => return Err(self.fail(LineErrorKind::PrematureEol, operation)),
                Some(&got) if got != want => return Err(self.fail(mismatch, operation)),
                Some(_) => self.pos += 1,
            }
        }
        Ok(())
    }

    fn fail(&self, kind: LineErrorKind, operation: &'static str) -> LineError {
        LineError {
            kind,
            field: self.field,
            position: self.pos,
            operation,
            line: self.line.to_vec(),
        }
    }
}
