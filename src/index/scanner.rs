use crate::index::types::{COMMENT, RawLine};
use memchr::memchr;

/// Iterates over the data lines of a source buffer.
///
/// Blank lines and `#` comments are skipped but still advance the line
/// number. Offsets always point at the first byte of the untrimmed line.
pub struct LineScanner<'a> {
    buf: &'a [u8],
    pos: usize,
    line_number: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line_number: 0,
        }
    }

    /// Lines consumed so far, skipped ones included
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = RawLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.buf.len() {
            let offset = self.pos;
            let rest = &self.buf[offset..];
            // The LF stays part of the line; a final unterminated line runs to EOF
            let end = memchr(b'\n', rest).map_or(rest.len(), |i| i + 1);
            self.pos += end;
            self.line_number += 1;

            let text = trim_space(&rest[..end]);
            if text.is_empty() || text[0] == COMMENT {
                continue;
            }

            return Some(RawLine {
                offset,
                line_number: self.line_number,
                text,
            });
        }
        None
    }
}

/// Strip leading and trailing whitespace, vertical tab included.
///
/// Valid UTF-8 is trimmed of Unicode whitespace; other input falls back to
/// ASCII whitespace so invalid bytes are never treated as spaces.
fn trim_space(line: &[u8]) -> &[u8] {
    if let Ok(text) = std::str::from_utf8(line) {
        return text.trim().as_bytes();
    }
    let start = line.iter().position(|b| !is_ascii_space(*b)).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !is_ascii_space(*b)).map_or(start, |i| i + 1);
    &line[start..end]
}

#[inline]
fn is_ascii_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'\x0b'
}
