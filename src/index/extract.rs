use crate::error::{IndexError, Result};
use crate::index::types::{Column, DELIMITER, KeyKind, RawLine};
use regex::bytes::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// User and group names: a letter or underscore, then alphanumerics, with
/// optional `_`, `.` or `-` separated alphanumeric groups
const NAME_PATTERN: &str = r"^[A-Za-z_][0-9A-Za-z]+(?:[_.-][0-9A-Za-z]+)*$";

/// Decimal IDs without leading zeros
const ID_PATTERN: &str = r"^(?:0|[1-9][0-9]*)$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is valid"))
}

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ID_PATTERN).expect("id pattern is valid"))
}

impl KeyKind {
    /// Check a column value against this kind's grammar
    pub fn matches(self, text: &[u8]) -> bool {
        match self {
            KeyKind::Name => name_regex().is_match(text),
            KeyKind::Numeric => id_regex().is_match(text),
        }
    }
}

/// Pulls the configured column out of each data line and validates it
pub struct RecordExtractor<'p> {
    path: &'p Path,
    column: Column,
    kind: KeyKind,
}

impl<'p> RecordExtractor<'p> {
    /// `path` is only used to label errors
    pub fn new(path: &'p Path, column: Column, kind: KeyKind) -> Self {
        Self { path, column, kind }
    }

    /// Extract and validate the key of one line
    pub fn extract<'a>(&self, line: &RawLine<'a>) -> Result<&'a str> {
        let mut fields = line.text.split(|&b| b == DELIMITER);
        let Some(field) = fields.nth(self.column.index()) else {
            return Err(IndexError::ColumnOutOfRange {
                path: self.path.to_path_buf(),
                line_offset: line.offset,
                line_number: line.line_number,
                column: self.column.get(),
                columns: line.text.split(|&b| b == DELIMITER).count(),
            });
        };

        if !self.kind.matches(field) {
            return Err(self.invalid_key(line, field));
        }

        // Both grammars only admit ASCII
        std::str::from_utf8(field).map_err(|_| self.invalid_key(line, field))
    }

    fn invalid_key(&self, line: &RawLine<'_>, field: &[u8]) -> IndexError {
        IndexError::InvalidKey {
            path: self.path.to_path_buf(),
            line_offset: line.offset,
            line_number: line.line_number,
            column: self.column.get(),
            text: String::from_utf8_lossy(field).into_owned(),
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &[u8]) -> RawLine<'_> {
        RawLine {
            offset: 17,
            line_number: 3,
            text,
        }
    }

    fn extractor(column: u8, kind: KeyKind) -> RecordExtractor<'static> {
        RecordExtractor::new(Path::new("/etc/passwd"), Column::new(column).unwrap(), kind)
    }

    #[test]
    fn test_name_grammar() {
        for ok in ["root", "_apt", "systemd-network", "ab.c_d-e", "ab", "x1"] {
            assert!(KeyKind::Name.matches(ok.as_bytes()), "{ok}");
        }
        for bad in ["a", "9x", "-root", "root-", "a..b", "a b", "", "ro:ot", "us\u{e9}r"] {
            assert!(!KeyKind::Name.matches(bad.as_bytes()), "{bad}");
        }
    }

    #[test]
    fn test_numeric_grammar() {
        for ok in ["0", "1", "65534", "1000"] {
            assert!(KeyKind::Numeric.matches(ok.as_bytes()), "{ok}");
        }
        for bad in ["007", "00", "", "-1", "1a", " 1"] {
            assert!(!KeyKind::Numeric.matches(bad.as_bytes()), "{bad}");
        }
    }

    #[test]
    fn test_extracts_configured_column() {
        let text = b"daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin";
        assert_eq!(extractor(1, KeyKind::Name).extract(&line(text)).unwrap(), "daemon");
        assert_eq!(extractor(3, KeyKind::Numeric).extract(&line(text)).unwrap(), "1");
    }

    #[test]
    fn test_column_out_of_range() {
        let err = extractor(5, KeyKind::Name).extract(&line(b"a:b:c")).unwrap_err();
        match err {
            IndexError::ColumnOutOfRange {
                line_offset,
                line_number,
                column,
                columns,
                ..
            } => {
                assert_eq!((line_offset, line_number, column, columns), (17, 3, 5, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_empty_column_counts() {
        // "a:b:" splits into three columns, the last one empty
        let err = extractor(3, KeyKind::Name).extract(&line(b"a:b:")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidKey { ref text, .. } if text.is_empty()));
    }

    #[test]
    fn test_invalid_keys() {
        let err = extractor(3, KeyKind::Numeric)
            .extract(&line(b"bond:x:007:7::/:/bin/sh"))
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::InvalidKey { ref text, kind: KeyKind::Numeric, column: 3, .. } if text == "007"
        ));

        let err = extractor(1, KeyKind::Name).extract(&line(b"9x:x:9:9")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidKey { ref text, .. } if text == "9x"));
    }
}
