use crate::error::{IndexError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Column separator in the source database
pub const DELIMITER: u8 = b':';

/// Lines whose trimmed text starts with this byte are ignored
pub const COMMENT: u8 = b'#';

/// Suffix appended to the destination path for the in-progress file
pub const TEMP_SUFFIX: &str = "~";

/// Smallest entry length: the two NUL separators of an empty entry
pub const MIN_ENTRY_LEN: usize = 2;

/// Highest column number that can be indexed
pub const MAX_COLUMN: u8 = 9;

/// Permission bits copied from the source (rwx for ugo plus setuid/setgid/sticky)
pub const MODE_MASK: u32 = 0o7777;

/// Mode of the temporary file until the source's mode is applied
pub const TEMP_MODE: u32 = 0o600;

/// 1-based column number, always within `1..=MAX_COLUMN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column(u8);

impl Column {
    pub fn new(column: u8) -> Result<Self> {
        if column == 0 || column > MAX_COLUMN {
            return Err(IndexError::Config { column });
        }
        Ok(Self(column))
    }

    /// The 1-based column number
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position among the split fields
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grammar the indexed column must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyKind {
    /// User or group name
    #[default]
    Name,
    /// Numeric uid/gid without leading zeros
    Numeric,
}

impl KeyKind {
    pub fn from_numeric(numeric: bool) -> Self {
        if numeric { KeyKind::Numeric } else { KeyKind::Name }
    }

    pub fn describe(self) -> &'static str {
        match self {
            KeyKind::Name => "invalid user or group name",
            KeyKind::Numeric => "invalid numeric identifier",
        }
    }
}

/// Configuration for one index build
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// passwd-like text database to read
    pub source: PathBuf,
    /// Binary index file to publish
    pub dest: PathBuf,
    pub column: Column,
    pub key_kind: KeyKind,
}

impl IndexConfig {
    /// Validate raw inputs; the column is checked before any file is touched
    pub fn new(
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        column: u8,
        numeric: bool,
    ) -> Result<Self> {
        Ok(Self {
            source: source.into(),
            dest: dest.into(),
            column: Column::new(column)?,
            key_kind: KeyKind::from_numeric(numeric),
        })
    }

    /// Sibling path the index is staged at before the rename
    pub fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.dest)
    }
}

/// `<dest>~`
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// One data line of the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Offset of the line's first byte, before trimming
    pub offset: usize,
    /// 1-based, counts skipped lines too
    pub line_number: usize,
    /// Line content with surrounding whitespace removed
    pub text: &'a [u8],
}

/// Summary of a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildStats {
    /// Records written, duplicates included
    pub records: usize,
    /// Key occurrences whose offset was shadowed by a later line
    pub duplicates: usize,
    /// Length of every record in bytes
    pub stride: usize,
    pub bytes_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_bounds() {
        assert!(matches!(Column::new(0), Err(IndexError::Config { column: 0 })));
        assert!(matches!(Column::new(10), Err(IndexError::Config { column: 10 })));
        assert_eq!(Column::new(1).unwrap().index(), 0);
        assert_eq!(Column::new(9).unwrap().get(), 9);
    }

    #[test]
    fn test_config_rejects_column_before_io() {
        let err = IndexConfig::new("/nonexistent/src", "/nonexistent/dst", 12, false).unwrap_err();
        assert!(matches!(err, IndexError::Config { column: 12 }));
    }

    #[test]
    fn test_temp_path() {
        let config = IndexConfig::new("/etc/passwd", "/etc/passwd.cache.ixname", 1, false).unwrap();
        assert_eq!(config.temp_path(), PathBuf::from("/etc/passwd.cache.ixname~"));
        assert_eq!(config.key_kind, KeyKind::Name);
    }
}
