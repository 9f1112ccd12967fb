//! Error types for index building

use crate::index::types::{KeyKind, MAX_COLUMN};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

/// File operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Stat,
    Read,
    Write,
    Chown,
    Chmod,
    Close,
}

impl IoOp {
    pub fn as_str(self) -> &'static str {
        match self {
            IoOp::Open => "open",
            IoOp::Stat => "stat",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Chown => "chown",
            IoOp::Chmod => "chmod",
            IoOp::Close => "close",
        }
    }
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("column {column} is out of range: columns are numbered from 1 to {}", MAX_COLUMN)]
    Config { column: u8 },

    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to replace {} with {}: {source}", dest.display(), temp.display())]
    Rename {
        temp: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "{}:{line_number} (offset {line_offset}): column {column} exceeds the {columns} available columns",
        path.display()
    )]
    ColumnOutOfRange {
        path: PathBuf,
        line_offset: usize,
        line_number: usize,
        column: u8,
        columns: usize,
    },

    #[error(
        "{}:{line_number} (offset {line_offset}): {} in column {column}: {text:?}",
        path.display(),
        kind.describe()
    )]
    InvalidKey {
        path: PathBuf,
        line_offset: usize,
        line_number: usize,
        column: u8,
        text: String,
        kind: KeyKind,
    },
}

impl IndexError {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        IndexError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Emit this error as a single structured log event
    pub fn report(&self) {
        match self {
            IndexError::Config { column } => {
                tracing::error!(column, "columns are numbered starting from 1 to a maximum of 9");
            }
            IndexError::Io { op, path, source } => {
                tracing::error!(
                    op = op.as_str(),
                    path = %path.display(),
                    error = %source,
                    "file operation failed"
                );
            }
            IndexError::Rename { temp, dest, source } => {
                tracing::error!(
                    dest_file = %dest.display(),
                    temp_file = %temp.display(),
                    error = %source,
                    "failed to replace destination file with temporary file"
                );
            }
            IndexError::ColumnOutOfRange {
                path,
                line_offset,
                line_number,
                column,
                columns,
            } => {
                tracing::error!(
                    source_file = %path.display(),
                    line_offset,
                    line_number,
                    column,
                    min = 0,
                    max = columns,
                    "column exceeds the number of available columns in the source file"
                );
            }
            IndexError::InvalidKey {
                path,
                line_offset,
                line_number,
                column,
                text,
                kind,
            } => {
                tracing::error!(
                    source_file = %path.display(),
                    line_offset,
                    line_number,
                    column,
                    text = text.as_str(),
                    "{}",
                    kind.describe()
                );
            }
        }
    }
}
