use crate::error::{IndexError, IoOp, Result};
use crate::index::builder::{IndexBuilder, SortedIndex};
use crate::index::encoder::RecordEncoder;
use crate::index::extract::RecordExtractor;
use crate::index::scanner::LineScanner;
use crate::index::types::{BuildStats, Column, IndexConfig, KeyKind};
use crate::index::writer::{AtomicFileWriter, FileOwnership};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Build the index described by `config` and publish it at `config.dest`
pub fn build_index(config: &IndexConfig) -> Result<BuildStats> {
    let source = &config.source;
    tracing::info!(source_file = %source.display(), "opening source text database file");

    let mut file = File::open(source).map_err(|e| IndexError::io(IoOp::Open, source, e))?;
    let metadata = file
        .metadata()
        .map_err(|e| IndexError::io(IoOp::Stat, source, e))?;
    let ownership = FileOwnership::from_metadata(&metadata);

    let mut content = Vec::with_capacity(metadata.len() as usize);
    file.read_to_end(&mut content)
        .map_err(|e| IndexError::io(IoOp::Read, source, e))?;
    drop(file);

    let index = index_buffer(&content, source, config.column, config.key_kind)?;
    tracing::info!(rows = index.len(), "found rows in source file");

    tracing::info!(
        dest_file = %config.dest.display(),
        temp_file = %config.temp_path().display(),
        "opening destination binary index file"
    );
    let mut writer = AtomicFileWriter::create(&config.dest)?;
    let stride = write_records(&index, &mut writer)?;
    let bytes_written = writer.bytes_written();
    writer.publish(ownership)?;

    tracing::info!(
        dest_file = %config.dest.display(),
        records = index.len(),
        stride,
        "published index"
    );

    Ok(BuildStats {
        records: index.len(),
        duplicates: index.duplicates(),
        stride,
        bytes_written,
    })
}

/// Scan, extract and sort the keys of an in-memory source file.
///
/// `path` only labels errors.
pub fn index_buffer(
    content: &[u8],
    path: &Path,
    column: Column,
    kind: KeyKind,
) -> Result<SortedIndex> {
    let extractor = RecordExtractor::new(path, column, kind);
    let mut builder = IndexBuilder::new();

    for line in LineScanner::new(content) {
        let key = extractor.extract(&line)?;
        builder.add(key, line.offset);
    }

    Ok(builder.finish())
}

/// Encode every entry into `writer`, returning the stride
pub fn write_records(index: &SortedIndex, writer: &mut AtomicFileWriter) -> Result<usize> {
    let encoder = RecordEncoder::new(index.max_entry_len());
    let mut buf = Vec::with_capacity(encoder.stride());
    for (key, offset) in index.entries() {
        buf.clear();
        encoder.encode_into(key, offset, &mut buf);
        writer.write_all(&buf)?;
    }
    Ok(encoder.stride())
}

/// Encode a whole index into memory
pub fn encode_index(index: &SortedIndex) -> Vec<u8> {
    let encoder = RecordEncoder::new(index.max_entry_len());
    let mut out = Vec::with_capacity(index.len() * encoder.stride());
    for (key, offset) in index.entries() {
        encoder.encode_into(key, offset, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWD: &[u8] = b"root:x:0:0:root:/root:/bin/bash\n\
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin\n";

    fn names(content: &[u8]) -> Result<SortedIndex> {
        index_buffer(content, Path::new("passwd"), Column::new(1).unwrap(), KeyKind::Name)
    }

    #[test]
    fn test_index_buffer_end_to_end() {
        let index = names(PASSWD).unwrap();
        let entries: Vec<_> = index.entries().collect();
        assert_eq!(entries, vec![("daemon", "32"), ("root", "0")]);
        assert_eq!(index.max_entry_len(), 2 + 6 + 2);
    }

    #[test]
    fn test_encode_index_uses_common_stride() {
        let encoded = encode_index(&names(PASSWD).unwrap());
        assert_eq!(encoded.len(), 2 * 11);
        assert_eq!(&encoded[..11], b"daemon\x0032\x00\n");
        assert_eq!(&encoded[11..], b"root\x000\x00\x00\x00\x00\n");
    }

    #[test]
    fn test_first_bad_line_stops_indexing() {
        let err = index_buffer(
            b"root:x:0:0\nbin:x:01:1\n",
            Path::new("passwd"),
            Column::new(3).unwrap(),
            KeyKind::Numeric,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            IndexError::InvalidKey { line_number: 2, line_offset: 11, .. }
        ));
    }

    #[test]
    fn test_vertical_tab_lines_are_trimmed() {
        let index = names(b"\x0b\nroot:x:0:0\n").unwrap();
        let entries: Vec<_> = index.entries().collect();
        assert_eq!(entries, vec![("root", "2")]);

        let index = index_buffer(
            b"root:x:0:0\x0b\n",
            Path::new("passwd"),
            Column::new(4).unwrap(),
            KeyKind::Numeric,
        )
        .unwrap();
        let entries: Vec<_> = index.entries().collect();
        assert_eq!(entries, vec![("0", "0")]);
    }

    #[test]
    fn test_comments_only_produce_empty_index() {
        let index = names(b"# nothing here\n\n   \n#root:x:0:0\n").unwrap();
        assert!(index.is_empty());
        assert!(encode_index(&index).is_empty());
        assert_eq!(RecordEncoder::new(index.max_entry_len()).stride(), 3);
    }
}
