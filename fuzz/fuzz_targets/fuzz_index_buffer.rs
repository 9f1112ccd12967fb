#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nsscache_index::index::build::{encode_index, index_buffer};
use nsscache_index::index::{Column, KeyKind};
use std::path::Path;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    column: u8,
    numeric: bool,
    content: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    // Scanning, extraction and encoding must never panic, and every record
    // of a successful run must share one stride
    let Ok(column) = Column::new(input.column % 10) else {
        return;
    };
    let kind = KeyKind::from_numeric(input.numeric);
    if let Ok(index) = index_buffer(input.content, Path::new("fuzz"), column, kind) {
        let stride = index.max_entry_len() + 1;
        let encoded = encode_index(&index);
        assert_eq!(encoded.len(), index.len() * stride);
        for record in encoded.chunks(stride) {
            assert_eq!(record.last(), Some(&b'\n'));
        }
    }
});
