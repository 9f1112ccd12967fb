use crate::index::builder::entry_len;

/// Serializes key/offset pairs into fixed-stride records:
/// `key NUL offset NUL padding... LF`
#[derive(Debug, Clone, Copy)]
pub struct RecordEncoder {
    max_entry_len: usize,
}

impl RecordEncoder {
    pub fn new(max_entry_len: usize) -> Self {
        Self { max_entry_len }
    }

    /// Length of every record produced by this encoder
    pub fn stride(&self) -> usize {
        self.max_entry_len + 1
    }

    /// Append one record to `buf`.
    ///
    /// `2 + key.len() + offset.len()` must not exceed the encoder's
    /// `max_entry_len`; longer entries would break the fixed stride.
    pub fn encode_into(&self, key: &str, offset: &str, buf: &mut Vec<u8>) {
        let len = entry_len(key, offset);
        debug_assert!(
            len <= self.max_entry_len,
            "entry of {len} bytes exceeds max entry length {}",
            self.max_entry_len
        );
        let pad = self.max_entry_len.saturating_sub(len);
        buf.reserve(self.stride());
        buf.extend_from_slice(key.as_bytes());
        buf.push(0);
        buf.extend_from_slice(offset.as_bytes());
        buf.push(0);
        buf.resize(buf.len() + pad, 0);
        buf.push(b'\n');
    }

    /// Encode a single record
    pub fn encode(&self, key: &str, offset: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.stride());
        self.encode_into(key, offset, &mut buf);
        buf
    }
}
