use crate::index::types::MIN_ENTRY_LEN;
use std::collections::HashMap;

/// Accumulates validated keys and the offsets of the lines they came from.
///
/// Every occurrence of a key is kept in insertion order, but the offset
/// table is last-write-wins: a repeated key resolves to the offset of its
/// final occurrence at every position of the sorted output.
pub struct IndexBuilder {
    keys: Vec<String>,
    offsets: HashMap<String, String>,
    max_entry_len: usize,
    duplicates: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            offsets: HashMap::with_capacity(capacity),
            max_entry_len: MIN_ENTRY_LEN,
            duplicates: 0,
        }
    }

    /// Record `key` as found on the line starting at `offset`
    pub fn add(&mut self, key: &str, offset: usize) {
        let offset = offset.to_string();
        let entry_len = entry_len(key, &offset);
        if self.max_entry_len < entry_len {
            self.max_entry_len = entry_len;
        }

        self.keys.push(key.to_string());
        if let Some(shadowed) = self.offsets.insert(key.to_string(), offset) {
            self.duplicates += 1;
            tracing::warn!(
                key,
                shadowed_offset = shadowed.as_str(),
                offset = self.offsets[key].as_str(),
                "duplicate key; only the last offset is kept"
            );
        }
    }

    /// Number of keys added, duplicates included
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sort the keys and freeze the index
    pub fn finish(mut self) -> SortedIndex {
        // Stable, so equal keys keep insertion order (they share one offset anyway)
        self.keys.sort();
        SortedIndex {
            keys: self.keys,
            offsets: self.offsets,
            max_entry_len: self.max_entry_len,
            duplicates: self.duplicates,
        }
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys in ascending byte order, ready for encoding
pub struct SortedIndex {
    keys: Vec<String>,
    offsets: HashMap<String, String>,
    max_entry_len: usize,
    duplicates: usize,
}

impl SortedIndex {
    /// `(key, offset)` pairs in sorted order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.keys.iter().map(|key| {
            let offset = self.offsets.get(key).map_or("", String::as_str);
            (key.as_str(), offset)
        })
    }

    /// Longest `2 + len(key) + len(offset)` over all entries, at least 2
    pub fn max_entry_len(&self) -> usize {
        self.max_entry_len
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Occurrences whose offset was overwritten by a later line
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Length of an entry without padding or the trailing LF
#[inline]
pub fn entry_len(key: &str, offset: &str) -> usize {
    MIN_ENTRY_LEN + key.len() + offset.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_keys_bytewise() {
        let mut builder = IndexBuilder::new();
        builder.add("root", 0);
        builder.add("daemon", 32);
        builder.add("Zed", 80);
        builder.add("_apt", 120);
        let index = builder.finish();

        let entries: Vec<_> = index.entries().collect();
        assert_eq!(
            entries,
            vec![("Zed", "80"), ("_apt", "120"), ("daemon", "32"), ("root", "0")]
        );
    }

    #[test]
    fn test_max_entry_len() {
        let mut builder = IndexBuilder::new();
        builder.add("ab", 7);
        builder.add("a", 12345);
        let index = builder.finish();
        assert_eq!(index.max_entry_len(), 2 + 1 + 5);
    }

    #[test]
    fn test_empty_index_keeps_floor() {
        let index = IndexBuilder::new().finish();
        assert!(index.is_empty());
        assert_eq!(index.max_entry_len(), MIN_ENTRY_LEN);
        assert_eq!(index.entries().count(), 0);
    }

    #[test]
    fn test_duplicate_keys_resolve_to_last_offset() {
        let mut builder = IndexBuilder::new();
        builder.add("adm", 0);
        builder.add("bin", 10);
        builder.add("adm", 20);
        assert_eq!(builder.len(), 3);
        let index = builder.finish();

        assert_eq!(index.duplicates(), 1);
        let entries: Vec<_> = index.entries().collect();
        assert_eq!(entries, vec![("adm", "20"), ("adm", "20"), ("bin", "10")]);
    }
}
