use std::collections::BTreeMap;

use crate::diagnostics::{format_count_line, Diagnostics};

/// Case-fold an identifier one character at a time.
///
/// `str::to_lowercase` maps a word-final `Σ` to `ς`, so the same scan would
/// fold differently depending on what follows it. Folding per character keeps
/// every `Σ` as `σ`.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Lowercased identifier -> number of occurrences across recorded tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedCounts {
    counts: BTreeMap<String, u64>,
}

impl RecordedCounts {
    /// Count the first cell of every non-empty row of every table.
    /// No row is treated as a header.
    pub fn from_tables(tables: &[Vec<Vec<String>>]) -> Self {
        let mut counts = Self::default();
        for table in tables {
            counts.merge(Self::count_table(table));
        }
        counts
    }

    pub fn count_table(table: &[Vec<String>]) -> Self {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for record in table {
            if let Some(first) = record.first() {
                *counts.entry(fold_case(first)).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Add `other`'s counts into `self`. Order-independent.
    pub fn merge(&mut self, other: RecordedCounts) {
        for (identifier, count) in other.counts {
            *self.counts.entry(identifier).or_insert(0) += count;
        }
    }

    pub fn get(&self, identifier: &str) -> Option<u64> {
        self.counts.get(&fold_case(identifier)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Emit the `recorded equipment:` listing.
    pub fn report(&self, sink: &mut dyn Diagnostics) {
        sink.info("recorded equipment:");
        sink.info("");
        sink.info_indented("equipment     : amount");
        sink.info_indented("----------------------");
        for (identifier, count) in self.iter() {
            sink.info_indented(&format_count_line(identifier, count));
        }
        sink.info("");
    }
}

impl FromIterator<(String, u64)> for RecordedCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = Self::default();
        for (identifier, count) in iter {
            *counts.counts.entry(fold_case(&identifier)).or_insert(0) += count;
        }
        counts
    }
}
