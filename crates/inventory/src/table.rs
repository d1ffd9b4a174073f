//! Header-indexed row store.
//!
//! Row 0 of the raw grid is the header. Every row (the header included) is
//! kept as a name -> cell mapping; `flatten` regenerates the grid in header
//! column order by explicit position lookup.

use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Column index
// ---------------------------------------------------------------------------

/// Bidirectional column name <-> position mapping built from the header row.
///
/// A repeated header name keeps the position of its last occurrence, so only
/// one of the duplicate columns is reachable by name.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    by_name: HashMap<String, usize>,
    by_position: BTreeMap<usize, String>,
    width: usize,
}

impl ColumnIndex {
    pub fn from_header(header: &[String]) -> Self {
        let mut by_name = HashMap::new();
        for (position, name) in header.iter().enumerate() {
            by_name.insert(name.clone(), position);
        }

        let by_position = by_name
            .iter()
            .map(|(name, &position)| (position, name.clone()))
            .collect();

        Self {
            by_name,
            by_position,
            width: header.len(),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.by_position.get(&position).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of header cells, shadowed duplicates included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Names reachable through the index, in position order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_position.values().map(String::as_str)
    }

    fn push(&mut self, name: &str) -> usize {
        let position = self.width;
        self.by_name.insert(name.to_string(), position);
        self.by_position.insert(position, name.to_string());
        self.width += 1;
        position
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    fn from_raw(raw: &[String], index: &ColumnIndex) -> Self {
        let cells = index
            .by_name
            .iter()
            .filter_map(|(name, &position)| {
                raw.get(position).map(|value| (name.clone(), value.clone()))
            })
            .collect();
        Self { cells }
    }

    /// Cell text for `column`; a missing cell reads as empty.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.cells.insert(column.to_string(), value.into());
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InventoryTable {
    index: ColumnIndex,
    rows: Vec<Row>,
}

impl InventoryTable {
    pub fn build(raw: Vec<Vec<String>>) -> Self {
        let index = raw
            .first()
            .map(|header| ColumnIndex::from_header(header))
            .unwrap_or_default();

        let rows = raw.iter().map(|record| Row::from_raw(record, &index)).collect();

        Self { index, rows }
    }

    /// Regenerate the raw grid in header column order.
    pub fn flatten(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                (0..self.index.width())
                    .map(|position| {
                        self.index
                            .name_at(position)
                            .map(|name| row.get(name).to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// Append `name` as a new last column unless it is already indexed.
    /// Returns whether the column was added.
    pub fn ensure_column(&mut self, name: &str) -> bool {
        if self.index.contains(name) {
            return false;
        }

        self.index.push(name);
        for (i, row) in self.rows.iter_mut().enumerate() {
            let value = if i == 0 { name } else { "" };
            row.set(name, value);
        }
        true
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.index
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row(&self, i: usize) -> Option<&Row> {
        self.rows.get(i)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<String>>> for InventoryTable {
    fn from(raw: Vec<Vec<String>>) -> Self {
        Self::build(raw)
    }
}

#[cfg(test)]
pub(crate) fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_returns_the_content() {
        let raw = grid(&[
            &["Verfügbar", "Ausstattung", "Inventar Nr", "Status"],
            &["4", "Handlampe", "0591-S00001", "V"],
            &["1", "Fuchsschwanz", "", "V"],
            &["1", "Rettungsweste", "0591-S00002", "U"],
        ]);

        let table = InventoryTable::build(raw.clone());
        assert_eq!(table.len(), 4);
        assert_eq!(table.flatten(), raw);
    }

    #[test]
    fn flatten_preserves_leading_and_trailing_spaces() {
        let raw = grid(&[
            &["Verfügbar", "Ausstattung", "Inventar Nr", "Status"],
            &["4", "  Handlampe", " 0591-S00001 ", "V  "],
        ]);

        let table = InventoryTable::build(raw.clone());
        assert_eq!(table.flatten(), raw);
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let raw = grid(&[&["a", "b", "c"], &["1"], &["1", "2"]]);

        let table = InventoryTable::build(raw);
        assert_eq!(table.rows()[1].get("c"), "");
        assert_eq!(
            table.flatten(),
            grid(&[&["a", "b", "c"], &["1", "", ""], &["1", "2", ""]])
        );
    }

    #[test]
    fn cells_beyond_the_header_are_dropped() {
        let raw = grid(&[&["a", "b"], &["1", "2", "extra"]]);
        let table = InventoryTable::build(raw);
        assert_eq!(table.flatten(), grid(&[&["a", "b"], &["1", "2"]]));
    }

    #[test]
    fn rows_are_addressed_by_column_name() {
        let raw = grid(&[&["Ebene", "Inventar Nr"], &["2", "1234"]]);
        let mut table = InventoryTable::build(raw);

        assert_eq!(table.rows()[0].get("Ebene"), "Ebene");
        assert_eq!(table.rows()[1].get("Inventar Nr"), "1234");
        assert_eq!(table.rows()[1].get("unknown"), "");

        table.rows_mut()[1].set("Ebene", "3");
        assert_eq!(table.flatten()[1], vec!["3", "1234"]);
    }

    #[test]
    fn duplicate_header_keeps_last_position() {
        let raw = grid(&[&["id", "n", "id"], &["first", "1", "second"]]);
        let table = InventoryTable::build(raw);

        assert_eq!(table.columns().position("id"), Some(2));
        assert_eq!(table.columns().width(), 3);
        assert_eq!(table.rows()[1].get("id"), "second");
        // The shadowed position flattens to an empty cell.
        assert_eq!(table.flatten()[1], vec!["", "1", "second"]);
    }

    #[test]
    fn empty_input_builds_an_empty_table() {
        let table = InventoryTable::build(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.columns().width(), 0);
        assert!(table.flatten().is_empty());
    }

    #[test]
    fn ensure_column_appends_once() {
        let raw = grid(&[&["Ebene", "Inventar Nr"], &["1", "1234"]]);
        let mut table = InventoryTable::build(raw);

        assert!(table.ensure_column("Verfügbar"));
        assert!(!table.ensure_column("Verfügbar"));
        assert_eq!(
            table.flatten(),
            grid(&[&["Ebene", "Inventar Nr", "Verfügbar"], &["1", "1234", ""]])
        );
    }

    #[test]
    fn index_maps_both_directions() {
        let index = ColumnIndex::from_header(&["a".into(), "".into(), "c".into()]);
        assert_eq!(index.position("c"), Some(2));
        assert_eq!(index.name_at(1), Some(""));
        assert_eq!(index.name_at(3), None);
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["a", "", "c"]);
    }
}
