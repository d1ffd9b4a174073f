//! Pseudo-ID generation.
//!
//! The inventory is a flattened tree: each row carries an integer layer
//! (depth), and a row's ancestors are the nearest preceding rows with smaller
//! layers. Rows without a numeric equipment ID get one composed from the
//! nearest ancestor that has a plain numeric ID, joined with the row's own
//! part number: `<ancestor id>__<part number>`.

use crate::config::{ColumnRoles, Role};
use crate::diagnostics::Diagnostics;
use crate::error::InventoryError;
use crate::model::GenerationReport;
use crate::table::{InventoryTable, Row};

/// Separator between the ancestor ID and the part number.
pub const PSEUDO_ID_SEPARATOR: &str = "__";

struct Columns<'a> {
    layer: &'a str,
    part_number: &'a str,
    id: &'a str,
}

enum Resolution {
    Created { id: String, path: String },
    Skipped(String),
    /// Walk reached the first row without a candidate or a warning.
    Exhausted,
}

/// Fill in missing equipment IDs, top to bottom.
///
/// Rows are processed in order because a row may inherit from an ancestor
/// resolved earlier in the same pass.
pub fn generate_pseudo_ids(
    table: &mut InventoryTable,
    roles: &ColumnRoles,
    sink: &mut dyn Diagnostics,
) -> Result<GenerationReport, InventoryError> {
    let columns = Columns {
        layer: roles.require(Role::Layer, table.columns())?,
        part_number: roles.require(Role::PartNumber, table.columns())?,
        id: roles.require(Role::Id, table.columns())?,
    };

    let mut report = GenerationReport::default();

    for i in 1..table.len() {
        if starts_with_digit(table.rows()[i].get(columns.id)) {
            continue;
        }

        match resolve(table.rows(), i, &columns) {
            Resolution::Created { id, path } => {
                table.rows_mut()[i].set(columns.id, id);
                sink.info(&format!("created ID for line {} (processed lines {path})", i + 1));
                report.created += 1;
            }
            Resolution::Skipped(message) => {
                sink.warn(&message);
                report.skipped += 1;
            }
            Resolution::Exhausted => {}
        }
    }

    Ok(report)
}

fn resolve(rows: &[Row], i: usize, columns: &Columns<'_>) -> Resolution {
    let line = i + 1;
    let row = &rows[i];

    let Ok(layer) = row.get(columns.layer).parse::<i64>() else {
        return Resolution::Skipped(format!(
            "failed to convert column '{}' to number on line {line}",
            columns.layer
        ));
    };

    let mut searched_layer = layer.saturating_sub(1);
    let mut path = line.to_string();

    for j in (0..i).rev() {
        if searched_layer <= 0 {
            return Resolution::Skipped(format!(
                "skipping ID generation for line {line} (processed lines {path}). Could not find a '{}' value up to '{}' 1",
                columns.id, columns.layer
            ));
        }

        let ancestor = &rows[j];
        let Ok(ancestor_layer) = ancestor.get(columns.layer).parse::<i64>() else {
            path.push_str(&format!(", {}", j + 1));
            return Resolution::Skipped(format!(
                "skipping ID generation for line {line} (processed lines {path}). Column '{}' of line {} cannot be converted to number",
                columns.layer,
                j + 1
            ));
        };

        if ancestor_layer != searched_layer {
            continue;
        }

        path.push_str(&format!(", {}", j + 1));

        let ancestor_id = ancestor.get(columns.id);
        if starts_with_digit(ancestor_id) && !ancestor_id.contains(PSEUDO_ID_SEPARATOR) {
            let id = format!(
                "{ancestor_id}{PSEUDO_ID_SEPARATOR}{}",
                row.get(columns.part_number)
            );
            return Resolution::Created { id, path };
        }

        // Unresolved or composite ancestor: look one layer further up.
        searched_layer -= 1;
    }

    Resolution::Exhausted
}

pub fn starts_with_digit(value: &str) -> bool {
    value.as_bytes().first().is_some_and(u8::is_ascii_digit)
}
