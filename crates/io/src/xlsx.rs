// Excel workbook updater: writes recorded counts into an inventory worksheet

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet};

use invmerge_inventory::{fold_case, RecordedCounts};

/// Column positions resolved from the first row of the worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColumns {
    pub id: usize,
    pub available: usize,
}

/// Statistics from an update run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct XlsxUpdateResult {
    pub sheets_written: usize,
    pub cells_written: usize,
    pub rows_updated: usize,
    /// Distinct identifiers found in the worksheet, lowercased
    pub identifiers_matched: BTreeSet<String>,
}

impl XlsxUpdateResult {
    pub fn summary(&self) -> String {
        format!(
            "Updated {} row(s) for {} identifier(s), wrote {} cell(s) in {} sheet(s)",
            self.rows_updated,
            self.identifiers_matched.len(),
            self.cells_written,
            self.sheets_written
        )
    }
}

/// Find the ID and available columns in a header row (case-insensitive).
/// When a name occurs more than once the rightmost cell wins.
pub fn resolve_header_columns(
    header: &[String],
    id_name: &str,
    available_name: &str,
    worksheet: &str,
) -> Result<HeaderColumns, String> {
    let mut id = None;
    let mut available = None;

    let id_name_folded = fold_case(id_name);
    let available_name_folded = fold_case(available_name);

    for (j, cell) in header.iter().enumerate() {
        let folded = fold_case(cell);
        if folded == id_name_folded {
            id = Some(j);
        } else if folded == available_name_folded {
            available = Some(j);
        }
    }

    let missing = |name: &str| format!("failed to find header {name} in first row of worksheet {worksheet}");
    Ok(HeaderColumns {
        id: id.ok_or_else(|| missing(id_name))?,
        available: available.ok_or_else(|| missing(available_name))?,
    })
}

/// Write recorded counts into the available column of `worksheet`.
///
/// Every sheet of `input` is read with calamine and rewritten to `output`
/// with rust_xlsxwriter. Only cell values survive the rewrite; formatting,
/// formulas and layout are not carried over. For each data row whose ID
/// (lowercased) has a recorded count, the count replaces the available
/// cell. Counts are not capped at any target quantity.
pub fn update_available_counts(
    input: &Path,
    output: &Path,
    worksheet: &str,
    id_name: &str,
    available_name: &str,
    counts: &RecordedCounts,
) -> Result<XlsxUpdateResult, String> {
    let sheets = read_sheets(input)?;

    let target = sheets
        .iter()
        .find(|(name, _)| name == worksheet)
        .map(|(_, range)| range)
        .ok_or_else(|| format!("worksheet '{worksheet}' not found in '{}'", input.display()))?;

    let columns = resolve_header_columns(&row_text(target, 0), id_name, available_name, worksheet)?;

    let mut updates: Vec<(u32, u64)> = Vec::new();
    let mut result = XlsxUpdateResult::default();
    let last_row = target.end().map(|(r, _)| r).unwrap_or(0);

    for row in 1..=last_row {
        let id = target
            .get_value((row, columns.id as u32))
            .map(cell_text)
            .unwrap_or_default();
        if id.is_empty() {
            continue;
        }
        if let Some(count) = counts.get(&id) {
            updates.push((row, count));
            result.identifiers_matched.insert(fold_case(&id));
        }
    }

    let mut xlsx_workbook = XlsxWorkbook::new();

    for (name, range) in &sheets {
        let sheet = xlsx_workbook
            .add_worksheet()
            .set_name(name)
            .map_err(|e| format!("Failed to create sheet '{}': {}", name, e))?;

        result.cells_written += write_range(sheet, range)?;

        if name == worksheet {
            let col16 = columns.available as u16;
            for &(row, count) in &updates {
                sheet
                    .write_number(row, col16, count as f64)
                    .map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col16, e))?;
            }
            result.rows_updated = updates.len();
        }

        result.sheets_written += 1;
    }

    xlsx_workbook
        .save(output)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    Ok(result)
}

fn read_sheets(path: &Path) -> Result<Vec<(String, Range<Data>)>, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err("Excel file contains no sheets".to_string());
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;
        sheets.push((sheet_name, range));
    }
    Ok(sheets)
}

/// Text of one absolute row, from column A to the last used column.
fn row_text(range: &Range<Data>, row: u32) -> Vec<String> {
    if range.is_empty() {
        return Vec::new();
    }
    let last_col = range.end().map(|(_, c)| c).unwrap_or(0);
    (0..=last_col)
        .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{}", n),
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Copy the values of `range` into `worksheet` at their original positions.
fn write_range(worksheet: &mut Worksheet, range: &Range<Data>) -> Result<usize, String> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut written = 0;

    for (row_idx, col_idx, cell) in range.cells() {
        let row32 = start_row + row_idx as u32;
        let col16 = (start_col as usize + col_idx) as u16;
        let err = |e: rust_xlsxwriter::XlsxError| {
            format!("Failed to write cell ({}, {}): {}", row32, col16, e)
        };

        match cell {
            Data::Empty => continue,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(row32, col16, s).map_err(err)?;
            }
            Data::Float(n) => {
                worksheet.write_number(row32, col16, *n).map_err(err)?;
            }
            Data::Int(n) => {
                worksheet.write_number(row32, col16, *n as f64).map_err(err)?;
            }
            Data::Bool(b) => {
                worksheet.write_boolean(row32, col16, *b).map_err(err)?;
            }
            Data::DateTime(dt) => {
                worksheet.write_number(row32, col16, dt.as_f64()).map_err(err)?;
            }
            Data::Error(e) => {
                worksheet
                    .write_string(row32, col16, format!("#{:?}", e))
                    .map_err(err)?;
            }
        }
        written += 1;
    }

    Ok(written)
}
